//! Service layer module
//!
//! Contains the command runner, limit prober, usage fetcher, calculator and status service

pub mod assembler;
pub mod calculator;
pub mod fetcher;
pub mod prober;
pub mod runner;
pub mod status;

pub use calculator::{calculate, UsageMetrics};
pub use fetcher::UsageFetcher;
pub use prober::LimitProber;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner, RunError};
pub use status::StatusService;
