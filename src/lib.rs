//! CCUsage Status API Library
//!
//! Reports Claude usage, burn rate and rate-limit status by combining the
//! output of an external probe command with a ccusage JSON usage report

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::{PlanConfig, PlanTable, PlanTier, Settings};
pub use handlers::{create_router, AppState};
pub use models::{LimitProbeResult, StatusReport, UsageBlock};
pub use services::{CommandRunner, ProcessRunner, StatusService};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
