//! Data models module
//!
//! Defines the ccusage report input and the status response output

pub mod status;
pub mod usage;

pub use status::{
    Exhaustion, LimitProbeResult, Predictions, StatusReport, TimeToReset, UsageGauge,
};
pub use usage::{BurnRate, UsageBlock, UsageReport};
