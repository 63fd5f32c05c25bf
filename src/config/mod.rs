//! Configuration management module
//!
//! Responsible for loading server settings from the environment and holding the static plan table

pub mod plans;
pub mod settings;

pub use plans::{PlanConfig, PlanTable, PlanTier};
pub use settings::Settings;
