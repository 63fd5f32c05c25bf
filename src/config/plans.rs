//! Subscription plan table
//!
//! Maps plan identifiers to their token, cost and message caps

use crate::utils::error::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Known subscription tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlanTier {
    Pro,
    Max5,
    Max20,
}

impl PlanTier {
    /// All tiers in table order
    pub const ALL: [PlanTier; 3] = [PlanTier::Pro, PlanTier::Max5, PlanTier::Max20];

    /// Identifier used in the `plan` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Pro => "Pro",
            PlanTier::Max5 => "Max5",
            PlanTier::Max20 => "Max20",
        }
    }

    /// Parse an identifier, matching case-sensitively
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == id)
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limits of a single plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanConfig {
    /// Token cap in thousands of tokens
    pub token_limit: u64,
    /// Cost cap in USD
    pub cost_limit: f64,
    /// Message cap
    pub message_limit: u64,
    /// Name reported back to clients
    pub display_name: String,
}

/// Read-only plan table, built once at startup
#[derive(Debug, Clone)]
pub struct PlanTable {
    plans: Vec<(PlanTier, PlanConfig)>,
}

impl PlanTable {
    /// Built-in limits for every known tier
    pub fn builtin() -> Self {
        let plans = PlanTier::ALL
            .into_iter()
            .map(|tier| {
                let (token_limit, cost_limit, message_limit) = match tier {
                    PlanTier::Pro => (19_000, 18.0, 250),
                    PlanTier::Max5 => (88_000, 35.0, 1_000),
                    PlanTier::Max20 => (220_000, 140.0, 2_000),
                };
                let config = PlanConfig {
                    token_limit,
                    cost_limit,
                    message_limit,
                    display_name: tier.as_str().to_string(),
                };
                (tier, config)
            })
            .collect();

        Self { plans }
    }

    /// Look up the limits for a tier
    pub fn get(&self, tier: PlanTier) -> Option<&PlanConfig> {
        self.plans
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, config)| config)
    }

    /// Resolve a plan identifier from a request
    pub fn resolve(&self, id: &str) -> AppResult<&PlanConfig> {
        PlanTier::parse(id)
            .and_then(|tier| self.get(tier))
            .ok_or_else(|| AppError::UnknownPlan(id.to_string()))
    }
}

impl Default for PlanTable {
    fn default() -> Self {
        Self::builtin()
    }
}
