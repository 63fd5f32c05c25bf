//! ccusage data models
//!
//! Defines the subset of the `ccusage blocks --json` report the service reads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level report printed by the usage command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    /// Billing blocks, active block first
    #[serde(default)]
    pub blocks: Vec<UsageBlock>,
}

/// A single 5-hour billing block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageBlock {
    /// Whether the block is the current one
    #[serde(default)]
    pub is_active: bool,
    /// Cost so far in USD
    #[serde(rename = "costUSD", default)]
    pub cost_usd: f64,
    /// Raw token count
    #[serde(default)]
    pub total_tokens: u64,
    /// Message count
    #[serde(default)]
    pub entries: u64,
    /// When the block ends and limits reset
    pub end_time: DateTime<Utc>,
    /// Current consumption rate (optional)
    #[serde(default)]
    pub burn_rate: Option<BurnRate>,
    /// Models used in this block, passed through untouched
    #[serde(default)]
    pub models: Vec<serde_json::Value>,
}

/// Consumption rate of a block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRate {
    /// Tokens per minute used for the burn indicator
    #[serde(default)]
    pub tokens_per_minute_for_indicator: Option<f64>,
    /// Cost per hour in USD
    #[serde(default)]
    pub cost_per_hour: Option<f64>,
}

impl UsageBlock {
    /// Tokens per minute, zero when unknown
    pub fn tokens_per_minute(&self) -> f64 {
        self.burn_rate
            .as_ref()
            .and_then(|b| b.tokens_per_minute_for_indicator)
            .unwrap_or(0.0)
    }

    /// Cost per hour, zero when unknown
    pub fn cost_per_hour(&self) -> f64 {
        self.burn_rate
            .as_ref()
            .and_then(|b| b.cost_per_hour)
            .unwrap_or(0.0)
    }
}
