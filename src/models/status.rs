//! Status response models
//!
//! Defines the `/status` response body and its parts

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Human readable UTC timestamp format used in responses
pub const UTC_MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Sentinel reported when no exhaustion time can be projected
pub const NOT_APPLICABLE: &str = "N/A";

/// Outcome of the rate-limit probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LimitProbeResult {
    /// Probe could not run or answered unexpectedly
    Error { message: String },
    /// Probe output reported a rate limit
    #[serde(rename = "limit")]
    LimitHit { message: String },
    /// Probe answered normally
    NotLimited { message: String },
}

impl LimitProbeResult {
    /// Wire discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            LimitProbeResult::Error { .. } => "error",
            LimitProbeResult::LimitHit { .. } => "limit",
            LimitProbeResult::NotLimited { .. } => "not_limited",
        }
    }

    /// Message carried by any variant
    pub fn message(&self) -> &str {
        match self {
            LimitProbeResult::Error { message }
            | LimitProbeResult::LimitHit { message }
            | LimitProbeResult::NotLimited { message } => message,
        }
    }
}

/// Usage against a cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageGauge<U, L> {
    /// Amount used
    pub used: U,
    /// Plan cap
    pub limit: L,
    /// `used / limit * 100`, rounded to one decimal
    pub percent: f64,
}

/// Time until the current block resets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeToReset {
    /// Whole minutes left, never negative
    pub remaining_minutes: u64,
    /// Reset instant
    #[serde(with = "utc_minute")]
    pub reset_at: DateTime<Utc>,
}

/// Projected token exhaustion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    /// Tokens run out at this instant
    At(DateTime<Utc>),
    /// No burn rate to project from
    NotApplicable,
}

/// Time-based predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    /// When tokens will run out at the current burn rate
    pub tokens_will_run_out: Exhaustion,
    /// When the limit resets
    #[serde(with = "utc_minute")]
    pub limit_resets_at: DateTime<Utc>,
}

/// `/status` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub limit: LimitProbeResult,
    pub plan: String,
    pub active: bool,
    pub models: Vec<serde_json::Value>,
    pub cost: UsageGauge<f64, f64>,
    /// Tokens in thousands
    pub tokens: UsageGauge<f64, u64>,
    pub messages: UsageGauge<u64, u64>,
    pub time_to_reset: TimeToReset,
    /// Tokens per minute
    pub burn_rate: f64,
    /// Cost per minute in USD
    pub cost_rate: f64,
    pub predictions: Predictions,
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exhaustion::At(at) => write!(f, "{}", at.format(UTC_MINUTE_FORMAT)),
            Exhaustion::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Exhaustion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Exhaustion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == NOT_APPLICABLE {
            return Ok(Exhaustion::NotApplicable);
        }
        utc_minute::parse(&s)
            .map(Exhaustion::At)
            .map_err(serde::de::Error::custom)
    }
}

/// Serde helpers for `YYYY-MM-DD HH:MM UTC` timestamps
pub mod utc_minute {
    use super::*;

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&at.format(UTC_MINUTE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    /// Parse a formatted timestamp back into an instant
    pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, UTC_MINUTE_FORMAT).map(|naive| Utc.from_utc_datetime(&naive))
    }
}
