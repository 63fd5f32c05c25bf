//! Usage calculator
//!
//! Derives percentages, burn rates and time projections from a usage block

use crate::config::PlanConfig;
use crate::models::{Exhaustion, Predictions, TimeToReset, UsageBlock, UsageGauge};
use chrono::{DateTime, Datelike, Duration, Utc};

/// Keeps the duration arithmetic in range before the year check applies
const MAX_PROJECTION_MILLIS: f64 = 1e15;

/// Last year that renders as four digits in `YYYY-MM-DD HH:MM UTC`
const MAX_PROJECTION_YEAR: i32 = 9999;

/// Figures derived from one usage block
#[derive(Debug, Clone, PartialEq)]
pub struct UsageMetrics {
    pub cost: UsageGauge<f64, f64>,
    pub tokens: UsageGauge<f64, u64>,
    pub messages: UsageGauge<u64, u64>,
    pub time_to_reset: TimeToReset,
    pub burn_rate: f64,
    pub cost_rate: f64,
    pub predictions: Predictions,
}

/// Compute all derived figures for `block` against `plan` at instant `now`
pub fn calculate(plan: &PlanConfig, block: &UsageBlock, now: DateTime<Utc>) -> UsageMetrics {
    // Plan token limits are in thousands, so compare in the same unit
    let tokens_used = block.total_tokens as f64 / 1000.0;

    let reset_at = block.end_time;
    let remaining_minutes = (reset_at - now).num_seconds().div_euclid(60).max(0) as u64;

    let burn_rate = block.tokens_per_minute();
    let cost_per_hour = block.cost_per_hour();
    let cost_rate = if cost_per_hour != 0.0 {
        cost_per_hour / 60.0
    } else {
        0.0
    };

    UsageMetrics {
        cost: UsageGauge {
            used: block.cost_usd,
            limit: plan.cost_limit,
            percent: round_to(percent(block.cost_usd, plan.cost_limit), 1),
        },
        tokens: UsageGauge {
            used: tokens_used,
            limit: plan.token_limit,
            percent: round_to(percent(tokens_used, plan.token_limit as f64), 1),
        },
        messages: UsageGauge {
            used: block.entries,
            limit: plan.message_limit,
            percent: round_to(percent(block.entries as f64, plan.message_limit as f64), 1),
        },
        time_to_reset: TimeToReset {
            remaining_minutes,
            reset_at,
        },
        burn_rate,
        cost_rate: round_to(cost_rate, 4),
        predictions: Predictions {
            tokens_will_run_out: project_exhaustion(plan, block.total_tokens, burn_rate, now),
            limit_resets_at: reset_at,
        },
    }
}

/// `used / limit * 100`, or zero for a zero limit
pub fn percent(used: f64, limit: f64) -> f64 {
    if limit != 0.0 {
        used / limit * 100.0
    } else {
        0.0
    }
}

/// When the remaining raw tokens run out at `tokens_per_minute`
pub fn project_exhaustion(
    plan: &PlanConfig,
    total_tokens: u64,
    tokens_per_minute: f64,
    now: DateTime<Utc>,
) -> Exhaustion {
    if tokens_per_minute.is_nan() || tokens_per_minute <= 0.0 {
        return Exhaustion::NotApplicable;
    }

    let remaining_tokens = (plan.token_limit.saturating_mul(1000)).saturating_sub(total_tokens);
    let millis = remaining_tokens as f64 / tokens_per_minute * 60_000.0;
    if !millis.is_finite() || millis > MAX_PROJECTION_MILLIS {
        return Exhaustion::NotApplicable;
    }

    match now.checked_add_signed(Duration::milliseconds(millis.round() as i64)) {
        Some(at) if at.year() <= MAX_PROJECTION_YEAR => Exhaustion::At(at),
        _ => Exhaustion::NotApplicable,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
