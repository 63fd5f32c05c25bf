//! Response assembler

use crate::config::PlanConfig;
use crate::models::{LimitProbeResult, StatusReport, UsageBlock};
use crate::services::calculator::UsageMetrics;

/// Merge probe result, block pass-through fields and derived metrics
pub fn assemble(
    limit: LimitProbeResult,
    plan: &PlanConfig,
    block: UsageBlock,
    metrics: UsageMetrics,
) -> StatusReport {
    StatusReport {
        limit,
        plan: plan.display_name.clone(),
        active: block.is_active,
        models: block.models,
        cost: metrics.cost,
        tokens: metrics.tokens,
        messages: metrics.messages,
        time_to_reset: metrics.time_to_reset,
        burn_rate: metrics.burn_rate,
        cost_rate: metrics.cost_rate,
        predictions: metrics.predictions,
    }
}
