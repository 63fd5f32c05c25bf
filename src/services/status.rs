//! Status service
//!
//! Resolves the plan, runs the probe and usage commands, and builds the report

use crate::config::{PlanTable, Settings};
use crate::models::StatusReport;
use crate::services::assembler::assemble;
use crate::services::calculator::calculate;
use crate::services::fetcher::UsageFetcher;
use crate::services::prober::LimitProber;
use crate::services::runner::CommandRunner;
use crate::utils::error::AppResult;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds status reports
#[derive(Clone)]
pub struct StatusService {
    plans: Arc<PlanTable>,
    prober: LimitProber,
    fetcher: UsageFetcher,
}

impl StatusService {
    pub fn new(plans: Arc<PlanTable>, prober: LimitProber, fetcher: UsageFetcher) -> Self {
        Self {
            plans,
            prober,
            fetcher,
        }
    }

    /// Wire the prober and fetcher to `runner` using the configured commands
    pub fn from_settings(settings: &Settings, plans: Arc<PlanTable>, runner: Arc<dyn CommandRunner>) -> Self {
        let timeout = settings.commands.timeout();
        let prober = LimitProber::new(runner.clone(), settings.commands.probe.clone(), timeout);
        let fetcher = UsageFetcher::new(runner, settings.commands.usage.clone(), timeout);
        Self::new(plans, prober, fetcher)
    }

    /// Build the status report for `plan_id`
    ///
    /// Probe problems are reported inside the result; usage problems fail the call.
    pub async fn status(&self, plan_id: &str) -> AppResult<StatusReport> {
        let plan = self.plans.resolve(plan_id)?;

        debug!("Collecting status for plan {}", plan.display_name);

        let (limit, block) = tokio::join!(self.prober.probe(), self.fetcher.fetch());
        let block = block?;

        let metrics = calculate(plan, &block, Utc::now());

        info!(
            plan = %plan.display_name,
            limit = limit.kind(),
            tokens_percent = metrics.tokens.percent,
            cost_percent = metrics.cost.percent,
            "Status collected"
        );

        Ok(assemble(limit, plan, block, metrics))
    }
}
