//! Usage fetcher
//!
//! Runs ccusage and extracts the active billing block from its JSON report

use crate::models::{UsageBlock, UsageReport};
use crate::services::runner::CommandRunner;
use crate::utils::error::{AppError, AppResult};
use crate::utils::text::truncate_chars;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Longest slice of failed command output echoed back to clients
pub const MAX_FETCH_DETAIL_CHARS: usize = 200;

/// Fetches the active usage block
#[derive(Clone)]
pub struct UsageFetcher {
    runner: Arc<dyn CommandRunner>,
    command: Vec<String>,
    timeout: Duration,
}

impl UsageFetcher {
    pub fn new(runner: Arc<dyn CommandRunner>, command: Vec<String>, timeout: Duration) -> Self {
        Self {
            runner,
            command,
            timeout,
        }
    }

    /// Run the usage command and return its first block
    pub async fn fetch(&self) -> AppResult<UsageBlock> {
        let output = self.runner.run(&self.command, self.timeout).await?;

        if !output.success() {
            error!("Usage command exited with code {}", output.exit_code);
            return Err(AppError::FetchFailed(
                truncate_chars(&output.output, MAX_FETCH_DETAIL_CHARS).to_string(),
            ));
        }

        let block = parse_active_block(&output.output)?;
        debug!(
            "Fetched usage block: {} tokens, ${:.2}, {} entries",
            block.total_tokens, block.cost_usd, block.entries
        );

        Ok(block)
    }
}

/// Decode a usage report and take its first block
pub fn parse_active_block(raw: &str) -> AppResult<UsageBlock> {
    let report: UsageReport = serde_json::from_str(raw)
        .map_err(|e| AppError::MalformedResponse(format!("invalid usage JSON: {}", e)))?;

    report
        .blocks
        .into_iter()
        .next()
        .ok_or_else(|| AppError::MalformedResponse("usage report contains no blocks".to_string()))
}
