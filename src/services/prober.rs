//! Rate-limit prober
//!
//! Runs a cheap prompt through the Claude CLI and classifies the answer

use crate::models::LimitProbeResult;
use crate::services::runner::CommandRunner;
use crate::utils::text::truncate_chars;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest message kept from probe output
pub const MAX_PROBE_MESSAGE_CHARS: usize = 500;

// "5-hour limit reached" (and the CLI's "readched" typo) or any "rate limit"
static LIMIT_HIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:5\s*[- ]?\s*hour\s+limit\s+(?:reached|readched)|rate\s*limit)").unwrap()
});

// "resets at 5pm", "reset in: 2h", ...
static RESET_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:resets?\s*(?:at|on|in)?\s*[:\-]?\s*)[^\n\r]+").unwrap());

/// Probes the CLI for rate-limit state
#[derive(Clone)]
pub struct LimitProber {
    runner: Arc<dyn CommandRunner>,
    command: Vec<String>,
    timeout: Duration,
}

impl LimitProber {
    pub fn new(runner: Arc<dyn CommandRunner>, command: Vec<String>, timeout: Duration) -> Self {
        Self {
            runner,
            command,
            timeout,
        }
    }

    /// Run the probe command and classify its output
    ///
    /// Never fails: execution errors become [`LimitProbeResult::Error`].
    pub async fn probe(&self) -> LimitProbeResult {
        let result = match self.runner.run(&self.command, self.timeout).await {
            Ok(output) => classify_output(&output.output),
            Err(e) => {
                warn!("Limit probe failed to run: {}", e);
                LimitProbeResult::Error {
                    message: truncate_chars(&e.to_string(), MAX_PROBE_MESSAGE_CHARS).to_string(),
                }
            }
        };

        match &result {
            LimitProbeResult::LimitHit { .. } => info!("Limit probe reports a rate limit"),
            other => debug!("Limit probe result: {}", other.kind()),
        }

        result
    }
}

/// Classify probe output
///
/// Limit patterns win over everything else. Otherwise the answer must
/// contain a "2" (the probe asks for 1+1) to count as a healthy reply.
pub fn classify_output(output: &str) -> LimitProbeResult {
    if LIMIT_HIT_RE.is_match(output) || RESET_HINT_RE.is_match(output) {
        return LimitProbeResult::LimitHit {
            message: truncate_chars(output, MAX_PROBE_MESSAGE_CHARS).to_string(),
        };
    }

    let trimmed = output.trim();
    if !trimmed.contains('2') {
        return LimitProbeResult::Error {
            message: truncate_chars(output, MAX_PROBE_MESSAGE_CHARS).to_string(),
        };
    }

    LimitProbeResult::NotLimited {
        message: trimmed.to_string(),
    }
}
