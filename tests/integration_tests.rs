//! Integration tests
//!
//! Test end-to-end functionality of the entire application

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use ccusage_api::services::{CommandOutput, CommandRunner, RunError};
use ccusage_api::{create_router, Settings};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Scripted reply of the fake runner
#[derive(Clone)]
enum Reply {
    Output(i32, String),
    Timeout,
}

/// Runner answering the probe and usage commands from a script
struct FakeRunner {
    probe: Reply,
    usage: Reply,
    calls: AtomicUsize,
}

impl FakeRunner {
    fn new(probe: Reply, usage: Reply) -> Arc<Self> {
        Arc::new(Self {
            probe,
            usage,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput, RunError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = if argv.starts_with(&["claude".to_string(), "-p".to_string()]) {
            self.probe.clone()
        } else if argv.starts_with(&["npx".to_string(), "ccusage@latest".to_string(), "blocks".to_string()]) {
            self.usage.clone()
        } else {
            Reply::Output(1, "error".to_string())
        };

        match reply {
            Reply::Output(code, out) => Ok(CommandOutput::new(code, &out, "")),
            Reply::Timeout => Err(RunError::Timeout {
                program: argv[0].clone(),
                seconds: timeout.as_secs(),
            }),
        }
    }
}

fn usage_json() -> String {
    json!({
        "blocks": [{
            "isActive": true,
            "costUSD": 6.4,
            "totalTokens": 15827,
            "entries": 180,
            "endTime": "2025-08-23T14:00:00.000Z",
            "burnRate": {
                "tokensPerMinuteForIndicator": 128.9,
                "costPerHour": 3.366
            }
        }]
    })
    .to_string()
}

fn ok(out: &str) -> Reply {
    Reply::Output(0, out.to_string())
}

async fn app_with(runner: Arc<FakeRunner>) -> Router {
    create_router(Settings::default(), runner)
        .await
        .expect("Failed to create router")
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_status_normal() {
    let app = app_with(FakeRunner::new(ok("2"), ok(&usage_json()))).await;

    let (status, data) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["plan"], "Pro");
    assert_eq!(data["active"], true);
    assert_eq!(data["limit"]["type"], "not_limited");
    assert_eq!(data["limit"]["message"], "2");
    assert_eq!(data["tokens"]["used"], 15.827);
    assert_eq!(data["tokens"]["limit"], 19_000);
    assert_eq!(data["tokens"]["percent"], 0.1);
    assert_eq!(data["cost"]["used"], 6.4);
    assert_eq!(data["cost"]["limit"], 18.0);
    assert_eq!(data["cost"]["percent"], 35.6);
    assert_eq!(data["messages"]["used"], 180);
    assert_eq!(data["messages"]["limit"], 250);
    assert_eq!(data["messages"]["percent"], 72.0);
    assert_eq!(data["models"], json!([]));
    assert_eq!(data["burn_rate"], 128.9);
    assert_eq!(data["cost_rate"], 0.0561);
    assert_eq!(data["time_to_reset"]["reset_at"], "2025-08-23 14:00 UTC");
    assert_eq!(data["predictions"]["limit_resets_at"], "2025-08-23 14:00 UTC");
    assert!(data["time_to_reset"]["remaining_minutes"].is_u64());

    let run_out = data["predictions"]["tokens_will_run_out"].as_str().unwrap();
    assert!(run_out.ends_with(" UTC"), "got {}", run_out);
}

#[tokio::test]
async fn test_status_default_plan_is_pro() {
    let app = app_with(FakeRunner::new(ok("2"), ok(&usage_json()))).await;

    let (status, data) = get(app, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["plan"], "Pro");
}

#[tokio::test]
async fn test_status_max20_plan() {
    let app = app_with(FakeRunner::new(ok("2"), ok(&usage_json()))).await;

    let (status, data) = get(app, "/status?plan=Max20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["plan"], "Max20");
    assert_eq!(data["tokens"]["limit"], 220_000);
    assert_eq!(data["cost"]["limit"], 140.0);
    assert_eq!(data["messages"]["limit"], 2_000);
}

#[tokio::test]
async fn test_repeated_plan_takes_last_value() {
    let app = app_with(FakeRunner::new(ok("2"), ok(&usage_json()))).await;

    let (status, data) = get(app.clone(), "/status?plan=Pro&plan=Pro").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["plan"], "Pro");

    let (status, data) = get(app.clone(), "/status?plan=Pro&plan=Max5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["plan"], "Max5");

    let (status, data) = get(app, "/status?plan=Max5&plan=Team").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["detail"], "Unknown plan: Team");
}

#[tokio::test]
async fn test_status_limit() {
    let app = app_with(FakeRunner::new(ok("5-hour limit reached"), ok(&usage_json()))).await;

    let (status, data) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["limit"]["type"], "limit");
    assert_eq!(data["limit"]["message"], "5-hour limit reached");
}

#[tokio::test]
async fn test_probe_failure_is_not_fatal() {
    let app = app_with(FakeRunner::new(Reply::Timeout, ok(&usage_json()))).await;

    let (status, data) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["limit"]["type"], "error");
    assert_eq!(data["limit"]["message"], "claude timed out after 30 seconds");
    assert_eq!(data["tokens"]["used"], 15.827);
}

#[tokio::test]
async fn test_unexpected_probe_answer_is_error() {
    let app = app_with(FakeRunner::new(ok("I can't help with that"), ok(&usage_json()))).await;

    let (status, data) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["limit"]["type"], "error");
}

#[tokio::test]
async fn test_ccusage_failure() {
    let app = app_with(FakeRunner::new(ok("2"), Reply::Output(1, "ccusage error".to_string()))).await;

    let (status, data) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(data["detail"], "ccusage failed: ccusage error");
}

#[tokio::test]
async fn test_ccusage_failure_detail_is_truncated() {
    let output = "x".repeat(1000);
    let app = app_with(FakeRunner::new(ok("2"), Reply::Output(2, output))).await;

    let (status, data) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let detail = data["detail"].as_str().unwrap();
    assert_eq!(detail, format!("ccusage failed: {}", "x".repeat(200)));
}

#[tokio::test]
async fn test_ccusage_timeout() {
    let app = app_with(FakeRunner::new(ok("2"), Reply::Timeout)).await;

    let (status, data) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(data["detail"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_ccusage_malformed_json() {
    let app = app_with(FakeRunner::new(ok("2"), ok("not json at all"))).await;

    let (status, data) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(data["detail"].as_str().unwrap().starts_with("Malformed usage response"));
}

#[tokio::test]
async fn test_ccusage_empty_blocks() {
    let app = app_with(FakeRunner::new(ok("2"), ok(r#"{"blocks": []}"#))).await;

    let (status, _) = get(app, "/status?plan=Pro").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unknown_plan() {
    let runner = FakeRunner::new(ok("2"), ok(&usage_json()));
    let app = app_with(runner.clone()).await;

    let (status, data) = get(app, "/status?plan=Enterprise").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["detail"], "Unknown plan: Enterprise");
    // No command is run for a bad plan
    assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_plan_is_case_sensitive() {
    let app = app_with(FakeRunner::new(ok("2"), ok(&usage_json()))).await;

    let (status, _) = get(app, "/status?plan=pro").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let runner = FakeRunner::new(Reply::Timeout, Reply::Timeout);
    let app = app_with(runner.clone()).await;

    let (status, data) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data, json!({"status": "healthy", "service": "ccusage_api"}));
    assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app_with(FakeRunner::new(ok("2"), ok(&usage_json()))).await;

    let (status, _) = get(app, "/v1/messages").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
