//! Usage status handler

use crate::handlers::AppState;
use crate::models::StatusReport;
use crate::utils::error::AppResult;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

/// Plan used when the request names none
pub const DEFAULT_PLAN: &str = "Pro";

/// Get Claude usage status
///
/// GET /status?plan=Pro
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<StatusReport>> {
    let Query(params) = query?;
    let plan = plan_param(&params);

    debug!("Received status request for plan: {}", plan);

    let report = state.status.status(plan).await?;
    Ok(Json(report))
}

/// Value of the `plan` parameter; the last one wins when repeated
fn plan_param(params: &[(String, String)]) -> &str {
    params
        .iter()
        .rev()
        .find(|(key, _)| key == "plan")
        .map(|(_, value)| value.as_str())
        .unwrap_or(DEFAULT_PLAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plan_param() {
        assert_eq!(plan_param(&params(&[])), "Pro");
        assert_eq!(plan_param(&params(&[("other", "x")])), "Pro");
        assert_eq!(plan_param(&params(&[("plan", "Max5")])), "Max5");
        assert_eq!(plan_param(&params(&[("plan", "Pro"), ("plan", "Max20")])), "Max20");
        assert_eq!(plan_param(&params(&[("plan", "")])), "");
    }
}
