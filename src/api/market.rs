use crate::error::{AppError, Result};
use crate::services::prompt::build_market_analysis_prompt;
use crate::types::{
    AnalysisRequest, AnalysisResponse, GlobalIndexEntry, IndexOverview, MiniIndexData,
};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Intervals accepted by the mini-index endpoint.
pub const VALID_INTERVALS: [&str; 5] = ["1m", "5m", "15m", "30m", "1h"];

/// Query params for the mini-index endpoint.
#[derive(Debug, Deserialize)]
pub struct MiniIndexQuery {
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_interval() -> String {
    "15m".to_string()
}

/// GET /api/market/indices
async fn get_indices(State(state): State<AppState>) -> Json<BTreeMap<String, GlobalIndexEntry>> {
    Json(state.market.global_indices().await)
}

/// GET /api/market/ibov
async fn get_index_overview(State(state): State<AppState>) -> Result<Json<IndexOverview>> {
    let overview = state.market.index_overview().await?;
    Ok(Json(overview))
}

/// GET /api/market/win?interval=15m
async fn get_mini_index(
    State(state): State<AppState>,
    Query(query): Query<MiniIndexQuery>,
) -> Result<Json<MiniIndexData>> {
    if !VALID_INTERVALS.contains(&query.interval.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Intervalo inválido. Use: {}",
            VALID_INTERVALS.join(", ")
        )));
    }

    let data = state.market.mini_index(&query.interval).await?;
    Ok(Json(data))
}

/// POST /api/market/analysis
async fn generate_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>> {
    let client = state.openrouter.as_ref().ok_or_else(|| {
        AppError::Internal("OPENROUTER_API_KEY is not configured".to_string())
    })?;

    // The 15-minute mini-index read is context, not a hard dependency.
    let mini_index = match state.market.mini_index("15m").await {
        Ok(data) => Some(data),
        Err(e) => {
            warn!("Mini-index context unavailable for analysis: {}", e);
            None
        }
    };

    let prompt = build_market_analysis_prompt(&request, mini_index.as_ref());
    let analysis = client
        .generate(&prompt)
        .await
        .map_err(AppError::ExternalApi)?;

    Ok(Json(AnalysisResponse { analysis }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/indices", get(get_indices))
        .route("/ibov", get(get_index_overview))
        .route("/win", get(get_mini_index))
        .route("/analysis", post(generate_analysis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn test_valid_intervals() {
        assert_eq!(VALID_INTERVALS.len(), 5);
        assert!(VALID_INTERVALS.contains(&"15m"));
        assert!(!VALID_INTERVALS.contains(&"2h"));
        assert!(!VALID_INTERVALS.contains(&"1d"));
    }

    #[test]
    fn test_mini_index_query_default() {
        let uri: Uri = "/api/market/win".parse().unwrap();
        let Query(query) = Query::<MiniIndexQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.interval, "15m");
    }

    #[test]
    fn test_mini_index_query_explicit() {
        let uri: Uri = "/api/market/win?interval=5m".parse().unwrap();
        let Query(query) = Query::<MiniIndexQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.interval, "5m");
    }

    #[test]
    fn test_invalid_interval_message() {
        let message = format!("Intervalo inválido. Use: {}", VALID_INTERVALS.join(", "));
        assert_eq!(message, "Intervalo inválido. Use: 1m, 5m, 15m, 30m, 1h");
    }
}
