use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde_json::json;
use tracing::error;

use crate::config::Settings;
use crate::error::LindyError;
use crate::loader::{load_table, GraftTable};
use crate::scoring::{calculate_breakdowns, calculate_scores, LindyBreakdown};

pub type SharedState = Arc<Settings>;

/// Map every pipeline failure to a 500 with a `{"error": ...}` body.
/// Request errors never crash the process.
impl IntoResponse for LindyError {
    fn into_response(self) -> Response {
        error!(code = self.code(), "request failed: {}", self);
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Build the router. State is just the immutable settings; every request
/// runs its own fetch-parse-score pass with nothing shared or cached.
pub fn build_router(settings: Settings) -> Router {
    let shared: SharedState = Arc::new(settings);

    Router::new()
        .route("/", get(scores))
        .route("/breakdown", get(breakdowns))
        .route("/records", get(records))
        .with_state(shared)
}

async fn scores(
    State(state): State<SharedState>,
) -> Result<Json<BTreeMap<String, f64>>, LindyError> {
    let table = load_table(&state).await?;
    let scores = calculate_scores(&table, Utc::now().year(), state.record_policy)?;
    Ok(Json(scores))
}

async fn breakdowns(
    State(state): State<SharedState>,
) -> Result<Json<BTreeMap<String, LindyBreakdown>>, LindyError> {
    let table = load_table(&state).await?;
    let breakdowns = calculate_breakdowns(&table, Utc::now().year(), state.record_policy)?;
    Ok(Json(breakdowns))
}

async fn records(State(state): State<SharedState>) -> Result<Json<GraftTable>, LindyError> {
    let table = load_table(&state).await?;
    Ok(Json(table))
}
