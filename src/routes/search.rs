use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{SearchRequest, SearchResponse};
use crate::services::trip_service::PlanError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/search", post(search))
}

/// POST /search
/// Plan a weekend trip from a free-text query.
#[axum::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    info!("POST /search - query: {}", request.query);

    let response = state
        .planner
        .plan(&request.query)
        .await
        .map_err(|e| match e {
            PlanError::NoEntitiesFound => AppError::NoPlacesFound,
        })?;

    Ok(Json(response))
}
