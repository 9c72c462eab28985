//! Public landing endpoints

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::{
    error::ApiError, models::NovelWithAuthor, recommend::RECOMMENDATION_LIMIT, state::AppState,
};

/// Response for the landing page
#[derive(Serialize)]
pub struct HomeResponse {
    /// Most-read online novels
    pub featured: Vec<NovelWithAuthor>,
    /// Most recently published online novels
    pub new: Vec<NovelWithAuthor>,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Landing page: featured and newly published novels, no login required
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let featured = state
        .novel_repository
        .top_by_read_count(RECOMMENDATION_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to load featured novels: {}", e);
            ApiError::InternalServerError
        })?;

    let new = state
        .novel_repository
        .latest(RECOMMENDATION_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to load new novels: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(HomeResponse { featured, new }))
}
