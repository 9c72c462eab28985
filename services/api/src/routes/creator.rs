//! Creator-facing handlers: novel and chapter management, import, submit

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    import::{self, FREE_CHAPTER_COUNT},
    middleware::AuthUser,
    models::{
        novel::is_valid_category, ChapterRequest, CreateNovelRequest, ImportRequest, Novel,
        NovelStatus, Role, UpdateNovelRequest,
    },
    state::AppState,
};

/// Response for the creator dashboard
#[derive(Serialize)]
pub struct CreatorDashboardResponse {
    pub novels: Vec<Novel>,
    pub total_novels: usize,
    pub online_novels: usize,
    pub total_reads: i64,
}

/// Load a novel and check the caller owns it
async fn owned_novel(state: &AppState, user: &AuthUser, id: Uuid) -> Result<Novel, ApiError> {
    let novel = state
        .novel_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load novel: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Novel not found".to_string()))?;

    if novel.author_id != user.id {
        return Err(ApiError::PermissionDenied);
    }

    Ok(novel)
}

fn validate_novel_payload(title: &str, category: &str, price: f64) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    if !is_valid_category(category) {
        return Err(ApiError::BadRequest(format!(
            "Unknown category: {}",
            category
        )));
    }
    if price < 0.0 {
        return Err(ApiError::BadRequest(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Creator dashboard: own novels plus aggregate counters
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;

    let novels = state
        .novel_repository
        .by_author(user.id)
        .await
        .map_err(|e| {
            error!("Failed to load novels: {}", e);
            ApiError::InternalServerError
        })?;

    let total_novels = novels.len();
    let online_novels = novels
        .iter()
        .filter(|n| n.status == NovelStatus::Online)
        .count();
    let total_reads = novels.iter().map(|n| n.read_count).sum();

    Ok(Json(CreatorDashboardResponse {
        novels,
        total_novels,
        online_novels,
        total_reads,
    }))
}

/// List the creator's own novels
pub async fn my_novels(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;

    let novels = state
        .novel_repository
        .by_author(user.id)
        .await
        .map_err(|e| {
            error!("Failed to load novels: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(novels))
}

/// Create a novel draft
pub async fn create_novel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(mut payload): Json<CreateNovelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;

    validate_novel_payload(&payload.title, &payload.category, payload.price)?;
    payload.tags = clean_tags(&payload.tags);

    let novel = state
        .novel_repository
        .create(user.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create novel: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Creator {} created novel {}", user.id, novel.id);

    Ok((StatusCode::CREATED, Json(novel)))
}

/// Update an owned novel's details
pub async fn update_novel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateNovelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;
    owned_novel(&state, &user, id).await?;

    validate_novel_payload(&payload.title, &payload.category, payload.price)?;
    payload.tags = clean_tags(&payload.tags);

    state
        .novel_repository
        .update_details(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update novel: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"message": "Novel updated"})))
}

/// Add a chapter to an owned novel
pub async fn add_chapter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChapterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;
    owned_novel(&state, &user, id).await?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Chapter title is required".to_string()));
    }

    let count = state.chapter_repository.count(id).await.map_err(|e| {
        error!("Failed to count chapters: {}", e);
        ApiError::InternalServerError
    })?;

    let chapter_id = import::chapter_id(count as usize + 1);
    let chapter = state
        .chapter_repository
        .insert(id, &chapter_id, &payload.title, &payload.content, payload.is_free)
        .await
        .map_err(|e| {
            error!("Failed to insert chapter: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(chapter)))
}

/// Edit a chapter of an owned novel
pub async fn update_chapter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, chapter_id)): Path<(Uuid, String)>,
    Json(payload): Json<ChapterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;
    owned_novel(&state, &user, id).await?;

    let updated = state
        .chapter_repository
        .update(id, &chapter_id, &payload.title, &payload.content, payload.is_free)
        .await
        .map_err(|e| {
            error!("Failed to update chapter: {}", e);
            ApiError::InternalServerError
        })?;

    if !updated {
        return Err(ApiError::NotFound("Chapter not found".to_string()));
    }

    Ok(Json(json!({"message": "Chapter updated"})))
}

/// Delete a chapter of an owned novel
pub async fn delete_chapter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, chapter_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;
    owned_novel(&state, &user, id).await?;

    let deleted = state
        .chapter_repository
        .delete(id, &chapter_id)
        .await
        .map_err(|e| {
            error!("Failed to delete chapter: {}", e);
            ApiError::InternalServerError
        })?;

    if !deleted {
        return Err(ApiError::NotFound("Chapter not found".to_string()));
    }

    Ok(Json(json!({"message": "Chapter deleted"})))
}

/// Import chapters from raw text
///
/// Splits the text on recognized chapter headings; ids continue after any
/// existing chapters, and the first three chapters of the import are free.
pub async fn import_chapters(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;
    owned_novel(&state, &user, id).await?;

    if payload.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Import text is empty".to_string()));
    }

    let chapters = import::parse_chapters(&payload.content);

    let offset = state.chapter_repository.count(id).await.map_err(|e| {
        error!("Failed to count chapters: {}", e);
        ApiError::InternalServerError
    })? as usize;

    for (idx, chapter) in chapters.iter().enumerate() {
        let chapter_id = import::chapter_id(offset + idx + 1);
        state
            .chapter_repository
            .insert(
                id,
                &chapter_id,
                &chapter.title,
                &chapter.content,
                idx < FREE_CHAPTER_COUNT,
            )
            .await
            .map_err(|e| {
                error!("Failed to insert imported chapter: {}", e);
                ApiError::InternalServerError
            })?;
    }

    info!("Imported {} chapters into novel {}", chapters.len(), id);

    Ok(Json(json!({
        "imported": chapters.len(),
        "message": "Chapters imported"
    })))
}

/// Submit an owned draft novel for review
pub async fn submit_novel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Creator)?;
    let novel = owned_novel(&state, &user, id).await?;

    if novel.status != NovelStatus::Draft {
        return Err(ApiError::InvalidState(format!(
            "Only draft novels can be submitted (current status: {})",
            novel.status
        )));
    }

    let chapter_count = state.chapter_repository.count(id).await.map_err(|e| {
        error!("Failed to count chapters: {}", e);
        ApiError::InternalServerError
    })?;

    if chapter_count == 0 {
        return Err(ApiError::InvalidState(
            "Add at least one chapter before submitting for review".to_string(),
        ));
    }

    state
        .novel_repository
        .set_status(id, NovelStatus::Pending)
        .await
        .map_err(|e| {
            error!("Failed to submit novel: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"message": "Novel submitted for review"})))
}
