//! Comment handlers, open to any authenticated user

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::{Comment, CommentRequest},
    state::AppState,
};

async fn novel_must_exist(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    state
        .novel_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load novel: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Novel not found".to_string()))?;

    Ok(())
}

/// Load a comment and check it belongs to the given novel
async fn comment_of_novel(
    state: &AppState,
    novel_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, ApiError> {
    let comment = state
        .comment_repository
        .find(comment_id)
        .await
        .map_err(|e| {
            error!("Failed to load comment: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    if comment.novel_id != novel_id {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    Ok(comment)
}

/// List a novel's comment threads
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    novel_must_exist(&state, id).await?;

    let threads = state
        .comment_repository
        .list_for_novel(id)
        .await
        .map_err(|e| {
            error!("Failed to load comments: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(threads))
}

/// Post a top-level comment
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest(
            "Comment content must not be empty".to_string(),
        ));
    }

    novel_must_exist(&state, id).await?;

    let comment_id = state
        .comment_repository
        .insert(id, None, user.id, content)
        .await
        .map_err(|e| {
            error!("Failed to insert comment: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"comment_id": comment_id, "message": "Comment posted"})),
    ))
}

/// Reply to a top-level comment
pub async fn reply_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest(
            "Reply content must not be empty".to_string(),
        ));
    }

    let parent = comment_of_novel(&state, id, comment_id).await?;

    if parent.parent_id.is_some() {
        return Err(ApiError::BadRequest(
            "Replies can only target top-level comments".to_string(),
        ));
    }

    let reply_id = state
        .comment_repository
        .insert(id, Some(parent.id), user.id, content)
        .await
        .map_err(|e| {
            error!("Failed to insert reply: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"comment_id": reply_id, "message": "Reply posted"})),
    ))
}

/// Delete one's own comment (replies included)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = comment_of_novel(&state, id, comment_id).await?;

    if comment.user_id != user.id {
        return Err(ApiError::PermissionDenied);
    }

    state
        .comment_repository
        .delete_thread(comment_id)
        .await
        .map_err(|e| {
            error!("Failed to delete comment: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"message": "Comment deleted"})))
}
