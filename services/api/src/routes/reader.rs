//! Reader-facing handlers: catalog, detail, reading, purchase, orders,
//! recommendations

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    catalog,
    error::ApiError,
    middleware::AuthUser,
    models::{
        CatalogQuery, Chapter, ChapterSummary, NovelStatus, NovelWithAuthor, OrderWithNovel,
        ReadingRecord, Role,
    },
    recommend,
    state::AppState,
};

/// Response for the novel detail page
#[derive(Serialize)]
pub struct NovelDetailResponse {
    #[serde(flatten)]
    pub novel: NovelWithAuthor,
    pub chapters: Vec<ChapterSummary>,
    pub purchased: bool,
    pub progress: Option<ReadingRecord>,
}

/// Response for reading one chapter
#[derive(Serialize)]
pub struct ChapterReadResponse {
    pub novel_id: Uuid,
    pub novel_title: String,
    pub author_name: String,
    pub chapter: Chapter,
    pub prev_chapter_id: Option<String>,
    pub next_chapter_id: Option<String>,
}

/// Catalog search with keyword, category filter, and pagination
pub async fn list_novels(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Reader)?;

    let page = catalog::search(&state.novel_repository, &state.user_repository, &query)
        .await
        .map_err(|e| {
            error!("Catalog search failed: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(page))
}

async fn online_novel(state: &AppState, id: Uuid) -> Result<NovelWithAuthor, ApiError> {
    let novel = state
        .novel_repository
        .find_with_author(id)
        .await
        .map_err(|e| {
            error!("Failed to load novel: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Novel not found".to_string()))?;

    if novel.novel.status != NovelStatus::Online {
        return Err(ApiError::InvalidState("Novel is not online".to_string()));
    }

    Ok(novel)
}

/// Detail of an online novel with chapters, purchase flag, and progress
pub async fn novel_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Reader)?;

    let novel = online_novel(&state, id).await?;

    let chapters = state
        .chapter_repository
        .list_summaries(id)
        .await
        .map_err(|e| {
            error!("Failed to load chapters: {}", e);
            ApiError::InternalServerError
        })?;

    let purchased = state
        .order_repository
        .has_paid_order(user.id, id)
        .await
        .map_err(|e| {
            error!("Failed to check purchase: {}", e);
            ApiError::InternalServerError
        })?;

    let progress = state
        .reading_repository
        .get_progress(user.id, id)
        .await
        .map_err(|e| {
            error!("Failed to load reading progress: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(NovelDetailResponse {
        novel,
        chapters,
        purchased,
        progress,
    }))
}

/// Read one chapter of an online novel
///
/// Paid chapters require a paid order. Saves reading progress and bumps the
/// novel's read counter.
pub async fn read_chapter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, chapter_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Reader)?;

    let novel = online_novel(&state, id).await?;

    let chapter = state
        .chapter_repository
        .find(id, &chapter_id)
        .await
        .map_err(|e| {
            error!("Failed to load chapter: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Chapter not found".to_string()))?;

    if !chapter.is_free {
        let purchased = state
            .order_repository
            .has_paid_order(user.id, id)
            .await
            .map_err(|e| {
                error!("Failed to check purchase: {}", e);
                ApiError::InternalServerError
            })?;

        if !purchased {
            return Err(ApiError::PermissionDenied);
        }
    }

    state
        .reading_repository
        .save_progress(user.id, id, &chapter_id)
        .await
        .map_err(|e| {
            error!("Failed to save reading progress: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .novel_repository
        .increment_read_count(id)
        .await
        .map_err(|e| {
            error!("Failed to increment read count: {}", e);
            ApiError::InternalServerError
        })?;

    let summaries = state
        .chapter_repository
        .list_summaries(id)
        .await
        .map_err(|e| {
            error!("Failed to load chapters: {}", e);
            ApiError::InternalServerError
        })?;

    let index = summaries
        .iter()
        .position(|c| c.chapter_id == chapter_id)
        .unwrap_or(0);
    let prev_chapter_id = index
        .checked_sub(1)
        .map(|i| summaries[i].chapter_id.clone());
    let next_chapter_id = summaries.get(index + 1).map(|c| c.chapter_id.clone());

    Ok(Json(ChapterReadResponse {
        novel_id: id,
        novel_title: novel.novel.title,
        author_name: novel.author_name,
        chapter,
        prev_chapter_id,
        next_chapter_id,
    }))
}

/// Purchase an online novel
///
/// Creates a pending order snapshotting the current price, marks it paid
/// (internal state transition, no gateway), and bumps the sale counter.
/// The three steps are independent, non-atomic operations.
pub async fn purchase_novel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Reader)?;

    let novel = online_novel(&state, id).await?;

    let purchased = state
        .order_repository
        .has_paid_order(user.id, id)
        .await
        .map_err(|e| {
            error!("Failed to check purchase: {}", e);
            ApiError::InternalServerError
        })?;

    if purchased {
        return Err(ApiError::InvalidState(
            "Novel already purchased".to_string(),
        ));
    }

    let order = state
        .order_repository
        .create(user.id, id, novel.novel.price)
        .await
        .map_err(|e| {
            error!("Failed to create order: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .order_repository
        .mark_paid(order.id)
        .await
        .map_err(|e| {
            error!("Failed to mark order paid: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .novel_repository
        .increment_sale_count(id)
        .await
        .map_err(|e| {
            error!("Failed to increment sale count: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({
        "order_id": order.id,
        "message": "Purchase successful"
    })))
}

/// The reader's orders, newest first
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Reader)?;

    let orders: Vec<OrderWithNovel> = state
        .order_repository
        .list_for_reader(user.id)
        .await
        .map_err(|e| {
            error!("Failed to load orders: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(orders))
}

/// Personalized recommendations: content-based, hot, and new lists
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Reader)?;

    let recommendations = recommend::recommendations_for(
        user.id,
        &state.novel_repository,
        &state.order_repository,
        &state.reading_repository,
    )
    .await
    .map_err(|e| {
        error!("Failed to build recommendations: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(recommendations))
}
