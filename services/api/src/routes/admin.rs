//! Admin handlers: dashboard, user management, review queue, statistics

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::{NovelStatus, NovelWithAuthor, Role, UserSummary},
    repositories::{CategoryStat, CreatorStat, RoleStat},
    state::AppState,
};

const TOP_LIST_LIMIT: i64 = 10;

/// Response for the admin dashboard
#[derive(Serialize)]
pub struct AdminDashboardResponse {
    pub total_users: i64,
    pub total_novels: i64,
    pub online_novels: i64,
    pub pending_novels: i64,
}

/// Request body for a review verdict
#[derive(Deserialize)]
pub struct ReviewRequest {
    pub approved: bool,
    #[serde(default)]
    pub opinion: String,
}

/// Platform-wide totals for the statistics page
#[derive(Serialize)]
pub struct PlatformTotals {
    pub total_users: i64,
    pub online_novels: i64,
    pub total_chapters: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
}

/// Response for the statistics page
#[derive(Serialize)]
pub struct StatisticsResponse {
    pub category_stats: Vec<CategoryStat>,
    pub top_by_reads: Vec<NovelWithAuthor>,
    pub top_by_sales: Vec<NovelWithAuthor>,
    pub creator_stats: Vec<CreatorStat>,
    pub role_stats: Vec<RoleStat>,
    pub totals: PlatformTotals,
}

/// Admin dashboard counters
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Admin)?;

    let total_users = state.user_repository.count_active().await.map_err(|e| {
        error!("Failed to count users: {}", e);
        ApiError::InternalServerError
    })?;

    let total_novels = state.novel_repository.count_all().await.map_err(|e| {
        error!("Failed to count novels: {}", e);
        ApiError::InternalServerError
    })?;

    let online_novels = state
        .novel_repository
        .count_with_status(NovelStatus::Online)
        .await
        .map_err(|e| {
            error!("Failed to count online novels: {}", e);
            ApiError::InternalServerError
        })?;

    let pending_novels = state
        .novel_repository
        .count_with_status(NovelStatus::Pending)
        .await
        .map_err(|e| {
            error!("Failed to count pending novels: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(AdminDashboardResponse {
        total_users,
        total_novels,
        online_novels,
        pending_novels,
    }))
}

/// List active users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Admin)?;

    let users: Vec<UserSummary> = state.user_repository.list_active().await.map_err(|e| {
        error!("Failed to list users: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(users))
}

/// Logically delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Admin)?;

    let deactivated = state.user_repository.deactivate(id).await.map_err(|e| {
        error!("Failed to deactivate user: {}", e);
        ApiError::InternalServerError
    })?;

    if !deactivated {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(json!({"message": "User deactivated"})))
}

/// Pending novels awaiting review
pub async fn review_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Admin)?;

    let pending = state
        .novel_repository
        .pending_with_author()
        .await
        .map_err(|e| {
            error!("Failed to list pending novels: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(pending))
}

/// Approve or reject a pending novel
pub async fn review_novel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Admin)?;

    let novel = state
        .novel_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load novel: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Novel not found".to_string()))?;

    if novel.status != NovelStatus::Pending {
        return Err(ApiError::InvalidState(format!(
            "Only pending novels can be reviewed (current status: {})",
            novel.status
        )));
    }

    let status = if payload.approved {
        NovelStatus::Online
    } else {
        NovelStatus::Rejected
    };

    state
        .novel_repository
        .review(id, user.id, &payload.opinion, status)
        .await
        .map_err(|e| {
            error!("Failed to record review: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Admin {} reviewed novel {}: {}", user.id, id, status);

    Ok(Json(json!({"message": "Review recorded", "status": status})))
}

/// Aggregate statistics across the platform
pub async fn statistics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(Role::Admin)?;

    let category_stats = state
        .novel_repository
        .category_stats()
        .await
        .map_err(|e| {
            error!("Failed to load category stats: {}", e);
            ApiError::InternalServerError
        })?;

    let top_by_reads = state
        .novel_repository
        .top_by_read_count(TOP_LIST_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to load top novels by reads: {}", e);
            ApiError::InternalServerError
        })?;

    let top_by_sales = state
        .novel_repository
        .top_by_sale_count(TOP_LIST_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to load top novels by sales: {}", e);
            ApiError::InternalServerError
        })?;

    let creator_stats = state
        .novel_repository
        .creator_stats(TOP_LIST_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to load creator stats: {}", e);
            ApiError::InternalServerError
        })?;

    let role_stats = state.user_repository.role_stats().await.map_err(|e| {
        error!("Failed to load role stats: {}", e);
        ApiError::InternalServerError
    })?;

    let total_users = state.user_repository.count_active().await.map_err(|e| {
        error!("Failed to count users: {}", e);
        ApiError::InternalServerError
    })?;

    let online_novels = state
        .novel_repository
        .count_with_status(NovelStatus::Online)
        .await
        .map_err(|e| {
            error!("Failed to count online novels: {}", e);
            ApiError::InternalServerError
        })?;

    let total_chapters = state.chapter_repository.count_online().await.map_err(|e| {
        error!("Failed to count chapters: {}", e);
        ApiError::InternalServerError
    })?;

    let total_orders = state.order_repository.count_all().await.map_err(|e| {
        error!("Failed to count orders: {}", e);
        ApiError::InternalServerError
    })?;

    let total_revenue = state.order_repository.paid_revenue().await.map_err(|e| {
        error!("Failed to sum revenue: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(StatisticsResponse {
        category_stats,
        top_by_reads,
        top_by_sales,
        creator_stats,
        role_stats,
        totals: PlatformTotals {
            total_users,
            online_novels,
            total_chapters,
            total_orders,
            total_revenue,
        },
    }))
}
