//! Platform service routes

mod admin;
mod comments;
mod creator;
mod home;
mod reader;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{middleware::auth_middleware, state::AppState};

/// Create the router for the platform service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // reader
        .route("/novels", get(reader::list_novels))
        .route("/novels/:id", get(reader::novel_detail))
        .route("/novels/:id/chapters/:chapter_id", get(reader::read_chapter))
        .route("/novels/:id/purchase", post(reader::purchase_novel))
        .route("/orders", get(reader::my_orders))
        .route("/recommendations", get(reader::recommendations))
        // comments (any authenticated user)
        .route("/novels/:id/comments", get(comments::list_comments))
        .route("/novels/:id/comments", post(comments::add_comment))
        .route(
            "/novels/:id/comments/:comment_id/replies",
            post(comments::reply_comment),
        )
        .route(
            "/novels/:id/comments/:comment_id",
            delete(comments::delete_comment),
        )
        // creator
        .route("/creator/dashboard", get(creator::dashboard))
        .route("/creator/novels", get(creator::my_novels))
        .route("/creator/novels", post(creator::create_novel))
        .route("/creator/novels/:id", put(creator::update_novel))
        .route("/creator/novels/:id/chapters", post(creator::add_chapter))
        .route(
            "/creator/novels/:id/chapters/:chapter_id",
            put(creator::update_chapter),
        )
        .route(
            "/creator/novels/:id/chapters/:chapter_id",
            delete(creator::delete_chapter),
        )
        .route("/creator/novels/:id/import", post(creator::import_chapters))
        .route("/creator/novels/:id/submit", post(creator::submit_novel))
        // admin
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id", delete(admin::delete_user))
        .route("/admin/review", get(admin::review_list))
        .route("/admin/review/:id", post(admin::review_novel))
        .route("/admin/statistics", get(admin::statistics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(home::health_check))
        .route("/home", get(home::home))
        .merge(protected_routes)
        .with_state(state)
}
