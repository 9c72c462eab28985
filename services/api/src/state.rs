//! Application state shared across handlers

use crate::middleware::JwtVerifier;
use crate::repositories::{
    ChapterRepository, CommentRepository, NovelRepository, OrderRepository,
    ReadingRecordRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub novel_repository: NovelRepository,
    pub chapter_repository: ChapterRepository,
    pub user_repository: UserRepository,
    pub order_repository: OrderRepository,
    pub reading_repository: ReadingRecordRepository,
    pub comment_repository: CommentRepository,
    pub jwt_verifier: JwtVerifier,
}
