//! Comment models
//!
//! Comments are individually addressable rows; a reply is a comment whose
//! `parent_id` points at a top-level comment of the same novel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity, with its author's username resolved for display
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A top-level comment with its replies, newest comment first
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Request to post a comment or reply
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}
