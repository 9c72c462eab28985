//! Comment repository for database operations
//!
//! Every comment is its own row, so appends, replies, and deletes are
//! single-row statements; two concurrent commenters never overwrite each
//! other's writes.

use anyhow::Result;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Comment, CommentThread};

fn map_comment(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        novel_id: row.get("novel_id"),
        parent_id: row.get("parent_id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

/// Comment repository
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a comment or reply
    pub async fn insert(
        &self,
        novel_id: Uuid,
        parent_id: Option<Uuid>,
        user_id: Uuid,
        content: &str,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO comments (id, novel_id, parent_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(novel_id)
        .bind(parent_id)
        .bind(user_id)
        .bind(content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Get one comment with its author's username
    pub async fn find(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query(
            r#"
            SELECT c.id, c.novel_id, c.parent_id, c.user_id, c.content, c.created_at,
                   COALESCE(u.username, '匿名用户') AS username
            FROM comments c
            LEFT JOIN users u ON u.id = c.user_id AND u.status = 'active'
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_comment))
    }

    /// Delete a comment and its replies; returns the number of rows removed
    pub async fn delete_thread(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 OR parent_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// All comments of a novel as threads: top-level newest first, replies
    /// oldest first within each thread
    pub async fn list_for_novel(&self, novel_id: Uuid) -> Result<Vec<CommentThread>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.novel_id, c.parent_id, c.user_id, c.content, c.created_at,
                   COALESCE(u.username, '匿名用户') AS username
            FROM comments c
            LEFT JOIN users u ON u.id = c.user_id AND u.status = 'active'
            WHERE c.novel_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(novel_id)
        .fetch_all(&self.pool)
        .await?;

        let comments: Vec<Comment> = rows.iter().map(map_comment).collect();

        let mut threads: Vec<CommentThread> = comments
            .iter()
            .filter(|c| c.parent_id.is_none())
            .map(|c| CommentThread {
                comment: c.clone(),
                replies: Vec::new(),
            })
            .collect();

        for reply in comments.iter().filter(|c| c.parent_id.is_some()) {
            if let Some(thread) = threads
                .iter_mut()
                .find(|t| Some(t.comment.id) == reply.parent_id)
            {
                thread.replies.push(reply.clone());
            }
        }

        // Top-level comments newest first; replies stay in posting order
        threads.reverse();

        Ok(threads)
    }
}
