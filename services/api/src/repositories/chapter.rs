//! Chapter repository for database operations
//!
//! Chapters are rows keyed by (novel_id, chapter_id); every operation is
//! per-row, so concurrent edits to different chapters never clash.

use anyhow::Result;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Chapter, ChapterSummary};

fn map_chapter(row: &PgRow) -> Chapter {
    Chapter {
        chapter_id: row.get("chapter_id"),
        title: row.get("title"),
        content: row.get("content"),
        is_free: row.get("is_free"),
        created_at: row.get("created_at"),
    }
}

/// Chapter repository
#[derive(Clone)]
pub struct ChapterRepository {
    pool: PgPool,
}

impl ChapterRepository {
    /// Create a new chapter repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a chapter under a novel
    pub async fn insert(
        &self,
        novel_id: Uuid,
        chapter_id: &str,
        title: &str,
        content: &str,
        is_free: bool,
    ) -> Result<Chapter> {
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO chapters (novel_id, chapter_id, title, content, is_free, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(novel_id)
        .bind(chapter_id)
        .bind(title)
        .bind(content)
        .bind(is_free)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Chapter {
            chapter_id: chapter_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            is_free,
            created_at,
        })
    }

    /// Get one chapter of a novel
    pub async fn find(&self, novel_id: Uuid, chapter_id: &str) -> Result<Option<Chapter>> {
        let row = sqlx::query(
            r#"
            SELECT chapter_id, title, content, is_free, created_at
            FROM chapters
            WHERE novel_id = $1 AND chapter_id = $2
            "#,
        )
        .bind(novel_id)
        .bind(chapter_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_chapter))
    }

    /// List a novel's chapters in order, without body text
    pub async fn list_summaries(&self, novel_id: Uuid) -> Result<Vec<ChapterSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT chapter_id, title, is_free
            FROM chapters
            WHERE novel_id = $1
            ORDER BY chapter_id ASC
            "#,
        )
        .bind(novel_id)
        .fetch_all(&self.pool)
        .await?;

        let summaries = rows
            .into_iter()
            .map(|row| ChapterSummary {
                chapter_id: row.get("chapter_id"),
                title: row.get("title"),
                is_free: row.get("is_free"),
            })
            .collect();

        Ok(summaries)
    }

    /// Count a novel's chapters
    pub async fn count(&self, novel_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE novel_id = $1")
            .bind(novel_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Update one chapter
    pub async fn update(
        &self,
        novel_id: Uuid,
        chapter_id: &str,
        title: &str,
        content: &str,
        is_free: bool,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE chapters
            SET title = $3, content = $4, is_free = $5
            WHERE novel_id = $1 AND chapter_id = $2
            "#,
        )
        .bind(novel_id)
        .bind(chapter_id)
        .bind(title)
        .bind(content)
        .bind(is_free)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete one chapter
    pub async fn delete(&self, novel_id: Uuid, chapter_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chapters WHERE novel_id = $1 AND chapter_id = $2")
            .bind(novel_id)
            .bind(chapter_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count chapters belonging to online novels (statistics page)
    pub async fn count_online(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM chapters c
            JOIN novels n ON n.id = c.novel_id
            WHERE n.status = 'online'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
