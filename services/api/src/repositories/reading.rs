//! Reading record repository for database operations

use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::ReadingRecord;

/// Reading record repository
#[derive(Clone)]
pub struct ReadingRecordRepository {
    pool: PgPool,
}

impl ReadingRecordRepository {
    /// Create a new reading record repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert the reader's progress in a novel
    ///
    /// The (reader, novel) pair is the primary key, so there is always at
    /// most one record per pair.
    pub async fn save_progress(
        &self,
        reader_id: Uuid,
        novel_id: Uuid,
        chapter_id: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reading_records (reader_id, novel_id, chapter_id, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (reader_id, novel_id)
            DO UPDATE SET chapter_id = $3, updated_at = $4
            "#,
        )
        .bind(reader_id)
        .bind(novel_id)
        .bind(chapter_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the reader's progress in a novel
    pub async fn get_progress(
        &self,
        reader_id: Uuid,
        novel_id: Uuid,
    ) -> Result<Option<ReadingRecord>> {
        let row = sqlx::query(
            r#"
            SELECT reader_id, novel_id, chapter_id, updated_at
            FROM reading_records
            WHERE reader_id = $1 AND novel_id = $2
            "#,
        )
        .bind(reader_id)
        .bind(novel_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| ReadingRecord {
            reader_id: row.get("reader_id"),
            novel_id: row.get("novel_id"),
            chapter_id: row.get("chapter_id"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Novel ids from the reader's most recent history entries
    pub async fn recent_novel_ids(&self, reader_id: Uuid, limit: i64) -> Result<Vec<Uuid>> {
        let rows = sqlx::query(
            r#"
            SELECT novel_id FROM reading_records
            WHERE reader_id = $1
            ORDER BY updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(reader_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("novel_id")).collect())
    }
}
