//! Reading progress models

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One record per (reader, novel) pair, upserted on every chapter view
#[derive(Debug, Clone, Serialize)]
pub struct ReadingRecord {
    pub reader_id: Uuid,
    pub novel_id: Uuid,
    pub chapter_id: String,
    pub updated_at: DateTime<Utc>,
}
