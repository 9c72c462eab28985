//! Novel and chapter models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The fixed category set novels are filed under
pub const CATEGORIES: &[&str] = &[
    "玄幻", "言情", "武侠", "科幻", "悬疑", "历史", "校园", "其他",
];

/// Check a category against the fixed set
pub fn is_valid_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

/// Novel lifecycle status
///
/// Transitions only draft → pending → {online, rejected}. Only `online`
/// novels are visible to the catalog and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelStatus {
    Draft,
    Pending,
    Online,
    Rejected,
}

impl NovelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Draft => "draft",
            NovelStatus::Pending => "pending",
            NovelStatus::Online => "online",
            NovelStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for NovelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NovelStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(NovelStatus::Draft),
            "pending" => Ok(NovelStatus::Pending),
            "online" => Ok(NovelStatus::Online),
            "rejected" => Ok(NovelStatus::Rejected),
            other => Err(anyhow::anyhow!("unknown novel status: {}", other)),
        }
    }
}

/// Novel entity
#[derive(Debug, Clone, Serialize)]
pub struct Novel {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub category: String,
    pub tags: Vec<String>,
    pub intro: String,
    pub price: f64,
    pub status: NovelStatus,
    pub read_count: i64,
    pub sale_count: i64,
    pub review_opinion: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A novel annotated with its author's display name
///
/// Deactivated or missing authors render as "未知".
#[derive(Debug, Clone, Serialize)]
pub struct NovelWithAuthor {
    #[serde(flatten)]
    pub novel: Novel,
    pub author_name: String,
}

/// Chapter entity, exclusively owned by its parent novel
#[derive(Debug, Clone, Serialize)]
pub struct Chapter {
    pub chapter_id: String,
    pub title: String,
    pub content: String,
    pub is_free: bool,
    pub created_at: DateTime<Utc>,
}

/// Chapter listing entry without the body text
#[derive(Debug, Clone, Serialize)]
pub struct ChapterSummary {
    pub chapter_id: String,
    pub title: String,
    pub is_free: bool,
}

/// Query parameters for the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Filter by category; empty or absent means all categories
    pub category: Option<String>,
    /// Case-insensitive substring match on title, tags, or author name
    pub keyword: Option<String>,
}

/// Response for catalog listing with pagination
#[derive(Debug, Clone, Serialize)]
pub struct NovelListResponse {
    pub items: Vec<NovelWithAuthor>,
    pub page: u32,
    pub total: i64,
    pub total_pages: i64,
}

/// Request to create a novel draft
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNovelRequest {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub price: f64,
}

/// Request to update a novel's details
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNovelRequest {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub price: f64,
}

/// Request to add or edit a chapter
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_free: bool,
}

/// Request to import chapters from raw text
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    pub content: String,
}
