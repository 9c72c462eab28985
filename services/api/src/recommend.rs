//! Recommendations
//!
//! Three independent lists per reader: content-based (interest overlap),
//! hot (global read count), and new (global recency). Hot and new are not
//! deduplicated against the content-based list or each other; a novel can
//! appear in all three at once.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::models::{Novel, NovelWithAuthor};
use crate::repositories::{NovelRepository, OrderRepository, ReadingRecordRepository};

/// Cap on each recommendation list
pub const RECOMMENDATION_LIMIT: i64 = 6;

/// How many recent reading-history entries feed the interest set
pub const READING_HISTORY_LIMIT: i64 = 10;

/// Categories and tags a reader has shown interest in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestSet {
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

impl InterestSet {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.tags.is_empty()
    }
}

/// Derive the interest set from the novels a reader purchased or read
pub fn interest_set<'a>(novels: impl IntoIterator<Item = &'a Novel>) -> InterestSet {
    let mut interest = InterestSet::default();

    for novel in novels {
        interest.categories.insert(novel.category.clone());
        for tag in &novel.tags {
            interest.tags.insert(tag.clone());
        }
    }

    interest
}

/// Distinct ids of the novels a reader purchased or read
pub fn seen_novel_ids<'a>(novels: impl IntoIterator<Item = &'a Novel>) -> Vec<Uuid> {
    let mut seen = BTreeSet::new();
    novels
        .into_iter()
        .filter(|novel| seen.insert(novel.id))
        .map(|novel| novel.id)
        .collect()
}

/// The recommendation page payload
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub content_based: Vec<NovelWithAuthor>,
    pub hot: Vec<NovelWithAuthor>,
    pub new: Vec<NovelWithAuthor>,
    pub interested_categories: Vec<String>,
    pub interested_tags: Vec<String>,
}

/// Build the three recommendation lists for a reader
pub async fn recommendations_for(
    reader_id: Uuid,
    novels: &NovelRepository,
    orders: &OrderRepository,
    reading: &ReadingRecordRepository,
) -> Result<Recommendations> {
    let purchased_ids = orders.paid_novel_ids(reader_id).await?;
    let purchased = novels.find_many(&purchased_ids).await?;

    let read_ids = reading
        .recent_novel_ids(reader_id, READING_HISTORY_LIMIT)
        .await?;
    let read = novels.find_many(&read_ids).await?;

    let interest = interest_set(purchased.iter().chain(read.iter()));
    let excluded = seen_novel_ids(purchased.iter().chain(read.iter()));

    let content_based = if interest.is_empty() {
        Vec::new()
    } else {
        let categories: Vec<String> = interest.categories.iter().cloned().collect();
        let tags: Vec<String> = interest.tags.iter().cloned().collect();
        novels
            .recommend_by_interest(&categories, &tags, &excluded, RECOMMENDATION_LIMIT)
            .await?
    };

    let hot = novels.top_by_read_count(RECOMMENDATION_LIMIT).await?;
    let new = novels.latest(RECOMMENDATION_LIMIT).await?;

    Ok(Recommendations {
        content_based,
        hot,
        new,
        interested_categories: interest.categories.into_iter().collect(),
        interested_tags: interest.tags.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NovelStatus;
    use chrono::Utc;

    fn novel(category: &str, tags: &[&str]) -> Novel {
        Novel {
            id: Uuid::new_v4(),
            title: "测试小说".to_string(),
            author_id: Uuid::new_v4(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            intro: String::new(),
            price: 0.0,
            status: NovelStatus::Online,
            read_count: 0,
            sale_count: 0,
            review_opinion: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_interest_set_unions_categories_and_tags() {
        let purchased = vec![novel("玄幻", &["热血", "争霸"])];
        let read = vec![novel("科幻", &["热血", "星际"]), novel("玄幻", &[])];

        let interest = interest_set(purchased.iter().chain(read.iter()));

        assert_eq!(
            interest.categories,
            BTreeSet::from(["玄幻".to_string(), "科幻".to_string()])
        );
        assert_eq!(
            interest.tags,
            BTreeSet::from([
                "热血".to_string(),
                "争霸".to_string(),
                "星际".to_string()
            ])
        );
    }

    #[test]
    fn test_interest_set_empty_without_history() {
        let interest = interest_set(std::iter::empty::<&Novel>());
        assert!(interest.is_empty());
    }

    #[test]
    fn test_seen_ids_dedup_purchased_and_read_overlap() {
        let a = novel("玄幻", &[]);
        let b = novel("言情", &[]);

        // the reader both bought and recently read novel `a`
        let purchased = vec![a.clone(), b.clone()];
        let read = vec![a.clone()];

        let excluded = seen_novel_ids(purchased.iter().chain(read.iter()));

        assert_eq!(excluded.len(), 2);
        assert!(excluded.contains(&a.id));
        assert!(excluded.contains(&b.id));
    }
}
