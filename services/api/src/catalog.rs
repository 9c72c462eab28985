//! Catalog search
//!
//! Keyword search runs in two passes: the primary query matches the keyword
//! against titles and tags in the store, then a second pass finds creators
//! whose username matches, pulls their online novels, and merges them in.
//! The final page is sliced from the combined in-memory list, so totals come
//! from the merged list length; under concurrent inserts a page can shift
//! between requests (known non-goal, no snapshot isolation).

use anyhow::Result;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{CatalogQuery, NovelListResponse, NovelWithAuthor};
use crate::repositories::{NovelRepository, UserRepository};

/// Fixed catalog page size
pub const NOVELS_PER_PAGE: usize = 12;

/// Cap on the secondary author-match fetch
pub const AUTHOR_MATCH_LIMIT: i64 = 100;

/// Append author-matched novels to the primary result, skipping novels
/// already present (dedup by novel id)
pub fn merge_author_matches(
    primary: Vec<NovelWithAuthor>,
    author_novels: Vec<NovelWithAuthor>,
) -> Vec<NovelWithAuthor> {
    let mut seen: HashSet<Uuid> = primary.iter().map(|n| n.novel.id).collect();
    let mut merged = primary;

    for novel in author_novels {
        if seen.insert(novel.novel.id) {
            merged.push(novel);
        }
    }

    merged
}

/// Slice one 1-based page out of an in-memory list
pub fn slice_page<T: Clone>(items: &[T], page: u32, per_page: usize) -> Vec<T> {
    let start = (page.max(1) as usize - 1) * per_page;
    items.iter().skip(start).take(per_page).cloned().collect()
}

/// Page count for a total under a fixed page size
pub fn total_pages(total: i64, per_page: usize) -> i64 {
    (total + per_page as i64 - 1) / per_page as i64
}

fn normalize(filter: Option<&String>) -> Option<&str> {
    filter.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Run a catalog query against online novels
///
/// Without a keyword this is a plain filtered skip/limit page with a direct
/// count. With a keyword the author-match pass widens the result set before
/// re-paginating in memory.
pub async fn search(
    novels: &NovelRepository,
    users: &UserRepository,
    query: &CatalogQuery,
) -> Result<NovelListResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let category = normalize(query.category.as_ref());
    let keyword = normalize(query.keyword.as_ref());

    let skip = (page as i64 - 1) * NOVELS_PER_PAGE as i64;
    let primary = novels
        .search_online_page(category, keyword, skip, NOVELS_PER_PAGE as i64)
        .await?;

    let (items, total) = match keyword {
        Some(keyword) => {
            let creator_ids = users.find_creator_ids_matching(keyword).await?;
            let author_novels = if creator_ids.is_empty() {
                Vec::new()
            } else {
                novels
                    .online_by_authors(&creator_ids, category, AUTHOR_MATCH_LIMIT)
                    .await?
            };

            let merged = merge_author_matches(primary, author_novels);
            let total = merged.len() as i64;
            (slice_page(&merged, page, NOVELS_PER_PAGE), total)
        }
        None => {
            let total = novels.count_online(category).await?;
            (primary, total)
        }
    };

    Ok(NovelListResponse {
        items,
        page,
        total,
        total_pages: total_pages(total, NOVELS_PER_PAGE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Novel, NovelStatus};
    use chrono::Utc;

    fn novel(title: &str, tags: &[&str], author_name: &str) -> NovelWithAuthor {
        NovelWithAuthor {
            novel: Novel {
                id: Uuid::new_v4(),
                title: title.to_string(),
                author_id: Uuid::new_v4(),
                category: "玄幻".to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                intro: String::new(),
                price: 9.9,
                status: NovelStatus::Online,
                read_count: 0,
                sale_count: 0,
                review_opinion: None,
                reviewed_by: None,
                reviewed_at: None,
                created_at: Utc::now(),
            },
            author_name: author_name.to_string(),
        }
    }

    #[test]
    fn test_merge_keeps_primary_order_and_appends_new() {
        let a = novel("玄幻王座", &[], "作者甲");
        let b = novel("修仙录", &["玄幻"], "作者乙");
        let c = novel("都市见闻", &[], "玄幻老人");

        let merged = merge_author_matches(vec![a.clone(), b.clone()], vec![c.clone()]);

        let ids: Vec<Uuid> = merged.iter().map(|n| n.novel.id).collect();
        assert_eq!(ids, vec![a.novel.id, b.novel.id, c.novel.id]);
    }

    #[test]
    fn test_merge_dedups_by_novel_id() {
        let a = novel("玄幻王座", &[], "作者甲");
        let b = novel("修仙录", &["玄幻"], "作者甲");

        // the author pass re-fetches a novel the primary pass already found
        let merged = merge_author_matches(vec![a.clone(), b.clone()], vec![b.clone()]);

        assert_eq!(merged.len(), 2);
    }

    /// Keyword "玄幻": 3 title matches, 2 tag matches (1 overlapping the
    /// title group), 1 further novel by a username-matching creator. The
    /// primary store query already dedups title/tag matches, so the merged
    /// result is exactly the 4 primary novels plus the author-matched one.
    #[test]
    fn test_keyword_scenario_exact_membership() {
        let title_a = novel("玄幻王座", &[], "作者甲");
        let title_b = novel("玄幻编年史", &[], "作者乙");
        let title_and_tag = novel("大玄幻", &["玄幻"], "作者丙");
        let tag_only = novel("修仙录", &["玄幻"], "作者丁");
        let by_author = novel("都市见闻", &[], "玄幻老人");

        let primary = vec![
            title_a.clone(),
            title_b.clone(),
            title_and_tag.clone(),
            tag_only.clone(),
        ];
        // author pass returns everything by the matching creator
        let merged = merge_author_matches(primary, vec![by_author.clone()]);

        let expected: HashSet<Uuid> = [
            title_a.novel.id,
            title_b.novel.id,
            title_and_tag.novel.id,
            tag_only.novel.id,
            by_author.novel.id,
        ]
        .into_iter()
        .collect();
        let actual: HashSet<Uuid> = merged.iter().map(|n| n.novel.id).collect();

        assert_eq!(merged.len(), 5);
        assert_eq!(actual, expected);
    }

    /// On a stable list, page p followed by page p+1 equals the first
    /// 2 × page-size items of the full merged list.
    #[test]
    fn test_consecutive_pages_cover_prefix() {
        let merged: Vec<NovelWithAuthor> = (0..30)
            .map(|i| novel(&format!("novel-{i}"), &[], "作者"))
            .collect();

        let mut pages = slice_page(&merged, 1, NOVELS_PER_PAGE);
        pages.extend(slice_page(&merged, 2, NOVELS_PER_PAGE));

        let prefix_ids: Vec<Uuid> = merged
            .iter()
            .take(2 * NOVELS_PER_PAGE)
            .map(|n| n.novel.id)
            .collect();
        let page_ids: Vec<Uuid> = pages.iter().map(|n| n.novel.id).collect();

        assert_eq!(page_ids, prefix_ids);
    }

    #[test]
    fn test_slice_page_past_end_is_empty() {
        let items: Vec<i32> = (0..5).collect();
        assert!(slice_page(&items, 3, 4).is_empty());
        assert_eq!(slice_page(&items, 2, 4), vec![4]);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
    }
}
