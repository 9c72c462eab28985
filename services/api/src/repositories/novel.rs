//! Novel repository for database operations

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    CreateNovelRequest, Novel, NovelStatus, NovelWithAuthor, UpdateNovelRequest,
};

/// Shared SELECT head for queries that annotate the author's display name.
/// Deactivated or missing authors resolve to "未知".
const SELECT_WITH_AUTHOR: &str = r#"
    SELECT n.id, n.title, n.author_id, n.category, n.tags, n.intro, n.price, n.status,
           n.read_count, n.sale_count, n.review_opinion, n.reviewed_by, n.reviewed_at,
           n.created_at, COALESCE(u.username, '未知') AS author_name
    FROM novels n
    LEFT JOIN users u ON u.id = n.author_id AND u.status = 'active'
"#;

const SELECT_NOVEL: &str = r#"
    SELECT n.id, n.title, n.author_id, n.category, n.tags, n.intro, n.price, n.status,
           n.read_count, n.sale_count, n.review_opinion, n.reviewed_by, n.reviewed_at,
           n.created_at
    FROM novels n
"#;

fn map_novel(row: &PgRow) -> Result<Novel> {
    Ok(Novel {
        id: row.get("id"),
        title: row.get("title"),
        author_id: row.get("author_id"),
        category: row.get("category"),
        tags: row.get("tags"),
        intro: row.get("intro"),
        price: row.get("price"),
        status: row.get::<String, _>("status").parse()?,
        read_count: row.get("read_count"),
        sale_count: row.get("sale_count"),
        review_opinion: row.get("review_opinion"),
        reviewed_by: row.get("reviewed_by"),
        reviewed_at: row.get("reviewed_at"),
        created_at: row.get("created_at"),
    })
}

fn map_novel_with_author(row: &PgRow) -> Result<NovelWithAuthor> {
    Ok(NovelWithAuthor {
        novel: map_novel(row)?,
        author_name: row.get("author_name"),
    })
}

/// Per-category aggregate for the statistics page
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub novel_count: i64,
    pub total_reads: i64,
    pub total_sales: i64,
}

/// Per-creator aggregate for the statistics page
#[derive(Debug, Clone, Serialize)]
pub struct CreatorStat {
    pub author_id: Uuid,
    pub author_name: String,
    pub novel_count: i64,
    pub total_reads: i64,
    pub total_sales: i64,
    pub total_revenue: f64,
}

/// Novel repository
#[derive(Clone)]
pub struct NovelRepository {
    pool: PgPool,
}

impl NovelRepository {
    /// Create a new novel repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a novel in draft status
    pub async fn create(&self, author_id: Uuid, payload: &CreateNovelRequest) -> Result<Novel> {
        let novel = Novel {
            id: Uuid::new_v4(),
            title: payload.title.clone(),
            author_id,
            category: payload.category.clone(),
            tags: payload.tags.clone(),
            intro: payload.intro.clone(),
            price: payload.price,
            status: NovelStatus::Draft,
            read_count: 0,
            sale_count: 0,
            review_opinion: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO novels (id, title, author_id, category, tags, intro, price, status,
                                read_count, sale_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(novel.id)
        .bind(&novel.title)
        .bind(novel.author_id)
        .bind(&novel.category)
        .bind(&novel.tags)
        .bind(&novel.intro)
        .bind(novel.price)
        .bind(novel.status.as_str())
        .bind(novel.read_count)
        .bind(novel.sale_count)
        .bind(novel.created_at)
        .execute(&self.pool)
        .await?;

        Ok(novel)
    }

    /// Get a novel by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Novel>> {
        let sql = format!("{} WHERE n.id = $1", SELECT_NOVEL);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => Ok(Some(map_novel(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a novel by ID with the author's display name
    pub async fn find_with_author(&self, id: Uuid) -> Result<Option<NovelWithAuthor>> {
        let sql = format!("{} WHERE n.id = $1", SELECT_WITH_AUTHOR);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => Ok(Some(map_novel_with_author(&row)?)),
            None => Ok(None),
        }
    }

    /// Get all novels whose id is in `ids`
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Novel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("{} WHERE n.id = ANY($1)", SELECT_NOVEL);
        let rows = sqlx::query(&sql).bind(ids).fetch_all(&self.pool).await?;

        rows.iter().map(map_novel).collect()
    }

    /// Get all novels by one author, newest first
    pub async fn by_author(&self, author_id: Uuid) -> Result<Vec<Novel>> {
        let sql = format!(
            "{} WHERE n.author_id = $1 ORDER BY n.created_at DESC",
            SELECT_NOVEL
        );
        let rows = sqlx::query(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_novel).collect()
    }

    /// Update a novel's editable details
    pub async fn update_details(&self, id: Uuid, payload: &UpdateNovelRequest) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE novels
            SET title = $2, category = $3, tags = $4, intro = $5, price = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.category)
        .bind(&payload.tags)
        .bind(&payload.intro)
        .bind(payload.price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Set a novel's lifecycle status
    pub async fn set_status(&self, id: Uuid, status: NovelStatus) -> Result<()> {
        sqlx::query("UPDATE novels SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a review verdict: status plus reviewer, opinion, and time
    pub async fn review(
        &self,
        id: Uuid,
        admin_id: Uuid,
        opinion: &str,
        status: NovelStatus,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE novels
            SET status = $2, review_opinion = $3, reviewed_by = $4, reviewed_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(opinion)
        .bind(admin_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// One page of online novels, newest first
    ///
    /// The keyword matches case-insensitively as a substring of the title or
    /// of any tag. No category means all categories.
    pub async fn search_online_page(
        &self,
        category: Option<&str>,
        keyword: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<NovelWithAuthor>> {
        let sql = format!(
            r#"
            {}
            WHERE n.status = 'online'
              AND ($1::text IS NULL OR n.category = $1)
              AND ($2::text IS NULL
                   OR n.title ILIKE '%' || $2 || '%'
                   OR EXISTS (SELECT 1 FROM unnest(n.tags) AS tag
                              WHERE tag ILIKE '%' || $2 || '%'))
            ORDER BY n.created_at DESC
            OFFSET $3 LIMIT $4
            "#,
            SELECT_WITH_AUTHOR
        );

        let rows = sqlx::query(&sql)
            .bind(category)
            .bind(keyword)
            .bind(skip)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_novel_with_author).collect()
    }

    /// Count online novels under an optional category filter
    pub async fn count_online(&self, category: Option<&str>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM novels
            WHERE status = 'online' AND ($1::text IS NULL OR category = $1)
            "#,
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Online novels written by any of the given authors, newest first
    pub async fn online_by_authors(
        &self,
        author_ids: &[Uuid],
        category: Option<&str>,
        limit: i64,
    ) -> Result<Vec<NovelWithAuthor>> {
        let sql = format!(
            r#"
            {}
            WHERE n.status = 'online'
              AND n.author_id = ANY($1)
              AND ($2::text IS NULL OR n.category = $2)
            ORDER BY n.created_at DESC
            LIMIT $3
            "#,
            SELECT_WITH_AUTHOR
        );

        let rows = sqlx::query(&sql)
            .bind(author_ids)
            .bind(category)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_novel_with_author).collect()
    }

    /// Top online novels by read count
    pub async fn top_by_read_count(&self, limit: i64) -> Result<Vec<NovelWithAuthor>> {
        let sql = format!(
            "{} WHERE n.status = 'online' ORDER BY n.read_count DESC LIMIT $1",
            SELECT_WITH_AUTHOR
        );
        let rows = sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await?;

        rows.iter().map(map_novel_with_author).collect()
    }

    /// Top online novels by sale count
    pub async fn top_by_sale_count(&self, limit: i64) -> Result<Vec<NovelWithAuthor>> {
        let sql = format!(
            "{} WHERE n.status = 'online' ORDER BY n.sale_count DESC LIMIT $1",
            SELECT_WITH_AUTHOR
        );
        let rows = sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await?;

        rows.iter().map(map_novel_with_author).collect()
    }

    /// Most recently created online novels
    pub async fn latest(&self, limit: i64) -> Result<Vec<NovelWithAuthor>> {
        let sql = format!(
            "{} WHERE n.status = 'online' ORDER BY n.created_at DESC LIMIT $1",
            SELECT_WITH_AUTHOR
        );
        let rows = sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await?;

        rows.iter().map(map_novel_with_author).collect()
    }

    /// Online novels overlapping the reader's interest set, most read first,
    /// excluding novels the reader has already purchased or read
    pub async fn recommend_by_interest(
        &self,
        categories: &[String],
        tags: &[String],
        exclude_ids: &[Uuid],
        limit: i64,
    ) -> Result<Vec<NovelWithAuthor>> {
        let sql = format!(
            r#"
            {}
            WHERE n.status = 'online'
              AND (n.category = ANY($1) OR n.tags && $2)
              AND NOT (n.id = ANY($3))
            ORDER BY n.read_count DESC
            LIMIT $4
            "#,
            SELECT_WITH_AUTHOR
        );

        let rows = sqlx::query(&sql)
            .bind(categories)
            .bind(tags)
            .bind(exclude_ids)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_novel_with_author).collect()
    }

    /// Pending novels awaiting review, oldest first
    pub async fn pending_with_author(&self) -> Result<Vec<NovelWithAuthor>> {
        let sql = format!(
            "{} WHERE n.status = 'pending' ORDER BY n.created_at ASC",
            SELECT_WITH_AUTHOR
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(map_novel_with_author).collect()
    }

    /// Atomically increment the read counter
    pub async fn increment_read_count(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE novels SET read_count = read_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Atomically increment the sale counter
    pub async fn increment_sale_count(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE novels SET sale_count = sale_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count all novels regardless of status
    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM novels")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Count novels in one status
    pub async fn count_with_status(&self, status: NovelStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM novels WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Per-category aggregates over online novels
    pub async fn category_stats(&self) -> Result<Vec<CategoryStat>> {
        let rows = sqlx::query(
            r#"
            SELECT category,
                   COUNT(*) AS novel_count,
                   COALESCE(SUM(read_count), 0)::BIGINT AS total_reads,
                   COALESCE(SUM(sale_count), 0)::BIGINT AS total_sales
            FROM novels
            WHERE status = 'online'
            GROUP BY category
            ORDER BY novel_count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let stats = rows
            .into_iter()
            .map(|row| CategoryStat {
                category: row.get("category"),
                novel_count: row.get("novel_count"),
                total_reads: row.get("total_reads"),
                total_sales: row.get("total_sales"),
            })
            .collect();

        Ok(stats)
    }

    /// Per-creator aggregates over online novels, most published first
    pub async fn creator_stats(&self, limit: i64) -> Result<Vec<CreatorStat>> {
        let rows = sqlx::query(
            r#"
            SELECT n.author_id,
                   COALESCE(u.username, '未知') AS author_name,
                   COUNT(*) AS novel_count,
                   COALESCE(SUM(n.read_count), 0)::BIGINT AS total_reads,
                   COALESCE(SUM(n.sale_count), 0)::BIGINT AS total_sales,
                   COALESCE(SUM(n.sale_count * n.price), 0) AS total_revenue
            FROM novels n
            LEFT JOIN users u ON u.id = n.author_id AND u.status = 'active'
            WHERE n.status = 'online'
            GROUP BY n.author_id, u.username
            ORDER BY novel_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let stats = rows
            .into_iter()
            .map(|row| CreatorStat {
                author_id: row.get("author_id"),
                author_name: row.get("author_name"),
                novel_count: row.get("novel_count"),
                total_reads: row.get("total_reads"),
                total_sales: row.get("total_sales"),
                total_revenue: row.get("total_revenue"),
            })
            .collect();

        Ok(stats)
    }
}
