//! User repository for database operations
//!
//! Account creation and credentials live in the auth service; this side
//! reads accounts for author names and search, and handles admin management.

use anyhow::Result;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Role, UserStatus, UserSummary};

fn map_user(row: &PgRow) -> Result<UserSummary> {
    Ok(UserSummary {
        id: row.get("id"),
        username: row.get("username"),
        role: row.get::<String, _>("role").parse()?,
        tags: row.get("tags"),
        status: row.get::<String, _>("status").parse()?,
        created_at: row.get("created_at"),
    })
}

/// Per-role account count for the statistics page
#[derive(Debug, Clone, Serialize)]
pub struct RoleStat {
    pub role: Role,
    pub count: i64,
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ids of active creators whose username contains the keyword,
    /// case-insensitively
    pub async fn find_creator_ids_matching(&self, keyword: &str) -> Result<Vec<Uuid>> {
        let rows = sqlx::query(
            r#"
            SELECT id FROM users
            WHERE role = $2
              AND status = 'active'
              AND username ILIKE '%' || $1 || '%'
            "#,
        )
        .bind(keyword)
        .bind(Role::Creator.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("id")).collect())
    }

    /// All active users, newest first
    pub async fn list_active(&self) -> Result<Vec<UserSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, role, tags, status, created_at
            FROM users
            WHERE status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_user).collect()
    }

    /// Logically delete a user by marking it deactivated
    pub async fn deactivate(&self, id: Uuid) -> Result<bool> {
        info!("Deactivating user: {}", id);

        let result = sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(UserStatus::Deactivated.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count active users
    pub async fn count_active(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Active account counts per role
    pub async fn role_stats(&self) -> Result<Vec<RoleStat>> {
        let rows = sqlx::query(
            r#"
            SELECT role, COUNT(*) AS user_count
            FROM users
            WHERE status = 'active'
            GROUP BY role
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = Vec::with_capacity(rows.len());
        for row in rows {
            stats.push(RoleStat {
                role: row.get::<String, _>("role").parse()?,
                count: row.get("user_count"),
            });
        }

        Ok(stats)
    }
}
