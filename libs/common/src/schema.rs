//! Schema bootstrap
//!
//! Tables and indexes are declared once at service startup, so a fresh
//! database is usable without a separate migration step. Every statement is
//! idempotent. Referential integrity is an application-level concern: user
//! and novel references are plain UUID columns, deletes are logical-only.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        status TEXT NOT NULL DEFAULT 'active',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_username_idx ON users (username)",
    "CREATE INDEX IF NOT EXISTS users_role_idx ON users (role)",
    r#"
    CREATE TABLE IF NOT EXISTS novels (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        author_id UUID NOT NULL,
        category TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        intro TEXT NOT NULL DEFAULT '',
        price DOUBLE PRECISION NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'draft',
        read_count BIGINT NOT NULL DEFAULT 0,
        sale_count BIGINT NOT NULL DEFAULT 0,
        review_opinion TEXT,
        reviewed_by UUID,
        reviewed_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS novels_category_idx ON novels (category)",
    "CREATE INDEX IF NOT EXISTS novels_status_idx ON novels (status)",
    "CREATE INDEX IF NOT EXISTS novels_author_idx ON novels (author_id)",
    "CREATE INDEX IF NOT EXISTS novels_created_idx ON novels (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS novels_category_status_idx ON novels (category, status)",
    r#"
    CREATE TABLE IF NOT EXISTS chapters (
        novel_id UUID NOT NULL,
        chapter_id TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        is_free BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (novel_id, chapter_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id UUID PRIMARY KEY,
        reader_id UUID NOT NULL,
        novel_id UUID NOT NULL,
        amount DOUBLE PRECISION NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        paid_at TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS orders_reader_idx ON orders (reader_id)",
    "CREATE INDEX IF NOT EXISTS orders_novel_idx ON orders (novel_id)",
    r#"
    CREATE TABLE IF NOT EXISTS reading_records (
        reader_id UUID NOT NULL,
        novel_id UUID NOT NULL,
        chapter_id TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (reader_id, novel_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id UUID PRIMARY KEY,
        novel_id UUID NOT NULL,
        parent_id UUID,
        user_id UUID NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS comments_novel_idx ON comments (novel_id)",
];

/// Create all tables and indexes if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> DatabaseResult<()> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    info!("Database schema ensured");
    Ok(())
}
