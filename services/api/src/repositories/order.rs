//! Order repository for database operations

use anyhow::Result;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Order, OrderStatus, OrderWithNovel};

fn map_order(row: &PgRow) -> Result<Order> {
    Ok(Order {
        id: row.get("id"),
        reader_id: row.get("reader_id"),
        novel_id: row.get("novel_id"),
        amount: row.get("amount"),
        status: row.get::<String, _>("status").parse()?,
        created_at: row.get("created_at"),
        paid_at: row.get("paid_at"),
    })
}

/// Order repository
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending order snapshotting the price at purchase time
    pub async fn create(&self, reader_id: Uuid, novel_id: Uuid, amount: f64) -> Result<Order> {
        let order = Order {
            id: Uuid::new_v4(),
            reader_id,
            novel_id,
            amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            paid_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO orders (id, reader_id, novel_id, amount, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id)
        .bind(order.reader_id)
        .bind(order.novel_id)
        .bind(order.amount)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    /// Mark an order paid, stamping the payment time
    pub async fn mark_paid(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE orders SET status = 'paid', paid_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Whether the reader holds a paid order for the novel
    pub async fn has_paid_order(&self, reader_id: Uuid, novel_id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE reader_id = $1 AND novel_id = $2 AND status = 'paid'
            "#,
        )
        .bind(reader_id)
        .bind(novel_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Novel ids the reader has paid for
    pub async fn paid_novel_ids(&self, reader_id: Uuid) -> Result<Vec<Uuid>> {
        let rows = sqlx::query(
            "SELECT novel_id FROM orders WHERE reader_id = $1 AND status = 'paid'",
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("novel_id")).collect())
    }

    /// The reader's orders, newest first, with novel titles for display
    pub async fn list_for_reader(&self, reader_id: Uuid) -> Result<Vec<OrderWithNovel>> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.reader_id, o.novel_id, o.amount, o.status, o.created_at, o.paid_at,
                   COALESCE(n.title, '未知') AS novel_title
            FROM orders o
            LEFT JOIN novels n ON n.id = o.novel_id
            WHERE o.reader_id = $1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(OrderWithNovel {
                order: map_order(row)?,
                novel_title: row.get("novel_title"),
            });
        }

        Ok(orders)
    }

    /// Count all orders
    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Total revenue over paid orders
    pub async fn paid_revenue(&self) -> Result<f64> {
        let revenue: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM orders WHERE status = 'paid'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue)
    }
}
