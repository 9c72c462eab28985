//! Order models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Order status
///
/// pending → paid is the only transition the purchase flow performs;
/// refunded is modeled but currently unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "refunded" => Ok(OrderStatus::Refunded),
            other => Err(anyhow::anyhow!("unknown order status: {}", other)),
        }
    }
}

/// Order entity
///
/// `amount` is a snapshot of the novel's price at purchase time and is
/// never re-derived.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub reader_id: Uuid,
    pub novel_id: Uuid,
    pub amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// An order annotated with its novel's title for listings
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithNovel {
    #[serde(flatten)]
    pub order: Order,
    pub novel_title: String,
}
