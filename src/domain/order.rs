use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::{DomainError, SubmissionError};
use super::reconciler::{recompute_grand_total, OrderLine};

/// Who is ordering from whom. Passed explicitly instead of read from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionContext {
    pub from_business: Uuid,
    pub to_business: Uuid,
    pub placed_by: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub pieces: u32,
    pub cartons: u32,
}

/// A normalized order ready for the submission sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub from_business: Uuid,
    pub to_business: Uuid,
    pub placed_by: Uuid,
    pub grand_total: BigDecimal,
    pub items: Vec<OrderItem>,
}

/// Largest order amount, `999999999999.99`. Mirrors `orders.amount NUMERIC(14, 2)`.
pub fn max_order_amount() -> BigDecimal {
    BigDecimal::new(BigInt::from(99_999_999_999_999_i64), 2)
}

/// Turn the lines of a draft into a submission payload.
///
/// Lines with no quantity are dropped; at least one must remain.
pub fn build_submission(
    lines: &[OrderLine],
    context: SubmissionContext,
) -> Result<Order, SubmissionError> {
    let retained: Vec<&OrderLine> = lines.iter().filter(|l| l.has_quantity()).collect();
    if retained.is_empty() {
        return Err(SubmissionError::EmptyOrder);
    }

    let mut seen = HashSet::with_capacity(retained.len());
    for line in &retained {
        if line.pieces == 0 && line.cartons == 0 {
            return Err(SubmissionError::ZeroQuantityLine(line.product_id));
        }
        if !seen.insert(line.product_id) {
            return Err(SubmissionError::DuplicateProduct(line.product_id));
        }
    }

    let kept: Vec<OrderLine> = retained.into_iter().cloned().collect();
    let grand_total = recompute_grand_total(&kept);
    if grand_total > max_order_amount() {
        return Err(SubmissionError::AmountTooLarge(grand_total));
    }
    Ok(Order {
        from_business: context.from_business,
        to_business: context.to_business,
        placed_by: context.placed_by,
        grand_total,
        items: kept
            .iter()
            .map(|l| OrderItem {
                product_id: l.product_id,
                pieces: l.pieces,
                cartons: l.cartons,
            })
            .collect(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted by the buyer, not yet acted on by the supplier.
    Placed,
    Accepted,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Accepted => "ACCEPTED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLACED" => Ok(OrderStatus::Placed),
            "ACCEPTED" => Ok(OrderStatus::Accepted),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

/// Which side of an order a business is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Orders the business placed with its suppliers.
    #[default]
    Outgoing,
    /// Orders other businesses placed with it.
    Incoming,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub pieces: u32,
    pub cartons: u32,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub from_business: Uuid,
    pub to_business: Uuid,
    pub placed_by: Uuid,
    pub amount: BigDecimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}

/// Row offset of a 1-based page. Pages below 1 are treated as the first.
pub fn page_offset(page: i64, limit: i64) -> Result<i64, DomainError> {
    (page.max(1) - 1)
        .checked_mul(limit.max(0))
        .ok_or_else(|| DomainError::InvalidInput(format!("page {} is out of range", page)))
}
