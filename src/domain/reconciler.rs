//! Quantity reconciliation for order lines.
//!
//! A line's quantity is one integer count of pieces written in mixed radix:
//! whole cartons plus loose pieces, with the product's pack size as the base.
//! Every edit to either field is folded back into that normal form, so loose
//! pieces never reach a full carton.

use std::fmt;
use std::num::{IntErrorKind, NonZeroU32};

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::QuantityError;
use super::product::Product;

/// Which quantity field a user edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Pieces,
    Cartons,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditKind::Pieces => f.write_str("pieces"),
            EditKind::Cartons => f.write_str("cartons"),
        }
    }
}

/// A +/- button press on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Increment,
    Decrement,
}

/// The last edit that failed validation, kept for the per-field message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedInput {
    pub field: EditKind,
    pub raw: String,
    pub reason: QuantityError,
}

impl fmt::Display for RejectedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (got {:?})", self.field, self.reason, self.raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub pieces: u32,
    pub cartons: u32,
    pub line_total: BigDecimal,
    pub invalid: bool,
    pub rejected: Option<RejectedInput>,
}

impl OrderLine {
    pub fn new(product_id: Uuid) -> Self {
        Self {
            product_id,
            pieces: 0,
            cartons: 0,
            line_total: BigDecimal::zero(),
            invalid: false,
            rejected: None,
        }
    }

    /// Build a normalized line from an arbitrary (pieces, cartons) pair.
    ///
    /// Cartons are applied first so that excess pieces carry over into them.
    pub fn from_quantities(product: &Product, pieces: u32, cartons: u32) -> Self {
        let line = apply_quantity(&Self::new(product.id), product, EditKind::Cartons, cartons);
        apply_quantity(&line, product, EditKind::Pieces, pieces)
    }

    pub fn has_quantity(&self) -> bool {
        self.pieces > 0 || self.cartons > 0
    }

    /// Piece-equivalent of the line: `pieces + cartons * pack_size`.
    pub fn total_pieces(&self, pack_size: Option<NonZeroU32>) -> u64 {
        match pack_size {
            Some(n) => u64::from(self.pieces) + u64::from(self.cartons) * u64::from(n.get()),
            None => u64::from(self.pieces),
        }
    }
}

/// Parse user input into a quantity. Blank input counts as zero.
pub fn parse_quantity(raw: &str) -> Result<u32, QuantityError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n < 0 => Err(QuantityError::Negative),
        Ok(n) => u32::try_from(n).map_err(|_| QuantityError::TooLarge),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Err(QuantityError::TooLarge),
            IntErrorKind::NegOverflow => Err(QuantityError::Negative),
            _ => Err(QuantityError::NotANumber),
        },
    }
}

/// Apply a raw text edit to one field of `line`.
///
/// Invalid input flags the line and leaves its quantities and total as they were.
pub fn apply_edit(line: &OrderLine, product: &Product, kind: EditKind, raw: &str) -> OrderLine {
    match parse_quantity(raw) {
        Ok(value) => apply_quantity(line, product, kind, value),
        Err(reason) => reject(line, kind, raw.to_string(), reason),
    }
}

/// Numeric counterpart of [`apply_edit`] for callers that already hold an integer.
pub fn apply_edit_value(line: &OrderLine, product: &Product, kind: EditKind, value: i64) -> OrderLine {
    match u32::try_from(value) {
        Ok(value) => apply_quantity(line, product, kind, value),
        Err(_) if value < 0 => reject(line, kind, value.to_string(), QuantityError::Negative),
        Err(_) => reject(line, kind, value.to_string(), QuantityError::TooLarge),
    }
}

/// Move one field up or down by one. Decrementing a field at zero does nothing.
pub fn step(line: &OrderLine, product: &Product, kind: EditKind, step: Step) -> OrderLine {
    let current = match kind {
        EditKind::Pieces => line.pieces,
        EditKind::Cartons => line.cartons,
    };
    let next = match step {
        Step::Increment => current.checked_add(1),
        Step::Decrement => current.checked_sub(1),
    };
    match next {
        Some(value) => apply_quantity(line, product, kind, value),
        None => line.clone(),
    }
}

pub fn recompute_grand_total(lines: &[OrderLine]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::zero(), |acc, line| acc + &line.line_total)
}

fn apply_quantity(line: &OrderLine, product: &Product, kind: EditKind, value: u32) -> OrderLine {
    let (pieces, cartons) = match (product.pack_size, kind) {
        // Cartons do not exist for pieces-only products.
        (None, EditKind::Cartons) => return line.clone(),
        (None, EditKind::Pieces) => (value, 0),
        (Some(n), EditKind::Pieces) => {
            let total = u64::from(value) + u64::from(line.cartons) * u64::from(n.get());
            match normalize(total, n) {
                Some(pair) => pair,
                None => return reject(line, kind, value.to_string(), QuantityError::TooLarge),
            }
        }
        (Some(n), EditKind::Cartons) => {
            let total = u64::from(line.pieces % n.get()) + u64::from(value) * u64::from(n.get());
            match normalize(total, n) {
                Some(pair) => pair,
                None => return reject(line, kind, value.to_string(), QuantityError::TooLarge),
            }
        }
    };

    let mut next = OrderLine {
        product_id: line.product_id,
        pieces,
        cartons,
        line_total: BigDecimal::zero(),
        invalid: false,
        rejected: None,
    };
    next.line_total = BigDecimal::from(next.total_pieces(product.pack_size)) * &product.rate;
    next
}

/// Split a piece count into `(loose pieces, cartons)`.
fn normalize(total: u64, pack_size: NonZeroU32) -> Option<(u32, u32)> {
    let n = u64::from(pack_size.get());
    let cartons = u32::try_from(total / n).ok()?;
    let pieces = u32::try_from(total % n).ok()?;
    Some((pieces, cartons))
}

fn reject(line: &OrderLine, field: EditKind, raw: String, reason: QuantityError) -> OrderLine {
    log::debug!(
        "rejected {} edit {:?} for product {}: {}",
        field,
        raw,
        line.product_id,
        reason
    );
    OrderLine {
        invalid: true,
        rejected: Some(RejectedInput { field, raw, reason }),
        ..line.clone()
    }
}
