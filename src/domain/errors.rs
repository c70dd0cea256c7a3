use bigdecimal::BigDecimal;
use thiserror::Error;
use uuid::Uuid;

/// Why a raw quantity edit was rejected. Recorded on the line, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity cannot be negative")]
    Negative,
    #[error("quantity must be a whole number")]
    NotANumber,
    #[error("quantity is too large")]
    TooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Select at least one item with quantity greater than zero")]
    EmptyOrder,
    #[error("Pieces and cartons cannot both be zero for product {0}")]
    ZeroQuantityLine(Uuid),
    #[error("Product {0} appears more than once in the order")]
    DuplicateProduct(Uuid),
    #[error("Order total {0} exceeds the largest amount an order can carry")]
    AmountTooLarge(BigDecimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Product {0} is not in this store's catalog")]
    UnknownProduct(Uuid),
    #[error("Product {0} is already selected")]
    DuplicateProduct(Uuid),
    #[error("No order line at position {0}")]
    NoSuchLine(usize),
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Business {from} is not connected to {to}")]
    NotConnected { from: Uuid, to: Uuid },
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("Order submission failed: {0}")]
    Transport(String),
}
