pub mod order_service;

pub use order_service::{LineEdit, OrderService, RequestedLine};
