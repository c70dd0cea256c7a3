use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Direction, ListResult, Order, OrderView};
use super::product::{Business, Product};

pub trait CatalogRepository: Send + Sync + 'static {
    fn products_for_store(&self, store_id: Uuid) -> Result<Vec<Product>, DomainError>;
    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
}

pub trait RelationshipRepository: Send + Sync + 'static {
    /// Businesses that `business_id` may place orders with.
    fn connected_businesses(&self, business_id: Uuid) -> Result<Vec<Business>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist the order and all of its items atomically, returning the new order id.
    fn submit(&self, order: &Order) -> Result<Uuid, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list_for_business(
        &self,
        business_id: Uuid,
        direction: Direction,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError>;
}

/// Everything the order service needs from storage.
pub trait OrderStore: CatalogRepository + RelationshipRepository + OrderRepository {}

impl<T> OrderStore for T where T: CatalogRepository + RelationshipRepository + OrderRepository {}
