//! In-process store used by tests and local demos.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    page_offset, Direction, ListResult, Order, OrderItemView, OrderStatus, OrderView,
};
use crate::domain::ports::{CatalogRepository, OrderRepository, RelationshipRepository};
use crate::domain::product::{Business, Product};

#[derive(Default)]
struct State {
    businesses: Vec<Business>,
    relations: Vec<(Uuid, Uuid)>,
    products: Vec<Product>,
    orders: Vec<OrderView>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    fail_submissions: AtomicBool,
}

impl InMemoryStore {
    pub fn add_business(&self, name: &str, owner_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.fixture().businesses.push(Business {
            id,
            name: name.to_string(),
            owner_name: owner_name.to_string(),
            contact: None,
        });
        id
    }

    /// Allow `buyer` to order from `seller`.
    pub fn connect(&self, buyer: Uuid, seller: Uuid) {
        self.fixture().relations.push((buyer, seller));
    }

    pub fn add_product(
        &self,
        seller_id: Uuid,
        name: &str,
        rate: BigDecimal,
        pack_size: Option<NonZeroU32>,
    ) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            seller_id,
            name: name.to_string(),
            mrp: rate.clone(),
            rate,
            pack_size,
        };
        self.fixture().products.push(product.clone());
        product
    }

    /// Make every later `submit` fail as if the database were unreachable.
    pub fn fail_submissions(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, DomainError> {
        self.state
            .read()
            .map_err(|e| DomainError::Transport(e.to_string()))
    }

    /// Write access for the seeding helpers above, which run outside any request.
    fn fixture(&self) -> RwLockWriteGuard<'_, State> {
        self.write().expect("in-memory store lock poisoned")
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, DomainError> {
        self.state
            .write()
            .map_err(|e| DomainError::Transport(e.to_string()))
    }
}

impl CatalogRepository for InMemoryStore {
    fn products_for_store(&self, store_id: Uuid) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .read()?
            .products
            .iter()
            .filter(|p| p.seller_id == store_id)
            .cloned()
            .collect())
    }

    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.read()?.products.iter().find(|p| p.id == id).cloned())
    }
}

impl RelationshipRepository for InMemoryStore {
    fn connected_businesses(&self, business_id: Uuid) -> Result<Vec<Business>, DomainError> {
        let state = self.read()?;
        Ok(state
            .relations
            .iter()
            .filter(|(buyer, _)| *buyer == business_id)
            .filter_map(|(_, seller)| state.businesses.iter().find(|b| b.id == *seller))
            .cloned()
            .collect())
    }
}

impl OrderRepository for InMemoryStore {
    fn submit(&self, order: &Order) -> Result<Uuid, DomainError> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(DomainError::Transport("store unavailable".to_string()));
        }
        let id = Uuid::new_v4();
        self.write()?.orders.push(OrderView {
            id,
            from_business: order.from_business,
            to_business: order.to_business,
            placed_by: order.placed_by,
            amount: order.grand_total.clone(),
            status: OrderStatus::Placed,
            created_at: Utc::now(),
            items: order
                .items
                .iter()
                .map(|i| OrderItemView {
                    id: Uuid::new_v4(),
                    product_id: i.product_id,
                    pieces: i.pieces,
                    cartons: i.cartons,
                })
                .collect(),
        });
        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.read()?.orders.iter().find(|o| o.id == id).cloned())
    }

    fn list_for_business(
        &self,
        business_id: Uuid,
        direction: Direction,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let state = self.read()?;
        let mut matching: Vec<OrderView> = state
            .orders
            .iter()
            .filter(|o| match direction {
                Direction::Outgoing => o.from_business == business_id,
                Direction::Incoming => o.to_business == business_id,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let offset = usize::try_from(page_offset(page, limit)?).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(take)
            .map(|mut o| {
                o.items.clear();
                o
            })
            .collect();
        Ok(ListResult { items, total })
    }
}
