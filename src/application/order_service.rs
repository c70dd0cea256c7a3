use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{build_submission, Direction, ListResult, OrderView, SubmissionContext};
use crate::domain::ports::OrderStore;
use crate::domain::product::{Business, Product};
use crate::domain::reconciler::{self, EditKind, OrderLine, Step};

/// Quantities for one product as sent by a client. Not trusted to be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedLine {
    pub product_id: Uuid,
    pub pieces: u32,
    pub cartons: u32,
}

/// One user action on a quantity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdit<'a> {
    Text(&'a str),
    Value(i64),
    Step(Step),
}

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderStore> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn products_for_store(&self, store_id: Uuid) -> Result<Vec<Product>, DomainError> {
        self.repo.products_for_store(store_id)
    }

    pub fn connected_businesses(&self, business_id: Uuid) -> Result<Vec<Business>, DomainError> {
        self.repo.connected_businesses(business_id)
    }

    /// Apply one field edit to a line in the given state and return the result.
    pub fn reconcile_line(
        &self,
        current: RequestedLine,
        kind: EditKind,
        edit: LineEdit<'_>,
    ) -> Result<(OrderLine, Product), DomainError> {
        let product = self
            .repo
            .find_product(current.product_id)?
            .ok_or(DomainError::NotFound)?;
        let line = OrderLine::from_quantities(&product, current.pieces, current.cartons);
        let line = match edit {
            LineEdit::Text(raw) => reconciler::apply_edit(&line, &product, kind, raw),
            LineEdit::Value(value) => reconciler::apply_edit_value(&line, &product, kind, value),
            LineEdit::Step(step) => reconciler::step(&line, &product, kind, step),
        };
        Ok((line, product))
    }

    /// Re-reconcile the requested lines against the supplier's catalog and
    /// submit the order. Totals are always recomputed from catalog rates.
    pub fn place_order(
        &self,
        context: SubmissionContext,
        requested: &[RequestedLine],
    ) -> Result<Uuid, DomainError> {
        let connected = self
            .repo
            .connected_businesses(context.from_business)?
            .iter()
            .any(|b| b.id == context.to_business);
        if !connected {
            return Err(DomainError::NotConnected {
                from: context.from_business,
                to: context.to_business,
            });
        }

        let catalog: HashMap<Uuid, Product> = self
            .repo
            .products_for_store(context.to_business)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut lines = Vec::with_capacity(requested.len());
        for req in requested {
            let product = catalog.get(&req.product_id).ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "product {} is not sold by {}",
                    req.product_id, context.to_business
                ))
            })?;
            let line = OrderLine::from_quantities(product, req.pieces, req.cartons);
            if let Some(rejected) = &line.rejected {
                return Err(DomainError::InvalidInput(format!(
                    "product {}: {}",
                    req.product_id, rejected
                )));
            }
            lines.push(line);
        }

        let order = build_submission(&lines, context)?;
        let order_id = self.repo.submit(&order)?;
        log::info!(
            "order {} placed by {} from {} to {} ({} items, total {})",
            order_id,
            context.placed_by,
            context.from_business,
            context.to_business,
            order.items.len(),
            order.grand_total
        );
        Ok(order_id)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(
        &self,
        business_id: Uuid,
        direction: Direction,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.repo.list_for_business(business_id, direction, page, limit)
    }
}
