use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    page_offset, Direction, ListResult, Order, OrderItemView, OrderStatus, OrderView,
};
use crate::domain::ports::{CatalogRepository, OrderRepository, RelationshipRepository};
use crate::domain::product::{Business, Product};
use crate::schema::{business_relations, businesses, order_items, orders, products};

use super::models::{BusinessRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow, ProductRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Transport(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Transport(e.to_string())
    }
}

// ── Row mapping ──────────────────────────────────────────────────────────────

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let pack_size = Product::pack_size_from_stored(row.pack_size);
        if pack_size.is_none() && row.pack_size.is_some() {
            log::warn!(
                "product {} has pack size {:?}; treating it as pieces only",
                row.id,
                row.pack_size
            );
        }
        Product {
            id: row.id,
            seller_id: row.seller_id,
            name: row.name,
            rate: row.rate,
            mrp: row.mrp,
            pack_size,
        }
    }
}

impl From<BusinessRow> for Business {
    fn from(row: BusinessRow) -> Self {
        Business {
            id: row.id,
            name: row.name,
            owner_name: row.owner_name,
            contact: row.contact,
        }
    }
}

fn to_column(qty: u32) -> Result<i32, DomainError> {
    i32::try_from(qty).map_err(|_| DomainError::InvalidInput(format!("quantity {} is too large", qty)))
}

fn from_column(qty: i32) -> Result<u32, DomainError> {
    u32::try_from(qty).map_err(|_| DomainError::Transport(format!("stored quantity {} is negative", qty)))
}

fn to_view(order: OrderRow, items: Vec<OrderItemRow>) -> Result<OrderView, DomainError> {
    let status = order
        .status
        .parse::<OrderStatus>()
        .map_err(DomainError::Transport)?;
    let items = items
        .into_iter()
        .map(|i| -> Result<OrderItemView, DomainError> {
            Ok(OrderItemView {
                id: i.id,
                product_id: i.product_id,
                pieces: from_column(i.qty_in_pcs)?,
                cartons: from_column(i.qty_in_ctn)?,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;
    Ok(OrderView {
        id: order.id,
        from_business: order.from_business,
        to_business: order.to_business,
        placed_by: order.placed_by,
        amount: order.amount,
        status,
        created_at: order.created_at,
        items,
    })
}

fn orders_for(business_id: Uuid, direction: Direction) -> orders::BoxedQuery<'static, Pg> {
    let query = orders::table.into_boxed();
    match direction {
        Direction::Outgoing => query.filter(orders::from_business.eq(business_id)),
        Direction::Incoming => query.filter(orders::to_business.eq(business_id)),
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselOrderRepository {
    fn products_for_store(&self, store_id: Uuid) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::seller_id.eq(store_id))
            .select(ProductRow::as_select())
            .order(products::name.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }
}

impl RelationshipRepository for DieselOrderRepository {
    fn connected_businesses(&self, business_id: Uuid) -> Result<Vec<Business>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = business_relations::table
            .inner_join(
                businesses::table.on(businesses::id.eq(business_relations::related_business_id)),
            )
            .filter(business_relations::business_id.eq(business_id))
            .select(BusinessRow::as_select())
            .order(businesses::name.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Business::from).collect())
    }
}

impl OrderRepository for DieselOrderRepository {
    fn submit(&self, order: &Order) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        // Order and items commit together or not at all.
        conn.transaction::<_, DomainError, _>(|conn| {
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    from_business: order.from_business,
                    to_business: order.to_business,
                    placed_by: order.placed_by,
                    amount: order.grand_total.clone(),
                    status: OrderStatus::Placed.as_str().to_string(),
                })
                .execute(conn)?;

            let new_items = order
                .items
                .iter()
                .enumerate()
                .map(|(line_no, item)| -> Result<NewOrderItemRow, DomainError> {
                    Ok(NewOrderItemRow {
                        id: Uuid::new_v4(),
                        order_id,
                        product_id: item.product_id,
                        line_no: i32::try_from(line_no).map_err(|_| {
                            DomainError::InvalidInput("too many order items".to_string())
                        })?,
                        qty_in_pcs: to_column(item.pieces)?,
                        qty_in_ctn: to_column(item.cartons)?,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            log::debug!("inserted order {} with {} items", order_id, new_items.len());
            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::line_no.asc())
            .load(&mut conn)?;

        to_view(order, items).map(Some)
    }

    fn list_for_business(
        &self,
        business_id: Uuid,
        direction: Direction,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = page_offset(page, limit)?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders_for(business_id, direction)
                .count()
                .get_result(conn)?;

            let rows = orders_for(business_id, direction)
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(|o| to_view(o, vec![]))
                    .collect::<Result<Vec<_>, DomainError>>()?,
                total,
            })
        })
    }
}
