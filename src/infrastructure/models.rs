use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{business_relations, businesses, order_items, orders, products};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = businesses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BusinessRow {
    pub id: Uuid,
    pub name: String,
    pub owner_name: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = businesses)]
pub struct NewBusinessRow {
    pub id: Uuid,
    pub name: String,
    pub owner_name: String,
    pub contact: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = business_relations)]
pub struct NewBusinessRelationRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub related_business_id: Uuid,
    pub relation_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub rate: BigDecimal,
    pub mrp: BigDecimal,
    pub pack_size: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub rate: BigDecimal,
    pub mrp: BigDecimal,
    pub pack_size: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub from_business: Uuid,
    pub to_business: Uuid,
    pub placed_by: Uuid,
    pub amount: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub from_business: Uuid,
    pub to_business: Uuid,
    pub placed_by: Uuid,
    pub amount: BigDecimal,
    pub status: String,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub line_no: i32,
    pub qty_in_pcs: i32,
    pub qty_in_ctn: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub line_no: i32,
    pub qty_in_pcs: i32,
    pub qty_in_ctn: i32,
}
