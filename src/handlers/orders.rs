use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::{OrderService, RequestedLine};
use crate::domain::order::{Direction, OrderStatus, OrderView, SubmissionContext};
use crate::domain::ports::OrderStore;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderLineRequest {
    pub product_id: Uuid,
    #[serde(default)]
    pub pieces: u32,
    #[serde(default)]
    pub cartons: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// The ordering business.
    pub from_business: Uuid,
    /// The supplying business whose catalog the lines refer to.
    pub to_business: Uuid,
    /// The user placing the order.
    pub placed_by: Uuid,
    pub lines: Vec<CreateOrderLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub pieces: u32,
    pub cartons: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub from_business: Uuid,
    pub to_business: Uuid,
    pub placed_by: Uuid,
    /// Decimal amount as a string, e.g. "250.00"
    pub amount: String,
    pub status: OrderStatus,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            from_business: o.from_business,
            to_business: o.to_business,
            placed_by: o.placed_by,
            amount: o.amount.to_string(),
            status: o.status,
            created_at: o.created_at.to_rfc3339(),
            items: o
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    product_id: i.product_id,
                    pieces: i.pieces,
                    cartons: i.cartons,
                })
                .collect(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// `outgoing` (placed by the business, default) or `incoming`.
    #[serde(default)]
    pub direction: Direction,
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places an order with a connected supplier. Quantities are normalized and
/// the amount is computed from the supplier's catalog; the order and all of
/// its items are written in a single transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = CreateOrderResponse),
        (status = 400, description = "Unknown product or unconnected businesses"),
        (status = 422, description = "No line carries a quantity, or a product repeats"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order<R: OrderStore>(
    service: web::Data<OrderService<R>>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let context = SubmissionContext {
        from_business: body.from_business,
        to_business: body.to_business,
        placed_by: body.placed_by,
    };
    let requested: Vec<RequestedLine> = body
        .lines
        .iter()
        .map(|l| RequestedLine {
            product_id: l.product_id,
            pieces: l.pieces,
            cartons: l.cartons,
        })
        .collect();

    let order_id = web::block(move || service.place_order(context, &requested))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CreateOrderResponse { id: order_id }))
}

/// GET /orders/{id}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order<R: OrderStore>(
    service: web::Data<OrderService<R>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let result = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /businesses/{id}/orders
///
/// Returns a paginated list of a business's orders (without their items),
/// newest first.
#[utoipa::path(
    get,
    path = "/businesses/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Business UUID"),
        ("direction" = Option<Direction>, Query, description = "outgoing (default) or incoming"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders<R: OrderStore>(
    service: web::Data<OrderService<R>>,
    path: web::Path<Uuid>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let business_id = path.into_inner();
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let direction = params.direction;

    let result = web::block(move || service.list_orders(business_id, direction, page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
