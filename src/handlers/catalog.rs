use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::{LineEdit, OrderService, RequestedLine};
use crate::domain::ports::OrderStore;
use crate::domain::product::{Business, Product};
use crate::domain::reconciler::{EditKind, Step};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub rate: String,
    pub mrp: String,
    /// Pieces per carton; absent for products sold in pieces only.
    pub pack_size: Option<u32>,
    /// Whether the cartons field applies to this product.
    pub sold_in_cartons: bool,
    /// Display label, e.g. "Biscuits - 12 in carton".
    pub label: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        let label = match p.pack_size {
            Some(n) => format!("{} - {} in carton", p.name, n),
            None => format!("{} - pcs only", p.name),
        };
        let sold_in_cartons = p.sold_in_cartons();
        Self {
            id: p.id,
            seller_id: p.seller_id,
            name: p.name,
            rate: p.rate.to_string(),
            mrp: p.mrp.to_string(),
            pack_size: p.pack_size.map(|n| n.get()),
            sold_in_cartons,
            label,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BusinessResponse {
    pub id: Uuid,
    pub name: String,
    pub owner_name: String,
    pub contact: Option<String>,
}

impl From<Business> for BusinessResponse {
    fn from(b: Business) -> Self {
        Self {
            id: b.id,
            name: b.name,
            owner_name: b.owner_name,
            contact: b.contact,
        }
    }
}

/// A quantity as typed by the user: either text from an input box or a number.
///
/// Any other JSON value is accepted too and comes back as a rejected edit.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawQuantity {
    /// Text form of a value that is neither an `i64` nor a string. Whole
    /// numbers outside `i64` keep their digits so they read as too large.
    fn other_as_text(value: &serde_json::Value) -> String {
        match value.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
            _ => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReconcileLineRequest {
    pub product_id: Uuid,
    /// Current loose pieces on the line.
    #[serde(default)]
    pub pieces: u32,
    /// Current cartons on the line.
    #[serde(default)]
    pub cartons: u32,
    /// The field being edited.
    pub field: EditKind,
    /// New value for the field. Exactly one of `value` and `step` must be set.
    pub value: Option<RawQuantity>,
    pub step: Option<Step>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileLineResponse {
    pub product_id: Uuid,
    pub pieces: u32,
    pub cartons: u32,
    pub line_total: String,
    pub invalid: bool,
    /// Validation message for the rejected field, if any.
    pub message: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /stores/{id}/products
#[utoipa::path(
    get,
    path = "/stores/{id}/products",
    params(
        ("id" = Uuid, Path, description = "Selling business UUID"),
    ),
    responses(
        (status = 200, description = "Catalog of the store", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_products<R: OrderStore>(
    service: web::Data<OrderService<R>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let store_id = path.into_inner();

    let products = web::block(move || service.products_for_store(store_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /businesses/{id}/connections
///
/// Businesses the given business may place orders with.
#[utoipa::path(
    get,
    path = "/businesses/{id}/connections",
    params(
        ("id" = Uuid, Path, description = "Ordering business UUID"),
    ),
    responses(
        (status = 200, description = "Connected businesses", body = [BusinessResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_connections<R: OrderStore>(
    service: web::Data<OrderService<R>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let business_id = path.into_inner();

    let businesses = web::block(move || service.connected_businesses(business_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<BusinessResponse> = businesses.into_iter().map(BusinessResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /order-lines/reconcile
///
/// Applies a single pieces/cartons edit to a line and returns the normalized
/// line. Invalid input is reported in the body, not as an error status.
#[utoipa::path(
    post,
    path = "/order-lines/reconcile",
    request_body = ReconcileLineRequest,
    responses(
        (status = 200, description = "Normalized line", body = ReconcileLineResponse),
        (status = 400, description = "Neither or both of value and step given"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn reconcile_line<R: OrderStore>(
    service: web::Data<OrderService<R>>,
    body: web::Json<ReconcileLineRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let current = RequestedLine {
        product_id: body.product_id,
        pieces: body.pieces,
        cartons: body.cartons,
    };
    let field = body.field;

    let line = web::block(move || {
        let other;
        let edit = match (&body.value, body.step) {
            (Some(RawQuantity::Text(raw)), None) => LineEdit::Text(raw),
            (Some(RawQuantity::Number(n)), None) => LineEdit::Value(*n),
            (Some(RawQuantity::Other(value)), None) => {
                other = RawQuantity::other_as_text(value);
                LineEdit::Text(&other)
            }
            (None, Some(step)) => LineEdit::Step(step),
            _ => {
                return Err(AppError::BadRequest(
                    "exactly one of value and step must be given".to_string(),
                ))
            }
        };
        let (line, _) = service.reconcile_line(current, field, edit)?;
        Ok::<_, AppError>(line)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ReconcileLineResponse {
        product_id: line.product_id,
        pieces: line.pieces,
        cartons: line.cartons,
        line_total: line.line_total.to_string(),
        invalid: line.invalid,
        message: line.rejected.map(|r| r.reason.to_string()),
    }))
}
