use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::extract::{AdminKey, Authenticated};
use super::{blocking, money, PageParams, PageResponse};
use crate::domain::delivery::AssignmentRow;
use crate::domain::order::{CartInput, CartLineInput, OrderLineView, OrderView};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartLineRequest {
    pub item_code: String,
    pub qty: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<CartLineRequest>,
    pub delivery_date: Option<NaiveDate>,
    /// `HH:MM:SS`
    #[schema(value_type = Option<String>)]
    pub delivery_time: Option<NaiveTime>,
    pub address_id: Option<Uuid>,
}

impl From<CreateOrderRequest> for CartInput {
    fn from(r: CreateOrderRequest) -> Self {
        CartInput {
            lines: r
                .items
                .into_iter()
                .map(|l| CartLineInput {
                    item_code: l.item_code,
                    qty: l.qty,
                })
                .collect(),
            delivery_date: r.delivery_date,
            delivery_time: r.delivery_time,
            address_id: r.address_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub delivered_qty: i32,
    /// Decimal rate as a string, e.g. "250.00"
    pub rate: String,
    pub amount: String,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(l: OrderLineView) -> Self {
        Self {
            rate: money(&l.rate),
            amount: money(&l.amount),
            id: l.id,
            item_code: l.item_code,
            item_name: l.item_name,
            qty: l.qty,
            delivered_qty: l.delivered_qty,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_type: String,
    pub status: String,
    pub transaction_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub delivery_time: Option<NaiveTime>,
    pub address_id: Option<Uuid>,
    pub grand_total: String,
    pub created_at: String,
    pub items: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            customer_id: o.customer_id,
            order_type: o.order_type,
            status: o.status,
            transaction_date: o.transaction_date,
            delivery_date: o.delivery_date,
            delivery_time: o.delivery_time,
            address_id: o.address_id,
            grand_total: money(&o.grand_total),
            created_at: o.created_at.to_rfc3339(),
            items: o.items.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignmentRequestRow {
    /// Sales order line id.
    pub so_detail: Uuid,
    pub sales_partner: Uuid,
    pub scheduled_datetime: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignPartnersRequest {
    pub assignments: Vec<AssignmentRequestRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignPartnersResponse {
    pub delivery_notes: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemsToAssignResponse {
    pub so_details: Vec<Uuid>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Places a shopping-cart order for the signed-in customer. Every line is
/// priced from the storefront price list.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Unknown item, unpriced item or bad quantity"),
        (status = 404, description = "No customer linked to this account"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let cart = CartInput::from(body.into_inner());
    let order = blocking(move || state.orders.create_order(&user.uid, cart)).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /api/orders
///
/// The signed-in customer's orders, newest first, with their lines.
#[utoipa::path(
    get,
    path = "/api/orders",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated orders", body = PageResponse<OrderResponse>),
        (status = 404, description = "No customer linked to this account"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: Authenticated,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let pagination = query.pagination();
    let page = blocking(move || state.orders.list_orders(&user.uid, pagination)).await?;
    Ok(HttpResponse::Ok().json(PageResponse::from_page(page, OrderResponse::from)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Sales order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    user: Authenticated,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = blocking(move || state.orders.get_order(&user.uid, order_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}/items-to-assign",
    params(("id" = Uuid, Path, description = "Sales order id")),
    responses(
        (status = 200, description = "Order lines still open for assignment", body = ItemsToAssignResponse),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "Order not found"),
    ),
    tag = "admin"
)]
pub async fn get_items_to_assign(
    state: web::Data<AppState>,
    _admin: AdminKey,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let so_details = blocking(move || state.orders.get_items_to_assign(order_id)).await?;
    Ok(HttpResponse::Ok().json(ItemsToAssignResponse { so_details }))
}

/// POST /api/admin/orders/{id}/assignments
///
/// Creates one pending delivery note per `(sales_partner,
/// scheduled_datetime)` pair.
#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/assignments",
    params(("id" = Uuid, Path, description = "Sales order id")),
    request_body = AssignPartnersRequest,
    responses(
        (status = 201, description = "Delivery notes created", body = AssignPartnersResponse),
        (status = 400, description = "Line not on this order or unknown partner"),
        (status = 409, description = "Line already assigned"),
    ),
    tag = "admin"
)]
pub async fn assign_partners(
    state: web::Data<AppState>,
    _admin: AdminKey,
    path: web::Path<Uuid>,
    body: web::Json<AssignPartnersRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let rows: Vec<AssignmentRow> = body
        .into_inner()
        .assignments
        .into_iter()
        .map(|r| AssignmentRow {
            so_detail: r.so_detail,
            sales_partner: r.sales_partner,
            scheduled_datetime: r.scheduled_datetime,
        })
        .collect();
    let delivery_notes = blocking(move || state.orders.assign_partners(order_id, rows)).await?;
    Ok(HttpResponse::Created().json(AssignPartnersResponse { delivery_notes }))
}
