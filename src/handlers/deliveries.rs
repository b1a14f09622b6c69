use std::str::FromStr;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::extract::Authenticated;
use super::{blocking, money, PageParams, PageResponse};
use crate::domain::delivery::{DeliveryNote, DeliveryNoteItem, WorkflowAction, WorkflowState};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryItemResponse {
    pub id: Uuid,
    /// Sales order line this item delivers.
    pub so_detail: Uuid,
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub rate: String,
    pub amount: String,
}

impl From<DeliveryNoteItem> for DeliveryItemResponse {
    fn from(i: DeliveryNoteItem) -> Self {
        Self {
            rate: money(&i.rate),
            amount: money(&i.amount),
            id: i.id,
            so_detail: i.so_detail,
            item_code: i.item_code,
            item_name: i.item_name,
            qty: i.qty,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryNoteResponse {
    pub id: Uuid,
    pub sales_order_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub commission_rate: String,
    pub scheduled_datetime: String,
    /// Pending, Completed or Cancelled.
    pub workflow_state: String,
    pub docstatus: i16,
    pub grand_total: String,
    pub items: Vec<DeliveryItemResponse>,
}

impl From<DeliveryNote> for DeliveryNoteResponse {
    fn from(n: DeliveryNote) -> Self {
        Self {
            commission_rate: money(&n.commission_rate),
            grand_total: money(&n.grand_total),
            scheduled_datetime: n.scheduled_datetime.to_rfc3339(),
            workflow_state: n.workflow_state.to_string(),
            id: n.id,
            sales_order_id: n.sales_order_id,
            customer_id: n.customer_id,
            customer_name: n.customer_name,
            docstatus: n.docstatus,
            items: n.items.into_iter().map(DeliveryItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionResponse {
    pub delivery_note: DeliveryNoteResponse,
    /// Set when completing the job raised an invoice.
    pub sales_invoice: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StateFilter {
    /// Only notes in this workflow state.
    pub state: Option<String>,
}

impl StateFilter {
    fn workflow_state(&self) -> Result<Option<WorkflowState>, AppError> {
        Ok(self
            .state
            .as_deref()
            .map(WorkflowState::from_str)
            .transpose()?)
    }
}

/// GET /api/partner/deliveries
///
/// Delivery jobs assigned to the signed-in partner, by scheduled time.
#[utoipa::path(
    get,
    path = "/api/partner/deliveries",
    params(PageParams, StateFilter),
    responses(
        (status = 200, description = "Paginated delivery notes", body = PageResponse<DeliveryNoteResponse>),
        (status = 400, description = "Unknown workflow state"),
        (status = 404, description = "No sales partner linked to this account"),
    ),
    tag = "partners"
)]
pub async fn list_deliveries(
    state: web::Data<AppState>,
    user: Authenticated,
    paging: web::Query<PageParams>,
    filter: web::Query<StateFilter>,
) -> Result<HttpResponse, AppError> {
    let workflow_state = filter.workflow_state()?;
    let pagination = paging.pagination();
    let page = blocking(move || {
        state
            .partners
            .list_deliveries(&user.uid, workflow_state, pagination)
    })
    .await?;
    Ok(HttpResponse::Ok().json(PageResponse::from_page(page, DeliveryNoteResponse::from)))
}

/// POST /api/partner/deliveries/{id}/{action}
///
/// Moves a pending job to Completed (`complete`) or Cancelled (`cancel`).
/// The customer and the partner are notified once the change is committed.
#[utoipa::path(
    post,
    path = "/api/partner/deliveries/{id}/{action}",
    params(
        ("id" = Uuid, Path, description = "Delivery note id"),
        ("action" = String, Path, description = "`complete` or `cancel`"),
    ),
    responses(
        (status = 200, description = "Transition applied", body = TransitionResponse),
        (status = 403, description = "Job belongs to another partner"),
        (status = 404, description = "Delivery note not found"),
        (status = 409, description = "Job is no longer pending"),
    ),
    tag = "partners"
)]
pub async fn transition(
    state: web::Data<AppState>,
    user: Authenticated,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    let (note_id, action) = path.into_inner();
    let action = WorkflowAction::from_str(&action)?;

    let service = state.clone();
    let outcome = blocking(move || service.deliveries.transition(&user.uid, note_id, action)).await?;
    let notified = outcome.clone();
    actix_web::rt::spawn(async move {
        state.deliveries.notify(&notified).await;
    });

    Ok(HttpResponse::Ok().json(TransitionResponse {
        sales_invoice: outcome.invoice_id,
        delivery_note: DeliveryNoteResponse::from(outcome.note),
    }))
}
