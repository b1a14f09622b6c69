use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// Document lifecycle flag shared by delivery notes and invoices.
pub const DOCSTATUS_DRAFT: i16 = 0;
pub const DOCSTATUS_SUBMITTED: i16 = 1;
pub const DOCSTATUS_CANCELLED: i16 = 2;

pub const MODE_OF_PAYMENT_CASH: &str = "Cash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    Pending,
    Completed,
    Cancelled,
}

impl WorkflowState {
    pub const ALL: [WorkflowState; 3] = [
        WorkflowState::Pending,
        WorkflowState::Completed,
        WorkflowState::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Pending => "Pending",
            WorkflowState::Completed => "Completed",
            WorkflowState::Cancelled => "Cancelled",
        }
    }

    /// Next state after `action`. Only pending jobs move.
    pub fn apply(self, action: WorkflowAction) -> Result<WorkflowState, DomainError> {
        match (self, action) {
            (WorkflowState::Pending, WorkflowAction::Complete) => Ok(WorkflowState::Completed),
            (WorkflowState::Pending, WorkflowAction::Cancel) => Ok(WorkflowState::Cancelled),
            (state, action) => Err(DomainError::Conflict(format!(
                "cannot {} a delivery in state {}",
                action, state
            ))),
        }
    }

    pub fn docstatus(&self) -> i16 {
        match self {
            WorkflowState::Pending => DOCSTATUS_DRAFT,
            WorkflowState::Completed => DOCSTATUS_SUBMITTED,
            WorkflowState::Cancelled => DOCSTATUS_CANCELLED,
        }
    }

    /// States that hold order lines, so those lines cannot be assigned again.
    pub fn holds_lines(&self) -> bool {
        matches!(self, WorkflowState::Pending | WorkflowState::Completed)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(WorkflowState::Pending),
            "Completed" => Ok(WorkflowState::Completed),
            "Cancelled" => Ok(WorkflowState::Cancelled),
            other => Err(DomainError::InvalidInput(format!(
                "unknown workflow state '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    Complete,
    Cancel,
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkflowAction::Complete => "complete",
            WorkflowAction::Cancel => "cancel",
        })
    }
}

impl FromStr for WorkflowAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(WorkflowAction::Complete),
            "cancel" => Ok(WorkflowAction::Cancel),
            other => Err(DomainError::InvalidInput(format!(
                "unknown workflow action '{other}'"
            ))),
        }
    }
}

/// One row of an assignment request: which order line goes to which partner
/// and when.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    pub so_detail: Uuid,
    pub sales_partner: Uuid,
    pub scheduled_datetime: DateTime<Utc>,
}

/// Order lines that will share one delivery note.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentGroup {
    pub sales_partner: Uuid,
    pub scheduled_datetime: DateTime<Utc>,
    pub so_details: Vec<Uuid>,
}

/// Groups rows by `(sales_partner, scheduled_datetime)` in first-seen order.
pub fn group_assignments(rows: &[AssignmentRow]) -> Vec<AssignmentGroup> {
    let mut groups: Vec<AssignmentGroup> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| {
            g.sales_partner == row.sales_partner && g.scheduled_datetime == row.scheduled_datetime
        }) {
            Some(g) => g.so_details.push(row.so_detail),
            None => groups.push(AssignmentGroup {
                sales_partner: row.sales_partner,
                scheduled_datetime: row.scheduled_datetime,
                so_details: vec![row.so_detail],
            }),
        }
    }
    groups
}

#[derive(Debug, Clone)]
pub struct DeliveryNoteItem {
    pub id: Uuid,
    pub delivery_note_id: Uuid,
    pub so_detail: Uuid,
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct DeliveryNote {
    pub id: Uuid,
    pub sales_order_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub sales_partner_id: Uuid,
    pub commission_rate: BigDecimal,
    pub scheduled_datetime: DateTime<Utc>,
    pub auto_invoice: bool,
    pub workflow_state: WorkflowState,
    pub docstatus: i16,
    pub grand_total: BigDecimal,
    pub items: Vec<DeliveryNoteItem>,
}

/// Invoices are raised on submission only for notes created with the
/// auto-invoice flag.
pub fn should_invoice(note: &DeliveryNote, next: WorkflowState) -> bool {
    note.auto_invoice && next == WorkflowState::Completed
}

/// Invoices are rounded to whole currency units.
pub fn rounded_total(total: &BigDecimal) -> BigDecimal {
    total.round(0)
}

/// What a committed transition produced, with the device tokens needed to
/// tell the people involved.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub note: DeliveryNote,
    pub previous_state: WorkflowState,
    pub invoice_id: Option<Uuid>,
    pub customer_fcm_token: Option<String>,
    pub partner_name: String,
    pub partner_fcm_token: Option<String>,
}
