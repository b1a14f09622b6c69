use serde_json::{json, Value};

use super::delivery::{TransitionOutcome, WorkflowState};

/// A message for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct PushNotification {
    pub device_token: String,
    pub title: String,
    pub body: String,
    pub data: Value,
}

/// Messages for the customer and the assigned partner after a delivery job
/// changed state. People without a registered device are skipped.
pub fn delivery_notifications(outcome: &TransitionOutcome) -> Vec<PushNotification> {
    let note = &outcome.note;
    let verb = match note.workflow_state {
        WorkflowState::Completed => "completed",
        WorkflowState::Cancelled => "cancelled",
        WorkflowState::Pending => "rescheduled",
    };
    let data = json!({
        "delivery_note": note.id,
        "sales_order": note.sales_order_id,
        "workflow_state": note.workflow_state.as_str(),
    });

    let mut out = Vec::with_capacity(2);
    if let Some(token) = outcome.customer_fcm_token.as_deref() {
        out.push(PushNotification {
            device_token: token.to_string(),
            title: format!("Service {verb}"),
            body: format!(
                "{} has {} your service scheduled for {}.",
                outcome.partner_name,
                verb,
                note.scheduled_datetime.format("%d %b %Y %H:%M")
            ),
            data: data.clone(),
        });
    }
    if let Some(token) = outcome.partner_fcm_token.as_deref() {
        out.push(PushNotification {
            device_token: token.to_string(),
            title: format!("Job {verb}"),
            body: format!("Job for {} marked as {}.", note.customer_name, verb),
            data,
        });
    }
    out
}
