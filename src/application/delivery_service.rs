use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use crate::domain::delivery::{TransitionOutcome, WorkflowAction};
use crate::domain::errors::DomainError;
use crate::domain::notification::delivery_notifications;
use crate::domain::ports::{DeliveryRepository, Notifier, PartnerRepository};

use super::partner_service::require_partner;

pub struct DeliveryService {
    partners: Arc<dyn PartnerRepository>,
    deliveries: Arc<dyn DeliveryRepository>,
    notifier: Arc<dyn Notifier>,
}

impl DeliveryService {
    pub fn new(
        partners: Arc<dyn PartnerRepository>,
        deliveries: Arc<dyn DeliveryRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            partners,
            deliveries,
            notifier,
        }
    }

    /// Applies `action` to the note on behalf of the signed-in partner. Runs
    /// the database work only; call [`DeliveryService::notify`] once this has
    /// returned.
    pub fn transition(
        &self,
        uid: &str,
        note_id: Uuid,
        action: WorkflowAction,
    ) -> Result<TransitionOutcome, DomainError> {
        let partner = require_partner(&*self.partners, uid)?;
        self.deliveries.transition(note_id, partner.id, action)
    }

    /// Pushes the transition to the customer and the partner. Failures are
    /// logged and otherwise ignored. Returns how many messages were accepted.
    pub async fn notify(&self, outcome: &TransitionOutcome) -> usize {
        let messages = delivery_notifications(outcome);
        let results = join_all(messages.iter().map(|m| self.notifier.send(m))).await;

        let mut delivered = 0;
        for (message, result) in messages.iter().zip(results) {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => log::warn!(
                    "push '{}' for delivery note {} failed: {}",
                    message.title,
                    outcome.note.id,
                    e
                ),
            }
        }
        delivered
    }
}
