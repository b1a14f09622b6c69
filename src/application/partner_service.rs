use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::delivery::{DeliveryNote, WorkflowState};
use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, Pagination};
use crate::domain::partner::{
    generate_sign_up_code, normalize_sign_up_code, NewSalesPartner, SalesPartner,
};
use crate::domain::ports::{DeliveryRepository, PartnerRepository};

const SIGN_UP_DONE: &str = "Sign-up already completed";

/// Fresh codes tried before giving up on a clash with another partner's code.
const CODE_ATTEMPTS: usize = 5;

/// The partner linked to `uid`, or 404 when the account has not signed up.
pub(crate) fn require_partner(
    repo: &dyn PartnerRepository,
    uid: &str,
) -> Result<SalesPartner, DomainError> {
    repo.find_by_uid(uid)?.ok_or_else(|| {
        DomainError::NotFound("No sales partner linked to this account".to_string())
    })
}

pub struct PartnerService {
    partners: Arc<dyn PartnerRepository>,
    deliveries: Arc<dyn DeliveryRepository>,
}

impl PartnerService {
    pub fn new(partners: Arc<dyn PartnerRepository>, deliveries: Arc<dyn DeliveryRepository>) -> Self {
        Self {
            partners,
            deliveries,
        }
    }

    pub fn create_partner(&self, partner: NewSalesPartner) -> Result<SalesPartner, DomainError> {
        if partner.partner_name.trim().is_empty() {
            return Err(DomainError::InvalidInput("partner_name is required".to_string()));
        }
        if partner.commission_rate < BigDecimal::from(0)
            || partner.commission_rate > BigDecimal::from(100)
        {
            return Err(DomainError::InvalidInput(
                "commission_rate must be between 0 and 100".to_string(),
            ));
        }
        self.partners.create(partner)
    }

    /// Issues a fresh code, replacing any earlier one.
    pub fn generate_signup_code(&self, partner_id: Uuid) -> Result<String, DomainError> {
        self.issue_code(partner_id, generate_sign_up_code)
    }

    fn issue_code(
        &self,
        partner_id: Uuid,
        mut next_code: impl FnMut(Uuid) -> String,
    ) -> Result<String, DomainError> {
        let partner = self
            .partners
            .find_by_id(partner_id)?
            .ok_or_else(|| DomainError::not_found("Sales Partner"))?;
        if partner.is_signed_up() {
            return Err(DomainError::Conflict(SIGN_UP_DONE.to_string()));
        }

        let mut attempt = 1;
        loop {
            let code = next_code(partner.id);
            match self.partners.replace_sign_up_code(partner.id, &code) {
                Ok(true) => {
                    log::info!("issued sign-up code for sales partner {}", partner.id);
                    return Ok(code);
                }
                Ok(false) => return Err(DomainError::Conflict(SIGN_UP_DONE.to_string())),
                // Another partner already holds this code.
                Err(DomainError::Conflict(_)) if attempt < CODE_ATTEMPTS => {
                    log::warn!(
                        "sign-up code clash for sales partner {} (attempt {})",
                        partner.id,
                        attempt
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn signup(&self, uid: &str, code: &str) -> Result<SalesPartner, DomainError> {
        let code = normalize_sign_up_code(code);
        if code.is_empty() {
            return Err(DomainError::InvalidInput("code is required".to_string()));
        }
        let partner = self
            .partners
            .claim_sign_up_code(&code, uid)?
            .ok_or_else(|| DomainError::InvalidInput("Invalid or used sign-up code".to_string()))?;
        log::info!("sales partner {} completed sign-up", partner.id);
        Ok(partner)
    }

    pub fn get_partner(&self, uid: &str) -> Result<SalesPartner, DomainError> {
        require_partner(&*self.partners, uid)
    }

    pub fn update_fcm_token(&self, uid: &str, token: &str) -> Result<(), DomainError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::InvalidInput("token is required".to_string()));
        }
        let partner = require_partner(&*self.partners, uid)?;
        self.partners.set_fcm_token(partner.id, token)
    }

    pub fn list_deliveries(
        &self,
        uid: &str,
        state: Option<WorkflowState>,
        pagination: Pagination,
    ) -> Result<Page<DeliveryNote>, DomainError> {
        let partner = require_partner(&*self.partners, uid)?;
        self.deliveries.list_for_partner(partner.id, state, pagination)
    }
}
