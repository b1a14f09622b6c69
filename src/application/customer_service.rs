use std::sync::Arc;

use uuid::Uuid;

use crate::domain::customer::{
    Address, AddressInput, Customer, CustomerDefaults, CustomerSignup, CustomerSummary,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerRepository;

/// The customer linked to `uid`, or 404 when the account has not signed up.
pub(crate) fn require_customer(
    repo: &dyn CustomerRepository,
    uid: &str,
) -> Result<Customer, DomainError> {
    repo.find_by_uid(uid)?
        .ok_or_else(|| DomainError::NotFound("No customer linked to this account".to_string()))
}

pub struct CustomerService {
    repo: Arc<dyn CustomerRepository>,
    defaults: CustomerDefaults,
}

impl CustomerService {
    pub fn new(repo: Arc<dyn CustomerRepository>, defaults: CustomerDefaults) -> Self {
        Self { repo, defaults }
    }

    pub fn get_customer(&self, uid: &str) -> Result<Option<CustomerSummary>, DomainError> {
        Ok(self.repo.find_by_uid(uid)?.as_ref().map(CustomerSummary::from))
    }

    pub fn create_customer(
        &self,
        uid: &str,
        signup: CustomerSignup,
    ) -> Result<CustomerSummary, DomainError> {
        if let Some(existing) = self.repo.find_by_uid(uid)? {
            return Ok(CustomerSummary::from(&existing));
        }
        if signup.customer_name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "customer_name is required".to_string(),
            ));
        }
        let customer = self.repo.get_or_create(uid, signup, &self.defaults)?;
        Ok(CustomerSummary::from(&customer))
    }

    pub fn update_fcm_token(&self, uid: &str, token: &str) -> Result<(), DomainError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::InvalidInput("token is required".to_string()));
        }
        let customer = require_customer(&*self.repo, uid)?;
        self.repo.set_fcm_token(customer.id, token)
    }

    pub fn list_addresses(&self, uid: &str) -> Result<Vec<Address>, DomainError> {
        let customer = require_customer(&*self.repo, uid)?;
        self.repo.list_addresses(customer.id)
    }

    pub fn create_address(&self, uid: &str, input: AddressInput) -> Result<Address, DomainError> {
        validate_address(&input)?;
        let customer = require_customer(&*self.repo, uid)?;
        self.repo.create_address(customer.id, input)
    }

    pub fn update_address(
        &self,
        uid: &str,
        address_id: Uuid,
        input: AddressInput,
    ) -> Result<Address, DomainError> {
        validate_address(&input)?;
        let customer = require_customer(&*self.repo, uid)?;
        self.repo.update_address(customer.id, address_id, input)
    }
}

fn validate_address(input: &AddressInput) -> Result<(), DomainError> {
    if input.address_line1.trim().is_empty() || input.city.trim().is_empty() {
        return Err(DomainError::InvalidInput(
            "address_line1 and city are required".to_string(),
        ));
    }
    Ok(())
}
