use std::collections::HashMap;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::catalog::{Item, ItemFilter, ItemGroup};
use super::customer::{Address, AddressInput, Customer, CustomerDefaults, CustomerSignup};
use super::delivery::{AssignmentGroup, DeliveryNote, TransitionOutcome, WorkflowAction, WorkflowState};
use super::errors::DomainError;
use super::identity::IdentityClaims;
use super::notification::PushNotification;
use super::order::{NewSalesOrder, OrderView};
use super::pagination::{Page, Pagination};
use super::partner::{NewSalesPartner, SalesPartner};
use super::pricing::PricingRule;

pub trait TokenVerifier: Send + Sync + 'static {
    fn verify(&self, token: &str) -> Result<IdentityClaims, DomainError>;
}

pub trait CustomerRepository: Send + Sync + 'static {
    fn find_by_uid(&self, uid: &str) -> Result<Option<Customer>, DomainError>;
    /// Returns the customer linked to `uid`, creating it (and its address)
    /// when none exists yet.
    fn get_or_create(
        &self,
        uid: &str,
        signup: CustomerSignup,
        defaults: &CustomerDefaults,
    ) -> Result<Customer, DomainError>;
    fn set_fcm_token(&self, customer_id: Uuid, token: &str) -> Result<(), DomainError>;
    fn list_addresses(&self, customer_id: Uuid) -> Result<Vec<Address>, DomainError>;
    fn create_address(&self, customer_id: Uuid, input: AddressInput) -> Result<Address, DomainError>;
    fn update_address(
        &self,
        customer_id: Uuid,
        address_id: Uuid,
        input: AddressInput,
    ) -> Result<Address, DomainError>;
}

pub trait CatalogRepository: Send + Sync + 'static {
    /// Groups shown on the website, in tree order.
    fn website_item_groups(&self) -> Result<Vec<ItemGroup>, DomainError>;
    fn all_item_groups(&self) -> Result<Vec<ItemGroup>, DomainError>;
    fn list_items(&self, filter: &ItemFilter, pagination: Pagination) -> Result<Page<Item>, DomainError>;
    fn find_item_by_route(&self, route: &str) -> Result<Option<Item>, DomainError>;
    fn find_items(&self, item_codes: &[String]) -> Result<Vec<Item>, DomainError>;
    fn list_rates(
        &self,
        price_list: &str,
        item_codes: &[String],
    ) -> Result<HashMap<String, BigDecimal>, DomainError>;
    fn pricing_rules(&self, item_codes: &[String]) -> Result<Vec<PricingRule>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewSalesOrder) -> Result<Uuid, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list_for_customer(
        &self,
        customer_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<OrderView>, DomainError>;
    /// Lines not yet held by a live delivery note and not fully delivered.
    fn assignable_lines(&self, order_id: Uuid) -> Result<Vec<Uuid>, DomainError>;
}

pub trait DeliveryRepository: Send + Sync + 'static {
    fn create_for_assignments(
        &self,
        order_id: Uuid,
        groups: Vec<AssignmentGroup>,
    ) -> Result<Vec<Uuid>, DomainError>;
    fn list_for_partner(
        &self,
        partner_id: Uuid,
        state: Option<WorkflowState>,
        pagination: Pagination,
    ) -> Result<Page<DeliveryNote>, DomainError>;
    fn transition(
        &self,
        note_id: Uuid,
        partner_id: Uuid,
        action: WorkflowAction,
    ) -> Result<TransitionOutcome, DomainError>;
}

pub trait PartnerRepository: Send + Sync + 'static {
    fn create(&self, partner: NewSalesPartner) -> Result<SalesPartner, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<SalesPartner>, DomainError>;
    fn find_by_uid(&self, uid: &str) -> Result<Option<SalesPartner>, DomainError>;
    /// Stores `code` unless the partner has already signed up. Returns false
    /// when the partner was already linked.
    fn replace_sign_up_code(&self, id: Uuid, code: &str) -> Result<bool, DomainError>;
    /// Links `uid` to the partner holding `code` and consumes the code in one
    /// statement. `None` when no unconsumed code matches.
    fn claim_sign_up_code(&self, code: &str, uid: &str) -> Result<Option<SalesPartner>, DomainError>;
    fn set_fcm_token(&self, id: Uuid, token: &str) -> Result<(), DomainError>;
}

#[derive(Debug, Clone, Default)]
pub struct WebsiteContent {
    pub copyright: Option<String>,
    pub footer_address: Option<String>,
    pub allcat_groups: Vec<String>,
}

pub trait WebsiteRepository: Send + Sync + 'static {
    fn content(&self) -> Result<WebsiteContent, DomainError>;
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(&self, notification: &PushNotification) -> Result<(), DomainError>;
}
