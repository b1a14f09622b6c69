//! In-memory port implementations for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::{Item, ItemFilter, ItemGroup};
use crate::domain::customer::{Address, AddressInput, Customer, CustomerDefaults, CustomerSignup};
use crate::domain::delivery::{
    AssignmentGroup, DeliveryNote, TransitionOutcome, WorkflowAction, WorkflowState,
};
use crate::domain::errors::DomainError;
use crate::domain::notification::PushNotification;
use crate::domain::order::{NewSalesOrder, OrderLineView, OrderView};
use crate::domain::pagination::{Page, Pagination};
use crate::domain::partner::{NewSalesPartner, SalesPartner};
use crate::domain::ports::{
    CatalogRepository, CustomerRepository, DeliveryRepository, Notifier, OrderRepository,
    PartnerRepository, WebsiteContent, WebsiteRepository,
};
use crate::domain::pricing::PricingRule;

fn page_of<T: Clone>(all: &[T], pagination: Pagination) -> Page<T> {
    Page {
        items: all
            .iter()
            .skip(pagination.offset() as usize)
            .take(pagination.page_length as usize)
            .cloned()
            .collect(),
        total: all.len() as i64,
        pagination,
    }
}

#[derive(Default)]
pub struct FakeCustomers {
    pub customers: Mutex<HashMap<String, Customer>>,
    pub addresses: Mutex<Vec<Address>>,
}

impl CustomerRepository for FakeCustomers {
    fn find_by_uid(&self, uid: &str) -> Result<Option<Customer>, DomainError> {
        Ok(self.customers.lock().unwrap().get(uid).cloned())
    }

    fn get_or_create(
        &self,
        uid: &str,
        signup: CustomerSignup,
        defaults: &CustomerDefaults,
    ) -> Result<Customer, DomainError> {
        if let Some(c) = self.find_by_uid(uid)? {
            return Ok(c);
        }
        let customer = Customer {
            id: Uuid::new_v4(),
            customer_name: signup.customer_name,
            customer_type: "Individual".to_string(),
            customer_group: defaults.customer_group.clone(),
            territory: defaults.territory.clone(),
            mobile_no: signup.mobile_no,
            email: signup.email,
            fcm_token: None,
        };
        if let Some(address) = signup.address {
            self.create_address(customer.id, address)?;
        }
        self.customers
            .lock()
            .unwrap()
            .insert(uid.to_string(), customer.clone());
        Ok(customer)
    }

    fn set_fcm_token(&self, customer_id: Uuid, token: &str) -> Result<(), DomainError> {
        let mut all = self.customers.lock().unwrap();
        let c = all
            .values_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| DomainError::not_found("Customer"))?;
        c.fcm_token = Some(token.to_string());
        Ok(())
    }

    fn list_addresses(&self, customer_id: Uuid) -> Result<Vec<Address>, DomainError> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect())
    }

    fn create_address(&self, customer_id: Uuid, input: AddressInput) -> Result<Address, DomainError> {
        let address = Address {
            id: Uuid::new_v4(),
            customer_id,
            address_line1: input.address_line1,
            address_line2: input.address_line2,
            city: input.city,
            state: input.state,
            country: input.country,
            pincode: input.pincode,
            is_primary: input.is_primary,
        };
        self.addresses.lock().unwrap().push(address.clone());
        Ok(address)
    }

    fn update_address(
        &self,
        customer_id: Uuid,
        address_id: Uuid,
        input: AddressInput,
    ) -> Result<Address, DomainError> {
        let mut all = self.addresses.lock().unwrap();
        let a = all
            .iter_mut()
            .find(|a| a.id == address_id && a.customer_id == customer_id)
            .ok_or_else(|| DomainError::not_found("Address"))?;
        a.address_line1 = input.address_line1;
        a.city = input.city;
        a.is_primary = input.is_primary;
        Ok(a.clone())
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    pub groups: Vec<ItemGroup>,
    pub items: Vec<Item>,
    pub rates: HashMap<String, BigDecimal>,
    pub rules: Vec<PricingRule>,
    pub last_filter: Mutex<Option<ItemFilter>>,
}

impl CatalogRepository for FakeCatalog {
    fn website_item_groups(&self) -> Result<Vec<ItemGroup>, DomainError> {
        Ok(self.groups.clone())
    }

    fn all_item_groups(&self) -> Result<Vec<ItemGroup>, DomainError> {
        Ok(self.groups.clone())
    }

    fn list_items(&self, filter: &ItemFilter, pagination: Pagination) -> Result<Page<Item>, DomainError> {
        *self.last_filter.lock().unwrap() = Some(filter.clone());
        let matching: Vec<Item> = self
            .items
            .iter()
            .filter(|i| {
                filter
                    .item_groups
                    .as_ref()
                    .is_none_or(|groups| groups.contains(&i.item_group))
            })
            .cloned()
            .collect();
        Ok(page_of(&matching, pagination))
    }

    fn find_item_by_route(&self, route: &str) -> Result<Option<Item>, DomainError> {
        Ok(self
            .items
            .iter()
            .find(|i| i.route.as_deref() == Some(route))
            .cloned())
    }

    fn find_items(&self, item_codes: &[String]) -> Result<Vec<Item>, DomainError> {
        Ok(self
            .items
            .iter()
            .filter(|i| item_codes.contains(&i.item_code))
            .cloned()
            .collect())
    }

    fn list_rates(
        &self,
        _price_list: &str,
        item_codes: &[String],
    ) -> Result<HashMap<String, BigDecimal>, DomainError> {
        Ok(self
            .rates
            .iter()
            .filter(|(code, _)| item_codes.contains(code))
            .map(|(code, rate)| (code.clone(), rate.clone()))
            .collect())
    }

    fn pricing_rules(&self, item_codes: &[String]) -> Result<Vec<PricingRule>, DomainError> {
        Ok(self
            .rules
            .iter()
            .filter(|r| item_codes.contains(&r.item_code))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeOrders {
    pub orders: Mutex<Vec<OrderView>>,
}

impl OrderRepository for FakeOrders {
    fn create(&self, order: NewSalesOrder) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let grand_total = order.grand_total();
        let items = order
            .lines
            .iter()
            .map(|l| OrderLineView {
                id: Uuid::new_v4(),
                order_id: id,
                item_code: l.item_code.clone(),
                item_name: l.item_name.clone(),
                qty: l.qty,
                rate: l.rate.clone(),
                amount: l.amount(),
                delivered_qty: 0,
            })
            .collect();
        self.orders.lock().unwrap().push(OrderView {
            id,
            customer_id: order.customer_id,
            order_type: "Shopping Cart".to_string(),
            status: "To Deliver and Bill".to_string(),
            transaction_date: Utc::now().date_naive(),
            delivery_date: order.delivery_date,
            delivery_time: order.delivery_time,
            address_id: order.address_id,
            grand_total,
            created_at: Utc::now(),
            items,
        });
        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    fn list_for_customer(
        &self,
        customer_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<OrderView>, DomainError> {
        let mine: Vec<OrderView> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        Ok(page_of(&mine, pagination))
    }

    fn assignable_lines(&self, order_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        Ok(self
            .find_by_id(order_id)?
            .map(|o| o.items.iter().map(|l| l.id).collect())
            .unwrap_or_default())
    }
}

/// Records assignment calls and replays a canned transition outcome.
#[derive(Default)]
pub struct FakeDeliveries {
    pub assigned: Mutex<Vec<(Uuid, Vec<AssignmentGroup>)>>,
    pub notes: Vec<DeliveryNote>,
    pub outcome: Option<TransitionOutcome>,
}

impl DeliveryRepository for FakeDeliveries {
    fn create_for_assignments(
        &self,
        order_id: Uuid,
        groups: Vec<AssignmentGroup>,
    ) -> Result<Vec<Uuid>, DomainError> {
        let ids = groups.iter().map(|_| Uuid::new_v4()).collect();
        self.assigned.lock().unwrap().push((order_id, groups));
        Ok(ids)
    }

    fn list_for_partner(
        &self,
        partner_id: Uuid,
        state: Option<WorkflowState>,
        pagination: Pagination,
    ) -> Result<Page<DeliveryNote>, DomainError> {
        let mine: Vec<DeliveryNote> = self
            .notes
            .iter()
            .filter(|n| n.sales_partner_id == partner_id)
            .filter(|n| state.is_none_or(|s| n.workflow_state == s))
            .cloned()
            .collect();
        Ok(page_of(&mine, pagination))
    }

    fn transition(
        &self,
        _note_id: Uuid,
        partner_id: Uuid,
        action: WorkflowAction,
    ) -> Result<TransitionOutcome, DomainError> {
        let mut outcome = self
            .outcome
            .clone()
            .ok_or_else(|| DomainError::not_found("Delivery Note"))?;
        if outcome.note.sales_partner_id != partner_id {
            return Err(DomainError::Forbidden("not yours".to_string()));
        }
        outcome.note.workflow_state = outcome.previous_state.apply(action)?;
        Ok(outcome)
    }
}

#[derive(Default)]
pub struct FakePartners {
    pub partners: Mutex<Vec<SalesPartner>>,
}

impl FakePartners {
    pub fn with(partners: Vec<SalesPartner>) -> Self {
        Self {
            partners: Mutex::new(partners),
        }
    }
}

impl PartnerRepository for FakePartners {
    fn create(&self, partner: NewSalesPartner) -> Result<SalesPartner, DomainError> {
        let created = SalesPartner {
            id: Uuid::new_v4(),
            partner_name: partner.partner_name,
            commission_rate: partner.commission_rate,
            firebase_uid: None,
            fcm_token: None,
            sign_up_code: None,
        };
        self.partners.lock().unwrap().push(created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<SalesPartner>, DomainError> {
        Ok(self.partners.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    fn find_by_uid(&self, uid: &str) -> Result<Option<SalesPartner>, DomainError> {
        Ok(self
            .partners
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.firebase_uid.as_deref() == Some(uid))
            .cloned())
    }

    fn replace_sign_up_code(&self, id: Uuid, code: &str) -> Result<bool, DomainError> {
        let mut all = self.partners.lock().unwrap();
        if all
            .iter()
            .any(|p| p.id != id && p.sign_up_code.as_deref() == Some(code))
        {
            return Err(DomainError::Conflict("sign-up code already in use".to_string()));
        }
        let p = all
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("Sales Partner"))?;
        if p.is_signed_up() {
            return Ok(false);
        }
        p.sign_up_code = Some(code.to_string());
        Ok(true)
    }

    fn claim_sign_up_code(&self, code: &str, uid: &str) -> Result<Option<SalesPartner>, DomainError> {
        let mut all = self.partners.lock().unwrap();
        if all.iter().any(|p| p.firebase_uid.as_deref() == Some(uid)) {
            return Err(DomainError::Conflict("already linked".to_string()));
        }
        let Some(p) = all
            .iter_mut()
            .find(|p| p.sign_up_code.as_deref() == Some(code) && !p.is_signed_up())
        else {
            return Ok(None);
        };
        p.firebase_uid = Some(uid.to_string());
        p.sign_up_code = None;
        Ok(Some(p.clone()))
    }

    fn set_fcm_token(&self, id: Uuid, token: &str) -> Result<(), DomainError> {
        let mut all = self.partners.lock().unwrap();
        let p = all
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("Sales Partner"))?;
        p.fcm_token = Some(token.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeWebsite {
    pub content: WebsiteContent,
}

impl WebsiteRepository for FakeWebsite {
    fn content(&self) -> Result<WebsiteContent, DomainError> {
        Ok(self.content.clone())
    }
}

/// Keeps every message; fails for device tokens starting with `bad`.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<PushNotification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &PushNotification) -> Result<(), DomainError> {
        if notification.device_token.starts_with("bad") {
            return Err(DomainError::Internal("device unreachable".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
