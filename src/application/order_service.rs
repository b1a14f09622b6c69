use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::delivery::{group_assignments, AssignmentRow};
use crate::domain::errors::DomainError;
use crate::domain::order::{CartInput, NewSalesOrder, OrderView, PricedLine};
use crate::domain::pagination::{Page, Pagination};
use crate::domain::ports::{CatalogRepository, CustomerRepository, DeliveryRepository, OrderRepository};

use super::catalog_service::quote_items;
use super::customer_service::require_customer;

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerRepository>,
    catalog: Arc<dyn CatalogRepository>,
    deliveries: Arc<dyn DeliveryRepository>,
    price_list: String,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        customers: Arc<dyn CustomerRepository>,
        catalog: Arc<dyn CatalogRepository>,
        deliveries: Arc<dyn DeliveryRepository>,
        price_list: String,
    ) -> Self {
        Self {
            orders,
            customers,
            catalog,
            deliveries,
            price_list,
        }
    }

    pub fn create_order(&self, uid: &str, cart: CartInput) -> Result<OrderView, DomainError> {
        cart.validate()?;
        let customer = require_customer(&*self.customers, uid)?;

        if let Some(address_id) = cart.address_id {
            let owned = self
                .customers
                .list_addresses(customer.id)?
                .iter()
                .any(|a| a.id == address_id);
            if !owned {
                return Err(DomainError::InvalidInput(format!(
                    "Address {address_id} does not belong to this customer"
                )));
            }
        }

        let mut seen = HashSet::new();
        let codes: Vec<String> = cart
            .lines
            .iter()
            .filter(|l| seen.insert(l.item_code.as_str()))
            .map(|l| l.item_code.clone())
            .collect();
        let names: HashMap<String, String> = self
            .catalog
            .find_items(&codes)?
            .into_iter()
            .map(|i| (i.item_code, i.item_name))
            .collect();
        if let Some(unknown) = codes.iter().find(|c| !names.contains_key(*c)) {
            return Err(DomainError::InvalidInput(format!(
                "Item {unknown} does not exist"
            )));
        }

        let quotes = quote_items(&*self.catalog, &self.price_list, &codes, Utc::now().date_naive())?;
        let lines = cart
            .lines
            .into_iter()
            .map(|l| {
                let rate = quotes
                    .get(&l.item_code)
                    .and_then(|q| q.price_list_rate.clone())
                    .ok_or_else(|| {
                        DomainError::InvalidInput(format!("Item {} has no price", l.item_code))
                    })?;
                Ok(PricedLine {
                    item_name: names[&l.item_code].clone(),
                    item_code: l.item_code,
                    qty: l.qty,
                    rate,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let order_id = self.orders.create(NewSalesOrder {
            customer_id: customer.id,
            lines,
            delivery_date: cart.delivery_date,
            delivery_time: cart.delivery_time,
            address_id: cart.address_id,
        })?;
        log::info!("customer {} placed order {}", customer.id, order_id);

        self.orders
            .find_by_id(order_id)?
            .ok_or_else(|| DomainError::Internal("order missing after insert".to_string()))
    }

    pub fn list_orders(&self, uid: &str, pagination: Pagination) -> Result<Page<OrderView>, DomainError> {
        let customer = require_customer(&*self.customers, uid)?;
        self.orders.list_for_customer(customer.id, pagination)
    }

    /// Another customer's order is reported as missing.
    pub fn get_order(&self, uid: &str, order_id: Uuid) -> Result<OrderView, DomainError> {
        let customer = require_customer(&*self.customers, uid)?;
        self.orders
            .find_by_id(order_id)?
            .filter(|o| o.customer_id == customer.id)
            .ok_or_else(|| DomainError::not_found("Sales Order"))
    }

    pub fn get_items_to_assign(&self, order_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        if self.orders.find_by_id(order_id)?.is_none() {
            return Err(DomainError::not_found("Sales Order"));
        }
        self.orders.assignable_lines(order_id)
    }

    pub fn assign_partners(
        &self,
        order_id: Uuid,
        rows: Vec<AssignmentRow>,
    ) -> Result<Vec<Uuid>, DomainError> {
        if rows.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one assignment is required".to_string(),
            ));
        }
        let groups = group_assignments(&rows);
        self.deliveries.create_for_assignments(order_id, groups)
    }
}
