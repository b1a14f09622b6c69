use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

pub const ORDER_TYPE_SHOPPING_CART: &str = "Shopping Cart";
pub const STATUS_TO_DELIVER_AND_BILL: &str = "To Deliver and Bill";

#[derive(Debug, Clone)]
pub struct CartLineInput {
    pub item_code: String,
    pub qty: i32,
}

#[derive(Debug, Clone)]
pub struct CartInput {
    pub lines: Vec<CartLineInput>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<NaiveTime>,
    pub address_id: Option<Uuid>,
}

impl CartInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lines.is_empty() {
            return Err(DomainError::InvalidInput(
                "order must contain at least one item".to_string(),
            ));
        }
        if let Some(line) = self.lines.iter().find(|l| l.qty <= 0) {
            return Err(DomainError::InvalidInput(format!(
                "quantity for {} must be positive",
                line.item_code
            )));
        }
        Ok(())
    }
}

/// Order line with its selling rate already resolved.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub rate: BigDecimal,
}

impl PricedLine {
    pub fn amount(&self) -> BigDecimal {
        &self.rate * BigDecimal::from(self.qty)
    }
}

#[derive(Debug, Clone)]
pub struct NewSalesOrder {
    pub customer_id: Uuid,
    pub lines: Vec<PricedLine>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<NaiveTime>,
    pub address_id: Option<Uuid>,
}

impl NewSalesOrder {
    pub fn grand_total(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::from(0), |acc, l| acc + l.amount())
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
    pub delivered_qty: i32,
}

impl OrderLineView {
    pub fn is_fully_delivered(&self) -> bool {
        self.delivered_qty.abs() >= self.qty.abs()
    }
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_type: String,
    pub status: String,
    pub transaction_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<NaiveTime>,
    pub address_id: Option<Uuid>,
    pub grand_total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLineView>,
}
