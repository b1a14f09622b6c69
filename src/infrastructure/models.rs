use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::catalog::{Item, ItemGroup};
use crate::domain::customer::{Address, Customer};
use crate::domain::order::{OrderLineView, OrderView};
use crate::domain::partner::SalesPartner;
use crate::domain::pricing::PricingRule;
use crate::schema::{
    addresses, customers, delivery_note_items, delivery_notes, invoice_payments, item_groups,
    item_prices, items, pricing_rules, sales_invoices, sales_order_items, sales_orders,
    sales_partners, website_settings,
};

// ── Customers ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_type: String,
    pub customer_group: String,
    pub territory: String,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
    pub firebase_uid: Option<String>,
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Customer {
            id: r.id,
            customer_name: r.customer_name,
            customer_type: r.customer_type,
            customer_group: r.customer_group,
            territory: r.territory,
            mobile_no: r.mobile_no,
            email: r.email,
            fcm_token: r.fcm_token,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_type: String,
    pub customer_group: String,
    pub territory: String,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
    pub firebase_uid: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = addresses)]
#[diesel(belongs_to(CustomerRow, foreign_key = customer_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AddressRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(r: AddressRow) -> Self {
        Address {
            id: r.id,
            customer_id: r.customer_id,
            address_line1: r.address_line1,
            address_line2: r.address_line2,
            city: r.city,
            state: r.state,
            country: r.country,
            pincode: r.pincode,
            is_primary: r.is_primary,
        }
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = addresses)]
#[diesel(treat_none_as_null = true)]
pub struct AddressChangeset {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = addresses)]
pub struct NewAddressRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[diesel(embed)]
    pub fields: AddressChangeset,
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = item_groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemGroupRow {
    pub name: String,
    pub parent_item_group: Option<String>,
    pub is_group: bool,
    pub route: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl From<ItemGroupRow> for ItemGroup {
    fn from(r: ItemGroupRow) -> Self {
        ItemGroup {
            name: r.name,
            parent_item_group: r.parent_item_group,
            is_group: r.is_group,
            route: r.route,
            description: r.description,
            image: r.image,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub item_code: String,
    pub item_name: String,
    pub item_group: String,
    pub description: Option<String>,
    pub web_long_description: Option<String>,
    pub image: Option<String>,
    pub website_image: Option<String>,
    pub thumbnail: Option<String>,
    pub route: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(r: ItemRow) -> Self {
        Item {
            item_code: r.item_code,
            item_name: r.item_name,
            item_group: r.item_group,
            description: r.description,
            web_long_description: r.web_long_description,
            image: r.image,
            website_image: r.website_image,
            thumbnail: r.thumbnail,
            route: r.route,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = item_prices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemPriceRow {
    pub item_code: String,
    pub price_list_rate: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pricing_rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PricingRuleRow {
    pub item_code: String,
    pub rate: Option<BigDecimal>,
    pub discount_percentage: Option<BigDecimal>,
    pub priority: i32,
    pub disabled: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_upto: Option<NaiveDate>,
}

impl From<PricingRuleRow> for PricingRule {
    fn from(r: PricingRuleRow) -> Self {
        PricingRule {
            item_code: r.item_code,
            rate: r.rate,
            discount_percentage: r.discount_percentage,
            priority: r.priority,
            disabled: r.disabled,
            valid_from: r.valid_from,
            valid_upto: r.valid_upto,
        }
    }
}

// ── Sales orders ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sales_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SalesOrderRow {
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
}

impl SalesOrderRow {
    pub fn into_view(self, items: Vec<OrderLineView>) -> OrderView {
        OrderView {
            id: self.id,
            customer_id: self.customer_id,
            order_type: self.order_type,
            status: self.status,
            transaction_date: self.transaction_date,
            delivery_date: self.delivery_date,
            delivery_time: self.delivery_time,
            address_id: self.address_id,
            grand_total: self.grand_total,
            created_at: self.created_at,
            items,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales_orders)]
pub struct NewSalesOrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_type: String,
    pub status: String,
    pub transaction_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<NaiveTime>,
    pub address_id: Option<Uuid>,
    pub grand_total: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = sales_order_items)]
#[diesel(belongs_to(SalesOrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SalesOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
    pub delivered_qty: i32,
}

impl From<SalesOrderItemRow> for OrderLineView {
    fn from(r: SalesOrderItemRow) -> Self {
        OrderLineView {
            id: r.id,
            order_id: r.order_id,
            item_code: r.item_code,
            item_name: r.item_name,
            qty: r.qty,
            rate: r.rate,
            amount: r.amount,
            delivered_qty: r.delivered_qty,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales_order_items)]
pub struct NewSalesOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub idx: i32,
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

// ── Sales partners ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sales_partners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SalesPartnerRow {
    pub id: Uuid,
    pub partner_name: String,
    pub commission_rate: BigDecimal,
    pub firebase_uid: Option<String>,
    pub fcm_token: Option<String>,
    pub sign_up_code: Option<String>,
}

impl From<SalesPartnerRow> for SalesPartner {
    fn from(r: SalesPartnerRow) -> Self {
        SalesPartner {
            id: r.id,
            partner_name: r.partner_name,
            commission_rate: r.commission_rate,
            firebase_uid: r.firebase_uid,
            fcm_token: r.fcm_token,
            sign_up_code: r.sign_up_code,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales_partners)]
pub struct NewSalesPartnerRow {
    pub id: Uuid,
    pub partner_name: String,
    pub commission_rate: BigDecimal,
}

// ── Delivery notes and invoices ──────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = delivery_notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryNoteRow {
    pub id: Uuid,
    pub sales_order_id: Uuid,
    pub customer_id: Uuid,
    pub sales_partner_id: Uuid,
    pub commission_rate: BigDecimal,
    pub scheduled_datetime: DateTime<Utc>,
    pub auto_invoice: bool,
    pub workflow_state: String,
    pub docstatus: i16,
    pub grand_total: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = delivery_notes)]
pub struct NewDeliveryNoteRow {
    pub id: Uuid,
    pub sales_order_id: Uuid,
    pub customer_id: Uuid,
    pub sales_partner_id: Uuid,
    pub commission_rate: BigDecimal,
    pub scheduled_datetime: DateTime<Utc>,
    pub auto_invoice: bool,
    pub workflow_state: String,
    pub docstatus: i16,
    pub grand_total: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = delivery_note_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryNoteItemRow {
    pub id: Uuid,
    pub delivery_note_id: Uuid,
    pub so_detail: Uuid,
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = delivery_note_items)]
pub struct NewDeliveryNoteItemRow {
    pub id: Uuid,
    pub delivery_note_id: Uuid,
    pub so_detail: Uuid,
    pub idx: i32,
    pub item_code: String,
    pub item_name: String,
    pub qty: i32,
    pub rate: BigDecimal,
    pub amount: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales_invoices)]
pub struct NewSalesInvoiceRow {
    pub id: Uuid,
    pub delivery_note_id: Uuid,
    pub customer_id: Uuid,
    pub is_pos: bool,
    pub grand_total: BigDecimal,
    pub rounded_total: BigDecimal,
    pub docstatus: i16,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sales_invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SalesInvoiceRow {
    pub id: Uuid,
    pub delivery_note_id: Uuid,
    pub customer_id: Uuid,
    pub is_pos: bool,
    pub grand_total: BigDecimal,
    pub rounded_total: BigDecimal,
    pub docstatus: i16,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = invoice_payments)]
pub struct NewInvoicePaymentRow {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub mode_of_payment: String,
    pub amount: BigDecimal,
}

// ── Website ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = website_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WebsiteSettingsRow {
    pub copyright: Option<String>,
    pub footer_address: Option<String>,
}
