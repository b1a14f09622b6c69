pub mod catalog_service;
pub mod customer_service;
pub mod delivery_service;
pub mod order_service;
pub mod partner_service;
pub mod website_service;

#[cfg(test)]
pub(crate) mod fakes;
