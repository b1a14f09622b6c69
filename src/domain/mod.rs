pub mod catalog;
pub mod customer;
pub mod delivery;
pub mod errors;
pub mod grouping;
pub mod identity;
pub mod notification;
pub mod order;
pub mod pagination;
pub mod partner;
pub mod ports;
pub mod pricing;
pub mod website;
