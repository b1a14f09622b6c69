use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API", description = "Shop, order and delivery-job endpoints"),
    paths(
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_fcm_token,
        handlers::customers::list_addresses,
        handlers::customers::create_address,
        handlers::customers::update_address,
        handlers::items::get_all_item_groups,
        handlers::items::get_items,
        handlers::items::get_item,
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::get_items_to_assign,
        handlers::orders::assign_partners,
        handlers::partners::create_partner,
        handlers::partners::generate_signup_code,
        handlers::partners::signup,
        handlers::partners::get_partner,
        handlers::partners::update_fcm_token,
        handlers::deliveries::list_deliveries,
        handlers::deliveries::transition,
        handlers::website::get_settings,
    ),
    tags(
        (name = "customers", description = "Signed-in customer and addresses"),
        (name = "catalog", description = "Item groups and priced items"),
        (name = "orders", description = "Shopping-cart orders"),
        (name = "partners", description = "Sales partner sign-up and delivery jobs"),
        (name = "admin", description = "Back-office operations, `X-Admin-Key` required"),
        (name = "website", description = "Storefront content"),
    )
)]
pub struct ApiDoc;
