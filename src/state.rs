use std::sync::Arc;

use crate::application::catalog_service::CatalogService;
use crate::application::customer_service::CustomerService;
use crate::application::delivery_service::DeliveryService;
use crate::application::order_service::OrderService;
use crate::application::partner_service::PartnerService;
use crate::application::website_service::WebsiteService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::domain::ports::{Notifier, TokenVerifier};
use crate::infrastructure::catalog_repo::DieselCatalogRepository;
use crate::infrastructure::customer_repo::DieselCustomerRepository;
use crate::infrastructure::delivery_repo::DieselDeliveryRepository;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::partner_repo::DieselPartnerRepository;
use crate::infrastructure::website_repo::DieselWebsiteRepository;

/// Services shared by every worker. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerService>,
    pub catalog: Arc<CatalogService>,
    pub orders: Arc<OrderService>,
    pub partners: Arc<PartnerService>,
    pub deliveries: Arc<DeliveryService>,
    pub website: Arc<WebsiteService>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub admin_api_key: String,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: &AppConfig,
        verifier: Arc<dyn TokenVerifier>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let customer_repo = Arc::new(DieselCustomerRepository::new(pool.clone()));
        let catalog_repo = Arc::new(DieselCatalogRepository::new(pool.clone()));
        let order_repo = Arc::new(DieselOrderRepository::new(pool.clone()));
        let partner_repo = Arc::new(DieselPartnerRepository::new(pool.clone()));
        let delivery_repo = Arc::new(DieselDeliveryRepository::new(pool.clone()));
        let website_repo = Arc::new(DieselWebsiteRepository::new(pool));
        let storefront = &config.storefront;

        Self {
            customers: Arc::new(CustomerService::new(
                customer_repo.clone(),
                storefront.customer_defaults(),
            )),
            catalog: Arc::new(CatalogService::new(
                catalog_repo.clone(),
                storefront.price_list.clone(),
                storefront.products_per_page,
            )),
            orders: Arc::new(OrderService::new(
                order_repo,
                customer_repo,
                catalog_repo.clone(),
                delivery_repo.clone(),
                storefront.price_list.clone(),
            )),
            partners: Arc::new(PartnerService::new(partner_repo.clone(), delivery_repo.clone())),
            deliveries: Arc::new(DeliveryService::new(partner_repo, delivery_repo, notifier)),
            website: Arc::new(WebsiteService::new(website_repo, catalog_repo)),
            verifier,
            admin_api_key: config.admin_api_key.clone(),
        }
    }
}
