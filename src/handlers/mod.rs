pub mod customers;
pub mod deliveries;
pub mod extract;
pub mod items;
pub mod orders;
pub mod partners;
pub mod website;

use actix_web::web;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, Pagination};
use crate::errors::AppError;

/// Runs repository-backed service work on the blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??)
}

pub(crate) fn money(value: &BigDecimal) -> String {
    value.to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Rows per page. Defaults to 20, maximum 100.
    #[serde(default = "default_page_length")]
    pub page_length: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_length() -> i64 {
    20
}

impl PageParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_length)
    }
}

/// Envelope for paginated lists.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_length: i64,
    pub page_count: i64,
}

impl<T> PageResponse<T> {
    pub fn from_page<S>(page: Page<S>, convert: impl FnMut(S) -> T) -> Self {
        let page_count = page.page_count();
        Self {
            total: page.total,
            page: page.pagination.page,
            page_length: page.pagination.page_length,
            page_count,
            items: page.items.into_iter().map(convert).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FcmTokenRequest {
    pub token: String,
}
