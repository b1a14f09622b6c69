use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use super::blocking;
use crate::domain::website::WebsiteSettings;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct WebsiteSettingsResponse {
    pub copyright: Option<String>,
    /// Footer address as plain text.
    pub address: Option<String>,
    pub root_groups: Vec<String>,
    pub allcat_groups: Vec<String>,
}

impl From<WebsiteSettings> for WebsiteSettingsResponse {
    fn from(s: WebsiteSettings) -> Self {
        Self {
            copyright: s.copyright,
            address: s.address,
            root_groups: s.root_groups,
            allcat_groups: s.allcat_groups,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/website/settings",
    responses((status = 200, description = "Footer and navigation content", body = WebsiteSettingsResponse)),
    tag = "website"
)]
pub async fn get_settings(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let settings = blocking(move || state.website.get_settings()).await?;
    Ok(HttpResponse::Ok().json(WebsiteSettingsResponse::from(settings)))
}
