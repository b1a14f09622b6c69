use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::{CatalogRepository, WebsiteRepository};
use crate::domain::website::WebsiteSettings;

pub struct WebsiteService {
    website: Arc<dyn WebsiteRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl WebsiteService {
    pub fn new(website: Arc<dyn WebsiteRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { website, catalog }
    }

    pub fn get_settings(&self) -> Result<WebsiteSettings, DomainError> {
        let content = self.website.content()?;
        let groups = self.catalog.website_item_groups()?;
        Ok(WebsiteSettings::assemble(
            content.copyright,
            content.footer_address.as_deref(),
            &groups,
            content.allcat_groups,
        ))
    }
}
