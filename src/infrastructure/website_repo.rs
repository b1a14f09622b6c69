use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{WebsiteContent, WebsiteRepository};
use crate::schema::{website_item_groups, website_settings};

use super::models::WebsiteSettingsRow;

pub struct DieselWebsiteRepository {
    pool: DbPool,
}

impl DieselWebsiteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl WebsiteRepository for DieselWebsiteRepository {
    fn content(&self) -> Result<WebsiteContent, DomainError> {
        let mut conn = self.pool.get()?;

        let settings = website_settings::table
            .select(WebsiteSettingsRow::as_select())
            .first(&mut conn)
            .optional()?;
        let allcat_groups = website_item_groups::table
            .order((website_item_groups::idx.asc(), website_item_groups::item_group.asc()))
            .select(website_item_groups::item_group)
            .load::<String>(&mut conn)?;

        let (copyright, footer_address) = settings
            .map(|s| (s.copyright, s.footer_address))
            .unwrap_or_default();

        Ok(WebsiteContent {
            copyright,
            footer_address,
            allcat_groups,
        })
    }
}
