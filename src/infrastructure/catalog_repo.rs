use std::collections::HashMap;

use bigdecimal::BigDecimal;
use diesel::pg::Pg;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::{Item, ItemFilter, ItemGroup};
use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, Pagination};
use crate::domain::ports::CatalogRepository;
use crate::domain::pricing::PricingRule;
use crate::schema::{item_groups, item_prices, items, pricing_rules};

use super::models::{ItemGroupRow, ItemPriceRow, ItemRow, PricingRuleRow};

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Website items matching `filter`. Both the count and the page query start
/// from here so they can never disagree on which rows qualify.
fn website_items(filter: &ItemFilter) -> items::BoxedQuery<'static, Pg> {
    let mut query = items::table
        .filter(items::show_in_website.eq(true))
        .into_boxed();

    if let Some(groups) = &filter.item_groups {
        query = query.filter(items::item_group.eq_any(groups.clone()));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        query = query.filter(
            items::item_name
                .ilike(pattern.clone())
                .or(items::item_code.ilike(pattern)),
        );
    }
    query
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl CatalogRepository for DieselCatalogRepository {
    fn website_item_groups(&self) -> Result<Vec<ItemGroup>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = item_groups::table
            .filter(item_groups::show_in_website.eq(true))
            .order((item_groups::lft.asc(), item_groups::rgt.asc()))
            .select(ItemGroupRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(ItemGroup::from).collect())
    }

    fn all_item_groups(&self) -> Result<Vec<ItemGroup>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = item_groups::table
            .order((item_groups::lft.asc(), item_groups::rgt.asc()))
            .select(ItemGroupRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(ItemGroup::from).collect())
    }

    fn list_items(&self, filter: &ItemFilter, pagination: Pagination) -> Result<Page<Item>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = website_items(filter).count().get_result(conn)?;

            let rows = website_items(filter)
                .select(ItemRow::as_select())
                .order((items::item_name.asc(), items::item_code.asc()))
                .limit(pagination.page_length)
                .offset(pagination.offset())
                .load(conn)?;

            Ok(Page {
                items: rows.into_iter().map(Item::from).collect(),
                total,
                pagination,
            })
        })
    }

    fn find_item_by_route(&self, route: &str) -> Result<Option<Item>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = items::table
            .filter(items::route.eq(route))
            .filter(items::show_in_website.eq(true))
            .select(ItemRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Item::from))
    }

    fn find_items(&self, item_codes: &[String]) -> Result<Vec<Item>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = items::table
            .filter(items::item_code.eq_any(item_codes))
            .select(ItemRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    fn list_rates(
        &self,
        price_list: &str,
        item_codes: &[String],
    ) -> Result<HashMap<String, BigDecimal>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = item_prices::table
            .filter(item_prices::price_list.eq(price_list))
            .filter(item_prices::item_code.eq_any(item_codes))
            .select(ItemPriceRow::as_select())
            .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|r| (r.item_code, r.price_list_rate))
            .collect())
    }

    fn pricing_rules(&self, item_codes: &[String]) -> Result<Vec<PricingRule>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = pricing_rules::table
            .filter(pricing_rules::item_code.eq_any(item_codes))
            .filter(pricing_rules::disabled.eq(false))
            .select(PricingRuleRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(PricingRule::from).collect())
    }
}
