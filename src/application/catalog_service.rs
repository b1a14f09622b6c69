use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::catalog::{
    decode_route, descendant_groups, Item, ItemFilter, ItemGroupView, ItemListing, ItemView,
};
use crate::domain::errors::DomainError;
use crate::domain::pagination::Pagination;
use crate::domain::ports::CatalogRepository;
use crate::domain::pricing::{resolve_price, PriceQuote};

/// Resolved selling price for each of `item_codes` on `day`.
pub(crate) fn quote_items(
    repo: &dyn CatalogRepository,
    price_list: &str,
    item_codes: &[String],
    day: NaiveDate,
) -> Result<HashMap<String, PriceQuote>, DomainError> {
    if item_codes.is_empty() {
        return Ok(HashMap::new());
    }
    let rates = repo.list_rates(price_list, item_codes)?;
    let rules = repo.pricing_rules(item_codes)?;

    Ok(item_codes
        .iter()
        .map(|code| {
            let item_rules: Vec<_> = rules.iter().filter(|r| &r.item_code == code).cloned().collect();
            (code.clone(), resolve_price(rates.get(code), &item_rules, day))
        })
        .collect())
}

pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
    price_list: String,
    page_length: i64,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>, price_list: String, page_length: i64) -> Self {
        Self {
            repo,
            price_list,
            page_length,
        }
    }

    pub fn get_all_item_groups(&self) -> Result<Vec<ItemGroupView>, DomainError> {
        Ok(self
            .repo
            .website_item_groups()?
            .into_iter()
            .map(ItemGroupView::from)
            .collect())
    }

    pub fn get_items(
        &self,
        page: i64,
        item_group: Option<&str>,
        search: Option<String>,
    ) -> Result<ItemListing, DomainError> {
        let item_groups = match item_group.map(str::trim).filter(|g| !g.is_empty()) {
            Some(root) => Some(descendant_groups(&self.repo.all_item_groups()?, root)),
            None => None,
        };
        let filter = ItemFilter {
            item_groups,
            search,
        };

        let listing = self
            .repo
            .list_items(&filter, Pagination::new(page, self.page_length))?;
        let page_count = listing.page_count();

        Ok(ItemListing {
            page_count,
            items: self.price(listing.items)?,
        })
    }

    /// Looks up a website item by its client-side (`__`-separated) route.
    pub fn get_item(&self, route: &str) -> Result<ItemView, DomainError> {
        let item = self
            .repo
            .find_item_by_route(&decode_route(route))?
            .ok_or_else(|| DomainError::NotFound("Item does not exist at this route".to_string()))?;

        self.price(vec![item])?
            .pop()
            .ok_or_else(|| DomainError::Internal("priced item missing".to_string()))
    }

    fn price(&self, items: Vec<Item>) -> Result<Vec<ItemView>, DomainError> {
        let codes: Vec<String> = items.iter().map(|i| i.item_code.clone()).collect();
        let mut quotes = quote_items(&*self.repo, &self.price_list, &codes, Utc::now().date_naive())?;

        Ok(items
            .into_iter()
            .map(|item| {
                let quote = quotes
                    .remove(&item.item_code)
                    .unwrap_or_else(PriceQuote::unpriced);
                ItemView::new(item, quote)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::application::fakes::FakeCatalog;
    use crate::domain::catalog::ItemGroup;
    use crate::domain::pricing::PricingRule;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn group(name: &str, parent: Option<&str>) -> ItemGroup {
        ItemGroup {
            name: name.to_string(),
            parent_item_group: parent.map(str::to_string),
            is_group: true,
            route: Some(format!("groups/{}", name.to_lowercase())),
            description: Some(format!("<p>{name}</p>")),
            image: None,
        }
    }

    fn item(code: &str, group: &str, route: &str) -> Item {
        Item {
            item_code: code.to_string(),
            item_name: format!("{code} name"),
            item_group: group.to_string(),
            description: Some("<b>Fast</b> service".to_string()),
            web_long_description: None,
            image: None,
            website_image: None,
            thumbnail: None,
            route: Some(route.to_string()),
        }
    }

    fn catalog() -> FakeCatalog {
        FakeCatalog {
            groups: vec![
                group("Services", None),
                group("Repairs", Some("Services")),
                group("Appliances", None),
            ],
            items: vec![
                item("REPAIR-1", "Repairs", "services/repair-1"),
                item("CLEAN-1", "Services", "services/clean-1"),
                item("AC-1", "Appliances", "appliances/ac-1"),
            ],
            rates: HashMap::from([
                ("REPAIR-1".to_string(), dec("500.00")),
                ("AC-1".to_string(), dec("30000.00")),
            ]),
            rules: vec![PricingRule {
                item_code: "REPAIR-1".to_string(),
                rate: None,
                discount_percentage: Some(dec("10")),
                priority: 1,
                disabled: false,
                valid_from: None,
                valid_upto: None,
            }],
            ..Default::default()
        }
    }

    fn service(repo: Arc<FakeCatalog>) -> CatalogService {
        CatalogService::new(repo, "Standard Selling".to_string(), 2)
    }

    #[test]
    fn groups_have_encoded_routes_and_plain_descriptions() {
        let groups = service(Arc::new(catalog())).get_all_item_groups().unwrap();
        assert_eq!(groups[1].route.as_deref(), Some("groups__repairs"));
        assert_eq!(groups[1].description, "Repairs");
    }

    #[test]
    fn group_filter_includes_descendants() {
        let repo = Arc::new(catalog());
        let listing = service(repo.clone()).get_items(1, Some("Services"), None).unwrap();

        let filter = repo.last_filter.lock().unwrap().clone().unwrap();
        assert_eq!(
            filter.item_groups,
            Some(vec!["Services".to_string(), "Repairs".to_string()])
        );
        assert_eq!(listing.page_count, 1);
        assert_eq!(listing.items.len(), 2);
    }

    #[test]
    fn items_carry_resolved_and_slashed_prices() {
        let listing = service(Arc::new(catalog())).get_items(1, None, None).unwrap();
        assert_eq!(listing.page_count, 2);

        let repair = &listing.items[0];
        assert_eq!(repair.name, "REPAIR-1");
        assert_eq!(repair.description, "Fast service");
        assert_eq!(repair.route.as_deref(), Some("services__repair-1"));
        assert_eq!(repair.price.price_list_rate, Some(dec("450.00")));
        assert_eq!(repair.price.slashed_rate, Some(dec("500.00")));

        let unpriced = &listing.items[1];
        assert_eq!(unpriced.price, PriceQuote::unpriced());
    }

    #[test]
    fn get_item_decodes_the_route() {
        let item = service(Arc::new(catalog())).get_item("appliances__ac-1").unwrap();
        assert_eq!(item.name, "AC-1");
        assert_eq!(item.price.price_list_rate, Some(dec("30000.00")));
        assert_eq!(item.price.slashed_rate, None);
    }

    #[test]
    fn unknown_route_is_not_found() {
        let err = service(Arc::new(catalog())).get_item("nope__nothing").unwrap_err();
        assert_eq!(
            err,
            DomainError::NotFound("Item does not exist at this route".to_string())
        );
    }
}
