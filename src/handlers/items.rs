use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{blocking, money};
use crate::domain::catalog::{ItemGroupView, ItemListing, ItemView};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemGroupResponse {
    pub name: String,
    pub is_group: bool,
    /// Route with `/` replaced by `__`.
    pub route: Option<String>,
    pub parent_item_group: Option<String>,
    pub description: String,
    pub image: Option<String>,
}

impl From<ItemGroupView> for ItemGroupResponse {
    fn from(g: ItemGroupView) -> Self {
        Self {
            name: g.name,
            is_group: g.is_group,
            route: g.route,
            parent_item_group: g.parent_item_group,
            description: g.description,
            image: g.image,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    /// Item code.
    pub name: String,
    pub item_name: String,
    pub item_group: String,
    pub route: Option<String>,
    pub description: String,
    pub web_long_description: String,
    pub image: Option<String>,
    pub website_image: Option<String>,
    pub thumbnail: Option<String>,
    /// Price the customer pays, as a decimal string.
    pub price_list_rate: Option<String>,
    /// List price shown struck through when a rule lowers it.
    pub slashed_rate: Option<String>,
}

impl From<ItemView> for ItemResponse {
    fn from(i: ItemView) -> Self {
        Self {
            price_list_rate: i.price.price_list_rate.as_ref().map(money),
            slashed_rate: i.price.slashed_rate.as_ref().map(money),
            name: i.name,
            item_name: i.item_name,
            item_group: i.item_group,
            route: i.route,
            description: i.description,
            web_long_description: i.web_long_description,
            image: i.image,
            website_image: i.website_image,
            thumbnail: i.thumbnail,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemListResponse {
    pub page_count: i64,
    pub items: Vec<ItemResponse>,
}

impl From<ItemListing> for ItemListResponse {
    fn from(l: ItemListing) -> Self {
        Self {
            page_count: l.page_count,
            items: l.items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemQuery {
    /// Page number (1-based). Defaults to 1.
    pub page: Option<i64>,
    /// Restrict to this group and every group below it.
    pub item_group: Option<String>,
    /// Case-insensitive match on item code or name.
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/item-groups",
    responses((status = 200, description = "Website item groups in tree order", body = Vec<ItemGroupResponse>)),
    tag = "catalog"
)]
pub async fn get_all_item_groups(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let groups = blocking(move || state.catalog.get_all_item_groups()).await?;
    let body: Vec<ItemGroupResponse> = groups.into_iter().map(ItemGroupResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/items
///
/// One page of website items with resolved prices.
#[utoipa::path(
    get,
    path = "/api/items",
    params(ItemQuery),
    responses((status = 200, description = "Page of items", body = ItemListResponse)),
    tag = "catalog"
)]
pub async fn get_items(
    state: web::Data<AppState>,
    query: web::Query<ItemQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner();
    let search = q.search.filter(|s| !s.trim().is_empty());
    let listing = blocking(move || {
        state
            .catalog
            .get_items(q.page.unwrap_or(1), q.item_group.as_deref(), search)
    })
    .await?;
    Ok(HttpResponse::Ok().json(ItemListResponse::from(listing)))
}

#[utoipa::path(
    get,
    path = "/api/items/{route}",
    params(("route" = String, Path, description = "Item route with `/` written as `__`")),
    responses(
        (status = 200, description = "Item with price", body = ItemResponse),
        (status = 404, description = "Item does not exist at this route"),
    ),
    tag = "catalog"
)]
pub async fn get_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let route = path.into_inner();
    let item = blocking(move || state.catalog.get_item(&route)).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}
