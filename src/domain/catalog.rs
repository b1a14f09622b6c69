use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::pricing::PriceQuote;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex is valid"));

/// Removes HTML tags, keeping the text between them.
pub fn strip_html_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// Text field with markup removed; a missing field becomes an empty string.
pub fn clean_description(html: Option<&str>) -> String {
    html.map(strip_html_tags).unwrap_or_default()
}

/// Routes contain `/`, which clients cannot put in a single path segment, so
/// they travel with every `/` replaced by `__`.
pub fn encode_route(route: &str) -> String {
    route.replace('/', "__")
}

pub fn decode_route(route: &str) -> String {
    route.replace("__", "/")
}

#[derive(Debug, Clone)]
pub struct ItemGroup {
    pub name: String,
    pub parent_item_group: Option<String>,
    pub is_group: bool,
    pub route: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ItemGroupView {
    pub name: String,
    pub is_group: bool,
    pub route: Option<String>,
    pub parent_item_group: Option<String>,
    pub description: String,
    pub image: Option<String>,
}

impl From<ItemGroup> for ItemGroupView {
    fn from(g: ItemGroup) -> Self {
        Self {
            description: clean_description(g.description.as_deref()),
            route: g.route.as_deref().map(encode_route),
            name: g.name,
            is_group: g.is_group,
            parent_item_group: g.parent_item_group,
            image: g.image,
        }
    }
}

/// `root` and every group below it, `root` first. Unknown roots yield just
/// the root name so a filter on it still matches items tagged with it.
pub fn descendant_groups(groups: &[ItemGroup], root: &str) -> Vec<String> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for g in groups {
        if let Some(parent) = g.parent_item_group.as_deref() {
            children.entry(parent).or_default().push(&g.name);
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(name) = stack.pop() {
        if !seen.insert(name) {
            continue;
        }
        out.push(name.to_string());
        if let Some(kids) = children.get(name) {
            stack.extend(kids.iter().rev());
        }
    }
    out
}

/// Distinct top-most ancestors of `groups`, in first-seen order. A parent
/// that is not itself in `groups` ends the walk. Cycles stop at the first
/// repeated group.
pub fn root_groups(groups: &[ItemGroup]) -> Vec<String> {
    let by_name: HashMap<&str, &ItemGroup> = groups.iter().map(|g| (g.name.as_str(), g)).collect();

    let mut roots = Vec::new();
    let mut seen_roots: HashSet<&str> = HashSet::new();
    for g in groups {
        let mut current = g;
        let mut visited: HashSet<&str> = HashSet::from([current.name.as_str()]);
        while let Some(parent) = current
            .parent_item_group
            .as_deref()
            .and_then(|p| by_name.get(p).copied())
        {
            if !visited.insert(parent.name.as_str()) {
                break;
            }
            current = parent;
        }
        if seen_roots.insert(current.name.as_str()) {
            roots.push(current.name.clone());
        }
    }
    roots
}

/// Website item record as stored.
#[derive(Debug, Clone)]
pub struct Item {
    pub item_code: String,
    pub item_name: String,
    pub item_group: String,
    pub description: Option<String>,
    pub web_long_description: Option<String>,
    pub image: Option<String>,
    pub website_image: Option<String>,
    pub thumbnail: Option<String>,
    pub route: Option<String>,
}

/// Item as shown to shoppers, with cleaned text and resolved price.
#[derive(Debug, Clone)]
pub struct ItemView {
    pub name: String,
    pub item_name: String,
    pub item_group: String,
    pub route: Option<String>,
    pub description: String,
    pub web_long_description: String,
    pub image: Option<String>,
    pub website_image: Option<String>,
    pub thumbnail: Option<String>,
    pub price: PriceQuote,
}

impl ItemView {
    pub fn new(item: Item, price: PriceQuote) -> Self {
        Self {
            description: clean_description(item.description.as_deref()),
            web_long_description: clean_description(item.web_long_description.as_deref()),
            route: item.route.as_deref().map(encode_route),
            name: item.item_code,
            item_name: item.item_name,
            item_group: item.item_group,
            image: item.image,
            website_image: item.website_image,
            thumbnail: item.thumbnail,
            price,
        }
    }
}

/// Filter shared by the item count and item page queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Already expanded to include descendant groups.
    pub item_groups: Option<Vec<String>>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ItemListing {
    pub page_count: i64,
    pub items: Vec<ItemView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, parent: Option<&str>) -> ItemGroup {
        ItemGroup {
            name: name.to_string(),
            parent_item_group: parent.map(str::to_string),
            is_group: true,
            route: None,
            description: None,
            image: None,
        }
    }

    fn tree() -> Vec<ItemGroup> {
        vec![
            group("All Item Groups", None),
            group("Appliances", Some("All Item Groups")),
            group("Kitchen", Some("Appliances")),
            group("Laundry", Some("Appliances")),
            group("Services", Some("All Item Groups")),
            group("Repairs", Some("Services")),
        ]
    }

    #[test]
    fn strips_tags_and_keeps_text() {
        assert_eq!(
            strip_html_tags("<p>Fast <b>repair</b><br/>service</p>"),
            "Fast repairservice"
        );
    }

    #[test]
    fn missing_description_is_empty() {
        assert_eq!(clean_description(None), "");
    }

    #[test]
    fn route_encoding_swaps_slashes() {
        assert_eq!(encode_route("products/ac/split-1"), "products__ac__split-1");
        assert_eq!(decode_route("products__ac__split-1"), "products/ac/split-1");
    }

    #[test]
    fn descendants_include_root_and_all_levels() {
        let mut got = descendant_groups(&tree(), "Appliances");
        got.sort();
        assert_eq!(got, vec!["Appliances", "Kitchen", "Laundry"]);
    }

    #[test]
    fn descendants_of_leaf_is_leaf() {
        assert_eq!(descendant_groups(&tree(), "Kitchen"), vec!["Kitchen"]);
    }

    #[test]
    fn descendants_of_unknown_group_is_itself() {
        assert_eq!(descendant_groups(&tree(), "Garden"), vec!["Garden"]);
    }

    #[test]
    fn single_tree_has_single_root() {
        assert_eq!(root_groups(&tree()), vec!["All Item Groups"]);
    }

    #[test]
    fn hidden_parent_makes_child_a_root() {
        // "All Item Groups" is not shown on the website.
        let groups: Vec<ItemGroup> = tree().into_iter().skip(1).collect();
        assert_eq!(root_groups(&groups), vec!["Appliances", "Services"]);
    }

    #[test]
    fn cyclic_parents_terminate() {
        let groups = vec![group("A", Some("B")), group("B", Some("A"))];
        assert_eq!(root_groups(&groups).len(), 1);
    }

    #[test]
    fn group_view_cleans_route_and_description() {
        let mut g = group("Kitchen", Some("Appliances"));
        g.route = Some("appliances/kitchen".to_string());
        g.description = Some("<div>Ovens</div>".to_string());
        let view = ItemGroupView::from(g);
        assert_eq!(view.route.as_deref(), Some("appliances__kitchen"));
        assert_eq!(view.description, "Ovens");
    }
}
