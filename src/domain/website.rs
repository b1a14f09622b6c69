use super::catalog::{root_groups, strip_html_tags, ItemGroup};

/// Footer and navigation content for the storefront.
#[derive(Debug, Clone, PartialEq)]
pub struct WebsiteSettings {
    pub copyright: Option<String>,
    pub address: Option<String>,
    pub root_groups: Vec<String>,
    pub allcat_groups: Vec<String>,
}

impl WebsiteSettings {
    pub fn assemble(
        copyright: Option<String>,
        footer_address: Option<&str>,
        website_groups: &[ItemGroup],
        allcat_groups: Vec<String>,
    ) -> Self {
        Self {
            copyright,
            address: footer_address.map(strip_html_tags),
            root_groups: root_groups(website_groups),
            allcat_groups,
        }
    }
}
