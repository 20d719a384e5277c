use reqwest::Url;

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::filters::FilterState;

pub const PROMPTS_PATH: &str = "/api/prompts";

/// One page of the prompt list. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageCursor {
    page: u32,
    page_size: u32,
}

impl PageCursor {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn next(&self) -> Self {
        Self::new(self.page.saturating_add(1), self.page_size)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Description of a `GET /api/prompts` call: path plus ordered query
/// parameters. Equal inputs always build equal requests, so it can key a
/// cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListRequest {
    pub path: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl ListRequest {
    /// Sort, page and page size are always sent; type, platform and category
    /// only when not `all`; search only when non-empty. Membership of the
    /// platform or category in the catalog is not checked here.
    pub fn build(filters: &FilterState, cursor: PageCursor) -> Self {
        let mut params = vec![
            ("page", cursor.page().to_string()),
            ("page_size", cursor.page_size().to_string()),
            ("sort", filters.sort.as_str().to_string()),
        ];
        if let Some(platform_type) = filters.platform_type.as_only() {
            params.push(("platform_type", platform_type.as_str().to_string()));
        }
        if let Some(platform) = filters.platform.as_only() {
            params.push(("platform", platform.clone()));
        }
        if let Some(category) = filters.category.as_only() {
            params.push(("category", category.clone()));
        }
        if !filters.search.is_empty() {
            params.push(("search", filters.search.clone()));
        }
        Self {
            path: PROMPTS_PATH,
            params,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn to_url(&self, base_url: &Url) -> Url {
        let mut url = endpoint_url(base_url, self.path);
        url.query_pairs_mut()
            .clear()
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        url
    }
}

/// Appends an API path to whatever path the base URL already carries, so a
/// base such as `https://host/proxy` keeps its prefix.
pub(crate) fn endpoint_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let prefix = base_url.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));
    url
}
