use std::env;
use std::time::Duration;

use crate::api::{ApiClient, ApiError, DEFAULT_TIMEOUT};
use crate::catalog::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Reads `PROMPTHUB_API_URL`, `PROMPTHUB_PAGE_SIZE` and
    /// `PROMPTHUB_HTTP_TIMEOUT_SECS`; unset or unparsable values keep their
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_url = lookup("PROMPTHUB_API_URL")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.api_url);
        let page_size = lookup("PROMPTHUB_PAGE_SIZE")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .map(clamp_page_size)
            .unwrap_or(defaults.page_size);
        let timeout = lookup("PROMPTHUB_HTTP_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        Self {
            api_url,
            page_size,
            timeout,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = clamp_page_size(page_size);
        self
    }

    pub fn build_client(&self) -> Result<ApiClient, ApiError> {
        ApiClient::with_timeout(self.api_url.clone(), self.timeout)
    }
}

/// The API accepts page sizes between 1 and 50.
fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}
