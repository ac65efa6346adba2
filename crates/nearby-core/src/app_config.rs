use std::fmt;

use crate::geo::RadiusBound;

/// HTTP verb the search form submits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    Get,
    #[default]
    Post,
}

impl FormMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-level configuration for the search controller.
///
/// Built once at startup and shared read-only; nothing in the controller
/// re-reads the environment afterwards.
#[derive(Clone)]
pub struct PageConfig {
    /// Absolute origin that relative endpoint paths are resolved against.
    pub base_url: String,
    pub results_url: String,
    /// Action of the search form itself. A submission that is not replaced
    /// goes here, and the server resolves the typed address.
    pub search_action: String,
    pub search_method: FormMethod,
    /// `None` when the page exposes no geocoding endpoint.
    pub geocode_endpoint: Option<String>,
    /// Fixed page size; never below 1.
    pub page_size: u32,
    pub radius: RadiusBound,
    /// Whether the partial-update request layer is present on the page.
    pub partial_updates: bool,
    /// Region replaced by in-place responses.
    pub results_target: String,
    pub csrf_meta: Option<String>,
    pub cookies: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            results_url: "/search/results".to_string(),
            search_action: "/search/geocode".to_string(),
            search_method: FormMethod::Post,
            geocode_endpoint: Some("/search/geocode/cep".to_string()),
            page_size: 15,
            radius: RadiusBound::default(),
            partial_updates: false,
            results_target: "#search-results".to_string(),
            csrf_meta: None,
            cookies: None,
            request_timeout_secs: 10,
            user_agent: "nearby/0.1 (search-controller)".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl fmt::Debug for PageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageConfig")
            .field("base_url", &self.base_url)
            .field("results_url", &self.results_url)
            .field("search_action", &self.search_action)
            .field("search_method", &self.search_method)
            .field("geocode_endpoint", &self.geocode_endpoint)
            .field("page_size", &self.page_size)
            .field("radius", &self.radius)
            .field("partial_updates", &self.partial_updates)
            .field("results_target", &self.results_target)
            .field("csrf_meta", &self.csrf_meta.as_ref().map(|_| "[redacted]"))
            .field("cookies", &self.cookies.as_ref().map(|_| "[redacted]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
