//! Frontend Configuration
//!
//! Build-time settings for the API location and list behaviour.

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the items backend, without trailing slash
    pub api_base: String,
    pub page_size: usize,
    /// Distance from the end of the list that triggers the next page
    pub load_more_margin_px: f64,
    pub search_debounce_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: PAGE_SIZE,
            load_more_margin_px: 200.0,
            search_debounce_ms: 300,
        }
    }
}

impl AppConfig {
    /// Reads `ITEMS_API` at compile time, falling back to the local backend
    pub fn from_env() -> Self {
        Self::with_api_base(option_env!("ITEMS_API"))
    }

    fn with_api_base(api_base: Option<&str>) -> Self {
        let api_base = api_base
            .map(|base| base.trim().trim_end_matches('/'))
            .filter(|base| !base.is_empty())
            .unwrap_or(DEFAULT_API_BASE);
        Self {
            api_base: api_base.to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_override() {
        let config = AppConfig::with_api_base(Some("https://items.example.com/"));
        assert_eq!(config.api_base, "https://items.example.com");
        assert_eq!(config.page_size, PAGE_SIZE);
    }

    #[test]
    fn test_blank_api_base_falls_back() {
        assert_eq!(AppConfig::with_api_base(Some("  ")).api_base, DEFAULT_API_BASE);
        assert_eq!(AppConfig::with_api_base(None).api_base, DEFAULT_API_BASE);
    }
}
