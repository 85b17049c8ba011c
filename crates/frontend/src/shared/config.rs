//! Application configuration.
//!
//! Defaults are embedded in the bundle as TOML; the API may override some of
//! them at startup through `GET /api/configuration`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfiguration {
    pub api: ApiConfig,
    pub list: ListConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Port of the Bookkeeping API on the page's host
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Quiet period before a typed filter triggers a request
    pub input_debounce_ms: u64,
    /// Records fetched per chunk in infinite-scroll mode
    pub infinite_scroll_chunk_size: usize,
    pub default_items_per_page: usize,
    pub page_size_options: Vec<usize>,
}

/// Subset of the configuration the API is allowed to override
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfiguration {
    #[serde(default)]
    pub input_debounce_time: Option<u64>,
    #[serde(default)]
    pub infinite_scroll_chunk_size: Option<usize>,
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
port = 3000

[list]
input_debounce_ms = 200
infinite_scroll_chunk_size = 19
default_items_per_page = 10
page_size_options = [5, 10, 25, 50, 100]
"#;

/// Load the embedded configuration
pub fn load_config() -> anyhow::Result<AppConfiguration> {
    let config: AppConfiguration = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

impl AppConfiguration {
    /// Apply the values provided by the API, returns true if anything changed
    pub fn apply_remote(&mut self, remote: &RemoteConfiguration) -> bool {
        let before = self.clone();
        if let Some(debounce) = remote.input_debounce_time {
            self.list.input_debounce_ms = debounce;
        }
        if let Some(chunk_size) = remote.infinite_scroll_chunk_size.filter(|size| *size > 0) {
            self.list.infinite_scroll_chunk_size = chunk_size;
        }
        before != *self
    }
}

impl Default for AppConfiguration {
    fn default() -> Self {
        Self {
            api: ApiConfig { port: 3000 },
            list: ListConfig {
                input_debounce_ms: 200,
                infinite_scroll_chunk_size: 19,
                default_items_per_page: 10,
                page_size_options: vec![5, 10, 25, 50, 100],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = load_config();
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config, AppConfiguration::default());
        assert_eq!(config.list.input_debounce_ms, 200);
        assert_eq!(config.list.infinite_scroll_chunk_size, 19);
    }

    #[test]
    fn test_apply_remote() {
        let mut config = AppConfiguration::default();
        let remote: RemoteConfiguration =
            serde_json::from_str(r#"{"inputDebounceTime": 500, "infiniteScrollChunkSize": 0}"#).unwrap();

        assert!(config.apply_remote(&remote));
        assert_eq!(config.list.input_debounce_ms, 500);
        assert_eq!(config.list.infinite_scroll_chunk_size, 19);
        assert!(!config.apply_remote(&remote));
    }
}
