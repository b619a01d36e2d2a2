//! Client configuration
//!
//! One `ClientConfig` value is built at startup and passed by reference to
//! the API client, the fetch hooks and the print driver.

use serde::Deserialize;

use crate::shared::error::ConfigError;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub revalidation: RevalidationConfig,
    #[serde(default)]
    pub print: PrintConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute backend origin; when absent the window host is used with `backend_port`
    pub base_url: Option<String>,
    pub backend_port: u16,
    pub timeout_ms: u64,
}

/// Background revalidation of fetch bindings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RevalidationConfig {
    pub refresh_interval_ms: Option<u64>,
    pub revalidate_on_focus: bool,
    pub revalidate_on_reconnect: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PrintConfig {
    pub page_size: u32,
    /// Extra attempts per page before printing what was collected
    pub max_retries: u32,
    /// Wait before retry N is N times this; 0 retries at once
    pub retry_delay_ms: u32,
}

/// Response cache shared by all fetch bindings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Payloads kept; the least recently used one goes first
    pub max_entries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            backend_port: 3000,
            timeout_ms: 30_000,
        }
    }
}

impl Default for RevalidationConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: None,
            revalidate_on_focus: true,
            revalidate_on_reconnect: true,
        }
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 256 }
    }
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
backend_port = 3000
timeout_ms = 30000

[revalidation]
revalidate_on_focus = true
revalidate_on_reconnect = true

[print]
page_size = 100
max_retries = 2
retry_delay_ms = 500

[cache]
max_entries = 256
"#;

impl ClientConfig {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.print.page_size == 0 {
            return Err(ConfigError::Invalid("print.page_size must be positive".into()));
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid("cache.max_entries must be positive".into()));
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::Invalid("api.timeout_ms must be positive".into()));
        }
        if self.revalidation.refresh_interval_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "revalidation.refresh_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Load the client configuration
///
/// Uses `override_source` when given, otherwise the embedded default.
pub fn load_config(override_source: Option<&str>) -> Result<ClientConfig, ConfigError> {
    match override_source {
        Some(source) => {
            log::info!("Loading client config from override");
            ClientConfig::from_toml(source)
        }
        None => {
            log::info!("Using default embedded client configuration");
            ClientConfig::from_toml(DEFAULT_CONFIG)
        }
    }
}
