//! Configuration management for PaperNest services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// arXiv fetching configuration
    #[serde(default)]
    pub arxiv: ArxivConfig,

    /// Listing configuration
    #[serde(default)]
    pub ui: UiConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

/// Sort field understood by the arXiv query API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedSortBy {
    #[default]
    SubmittedDate,
    LastUpdatedDate,
    Relevance,
}

impl FeedSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSortBy::SubmittedDate => "submittedDate",
            FeedSortBy::LastUpdatedDate => "lastUpdatedDate",
            FeedSortBy::Relevance => "relevance",
        }
    }
}

/// Sort direction understood by the arXiv query API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSortOrder {
    Ascending,
    #[default]
    Descending,
}

impl FeedSortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSortOrder::Ascending => "ascending",
            FeedSortOrder::Descending => "descending",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArxivConfig {
    /// Query endpoint of the arXiv API
    #[serde(default = "default_arxiv_base_url")]
    pub base_url: String,

    /// Category filters, OR-combined (e.g. cs.AI)
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Keyword filters, OR-combined
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Maximum entries requested per fetch
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default)]
    pub sort_by: FeedSortBy,

    #[serde(default)]
    pub sort_order: FeedSortOrder,

    /// Interval between scheduled fetches in seconds
    #[serde(default = "default_fetch_interval")]
    pub fetch_interval_secs: u64,

    /// Mandatory pause after every request, in milliseconds
    #[serde(default = "default_rate_limit_delay")]
    pub rate_limit_delay_ms: u64,

    /// Run the periodic scheduler inside the gateway
    #[serde(default = "default_enabled")]
    pub schedule_enabled: bool,

    /// Delay before the first scheduled fetch in seconds
    #[serde(default = "default_warmup")]
    pub warmup_secs: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_arxiv_timeout")]
    pub request_timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Default page size for paper listings
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Upper bound for a requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per second across the API
    #[serde(default = "default_rate_limit")]
    pub requests_per_second: u32,

    /// Burst capacity
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 120 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_database_url() -> String { "sqlite://data/papernest.db?mode=rwc".to_string() }
fn default_max_connections() -> u32 { 5 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_arxiv_base_url() -> String { "http://export.arxiv.org/api/query".to_string() }
fn default_categories() -> Vec<String> {
    vec!["cs.AI".to_string(), "cs.LG".to_string(), "cs.CL".to_string()]
}
fn default_max_results() -> u32 { 100 }
fn default_fetch_interval() -> u64 { 24 * 60 * 60 }
fn default_rate_limit_delay() -> u64 { 3000 }
fn default_warmup() -> u64 { 10 }
fn default_arxiv_timeout() -> u64 { 30 }
fn default_user_agent() -> String { format!("PaperNest/{}", env!("CARGO_PKG_VERSION")) }
fn default_page_size() -> u64 { 20 }
fn default_max_page_size() -> u64 { 100 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { false }
fn default_metrics_port() -> u16 { 9090 }
fn default_rate_limit() -> u32 { 20 }
fn default_burst() -> u32 { 40 }
fn default_enabled() -> bool { true }

/// Environment source: APP__ prefix, `__` nesting, comma-separated lists
fn environment() -> Environment {
    Environment::with_prefix("APP")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("arxiv.categories")
        .with_list_parse_key("arxiv.keywords")
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__ARXIV__MAX_RESULTS=50
            .add_source(environment())

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific config file, still honouring APP__ overrides
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::from_sources(Some(path), environment())
    }

    fn from_sources(path: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl ArxivConfig {
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs)
    }

    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Private in-memory database; a single connection keeps it alive
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            base_url: default_arxiv_base_url(),
            categories: default_categories(),
            keywords: Vec::new(),
            max_results: default_max_results(),
            sort_by: FeedSortBy::default(),
            sort_order: FeedSortOrder::default(),
            fetch_interval_secs: default_fetch_interval(),
            rate_limit_delay_ms: default_rate_limit_delay(),
            schedule_enabled: default_enabled(),
            warmup_secs: default_warmup(),
            request_timeout_secs: default_arxiv_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rate_limit(),
            burst: default_burst(),
            enabled: default_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.arxiv.categories, vec!["cs.AI", "cs.LG", "cs.CL"]);
        assert!(config.arxiv.keywords.is_empty());
        assert_eq!(config.arxiv.max_results, 100);
        assert_eq!(config.arxiv.fetch_interval(), Duration::from_secs(86_400));
        assert_eq!(config.arxiv.rate_limit_delay(), Duration::from_secs(3));
        assert_eq!(config.arxiv.warmup(), Duration::from_secs(10));
        assert!(config.arxiv.schedule_enabled);
        assert_eq!(config.ui.page_size, 20);
    }

    #[test]
    fn test_empty_sources_fall_back_to_defaults() {
        let config = AppConfig::from_sources(None, env_from(&[])).unwrap();
        assert_eq!(config.database.url, "sqlite://data/papernest.db?mode=rwc");
        assert_eq!(config.arxiv.sort_by, FeedSortBy::SubmittedDate);
        assert_eq!(config.arxiv.sort_order, FeedSortOrder::Descending);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_sources(
            None,
            env_from(&[
                ("APP__SERVER__PORT", "9000"),
                ("APP__ARXIV__MAX_RESULTS", "25"),
                ("APP__ARXIV__CATEGORIES", "math.CO,cs.DS"),
                ("APP__ARXIV__SORT_BY", "lastUpdatedDate"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.arxiv.max_results, 25);
        assert_eq!(config.arxiv.categories, vec!["math.CO", "cs.DS"]);
        assert_eq!(config.arxiv.sort_by, FeedSortBy::LastUpdatedDate);
        // untouched fields keep their defaults
        assert_eq!(config.arxiv.rate_limit_delay_ms, 3000);
    }

    #[test]
    fn test_sort_wire_names() {
        assert_eq!(FeedSortBy::SubmittedDate.as_str(), "submittedDate");
        assert_eq!(FeedSortBy::LastUpdatedDate.as_str(), "lastUpdatedDate");
        assert_eq!(FeedSortBy::Relevance.as_str(), "relevance");
        assert_eq!(FeedSortOrder::Ascending.as_str(), "ascending");
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
