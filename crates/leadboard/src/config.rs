//! Configuration management for leadboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "leadboard";

/// Bare environment variables honoured alongside the `LEADBOARD_` prefix.
const LEGACY_ENV_KEYS: [(&str, &str); 4] = [
    ("SMARTSUITE_API_KEY", "smartsuite.api_key"),
    ("SMARTSUITE_ACCOUNT_ID", "smartsuite.account_id"),
    ("SMARTSUITE_TABLE_ID", "smartsuite.table_id"),
    ("PORT", "server.port"),
];

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LEADBOARD_`, nested with `__`)
/// 2. The bare `SMARTSUITE_*` and `PORT` variables
/// 3. TOML config file at `~/.config/leadboard/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// SmartSuite API configuration.
    pub smartsuite: SmartSuiteConfig,
    /// Geocoding configuration.
    pub geocoding: GeocodingConfig,
    /// Refresh scheduling configuration.
    pub refresh: RefreshConfig,
    /// Login configuration.
    pub auth: AuthConfig,
    /// Debug endpoint configuration.
    pub debug: DebugConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory served for static assets (logo, favicon).
    pub public_dir: PathBuf,
}

/// SmartSuite API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartSuiteConfig {
    /// API base URL.
    pub base_url: String,
    /// API token.
    pub api_key: String,
    /// Workspace account identifier (sent as `ACCOUNT-ID`).
    pub account_id: String,
    /// Table (application) identifier.
    pub table_id: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Field identifiers of the lead table.
    pub fields: FieldMap,
}

/// SmartSuite field identifiers for each lead attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    /// Company name.
    pub company: String,
    /// Location (address + coordinates).
    pub location: String,
    /// Estimated new jobs.
    pub estimated_new_jobs: String,
    /// Activity type single-select.
    pub activity_type: String,
    /// Timeframe single-select.
    pub timeframe: String,
    /// General lead summary text.
    pub general_lead_summary: String,
    /// About text.
    pub about: String,
    /// Site type multi-select.
    pub site_type: String,
    /// Specialized industry site multi-select.
    pub specialized_industry_site: String,
    /// O*NET industry site multi-select.
    pub onet_industry_site: String,
}

/// Geocoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Query remote providers. When disabled only the fallback table is used.
    pub enabled: bool,
    /// User agent sent to the public geocoding services.
    pub user_agent: String,
    /// Nominatim base URL.
    pub nominatim_url: String,
    /// Photon base URL.
    pub photon_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Delay before the first provider is queried, in milliseconds.
    pub request_delay_ms: u64,
    /// Delay after a provider finds no match, in milliseconds.
    pub provider_delay_ms: u64,
    /// Maximum number of leads geocoded per refresh.
    pub max_per_refresh: usize,
    /// Number of leads geocoded concurrently.
    pub batch_size: usize,
    /// Delay between batches, in milliseconds.
    pub batch_delay_ms: u64,
}

/// Refresh scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between automatic refreshes.
    pub interval_secs: u64,
}

/// Login configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared dashboard password. Login is disabled when unset.
    pub password: Option<String>,
    /// Session lifetime in minutes.
    pub session_ttl_minutes: u64,
}

/// Debug endpoint configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Key required by the `/debug/*` routes. The routes are disabled when unset.
    pub key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            public_dir: PathBuf::from("public"),
        }
    }
}

impl Default for SmartSuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://app.smartsuite.com/api/v1".to_string(),
            api_key: String::new(),
            account_id: String::new(),
            table_id: String::new(),
            timeout_secs: 30,
            fields: FieldMap::default(),
        }
    }
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            company: "s79c2f08d9".to_string(),
            location: "s5d25b0846".to_string(),
            estimated_new_jobs: "s20f809da6".to_string(),
            activity_type: "s560d452b4".to_string(),
            timeframe: "s8a9285317".to_string(),
            general_lead_summary: "s54a8cc7de".to_string(),
            about: "sb7f0cac0e".to_string(),
            site_type: "s91e2ac54c".to_string(),
            specialized_industry_site: "s21hlm59".to_string(),
            onet_industry_site: "s5530473fb".to_string(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: "LocationLeadDashboard/1.0 (contact@encodeset.com)".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            photon_url: "https://photon.komoot.io".to_string(),
            request_timeout_secs: 10,
            request_delay_ms: 1000,
            provider_delay_ms: 500,
            max_per_refresh: 20,
            batch_size: 5,
            batch_delay_ms: 1000,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5 * 60,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password: None,
            session_ttl_minutes: 12 * 60,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the layered figment for the given config file.
    #[must_use]
    pub fn figment(config_file: PathBuf) -> Figment {
        let legacy_keys: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(env, _)| *env).collect();

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::raw().only(&legacy_keys).map(|key| {
                LEGACY_ENV_KEYS
                    .iter()
                    .find(|(env, _)| key.as_str().eq_ignore_ascii_case(env))
                    .map_or_else(|| key.as_str().to_owned(), |(_, path)| (*path).to_owned())
                    .into()
            }))
            .merge(Env::prefixed("LEADBOARD_").split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.refresh.interval_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "refresh.interval_secs must be greater than 0".to_string(),
            });
        }

        if self.smartsuite.timeout_secs == 0 || self.geocoding.request_timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "request timeouts must be greater than 0".to_string(),
            });
        }

        if self.geocoding.batch_size == 0 {
            return Err(Error::ConfigValidation {
                message: "geocoding.batch_size must be greater than 0".to_string(),
            });
        }

        if self.geocoding.user_agent.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "geocoding.user_agent must not be empty".to_string(),
            });
        }

        if matches!(&self.auth.password, Some(p) if p.is_empty()) {
            return Err(Error::ConfigValidation {
                message: "auth.password must not be empty when set".to_string(),
            });
        }

        Ok(())
    }

    /// Socket address string the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }

    /// Get the refresh interval as a Duration.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }

    /// Get the session lifetime as a Duration.
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.session_ttl_minutes * 60)
    }

    /// Whether the dashboard requires a login.
    #[must_use]
    pub fn login_required(&self) -> bool {
        self.auth.password.is_some()
    }
}

impl SmartSuiteConfig {
    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// URL of the records list endpoint.
    #[must_use]
    pub fn records_url(&self) -> String {
        format!(
            "{}/applications/{}/records/list/",
            self.base_url.trim_end_matches('/'),
            self.table_id
        )
    }
}

impl GeocodingConfig {
    /// Get the per-request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the pre-request delay as a Duration.
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Get the inter-provider delay as a Duration.
    #[must_use]
    pub fn provider_delay(&self) -> Duration {
        Duration::from_millis(self.provider_delay_ms)
    }

    /// Get the inter-batch delay as a Duration.
    #[must_use]
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.port, 3000);
        assert!(config.geocoding.enabled);
        assert!(config.auth.password.is_none());
        assert!(config.debug.key.is_none());
        assert!(config.smartsuite.api_key.is_empty());
    }

    #[test]
    fn test_default_field_map() {
        let fields = FieldMap::default();

        assert_eq!(fields.company, "s79c2f08d9");
        assert_eq!(fields.location, "s5d25b0846");
        assert_eq!(fields.site_type, "s91e2ac54c");
    }

    #[test]
    fn test_default_geocoding_config() {
        let geocoding = GeocodingConfig::default();

        assert_eq!(geocoding.max_per_refresh, 20);
        assert_eq!(geocoding.batch_size, 5);
        assert_eq!(geocoding.batch_delay(), Duration::from_secs(1));
        assert_eq!(geocoding.request_timeout(), Duration::from_secs(10));
        assert_eq!(geocoding.provider_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.port"));
    }

    #[test]
    fn test_validate_zero_refresh_interval() {
        let mut config = Config::default();
        config.refresh.interval_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("interval_secs"));
    }

    #[test]
    fn test_validate_zero_batch_size() {
        let mut config = Config::default();
        config.geocoding.batch_size = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("batch_size"));
    }

    #[test]
    fn test_validate_empty_password() {
        let mut config = Config::default();
        config.auth.password = Some(String::new());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_refresh_interval() {
        let config = Config::default();
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_session_ttl() {
        let config = Config::default();
        assert_eq!(config.session_ttl(), Duration::from_secs(12 * 60 * 60));
    }

    #[test]
    fn test_records_url_trims_slash() {
        let mut smartsuite = SmartSuiteConfig::default();
        smartsuite.base_url = "https://example.test/api/v1/".to_string();
        smartsuite.table_id = "tbl1".to_string();

        assert_eq!(
            smartsuite.records_url(),
            "https://example.test/api/v1/applications/tbl1/records/list/"
        );
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("leadboard"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_jail| {
            let config =
                Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[smartsuite]\ntable_id = \"tbl\"\n\n[smartsuite.fields]\ncompany = \"custom\""
        )
        .unwrap();

        figment::Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.smartsuite.table_id, "tbl");
            assert_eq!(config.smartsuite.fields.company, "custom");
            assert_eq!(config.smartsuite.fields.location, "s5d25b0846");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SMARTSUITE_API_KEY", "secret");
            jail.set_env("PORT", "4100");
            jail.set_env("LEADBOARD_DEBUG__KEY", "peek");
            jail.set_env("LEADBOARD_GEOCODING__MAX_PER_REFRESH", "3");

            let config: Config = Config::figment(PathBuf::from("/nonexistent.toml")).extract()?;
            assert_eq!(config.smartsuite.api_key, "secret");
            assert_eq!(config.server.port, 4100);
            assert_eq!(config.debug.key.as_deref(), Some("peek"));
            assert_eq!(config.geocoding.max_per_refresh, 3);
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("smartsuite"));
        assert!(json.contains("max_per_refresh"));
    }

    #[test]
    fn test_geocoding_config_deserialize() {
        let json = r#"{"enabled": false, "batch_size": 2}"#;
        let geocoding: GeocodingConfig = serde_json::from_str(json).unwrap();
        assert!(!geocoding.enabled);
        assert_eq!(geocoding.batch_size, 2);
        assert_eq!(geocoding.max_per_refresh, 20);
    }
}
