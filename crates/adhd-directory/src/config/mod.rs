use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the site.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub site: SiteConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_url = env::var("SITE_URL").unwrap_or_else(|_| SiteConfig::DEFAULT_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;
        let name = env::var("SITE_NAME").unwrap_or_else(|_| SiteConfig::DEFAULT_NAME.to_string());
        let twitter_handle = env::var("SITE_TWITTER_HANDLE")
            .unwrap_or_else(|_| SiteConfig::DEFAULT_TWITTER_HANDLE.to_string());

        let fixture_path = env::var("STORE_FIXTURE_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            site: SiteConfig {
                base_url,
                name,
                twitter_handle,
            },
            store: StoreConfig { fixture_path },
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidSiteUrl {
            value: raw.to_string(),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Public identity of the site, used for canonical URLs, feeds and schema.org payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Absolute origin without a trailing slash.
    pub base_url: String,
    pub name: String,
    pub twitter_handle: String,
}

impl SiteConfig {
    pub const DEFAULT_URL: &'static str = "https://adhdnsw.org";
    pub const DEFAULT_NAME: &'static str = "ADHD NSW";
    pub const DEFAULT_TWITTER_HANDLE: &'static str = "@adhdnsw";

    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() || path == "/" {
            return self.base_url.clone();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_URL.to_string(),
            name: Self::DEFAULT_NAME.to_string(),
            twitter_handle: Self::DEFAULT_TWITTER_HANDLE.to_string(),
        }
    }
}

/// Where the record store gets its data. No fixture means the store is unconfigured.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub fixture_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSiteUrl { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSiteUrl { value } => {
                write!(f, "SITE_URL must be an absolute http(s) origin, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSiteUrl { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SITE_URL",
            "SITE_NAME",
            "SITE_TWITTER_HANDLE",
            "STORE_FIXTURE_PATH",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.site, SiteConfig::default());
        assert!(config.store.fixture_path.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn site_url_is_normalized_and_validated() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SITE_URL", "https://staging.adhdnsw.org/");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.site.base_url, "https://staging.adhdnsw.org");

        env::set_var("SITE_URL", "adhdnsw.org");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidSiteUrl { .. })
        ));
        reset_env();
    }

    #[test]
    fn blank_fixture_path_means_unconfigured_store() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("STORE_FIXTURE_PATH", "  ");
        let config = AppConfig::load().expect("config loads");
        assert!(config.store.fixture_path.is_none());
        reset_env();
    }

    #[test]
    fn site_url_joins_paths() {
        let site = SiteConfig::default();
        assert_eq!(site.url("/blog/rss.xml"), "https://adhdnsw.org/blog/rss.xml");
        assert_eq!(site.url("about"), "https://adhdnsw.org/about");
        assert_eq!(site.url("/"), "https://adhdnsw.org");
        assert_eq!(site.url("https://cdn.example.com/a.jpg"), "https://cdn.example.com/a.jpg");
    }
}
