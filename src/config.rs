use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::time::Duration;
use url::Url;

/// Default User-Agent sent to the feed source
pub const DEFAULT_USER_AGENT: &str = "Alpine-Court-Chalet/1.0";

/// Default bound on a single upstream fetch
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 10;

/// Optional file with overrides for the environment settings
pub const OVERRIDES_PATH: &str = "config/availability.toml";

/// Main configuration structure for the service
#[derive(Debug, Clone)]
pub struct Config {
    /// iCal feed to read bookings from; `None` means not configured
    pub feed_url: Option<Url>,
    /// Address to bind the HTTP server to
    pub bind_address: String,
    /// Port to listen on
    pub port: u16,
    /// Timeout for the upstream request, in seconds
    pub feed_timeout_secs: u64,
    /// User-Agent header sent upstream
    pub user_agent: String,
    /// Allowed CORS origin; permissive when unset
    pub cors_allowed_origin: Option<String>,
}

/// Settings that `config/availability.toml` may override
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    feed_url: Option<String>,
    bind_address: Option<String>,
    port: Option<u16>,
    feed_timeout_secs: Option<u64>,
    user_agent: Option<String>,
    cors_allowed_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: None,
            bind_address: String::from("127.0.0.1"),
            port: 3000,
            feed_timeout_secs: DEFAULT_FEED_TIMEOUT_SECS,
            user_agent: String::from(DEFAULT_USER_AGENT),
            cors_allowed_origin: None,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_env()?;

        // Apply file overrides if present; a broken file is ignored
        if let Ok(content) = fs::read_to_string(OVERRIDES_PATH) {
            match toml::from_str::<FileOverrides>(&content) {
                Ok(overrides) => config.apply(overrides),
                Err(e) => tracing::warn!("Ignoring malformed {}: {}", OVERRIDES_PATH, e),
            }
        }

        Ok(config)
    }

    /// Build configuration from environment variables only
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let feed_url = match env::var("ICAL_FEED_URL").or_else(|_| env::var("AIRBNB_ICAL_URL")) {
            Ok(raw) => feed_url_setting(&raw),
            Err(_) => None,
        };

        let bind_address = env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);

        let port = match env::var("PORT") {
            Ok(p) => p.parse::<u16>().map_err(|_| env_error("PORT"))?,
            Err(_) => defaults.port,
        };

        let feed_timeout_secs = match env::var("FEED_TIMEOUT_SECS") {
            Ok(t) => t.parse::<u64>().map_err(|_| env_error("FEED_TIMEOUT_SECS"))?,
            Err(_) => defaults.feed_timeout_secs,
        };

        let user_agent = env::var("FEED_USER_AGENT").unwrap_or(defaults.user_agent);

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|o| !o.trim().is_empty());

        Ok(Config {
            feed_url,
            bind_address,
            port,
            feed_timeout_secs,
            user_agent,
            cors_allowed_origin,
        })
    }

    fn apply(&mut self, overrides: FileOverrides) {
        if let Some(raw) = overrides.feed_url {
            self.feed_url = feed_url_setting(&raw);
        }
        if let Some(bind_address) = overrides.bind_address {
            self.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(timeout) = overrides.feed_timeout_secs {
            self.feed_timeout_secs = timeout;
        }
        if let Some(user_agent) = overrides.user_agent {
            self.user_agent = user_agent;
        }
        if overrides.cors_allowed_origin.is_some() {
            self.cors_allowed_origin = overrides.cors_allowed_origin;
        }
    }

    /// Bound applied to each upstream fetch
    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    /// Whether a feed URL is configured
    pub fn is_feed_configured(&self) -> bool {
        self.feed_url.is_some()
    }
}

/// Parse a feed URL setting. Blank means "not configured".
pub fn parse_feed_url(raw: &str) -> AppResult<Option<Url>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(raw)
        .map_err(|e| config_error(&format!("Invalid feed URL: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(config_error(&format!("Unsupported feed URL scheme: {}", other))),
    }
}

/// Read the feed URL setting, treating an invalid value as not configured
pub fn feed_url_setting(raw: &str) -> Option<Url> {
    match parse_feed_url(raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("{}; treating the feed as not configured", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_url() {
        assert!(parse_feed_url("").unwrap().is_none());
        assert!(parse_feed_url("   ").unwrap().is_none());

        let url = parse_feed_url(" https://example.com/calendar/ical/123.ics ").unwrap();
        assert_eq!(
            url.unwrap().as_str(),
            "https://example.com/calendar/ical/123.ics"
        );

        assert!(parse_feed_url("not a url").is_err());
        assert!(parse_feed_url("ftp://example.com/feed.ics").is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let overrides: FileOverrides = toml::from_str(
            r#"
            feed_url = "https://example.com/feed.ics"
            port = 8080
            user_agent = "Test/1.0"
            "#,
        )
        .unwrap();

        config.apply(overrides);

        assert!(config.is_feed_configured());
        assert_eq!(config.port, 8080);
        assert_eq!(config.user_agent, "Test/1.0");
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.feed_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_override_url_is_unconfigured() {
        let mut config = Config::default();
        config.feed_url = parse_feed_url("https://example.com/feed.ics").unwrap();

        let overrides: FileOverrides = toml::from_str(r#"feed_url = "not a url""#).unwrap();
        config.apply(overrides);

        assert!(!config.is_feed_configured());
    }

    #[test]
    fn test_invalid_env_url_still_loads() {
        env::set_var("ICAL_FEED_URL", "not a url");
        let config = Config::from_env();
        env::remove_var("ICAL_FEED_URL");

        let config = config.unwrap();
        assert!(!config.is_feed_configured());

        assert!(feed_url_setting("ftp://example.com/feed.ics").is_none());
        assert!(feed_url_setting("https://example.com/feed.ics").is_some());
    }
}
