use crate::config::Config;
use crate::error::{feed_error, AppResult, Error};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Media type requested from the feed source
pub const ICAL_MEDIA_TYPE: &str = "text/calendar";

/// Something that can produce the raw feed text
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
    /// Fetch the whole feed body
    async fn fetch(&self) -> AppResult<String>;

    /// Where the feed comes from, for logging
    fn describe(&self) -> String;
}

/// Fetches the feed over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    url: Url,
    user_agent: String,
}

impl HttpFeedSource {
    /// Create a source with a bounded request time
    pub fn new(url: Url, timeout: Duration, user_agent: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| feed_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            user_agent: user_agent.to_string(),
        })
    }

    /// Build a source from config, or `None` when no feed URL is set
    pub fn from_config(config: &Config) -> AppResult<Option<Self>> {
        match &config.feed_url {
            Some(url) => Ok(Some(Self::new(
                url.clone(),
                config.feed_timeout(),
                &config.user_agent,
            )?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> AppResult<String> {
        debug!("Fetching feed from {}", self.url.host_str().unwrap_or("unknown host"));

        let response = self
            .client
            .get(self.url.clone())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, ICAL_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| feed_error(&format!("Failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::FeedStatus(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| feed_error(&format!("Failed to read feed body: {}", e)))
    }

    fn describe(&self) -> String {
        // Host only; the path carries the feed's access token
        format!("ical feed at {}", self.url.host_str().unwrap_or("unknown host"))
    }
}
