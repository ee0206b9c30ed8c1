use super::models::{Availability, CacheEntry, CacheStatus, ReservedRange};
use super::parser::parse_feed;
use super::source::FeedSource;
use crate::utils::time::{is_within, Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// How long a successful fetch is served without refetching
pub const CACHE_TTL_SECS: i64 = 60 * 60;

/// Freshness window as a duration
pub fn cache_ttl() -> Duration {
    Duration::seconds(CACHE_TTL_SECS)
}

/// Serves availability from a single cached feed, refreshing it hourly
pub struct AvailabilityService {
    source: Option<Arc<dyn FeedSource>>,
    clock: Arc<dyn Clock>,
    cache: RwLock<Option<CacheEntry>>,
    refresh_lock: Mutex<()>,
}

impl AvailabilityService {
    /// Create a service; `None` as source means no feed is configured
    pub fn new(source: Option<Arc<dyn FeedSource>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Create a service using the wall clock
    pub fn with_system_clock(source: Option<Arc<dyn FeedSource>>) -> Self {
        Self::new(source, Arc::new(SystemClock))
    }

    /// Whether a feed source is configured
    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// When the current cache entry was fetched, if there is one
    pub async fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.cache.read().await.as_ref().map(|entry| entry.fetched_at)
    }

    /// Get the reserved ranges.
    ///
    /// Never fails: a broken or missing feed degrades to the last good data,
    /// or to an empty list when there is none.
    pub async fn get_availability(&self) -> Availability {
        if let Some(ranges) = self.fresh_data().await {
            return Availability {
                ranges,
                status: CacheStatus::Hit,
            };
        }

        let Some(source) = &self.source else {
            debug!("No feed URL configured, returning empty availability");
            return Availability::empty(CacheStatus::Unconfigured);
        };

        // One refresh at a time; waiters pick up the winner's result
        let _guard = self.refresh_lock.lock().await;
        if let Some(ranges) = self.fresh_data().await {
            return Availability {
                ranges,
                status: CacheStatus::Hit,
            };
        }

        match source.fetch().await {
            Ok(body) => {
                let ranges = parse_feed(&body);
                let fetched_at = self.clock.now();
                info!(
                    "Refreshed availability from {}: {} reserved ranges",
                    source.describe(),
                    ranges.len()
                );

                *self.cache.write().await = Some(CacheEntry {
                    data: ranges.clone(),
                    fetched_at,
                });

                Availability {
                    ranges,
                    status: CacheStatus::Miss,
                }
            }
            Err(e) => {
                warn!("Failed to refresh availability from {}: {}", source.describe(), e);

                match self.cache.read().await.as_ref() {
                    Some(entry) => {
                        warn!(
                            "Serving stale availability fetched at {}",
                            entry.fetched_at.to_rfc3339()
                        );
                        Availability {
                            ranges: entry.data.clone(),
                            status: CacheStatus::Stale,
                        }
                    }
                    None => Availability::empty(CacheStatus::Failed),
                }
            }
        }
    }

    /// Cached data if it is still inside the freshness window
    async fn fresh_data(&self) -> Option<Vec<ReservedRange>> {
        let cache = self.cache.read().await;
        let entry = cache.as_ref()?;
        is_within(entry.fetched_at, self.clock.now(), cache_ttl()).then(|| entry.data.clone())
    }
}
