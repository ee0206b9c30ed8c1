use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contiguous span during which the property is booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedRange {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ReservedRange {
    /// Build a range, refusing spans that end before they start
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Option<Self> {
        (start_date <= end_date).then_some(Self {
            start_date,
            end_date,
        })
    }
}

/// The last successfully fetched availability
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Vec<ReservedRange>,
    pub fetched_at: DateTime<Utc>,
}

/// How an availability answer was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from a cache entry inside the freshness window
    Hit,
    /// Freshly fetched from the feed
    Miss,
    /// Refresh failed; served an expired cache entry
    Stale,
    /// No feed URL configured
    Unconfigured,
    /// Refresh failed and nothing was cached
    Failed,
}

impl CacheStatus {
    /// Value for the `X-Cache` response header
    pub fn as_header_value(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Stale => "STALE",
            CacheStatus::Unconfigured => "UNCONFIGURED",
            CacheStatus::Failed => "ERROR",
        }
    }

    /// Value for the `Cache-Control` response header
    pub fn cache_control(&self) -> &'static str {
        match self {
            CacheStatus::Hit | CacheStatus::Miss => {
                "public, max-age=3600, stale-while-revalidate=86400"
            }
            CacheStatus::Stale | CacheStatus::Unconfigured | CacheStatus::Failed => {
                "public, max-age=60"
            }
        }
    }
}

/// Result of an availability lookup
#[derive(Debug, Clone)]
pub struct Availability {
    pub ranges: Vec<ReservedRange>,
    pub status: CacheStatus,
}

impl Availability {
    pub fn empty(status: CacheStatus) -> Self {
        Self {
            ranges: Vec::new(),
            status,
        }
    }
}
