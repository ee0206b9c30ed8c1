//! Booking availability built from an iCal feed.
//!
//! [`parser`] turns feed text into [`ReservedRange`]s, [`source`] fetches the
//! feed, and [`AvailabilityService`] keeps the last good result cached for an
//! hour and falls back to it when the feed is unreachable.

pub mod models;
pub mod parser;
mod service;
pub mod source;

pub use models::{Availability, CacheEntry, CacheStatus, ReservedRange};
pub use parser::parse_feed;
pub use service::{cache_ttl, AvailabilityService, CACHE_TTL_SECS};
pub use source::{FeedSource, HttpFeedSource};
