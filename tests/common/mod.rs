#![allow(dead_code)]

use async_trait::async_trait;
use chalet_availability::components::availability::{AvailabilityService, FeedSource};
use chalet_availability::error::{feed_error, AppResult, Error};
use chalet_availability::utils::time::ManualClock;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum MockResponse {
    Body(String),
    Status(u16),
    Unreachable,
}

/// Mock feed source that records how often it was asked
#[derive(Debug)]
pub struct MockFeedSource {
    response: Mutex<MockResponse>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockFeedSource {
    /// A source that returns `body`
    pub fn serving(body: &str) -> Self {
        Self {
            response: Mutex::new(MockResponse::Body(body.to_string())),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// A source that answers with an HTTP error status
    pub fn failing(status: u16) -> Self {
        let source = Self::serving("");
        source.respond(MockResponse::Status(status));
        source
    }

    /// Make every fetch take `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Change the answer for subsequent fetches
    pub fn respond(&self, response: MockResponse) {
        *self.response.lock().unwrap() = response;
    }

    /// Number of fetches so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for MockFeedSource {
    async fn fetch(&self) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.response.lock().unwrap().clone();
        match response {
            MockResponse::Body(body) => Ok(body),
            MockResponse::Status(status) => Err(Error::FeedStatus(status)),
            MockResponse::Unreachable => Err(feed_error("connection refused")),
        }
    }

    fn describe(&self) -> String {
        "mock feed".to_string()
    }
}

/// Fixed starting point for the manual clock
pub fn test_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

/// Service wired to a mock source and a manual clock
pub fn test_service(
    source: Arc<MockFeedSource>,
) -> (Arc<AvailabilityService>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(test_start()));
    let service = AvailabilityService::new(
        Some(source as Arc<dyn FeedSource>),
        clock.clone(),
    );
    (Arc::new(service), clock)
}

/// Wrap booking blocks in a calendar
pub fn calendar(events: &[(&str, &str)]) -> String {
    let mut feed = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Airbnb Inc//Hosting Calendar 0.8.8//EN\r\nCALSCALE:GREGORIAN\r\n");
    for (i, (start, end)) in events.iter().enumerate() {
        feed.push_str(&format!(
            "BEGIN:VEVENT\r\nDTEND;VALUE=DATE:{end}\r\nDTSTART;VALUE=DATE:{start}\r\nUID:booking-{i}@example.com\r\nSUMMARY:Reserved\r\nEND:VEVENT\r\n"
        ));
    }
    feed.push_str("END:VCALENDAR\r\n");
    feed
}
