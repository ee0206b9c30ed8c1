use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::components::availability::{Availability, AvailabilityService};

/// Header telling whether the answer came from cache, the feed, or a fallback
pub const X_CACHE: &str = "x-cache";

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The cached availability service
    pub availability: Arc<AvailabilityService>,
}

impl AppState {
    pub fn new(availability: Arc<AvailabilityService>) -> Self {
        Self { availability }
    }
}

/// Handler for `GET /api/availability`.
///
/// Always answers 200 with a JSON array; failures show up only in the
/// `X-Cache` header and as empty or stale data.
pub async fn availability_handler(State(state): State<AppState>) -> Response {
    let Availability { ranges, status } = state.availability.get_availability().await;

    (
        StatusCode::OK,
        [
            (header::CACHE_CONTROL, status.cache_control()),
            (HeaderName::from_static(X_CACHE), status.as_header_value()),
        ],
        Json(ranges),
    )
        .into_response()
}

/// Handler for the health check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
