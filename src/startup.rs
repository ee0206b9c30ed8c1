use crate::components::availability::{AvailabilityService, FeedSource, HttpFeedSource};
use crate::config::Config;
use crate::error::{other_error, AppResult, Error};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[cfg(feature = "web-interface")]
use crate::error::config_error;
#[cfg(feature = "web-interface")]
use crate::handlers::{availability_handler, health_handler, AppState};
#[cfg(feature = "web-interface")]
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
#[cfg(feature = "web-interface")]
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Path of the availability endpoint
pub const AVAILABILITY_PATH: &str = "/api/availability";

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => {
            if !config.is_feed_configured() {
                warn!("No valid ICAL_FEED_URL set; availability will always be empty");
            }
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the availability service for the configured feed
pub fn build_service(config: &Config) -> AppResult<Arc<AvailabilityService>> {
    let source = HttpFeedSource::from_config(config)?
        .map(|source| Arc::new(source) as Arc<dyn FeedSource>);

    if let Some(source) = &source {
        info!("Using {}", source.describe());
    }

    Ok(Arc::new(AvailabilityService::with_system_clock(source)))
}

/// Build the router with its layers
#[cfg(feature = "web-interface")]
pub fn build_router(service: Arc<AvailabilityService>, config: &Config) -> AppResult<Router> {
    let cors = match &config.cors_allowed_origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .map_err(|e| config_error(&format!("Invalid CORS origin: {}", e)))?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET])
        }
        None => CorsLayer::permissive(),
    };

    let app = Router::new()
        .route(AVAILABILITY_PATH, get(availability_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState::new(service));

    Ok(app)
}

/// Serve the availability endpoint until a shutdown signal arrives
#[cfg(feature = "web-interface")]
pub async fn start_server(config: Config) -> miette::Result<()> {
    let service = build_service(&config)?;
    let app = build_router(service, &config)?;

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::shutdown::shutdown_signal())
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}
