//! # Courtside API
//!
//! The API crate provides the web server for the Courtside booking service.
//! It exposes JSON endpoints for accounts, rooms, courts and the admin
//! dashboard.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Load data, apply the domain rules from `courtside-core`, persist
//! - **Middleware**: Bearer-session authentication and error mapping
//! - **Config**: Environment-driven settings
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Authentication extractors and error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use courtside_core::{availability::SlotWindow, errors::BookingError};
use courtside_db::DbPool;
use eyre::Result;
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::middleware::error_handling::map_error;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: DbPool,

    /// Lifetime of newly issued sessions
    pub session_ttl_hours: i64,

    /// Default opening hours for court availability queries
    pub slot_window: SlotWindow,
}

impl ApiState {
    pub fn new(db_pool: DbPool, config: &config::ApiConfig) -> Self {
        Self {
            db_pool,
            session_ttl_hours: config.session_ttl_hours,
            slot_window: config.slot_window,
        }
    }
}

async fn handle_timeout(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("Request timed out");
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
            .into_response()
    } else {
        map_error(BookingError::Internal(err))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Builds the complete application: every route plus tracing, timeout and
/// (when origins are configured) CORS layers.
pub fn build_app(state: Arc<ApiState>, config: &config::ApiConfig) -> Router {
    let app = Router::new()
        .merge(routes::health::routes())
        .merge(routes::auth::routes())
        .merge(routes::room::routes())
        .merge(routes::court::routes())
        .merge(routes::admin::routes())
        .with_state(state);

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(Duration::from_secs(config.request_timeout)),
    )
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = courtside_api::config::ApiConfig::from_env()?;
/// let db_pool = courtside_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// courtside_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(db_pool, &config));
    let app = build_app(state, &config);

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
