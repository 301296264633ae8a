//! Tablebook API Server
//!
//! Table reservations and venue ratings for restaurants.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresReservationRepository, PostgresReviewRepository, PostgresTableRepository,
    PostgresVenueRepository,
};
use app::{RatingService, ReservationService, TableService, VenueService};
use config::Config;
use domain::ports::{ReservationRepository, ReviewRepository, TableRepository, VenueRepository};

/// Repository handles the services are built from
#[derive(Clone)]
pub struct Repositories {
    pub venues: Arc<dyn VenueRepository>,
    pub tables: Arc<dyn TableRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

impl Repositories {
    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            venues: Arc::new(PostgresVenueRepository::new(db.clone())),
            tables: Arc::new(PostgresTableRepository::new(db.clone())),
            reservations: Arc::new(PostgresReservationRepository::new(db.clone())),
            reviews: Arc::new(PostgresReviewRepository::new(db)),
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub venue_service: Arc<VenueService<dyn VenueRepository>>,
    pub table_service: Arc<TableService<dyn VenueRepository, dyn TableRepository>>,
    pub reservation_service: Arc<
        ReservationService<dyn VenueRepository, dyn TableRepository, dyn ReservationRepository>,
    >,
    pub rating_service: Arc<RatingService<dyn VenueRepository, dyn ReviewRepository>>,
}

impl AppState {
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            venue_service: Arc::new(VenueService::new(repos.venues.clone())),
            table_service: Arc::new(TableService::new(
                repos.venues.clone(),
                repos.tables.clone(),
            )),
            reservation_service: Arc::new(
                ReservationService::new(
                    repos.venues.clone(),
                    repos.tables.clone(),
                    repos.reservations.clone(),
                )
                .with_max_availability_days(config.max_availability_days),
            ),
            rating_service: Arc::new(RatingService::new(repos.venues, repos.reviews)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router.
///
/// `rate_limit` wraps the booking and review routes; the binary installs the
/// per-IP governor there, tests pass the router through unchanged.
pub fn build_router<F>(state: AppState, rate_limit: F) -> Router
where
    F: FnOnce(Router<AppState>) -> Router<AppState>,
{
    // Rate-limited routes (bookings, reviews)
    let rate_limited_routes = rate_limit(
        Router::new()
            .route(
                "/venues/:venue_id/tables/:table_number/reservations",
                post(handlers::reserve),
            )
            .route("/reservations/:reservation_id", delete(handlers::cancel))
            .route(
                "/venues/:venue_id/reviews",
                post(handlers::submit_review).get(handlers::list_reviews),
            )
            .route("/reviews/:review_id", delete(handlers::delete_review)),
    );

    // Everything except health requires an identity
    let protected_routes = Router::new()
        .route("/venues", post(handlers::register_venue))
        .route("/venues/:venue_id", get(handlers::get_venue))
        .route("/venues/:venue_id/layouts", get(handlers::list_layouts))
        .route(
            "/venues/:venue_id/layouts/:layout/tables",
            get(handlers::list_tables),
        )
        .route(
            "/venues/:venue_id/layouts/:layout/availability",
            get(handlers::check_availability),
        )
        .route("/venues/:venue_id/tables", post(handlers::declare_table))
        .route(
            "/venues/:venue_id/tables/:table_number",
            delete(handlers::remove_table),
        )
        .route(
            "/venues/:venue_id/reservations",
            get(handlers::list_venue_reservations),
        )
        .route("/reservations", get(handlers::list_my_reservations))
        .route(
            "/venues/:venue_id/rating/recompute",
            post(handlers::recompute_rating),
        )
        .merge(rate_limited_routes)
        .route_layer(middleware::from_fn(auth::identity_middleware));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .merge(protected_routes)
        // Middleware
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tablebook_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tablebook API...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.apply_schema {
        adapters::apply_schema(&db)
            .await
            .context("Failed to apply schema")?;
    }

    let state = AppState::new(Repositories::postgres(db), &config);

    // Per-IP rate limit for booking and review routes.
    // PeerIpKeyExtractor reads the client IP from the socket connection.
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .context("Invalid rate limit configuration")?,
    );

    let app = build_router(state, |routes| {
        routes.layer(GovernorLayer {
            config: governor_config,
        })
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
