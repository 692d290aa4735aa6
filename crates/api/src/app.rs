use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use domain::services::FirmwareGenerator;
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    ingest_rate_limit, metrics_handler, metrics_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    auth, companies, devices, firmware, hardware, health, ingest, legacy, users, widgets,
};
use crate::services::GeminiFirmwareGenerator;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    /// `None` when firmware generation is disabled.
    pub firmware: Option<Arc<dyn FirmwareGenerator>>,
}

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("JWT configuration error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Firmware generator client error: {0}")]
    FirmwareClient(#[from] reqwest::Error),
}

impl AppState {
    /// Builds state with the generator selected by `firmware.enabled`.
    pub fn from_config(config: Config, pool: PgPool) -> Result<Self, AppInitError> {
        let generator: Option<Arc<dyn FirmwareGenerator>> = if config.firmware.enabled {
            Some(Arc::new(GeminiFirmwareGenerator::new(&config.firmware)?))
        } else {
            None
        };
        Self::new(config, pool, generator)
    }

    pub fn new(
        config: Config,
        pool: PgPool,
        firmware: Option<Arc<dyn FirmwareGenerator>>,
    ) -> Result<Self, AppInitError> {
        let jwt = JwtConfig::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        Ok(Self {
            pool,
            rate_limiter: RateLimiterState::new(config.security.ingest_rate_limit_per_minute)
                .map(Arc::new),
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            firmware,
        })
    }
}

/// Builds the router with the generator selected by `firmware.enabled`.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, AppInitError> {
    Ok(create_router(AppState::from_config(config, pool)?))
}

/// Builds the router around an explicit firmware generator.
pub fn create_app_with_generator(
    config: Config,
    pool: PgPool,
    firmware: Option<Arc<dyn FirmwareGenerator>>,
) -> Result<Router, AppInitError> {
    Ok(create_router(AppState::new(config, pool, firmware)?))
}

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Device-facing write path, rate limited per client IP
    let ingest_routes = Router::new()
        .route("/api/iot_backend.php", post(ingest::ingest))
        .route("/api/v1/ingest", post(ingest::ingest))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            ingest_rate_limit,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
        .route("/api.php", get(legacy::legacy_api))
        .route("/api/v1/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route(
            "/api/v1/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/api/v1/companies/:id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route("/api/v1/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/v1/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/v1/devices",
            get(devices::list_devices).post(devices::create_device),
        )
        .route(
            "/api/v1/devices/:id",
            get(devices::get_device)
                .put(devices::update_device)
                .delete(devices::delete_device),
        )
        .route(
            "/api/v1/devices/:id/thresholds",
            put(devices::update_thresholds),
        )
        .route(
            "/api/v1/devices/:id/measurements",
            get(devices::list_measurements),
        )
        .route(
            "/api/v1/widgets",
            get(widgets::list_widgets).post(widgets::create_widget),
        )
        .route(
            "/api/v1/widgets/:id",
            delete(widgets::delete_widget),
        )
        .route("/api/v1/hardware/profiles", get(hardware::list_profiles))
        .route("/api/v1/firmware/generate", post(firmware::generate_firmware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    Router::new()
        .merge(ingest_routes)
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
