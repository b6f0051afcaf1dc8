use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;

pub mod auth;
pub mod desks;
mod error;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    store: Store,
}

impl AppState {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }
}

pub async fn create_app_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::new(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState { store }))
}

pub fn router(state: Arc<AppState>, config: &Config) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_ttl_minutes,
        )));

    let protected_routes = Router::new()
        .route("/logout", get(auth::logout))
        .route("/add_occupant", post(desks::add_occupant))
        .route("/remove_occupant", post(desks::remove_occupant))
        .route("/set_details", post(desks::set_details))
        .route("/add_desk", post(desks::add_desk))
        .route_layer(middleware::from_fn(auth::require_session));

    let cors_origins = &config.server.cors_allowed_origins;
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(protected_routes)
        .route("/", get(auth::index))
        .route("/login", get(auth::index).post(auth::login))
        .route("/list_desks", get(desks::list_desks))
        .route("/find_vacant_desks", get(desks::find_vacant_desks))
        .route("/health", get(health))
        .layer(session_layer)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
/// Liveness probe including database connectivity.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = state.store().ping().await.is_ok();
    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
