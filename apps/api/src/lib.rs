//! # Digicheese API
//!
//! JSON HTTP server for the cheese shop's loyalty and order backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Digicheese API                                  │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Router (axum) + TraceLayer                                       │  │
//! │  │                                                                   │  │
//! │  │  GET /            GET /health        /api/v1/...                  │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │ State<AppState>                       │
//! │  ┌──────────────────────────────▼───────────────────────────────────┐  │
//! │  │  routes/     bind path/query/body, check limit and ids (422)      │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │  ┌──────────────────────────────▼───────────────────────────────────┐  │
//! │  │  services/   normalize, hash passwords, NotFound, log             │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │  ┌──────────────────────────────▼───────────────────────────────────┐  │
//! │  │  digicheese-db   Repository<R> over SQLite                        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`] for the environment variables.

pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use digicheese_db::{Database, DbResult};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use services::{ServiceError, Services};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub services: Services,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            services: Services::new(db),
            config: Arc::new(config),
        }
    }

    /// Opens (and migrates) the configured database.
    pub async fn connect(config: ApiConfig) -> DbResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(AppState::new(db, config))
    }

    pub fn db(&self) -> &Database {
        self.services.database()
    }
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Greeting {
    response: &'static str,
}

/// GET /
async fn root() -> Json<Greeting> {
    Json(Greeting {
        response: "Hello World!",
    })
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    database: &'static str,
}

/// GET /health
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    if state.db().health_check().await {
        (
            StatusCode::OK,
            Json(Health {
                status: "healthy",
                database: "connected",
            }),
        )
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Health {
                status: "unhealthy",
                database: "disconnected",
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::get as get_json;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn memory_state() -> AppState {
        let config = ApiConfig {
            database_path: ":memory:".to_string(),
            ..ApiConfig::default()
        };
        AppState::connect(config).await.unwrap()
    }

    #[tokio::test]
    async fn test_root() {
        let app = build_router(memory_state().await);
        let (status, body) = get_json(&app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "Hello World!"}));
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(memory_state().await);
        let (status, body) = get_json(&app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "database": "connected"}));
    }

    #[tokio::test]
    async fn test_health_reports_closed_database() {
        let state = memory_state().await;
        state.db().close().await;

        let response = build_router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["database"], "disconnected");
    }
}
