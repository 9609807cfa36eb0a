//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for statements of account
//! - JSON error responses

pub mod error;
pub mod routes;

use axum::Router;
use ledgerview_db::StatementRepository;
use ledgerview_shared::config::StatementConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Statement settings.
    pub statement: Arc<StatementConfig>,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub fn new(db: DatabaseConnection, statement: StatementConfig) -> Self {
        Self {
            db: Arc::new(db),
            statement: Arc::new(statement),
        }
    }

    /// Statement repository using the configured balance strategy.
    #[must_use]
    pub fn statements(&self) -> StatementRepository {
        StatementRepository::new((*self.db).clone(), self.statement.balance_strategy)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
