//! philo-rec library - philosophy book recommendation service
//!
//! Exposes the router and state for integration testing

pub mod api;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use philo_common::config::TomlConfig;
use philo_common::{BookCatalog, ProfileBuilder, RecommendationEngine};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::models::CatalogUpdate;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Books available for scoring; written only to merge fetched books
    pub catalog: Arc<RwLock<BookCatalog>>,
    pub config: Arc<TomlConfig>,
    pub builder: Arc<ProfileBuilder>,
    pub engine: RecommendationEngine,
    /// Background catalog updates by id
    pub updates: Arc<RwLock<HashMap<Uuid, CatalogUpdate>>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// State with the seeded catalog
    pub fn new(config: TomlConfig) -> Self {
        Self::with_catalog(config, BookCatalog::seeded())
    }

    pub fn with_catalog(config: TomlConfig, catalog: BookCatalog) -> Self {
        let builder = ProfileBuilder::new(config.recommendations.trait_merge);
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            config: Arc::new(config),
            builder: Arc::new(builder),
            engine: RecommendationEngine::new(),
            updates: Arc::new(RwLock::new(HashMap::new())),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::buildinfo_routes())
        .merge(api::question_routes())
        .merge(api::profile_routes())
        .merge(api::recommendation_routes())
        .merge(api::compatibility_routes())
        .merge(api::catalog_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
