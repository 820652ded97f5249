//! Catalog listing and background catalog updates

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use philo_common::{Book, CatalogSource, CuratedAdditions};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{prune_finished, CatalogUpdate, UpdateSource, MAX_FINISHED_UPDATES};
use crate::services::GutenbergImporter;
use crate::AppState;

/// GET /api/catalog response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub count: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub books: Vec<Book>,
}

/// POST /api/catalog/update request
#[derive(Debug, Deserialize)]
pub struct StartUpdateRequest {
    pub source: UpdateSource,
}

/// GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let catalog = state.catalog.read().await;
    Json(CatalogResponse {
        count: catalog.len(),
        last_updated: catalog.last_updated(),
        books: catalog.snapshot(),
    })
}

/// POST /api/catalog/update
///
/// Start a background update. Returns 202 Accepted with the update record, or 409 while
/// another update is still running.
pub async fn start_update(
    State(state): State<AppState>,
    Json(request): Json<StartUpdateRequest>,
) -> ApiResult<(StatusCode, Json<CatalogUpdate>)> {
    let source: Box<dyn CatalogSource> = match request.source {
        UpdateSource::Curated => Box::new(CuratedAdditions),
        UpdateSource::Gutenberg => Box::new(
            GutenbergImporter::from_config(&state.config.gutenberg)
                .map_err(|e| ApiError::Internal(e.to_string()))?,
        ),
    };

    let update = CatalogUpdate::start(request.source);
    let update_id = update.update_id;
    {
        let mut updates = state.updates.write().await;
        if let Some(running) = updates.values().find(|u| u.is_running()) {
            return Err(ApiError::Conflict(format!(
                "Catalog update {} is already running",
                running.update_id
            )));
        }
        prune_finished(&mut updates, MAX_FINISHED_UPDATES);
        updates.insert(update_id, update.clone());
    }

    tracing::info!(update_id = %update_id, source = source.name(), "Catalog update started");

    let state_clone = state.clone();
    tokio::spawn(async move {
        run_catalog_update(state_clone, update_id, source).await;
    });

    Ok((StatusCode::ACCEPTED, Json(update)))
}

/// Fetch from `source`, then merge under a short write lock
///
/// The catalog is untouched when the fetch fails; the failure lands in the update record
/// and the service's last error.
pub async fn run_catalog_update(state: AppState, update_id: Uuid, source: Box<dyn CatalogSource>) {
    let result = source.fetch().await;

    let outcome = match result {
        Ok(books) => {
            let fetched = books.len();
            let mut catalog = state.catalog.write().await;
            let added = catalog.merge(books);
            tracing::info!(
                update_id = %update_id,
                source = source.name(),
                fetched,
                added,
                total = catalog.len(),
                "Catalog update completed"
            );
            Ok(added)
        }
        Err(e) => {
            tracing::error!(
                update_id = %update_id,
                source = source.name(),
                error = %e,
                "Catalog update failed"
            );
            state.record_error(format!("Catalog update {} failed: {}", update_id, e)).await;
            Err(e.to_string())
        }
    };

    if let Some(update) = state.updates.write().await.get_mut(&update_id) {
        match outcome {
            Ok(added) => update.complete(added),
            Err(message) => update.fail(message),
        }
    }
}

/// GET /api/catalog/update/:id
pub async fn get_update(
    State(state): State<AppState>,
    Path(update_id): Path<Uuid>,
) -> ApiResult<Json<CatalogUpdate>> {
    state
        .updates
        .read()
        .await
        .get(&update_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Catalog update not found: {}", update_id)))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/catalog", get(get_catalog))
        .route("/api/catalog/update", post(start_update))
        .route("/api/catalog/update/:id", get(get_update))
}
