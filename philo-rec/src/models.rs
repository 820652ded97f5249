//! Catalog update job records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Finished update records kept for status queries
pub const MAX_FINISHED_UPDATES: usize = 16;

/// Where a catalog update pulls books from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSource {
    /// Hand-curated additions shipped with the service
    Curated,
    /// Project Gutenberg via Gutendex
    Gutenberg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateState {
    Running,
    Completed,
    Failed,
}

/// One background catalog update
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogUpdate {
    pub update_id: Uuid,
    pub source: UpdateSource,
    pub state: UpdateState,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_added: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CatalogUpdate {
    pub fn start(source: UpdateSource) -> Self {
        Self {
            update_id: Uuid::new_v4(),
            source,
            state: UpdateState::Running,
            started_at: Utc::now(),
            finished_at: None,
            books_added: None,
            error: None,
        }
    }

    pub fn complete(&mut self, books_added: usize) {
        self.state = UpdateState::Completed;
        self.books_added = Some(books_added);
        self.finished_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = UpdateState::Failed;
        self.error = Some(error.into());
        self.finished_at = Some(Utc::now());
    }

    pub fn is_running(&self) -> bool {
        self.state == UpdateState::Running
    }
}

/// Drop the oldest finished records until at most `keep` remain; running ones always stay
pub fn prune_finished(updates: &mut HashMap<Uuid, CatalogUpdate>, keep: usize) {
    let mut finished: Vec<(DateTime<Utc>, Uuid)> = updates
        .values()
        .filter(|u| !u.is_running())
        .map(|u| (u.finished_at.unwrap_or(u.started_at), u.update_id))
        .collect();
    if finished.len() <= keep {
        return;
    }

    finished.sort();
    let excess = finished.len() - keep;
    for (_, id) in finished.into_iter().take(excess) {
        updates.remove(&id);
    }
}
