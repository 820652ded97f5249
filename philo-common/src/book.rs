//! Book records

use crate::profile::ProfileVector;
use serde::{Deserialize, Serialize};

/// Where a catalog entry came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSource {
    #[default]
    Manual,
    Gutenberg,
    Other,
}

/// A philosophy book and the stance profile of the work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: String,
    pub era: String,
    pub movement: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_summary: Option<String>,
    pub profile: ProfileVector,
    /// Historical or thematic contexts the work responds to
    #[serde(default)]
    pub context_responded_to: Vec<String>,
    #[serde(default)]
    pub is_public_domain: bool,
    #[serde(default)]
    pub source: BookSource,
    /// Link to the full text when the work is public domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_domain_link: Option<String>,
    /// Set only on scored copies returned by the recommender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<u8>,
}

impl Book {
    /// Shallow copy carrying a freshly computed match percentage
    pub fn scored(&self, match_percentage: u8) -> Self {
        Self {
            match_percentage: Some(match_percentage),
            ..self.clone()
        }
    }
}
