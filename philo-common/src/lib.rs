//! # PhiloPalette Common Library
//!
//! Core of the philosophy book recommender, shared by the service and its tests:
//! - Profile and book models
//! - Quiz question bank and profile building
//! - Context extraction from introspection text
//! - Compatibility scoring and ranking
//! - Book catalog and catalog sources
//! - Configuration loading

pub mod book;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod profile;
pub mod profile_builder;
pub mod quiz;
pub mod recommend;
pub mod scoring;

pub use book::{Book, BookSource};
pub use catalog::{BookCatalog, CatalogSource, CuratedAdditions};
pub use error::{Error, Result};
pub use profile::{
    EnhancedUserProfile, ExperienceLevel, PreferenceType, ProfileVector, SeekingType, Tone,
    Trait, TraitValue, UserProfile,
};
pub use profile_builder::{build_user_profile, ProfileBuilder, QuizAnswer, TraitMergePolicy};
pub use recommend::{RecommendationEngine, Recommendations, ResultFilter};
pub use scoring::{score_book, MatchQuality, MatchScorer};
