//! Ranking the catalog for a reader
//!
//! Every pass scores copies of the catalog books; the catalog itself is never touched, so
//! passes can be repeated over the same snapshot as often as needed.

use crate::book::Book;
use crate::profile::{Trait, TraitValue, UserProfile};
use crate::scoring::MatchScorer;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Half-width of the openness perturbation applied by [`RecommendationEngine::regenerate`]
pub const OPENNESS_JITTER: f64 = 10.0;

/// Openness assumed before perturbing a profile that has none
const DEFAULT_OPENNESS: f64 = 50.0;

/// Which subset of a ranked list to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultFilter {
    #[default]
    All,
    PublicDomain,
    /// Works still under copyright
    Modern,
}

impl ResultFilter {
    pub fn accepts(self, book: &Book) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::PublicDomain => book.is_public_domain,
            ResultFilter::Modern => !book.is_public_domain,
        }
    }

    /// Keep the accepted books, preserving rank order
    pub fn apply(self, ranked: Vec<Book>) -> Vec<Book> {
        ranked.into_iter().filter(|b| self.accepts(b)).collect()
    }
}

/// Aligned and contrasting rankings for one reader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub aligned: Vec<Book>,
    pub contrasting: Vec<Book>,
}

impl Recommendations {
    pub fn filtered(self, filter: ResultFilter) -> Self {
        Self {
            aligned: filter.apply(self.aligned),
            contrasting: filter.apply(self.contrasting),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score every book against `profile` and return the best `limit`, highest first
    pub fn recommend(&self, catalog: &[Book], profile: &UserProfile, limit: usize) -> Vec<Book> {
        let contexts = profile.effective_contexts();
        let scorer = MatchScorer::new(
            profile.effective_traits(),
            &contexts,
            profile.wants_contrast,
            profile.seeking_type(),
        );

        let mut ranked: Vec<Book> = catalog
            .iter()
            .map(|book| book.scored(scorer.score(book)))
            .collect();

        // stable: equal scores keep catalog order
        ranked.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
        ranked.truncate(limit);

        debug!(
            catalog = catalog.len(),
            returned = ranked.len(),
            top = ranked.first().map(|b| b.id.as_str()).unwrap_or("-"),
            "Ranked catalog"
        );
        ranked
    }

    /// Rank against the inverted profile to surface challenging works
    pub fn recommend_contrasting(
        &self,
        catalog: &[Book],
        profile: &UserProfile,
        limit: usize,
    ) -> Vec<Book> {
        self.recommend(catalog, &profile.inverted_for_contrast(), limit)
    }

    pub fn recommend_both(
        &self,
        catalog: &[Book],
        profile: &UserProfile,
        limit: usize,
    ) -> Recommendations {
        Recommendations {
            aligned: self.recommend(catalog, profile, limit),
            contrasting: self.recommend_contrasting(catalog, profile, limit),
        }
    }

    /// Rerun both passes with the reader's openness nudged at random
    ///
    /// Returns the perturbed profile along with the new rankings.
    pub fn regenerate<R: Rng + ?Sized>(
        &self,
        catalog: &[Book],
        profile: &UserProfile,
        limit: usize,
        rng: &mut R,
    ) -> (UserProfile, Recommendations) {
        let perturbed = perturb_openness(profile, rng);
        let recommendations = self.recommend_both(catalog, &perturbed, limit);
        (perturbed, recommendations)
    }
}

/// Copy of `profile` with openness of the effective traits shifted by a uniform offset in
/// `[-10, 10)`, clamped into range and rounded
pub fn perturb_openness<R: Rng + ?Sized>(profile: &UserProfile, rng: &mut R) -> UserProfile {
    let mut perturbed = profile.clone();
    let traits = match perturbed
        .enhanced_profile
        .as_mut()
        .and_then(|e| e.personality_traits.as_mut())
    {
        Some(enhanced) => enhanced,
        None => &mut perturbed.personality_traits,
    };

    let base = traits
        .get(Trait::Openness)
        .map(|v| f64::from(v.get()))
        .unwrap_or(DEFAULT_OPENNESS);
    let offset = rng.gen_range(-OPENNESS_JITTER..OPENNESS_JITTER);
    let shifted = (base + offset).clamp(0.0, f64::from(TraitValue::MAX)).round();
    traits.traits.set(Trait::Openness, TraitValue::new(shifted as i64));

    debug!(base, offset, openness = shifted, "Perturbed openness");
    perturbed
}

/// Most frequent movement among the top three books; ties go to the first seen
pub fn dominant_movement(ranked: &[Book]) -> Option<&str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for book in ranked.iter().take(3) {
        match counts.iter_mut().find(|(m, _)| *m == book.movement) {
            Some((_, n)) => *n += 1,
            None => counts.push((book.movement.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (movement, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((movement, n));
        }
    }
    best.map(|(m, _)| m)
}
