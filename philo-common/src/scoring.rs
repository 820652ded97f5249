//! Book/reader compatibility scoring
//!
//! A score is the rounded mean of a handful of factors, each worth up to 100 points
//! (150 for the seeking-type bonus):
//!
//! | Factor | Points | Counted when |
//! |---|---|---|
//! | context overlap | 100 | any reader context is a substring of any book context |
//! | each shared trait | `100 - abs(u - b)` | trait known on both sides |
//! | seeking type | 150 | book practicality fits what the reader seeks |
//! | tone | 100 / 50 / 0 | tone known on both sides |
//!
//! The context overlap is a single factor no matter how many contexts overlap, so a book
//! that answers the reader's concerns can rank high even when its traits are far off.
//! Rankings depend on that weighting; it is not normalized against the trait factors.

use crate::book::Book;
use crate::profile::{ProfileVector, SeekingType, Tone, Trait, TraitValue};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

pub const CONTEXT_BONUS: u32 = 100;
pub const SEEKING_BONUS: u32 = 150;
pub const TONE_MATCH_POINTS: u32 = 100;
pub const TONE_NEUTRAL_POINTS: u32 = 50;

/// Highest score a book can receive
pub const MAX_SCORE: u8 = 100;

/// Running sum of points and evaluated factors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    points: u32,
    factors: u32,
}

impl Tally {
    fn add(&mut self, points: u32) {
        self.points += points;
        self.factors += 1;
    }

    /// Mean rounded half up, capped at [`MAX_SCORE`]; 0 when nothing was evaluated
    fn finish(self) -> u8 {
        if self.factors == 0 {
            return 0;
        }
        let mean = (2 * self.points + self.factors) / (2 * self.factors);
        mean.min(MAX_SCORE as u32) as u8
    }
}

/// Scores books against one reader profile
///
/// Holds the per-request inputs so a whole catalog can be scored without re-deriving them.
#[derive(Debug, Clone, Copy)]
pub struct MatchScorer<'a> {
    profile: &'a ProfileVector,
    context: &'a BTreeSet<String>,
    wants_contrast: bool,
    seeking_type: Option<SeekingType>,
}

impl<'a> MatchScorer<'a> {
    pub fn new(
        profile: &'a ProfileVector,
        context: &'a BTreeSet<String>,
        wants_contrast: bool,
        seeking_type: Option<SeekingType>,
    ) -> Self {
        Self {
            profile,
            context,
            wants_contrast,
            seeking_type,
        }
    }

    /// Compatibility of `book` with the reader, 0..=100
    pub fn score(&self, book: &Book) -> u8 {
        let mut tally = Tally::default();

        if context_matches(self.context, &book.context_responded_to) {
            tally.add(CONTEXT_BONUS);
        }

        for (t, user_value) in self.profile.traits.present() {
            if let Some(book_value) = book.profile.get(t) {
                tally.add(trait_points(t, user_value, book_value, self.wants_contrast));
            }
        }

        if let Some(seeking) = self.seeking_type {
            if seeking_bonus_applies(seeking, book.profile.get(Trait::Practicality)) {
                tally.add(SEEKING_BONUS);
            }
        }

        if let (Some(user_tone), Some(book_tone)) = (self.profile.tone, book.profile.tone) {
            tally.add(tone_points(user_tone, book_tone));
        }

        let score = tally.finish();
        debug!(
            book_id = %book.id,
            points = tally.points,
            factors = tally.factors,
            score,
            "Scored book"
        );
        score
    }
}

/// Score a single book; see [`MatchScorer`]
pub fn score_book(
    book: &Book,
    profile: &ProfileVector,
    context: &BTreeSet<String>,
    wants_contrast: bool,
    seeking_type: Option<SeekingType>,
) -> u8 {
    MatchScorer::new(profile, context, wants_contrast, seeking_type).score(book)
}

/// True when some reader context appears, case-insensitively, inside some book context
pub fn context_matches(user_contexts: &BTreeSet<String>, book_contexts: &[String]) -> bool {
    if user_contexts.is_empty() || book_contexts.is_empty() {
        return false;
    }

    let book_lower: Vec<String> = book_contexts.iter().map(|c| c.to_lowercase()).collect();
    user_contexts.iter().any(|ctx| {
        let needle = ctx.to_lowercase();
        book_lower.iter().any(|b| b.contains(&needle))
    })
}

/// Points for one trait present on both sides
///
/// With `wants_contrast`, the contrast-scored traits reward a book whose value is the
/// complement of the reader's (`u + b == 100` scores 100).
pub fn trait_points(t: Trait, user: TraitValue, book: TraitValue, wants_contrast: bool) -> u32 {
    let u = user.get() as i32;
    let b = book.get() as i32;
    let distance = if wants_contrast && t.is_contrast_scored() {
        (100 - u - b).abs()
    } else {
        (u - b).abs()
    };
    (100 - distance) as u32
}

pub fn seeking_bonus_applies(seeking: SeekingType, practicality: Option<TraitValue>) -> bool {
    let Some(p) = practicality.map(TraitValue::get) else {
        return false;
    };
    match seeking {
        SeekingType::Practical => p > 70,
        SeekingType::Theoretical => p < 40,
        SeekingType::Both => (40..=70).contains(&p),
    }
}

pub fn tone_points(user: Tone, book: Tone) -> u32 {
    if user == book {
        TONE_MATCH_POINTS
    } else if user == Tone::Neutral || book == Tone::Neutral {
        TONE_NEUTRAL_POINTS
    } else {
        0
    }
}

/// Side-by-side view of one trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitComparison {
    #[serde(rename = "trait")]
    pub target: Trait,
    pub user_value: u8,
    pub book_value: u8,
    pub difference: u8,
    pub similarity: u8,
}

/// Compare every trait known on both sides
pub fn compare_traits(user: &ProfileVector, book: &ProfileVector) -> Vec<TraitComparison> {
    user.traits
        .present()
        .filter_map(|(t, u)| {
            let b = book.get(t)?;
            let difference = u.get().abs_diff(b.get());
            Some(TraitComparison {
                target: t,
                user_value: u.get(),
                book_value: b.get(),
                difference,
                similarity: 100 - difference,
            })
        })
        .collect()
}

/// Coarse label for a match percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl MatchQuality {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80..=u8::MAX => MatchQuality::Excellent,
            60..=79 => MatchQuality::Good,
            40..=59 => MatchQuality::Moderate,
            _ => MatchQuality::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchQuality::Excellent => "Excellent Match",
            MatchQuality::Good => "Good Match",
            MatchQuality::Moderate => "Moderate Match",
            MatchQuality::Poor => "Poor Match",
        }
    }
}
