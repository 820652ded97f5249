//! Gutenberg subject mapper
//!
//! Derives catalog metadata from the sparse bibliographic data Gutendex returns. Era comes
//! from the first author's birth year, movement from the first subject pattern that hits,
//! and the stance profile from a small per-movement heuristic table. These are coarse
//! guesses; curated entries always carry hand-set profiles.

use philo_common::{Book, BookSource, ProfileVector, Tone, Trait};

use super::gutenberg_client::GutendexBook;

/// Subject patterns in priority order; the first pattern found in any subject wins
const MOVEMENT_PATTERNS: [(&str, &str); 12] = [
    ("stoic", "Stoicism"),
    ("existential", "Existentialism"),
    ("ideal", "Idealism"),
    ("pragmat", "Pragmatism"),
    ("rational", "Rationalism"),
    ("empiri", "Empiricism"),
    ("phenomen", "Phenomenology"),
    ("ethic", "Ethics"),
    ("politic", "Political Philosophy"),
    ("metaphys", "Metaphysics"),
    ("epistem", "Epistemology"),
    ("logic", "Logic"),
];

const UNKNOWN: &str = "Unknown";

/// Preferred full-text formats, best first
const TEXT_FORMATS: [&str; 3] = ["text/plain", "text/plain; charset=utf-8", "text/html"];

/// Era for an author's birth year; year 0 is treated as missing
pub fn era_for_birth_year(birth_year: Option<i32>) -> &'static str {
    match birth_year {
        None | Some(0) => UNKNOWN,
        Some(y) if y < 500 => "Ancient",
        Some(y) if y < 1500 => "Medieval",
        Some(y) if y < 1800 => "Early Modern",
        Some(y) if y < 1900 => "Modern",
        Some(_) => "Contemporary",
    }
}

/// Movement for a list of subjects, matched case-insensitively
pub fn movement_for_subjects(subjects: &[String]) -> &'static str {
    let lowered: Vec<String> = subjects.iter().map(|s| s.to_lowercase()).collect();
    MOVEMENT_PATTERNS
        .iter()
        .find(|(pattern, _)| lowered.iter().any(|s| s.contains(pattern)))
        .map(|(_, movement)| *movement)
        .unwrap_or(UNKNOWN)
}

/// Heuristic stance profile for a movement
pub fn profile_for_movement(movement: &str) -> ProfileVector {
    let stoic = movement == "Stoicism";
    let existential = movement == "Existentialism";

    let openness = if existential {
        85
    } else if stoic {
        60
    } else {
        70
    };
    let practicality = if stoic {
        85
    } else if movement == "Ethics" {
        75
    } else {
        50
    };
    let tone = if existential { Tone::Pessimistic } else { Tone::Neutral };

    ProfileVector::from_scores(&[
        (Trait::Openness, openness),
        (Trait::Conscientiousness, if stoic { 85 } else { 65 }),
        (Trait::Extraversion, 50),
        (Trait::Agreeableness, if stoic { 70 } else { 60 }),
        (Trait::Neuroticism, if stoic { 20 } else { 50 }),
        (Trait::Practicality, practicality),
        (Trait::DogmaSkeptic, if stoic { 60 } else { 70 }),
        (Trait::AcceptanceAction, if stoic { 70 } else { 50 }),
    ])
    .with_tone(tone)
}

fn text_link(book: &GutendexBook) -> Option<String> {
    TEXT_FORMATS
        .iter()
        .find_map(|mime| book.formats.get(*mime))
        .filter(|url| !url.is_empty())
        .cloned()
}

/// Map a Gutendex record to a catalog book
pub fn map_gutenberg_book(raw: &GutendexBook) -> Book {
    let first_author = raw.authors.first();
    let author = first_author
        .map(|a| a.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());
    // a zero year counts as unknown, same as null
    let birth_year = first_author.and_then(|a| a.birth_year).filter(|&y| y != 0);
    let death_year = first_author.and_then(|a| a.death_year).filter(|&y| y != 0);

    let movement = movement_for_subjects(&raw.subjects);
    let year = match birth_year {
        Some(born) => format!(
            "{}-{}",
            born,
            death_year.map_or_else(|| "?".to_string(), |d| d.to_string())
        ),
        None => UNKNOWN.to_string(),
    };

    let mut profile = profile_for_movement(movement);
    profile.keywords = raw.subjects.iter().take(5).map(|s| s.to_lowercase()).collect();
    profile.themes = raw.bookshelves.iter().take(5).cloned().collect();

    Book {
        id: format!("gutenberg-{}", raw.id),
        title: raw.title.clone(),
        description: format!(
            "A work of {} philosophy by {}. Part of the Project Gutenberg collection.",
            movement, author
        ),
        short_summary: Some(format!(
            "{}'s exploration of {} philosophy.",
            author,
            movement.to_lowercase()
        )),
        author,
        year,
        era: era_for_birth_year(birth_year).to_string(),
        movement: movement.to_string(),
        profile,
        context_responded_to: raw.subjects.iter().take(3).cloned().collect(),
        is_public_domain: true,
        source: BookSource::Gutenberg,
        public_domain_link: text_link(raw),
        match_percentage: None,
    }
}
