//! Context extraction from free text
//!
//! Scans introspection text for a fixed vocabulary of topics. Matching is plain
//! case-insensitive substring containment: no tokenization, no stemming.

use std::collections::BTreeSet;

/// Single-word topics
pub const TOPIC_WORDS: [&str; 38] = [
    "meaning", "purpose", "anxiety", "depression", "fear", "death",
    "religion", "god", "spirituality", "ethics", "morality", "virtue",
    "happiness", "suffering", "freedom", "choice", "responsibility",
    "identity", "existence", "nihilism", "absurdity", "love",
    "relationships", "society", "politics", "justice", "knowledge",
    "truth", "reality", "beauty", "art", "science", "nature",
    "technology", "work", "success", "failure", "mindfulness",
];

/// Multi-word concerns
pub const CONCERN_PHRASES: [&str; 11] = [
    "meaning of life", "fear of death", "moral dilemma",
    "ethical choice", "social anxiety", "religious doubt",
    "career decision", "personal identity", "relationship problem",
    "political views", "mental health",
];

/// Every vocabulary entry, words first
pub fn vocabulary() -> impl Iterator<Item = &'static str> {
    TOPIC_WORDS.iter().chain(CONCERN_PHRASES.iter()).copied()
}

/// Extract the vocabulary entries contained in `text`
///
/// Returns the vocabulary spelling of each match. Empty or whitespace-only text yields an
/// empty set.
pub fn extract_contexts(text: &str) -> BTreeSet<String> {
    if text.trim().is_empty() {
        return BTreeSet::new();
    }

    let haystack = text.to_lowercase();
    vocabulary()
        .filter(|entry| haystack.contains(&entry.to_lowercase()))
        .map(str::to_string)
        .collect()
}
