//! Book catalog
//!
//! The catalog is an ordinary value owned by whoever serves recommendations. Scoring reads a
//! snapshot; updates fetch from a [`CatalogSource`] first and only then merge, so a failed
//! fetch never touches the books already loaded.

use crate::book::{Book, BookSource};
use crate::profile::{ProfileVector, Tone, Trait};
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// Something that can supply additional catalog entries
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short name for logs and job status
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<Book>>;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCatalog {
    books: Vec<Book>,
    last_updated: Option<DateTime<Utc>>,
}

impl BookCatalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books,
            last_updated: None,
        }
    }

    /// Catalog holding the curated seed works
    pub fn seeded() -> Self {
        Self::new(seed_books())
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Owned copy for one scoring pass
    pub fn snapshot(&self) -> Vec<Book> {
        self.books.clone()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Append books whose id is not yet in the catalog; returns how many were added
    pub fn merge(&mut self, incoming: Vec<Book>) -> usize {
        let mut known: HashSet<String> = self.books.iter().map(|b| b.id.clone()).collect();
        let before = self.books.len();

        for book in incoming {
            if known.insert(book.id.clone()) {
                self.books.push(book);
            }
        }

        let added = self.books.len() - before;
        if added > 0 {
            self.last_updated = Some(Utc::now());
        }
        added
    }

    /// Fetch from `source` and merge the result
    ///
    /// On error the catalog is left exactly as it was.
    pub async fn update_from(&mut self, source: &dyn CatalogSource) -> Result<usize> {
        let incoming = source.fetch().await?;
        let fetched = incoming.len();
        let added = self.merge(incoming);
        info!(
            source = source.name(),
            fetched,
            added,
            total = self.books.len(),
            "Catalog updated"
        );
        Ok(added)
    }
}

/// Hand-curated additions released after the seed set
#[derive(Debug, Clone, Copy, Default)]
pub struct CuratedAdditions;

#[async_trait]
impl CatalogSource for CuratedAdditions {
    fn name(&self) -> &'static str {
        "curated"
    }

    async fn fetch(&self) -> Result<Vec<Book>> {
        Ok(vec![spinoza_ethics()])
    }
}

fn stance(
    scores: [u8; 8],
    tone: Tone,
    keywords: &[&str],
    themes: &[&str],
) -> ProfileVector {
    let pairs: Vec<(Trait, u8)> = Trait::ALL.into_iter().zip(scores).collect();
    ProfileVector {
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        themes: themes.iter().map(|s| s.to_string()).collect(),
        ..ProfileVector::from_scores(&pairs).with_tone(tone)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The six curated works every catalog starts with
///
/// Trait order in the score arrays follows [`Trait::ALL`].
pub fn seed_books() -> Vec<Book> {
    vec![
        Book {
            id: "meditations".to_string(),
            title: "Meditations".to_string(),
            author: "Marcus Aurelius".to_string(),
            year: "180 CE".to_string(),
            era: "Ancient Rome".to_string(),
            movement: "Stoicism".to_string(),
            description: "Written as a source for his own guidance and self-improvement, Meditations is a series of personal writings by Marcus Aurelius, Roman Emperor from 161 to 180 CE, recording his private notes to himself and ideas on Stoic philosophy.".to_string(),
            short_summary: Some("A Roman emperor's personal journal on finding tranquility in a chaotic world through stoic principles.".to_string()),
            profile: stance(
                [65, 90, 40, 75, 20, 85, 60, 70],
                Tone::Neutral,
                &["duty", "virtue", "resilience", "acceptance", "discipline"],
                &["adversity", "acceptance", "self-control", "mortality"],
            ),
            context_responded_to: strings(&["personal grief", "burden of leadership", "war", "mortality"]),
            is_public_domain: true,
            source: BookSource::Gutenberg,
            public_domain_link: Some("https://www.gutenberg.org/ebooks/2680".to_string()),
            match_percentage: None,
        },
        Book {
            id: "beyond-good-evil".to_string(),
            title: "Beyond Good and Evil".to_string(),
            author: "Friedrich Nietzsche".to_string(),
            year: "1886".to_string(),
            era: "Modern".to_string(),
            movement: "Existentialism".to_string(),
            description: "Beyond Good and Evil confirmed Nietzsche's position as the towering European philosopher of his age. The work dramatically rejects the tradition of Western thought with its notions of truth and God, good and evil.".to_string(),
            short_summary: Some("A radical critique of traditional morality and a call to move \"beyond good and evil\" to create new values.".to_string()),
            profile: stance(
                [95, 70, 30, 20, 60, 40, 90, 85],
                Tone::Pessimistic,
                &["will", "power", "overcoming", "transvaluation", "nihilism"],
                &["meaning", "struggle", "creativity", "individual"],
            ),
            context_responded_to: strings(&["Christian morality", "European philosophy", "nihilism", "social conformity"]),
            is_public_domain: true,
            source: BookSource::Gutenberg,
            public_domain_link: Some("https://www.gutenberg.org/ebooks/4363".to_string()),
            match_percentage: None,
        },
        Book {
            id: "second-sex".to_string(),
            title: "The Second Sex".to_string(),
            author: "Simone de Beauvoir".to_string(),
            year: "1949".to_string(),
            era: "Contemporary".to_string(),
            movement: "Existentialism".to_string(),
            description: "A powerful analysis of the Western notion of \"woman,\" and a groundbreaking exploration of inequality and otherness. De Beauvoir's revolutionary work examines the oppression of women from a philosophical perspective.".to_string(),
            short_summary: Some("A foundational text of feminism examining how women have been defined as \"other\" in relation to men throughout history.".to_string()),
            profile: stance(
                [85, 75, 55, 60, 45, 65, 75, 70],
                Tone::Neutral,
                &["freedom", "situation", "transcendence", "oppression", "authenticity"],
                &["gender", "freedom", "ethics", "relationships"],
            ),
            context_responded_to: strings(&["patriarchy", "gender inequality", "post-war France", "existential freedom"]),
            is_public_domain: false,
            source: BookSource::Manual,
            public_domain_link: None,
            match_percentage: None,
        },
        Book {
            id: "myth-of-sisyphus".to_string(),
            title: "The Myth of Sisyphus".to_string(),
            author: "Albert Camus".to_string(),
            year: "1942".to_string(),
            era: "Contemporary".to_string(),
            movement: "Absurdism".to_string(),
            description: "One of the most influential works of this century, this is a crucial exposition of existentialist thought. Influenced by works such as Don Juan and the novels of Kafka, these essays begin with a meditation on suicide.".to_string(),
            short_summary: Some("An exploration of the absurdity of life and the question of suicide, concluding we must embrace the absurd and find meaning anyway.".to_string()),
            profile: stance(
                [80, 60, 50, 65, 40, 70, 85, 75],
                Tone::Optimistic,
                &["absurd", "rebellion", "authenticity", "meaning", "suicide"],
                &["meaning", "rebellion", "absurdity", "happiness"],
            ),
            context_responded_to: strings(&["existential crisis", "meaninglessness", "World War II", "suicide"]),
            is_public_domain: false,
            source: BookSource::Manual,
            public_domain_link: None,
            match_percentage: None,
        },
        Book {
            id: "enchiridion".to_string(),
            title: "Enchiridion".to_string(),
            author: "Epictetus".to_string(),
            year: "135 CE".to_string(),
            era: "Ancient Rome".to_string(),
            movement: "Stoicism".to_string(),
            description: "The Enchiridion or Handbook of Epictetus is a short manual of Stoic ethical advice compiled by Arrian, a 2nd-century disciple of the Greek philosopher Epictetus. The work consists of fifty-three short chapters.".to_string(),
            short_summary: Some("A practical handbook for daily living based on Stoic principles, focusing on what we can and cannot control.".to_string()),
            profile: stance(
                [60, 95, 30, 70, 15, 90, 55, 60],
                Tone::Neutral,
                &["control", "acceptance", "perception", "discipline", "freedom"],
                &["freedom", "control", "rationality", "emotions"],
            ),
            context_responded_to: strings(&["slavery", "personal freedom", "social adversity", "emotional control"]),
            is_public_domain: true,
            source: BookSource::Gutenberg,
            public_domain_link: Some("https://www.gutenberg.org/ebooks/45109".to_string()),
            match_percentage: None,
        },
        Book {
            id: "republic".to_string(),
            title: "The Republic".to_string(),
            author: "Plato".to_string(),
            year: "380 BCE".to_string(),
            era: "Ancient Greece".to_string(),
            movement: "Platonism".to_string(),
            description: "The Republic is a Socratic dialogue, authored by Plato around 375 BCE, concerning justice, the order and character of the just city-state, and the just man.".to_string(),
            short_summary: Some("A foundational work exploring the nature of justice, the ideal society, and the role of the philosopher.".to_string()),
            profile: stance(
                [85, 80, 60, 65, 40, 40, 60, 45],
                Tone::Optimistic,
                &["forms", "ideal", "republic", "justice", "knowledge"],
                &["reality", "knowledge", "politics", "ethics"],
            ),
            context_responded_to: strings(&["Athenian democracy failure", "sophistry", "moral relativism", "societal corruption"]),
            is_public_domain: true,
            source: BookSource::Gutenberg,
            public_domain_link: Some("https://www.gutenberg.org/ebooks/1497".to_string()),
            match_percentage: None,
        },
    ]
}

fn spinoza_ethics() -> Book {
    Book {
        id: "ethics".to_string(),
        title: "Ethics".to_string(),
        author: "Benedict de Spinoza".to_string(),
        year: "1677".to_string(),
        era: "Early Modern".to_string(),
        movement: "Rationalism".to_string(),
        description: "Ethics, demonstrated in geometrical order, is a philosophical treatise written by Benedict de Spinoza. In it, Spinoza presents an ethical vision unifying God, nature, and humanity, emphasizing that true human happiness requires a detached devotion to truth.".to_string(),
        short_summary: Some("A geometric approach to understanding God, nature, and human emotions, advocating for rational understanding as the path to freedom.".to_string()),
        profile: stance(
            [80, 85, 30, 60, 20, 50, 70, 40],
            Tone::Neutral,
            &["reason", "god", "nature", "emotions", "freedom"],
            &["determinism", "pantheism", "rationality", "happiness"],
        ),
        context_responded_to: strings(&["religious dogma", "emotions", "human freedom", "determinism", "nature of God"]),
        is_public_domain: true,
        source: BookSource::Gutenberg,
        public_domain_link: Some("https://www.gutenberg.org/ebooks/3800".to_string()),
        match_percentage: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::TraitValue;
    use crate::Error;

    struct FailingSource(String);

    #[async_trait]
    impl CatalogSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self) -> Result<Vec<Book>> {
            Err(Error::CatalogSource(self.0.clone()))
        }
    }

    #[test]
    fn test_seed_catalog() {
        let catalog = BookCatalog::seeded();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.last_updated().is_none());

        for book in catalog.books() {
            assert_eq!(book.profile.traits.present().count(), 8, "{} should be fully profiled", book.id);
            assert!(book.profile.tone.is_some());
            assert!(!book.context_responded_to.is_empty());
            assert!(book.match_percentage.is_none());
        }
    }

    #[test]
    fn test_seed_trait_order() {
        let catalog = BookCatalog::seeded();
        let meditations = catalog.get("meditations").unwrap();
        let get = |t| meditations.profile.get(t).map(TraitValue::get);
        assert_eq!(get(Trait::Openness), Some(65));
        assert_eq!(get(Trait::Neuroticism), Some(20));
        assert_eq!(get(Trait::Practicality), Some(85));
        assert_eq!(get(Trait::AcceptanceAction), Some(70));
    }

    #[test]
    fn test_merge_skips_known_ids() {
        let mut catalog = BookCatalog::seeded();
        let duplicate = catalog.books()[0].clone();
        let fresh = Book {
            id: "new-one".to_string(),
            ..Default::default()
        };

        let added = catalog.merge(vec![duplicate, fresh.clone(), fresh]);
        assert_eq!(added, 1);
        assert_eq!(catalog.len(), 7);
        assert!(catalog.last_updated().is_some());
    }

    #[tokio::test]
    async fn test_update_from_curated_is_idempotent() {
        let mut catalog = BookCatalog::seeded();
        assert_eq!(catalog.update_from(&CuratedAdditions).await.unwrap(), 1);
        assert_eq!(catalog.update_from(&CuratedAdditions).await.unwrap(), 0);
        assert_eq!(catalog.len(), 7);
        assert!(catalog.get("ethics").is_some());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_catalog_untouched() {
        let mut catalog = BookCatalog::seeded();
        let before = catalog.snapshot();

        let result = catalog.update_from(&FailingSource("offline".to_string())).await;
        assert!(matches!(result, Err(Error::CatalogSource(_))));
        assert_eq!(catalog.books(), before.as_slice());
        assert!(catalog.last_updated().is_none());
    }
}
