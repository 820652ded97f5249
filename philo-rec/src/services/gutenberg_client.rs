//! Project Gutenberg catalog client
//!
//! Talks to a Gutendex instance (`{base_url}/books/?page=N&search=T`), one request at a
//! time with a minimum spacing between requests, and turns the results into catalog books.

use async_trait::async_trait;
use philo_common::config::GutenbergConfig;
use philo_common::{Book, CatalogSource};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::subject_mapper::map_gutenberg_book;

const USER_AGENT: &str = concat!("PhiloPalette/", env!("CARGO_PKG_VERSION"));

/// Philosophy topics searched by default
pub const PHILOSOPHY_TOPICS: [&str; 18] = [
    "philosophy", "ethics", "metaphysics", "epistemology", "logic",
    "aesthetics", "political philosophy", "stoicism", "existentialism",
    "phenomenology", "idealism", "materialism", "empiricism", "rationalism",
    "skepticism", "nihilism", "absurdism", "humanism",
];

/// Philosophers searched by default
pub const KNOWN_PHILOSOPHERS: [&str; 33] = [
    "Plato", "Aristotle", "Socrates", "Kant", "Hegel", "Nietzsche",
    "Schopenhauer", "Kierkegaard", "Sartre", "Camus", "Simone de Beauvoir",
    "Hannah Arendt", "John Locke", "Thomas Hobbes", "Jean-Jacques Rousseau",
    "David Hume", "John Stuart Mill", "Bertrand Russell", "Ludwig Wittgenstein",
    "Martin Heidegger", "Edmund Husserl", "Michel Foucault", "Søren Kierkegaard",
    "Marcus Aurelius", "Epictetus", "Seneca", "Confucius", "Lao Tzu",
    "Avicenna", "Averroes", "Maimonides", "Thomas Aquinas", "Voltaire",
];

/// Topics followed by philosophers
pub fn default_search_terms() -> Vec<String> {
    PHILOSOPHY_TOPICS
        .iter()
        .chain(KNOWN_PHILOSOPHERS.iter())
        .map(|s| s.to_string())
        .collect()
}

/// Gutenberg client errors
#[derive(Debug, Error)]
pub enum GutenbergError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// Every request of an import failed
    #[error("No results: {0}")]
    NoResults(String),
}

/// One page of a Gutendex search
#[derive(Debug, Clone, Deserialize)]
pub struct GutendexPage {
    #[serde(default)]
    pub count: u64,
    /// URL of the next page, absent on the last one
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<GutendexBook>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GutendexBook {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<GutendexPerson>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub bookshelves: Vec<String>,
    /// MIME type to download URL
    #[serde(default)]
    pub formats: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GutendexPerson {
    pub name: String,
    /// Negative for BCE
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

/// Enforces a minimum spacing between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Gutendex API client
pub struct GutenbergClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl GutenbergClient {
    pub fn new(config: &GutenbergConfig) -> Result<Self, GutenbergError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GutenbergError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::new(config.request_interval_ms)),
        })
    }

    /// Fetch one page of search results
    pub async fn fetch_page(&self, page: u32, topic: &str) -> Result<GutendexPage, GutenbergError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/books/", self.base_url);
        debug!(url = %url, page, topic, "Querying Gutendex");

        let response = self
            .http_client
            .get(&url)
            .query(&[("page", page.to_string()), ("search", topic.to_string())])
            .send()
            .await
            .map_err(|e| GutenbergError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GutenbergError::Api(status.as_u16(), error_text));
        }

        response
            .json::<GutendexPage>()
            .await
            .map_err(|e| GutenbergError::Parse(e.to_string()))
    }
}

/// Catalog source backed by Gutendex searches
pub struct GutenbergImporter {
    client: GutenbergClient,
    search_terms: Vec<String>,
    max_pages: u32,
}

impl GutenbergImporter {
    pub fn new(client: GutenbergClient, search_terms: Vec<String>, max_pages: u32) -> Self {
        Self {
            client,
            search_terms,
            max_pages,
        }
    }

    /// Build from config; without configured terms the built-in list is used
    pub fn from_config(config: &GutenbergConfig) -> Result<Self, GutenbergError> {
        let terms = config
            .search_terms
            .clone()
            .unwrap_or_else(default_search_terms);
        Ok(Self::new(GutenbergClient::new(config)?, terms, config.max_pages))
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    /// Search every term and map the results, de-duplicated by book id
    ///
    /// A failing term is logged and skipped. The import fails only when no request at all
    /// succeeded.
    pub async fn import_books(&self) -> Result<Vec<Book>, GutenbergError> {
        let mut books = Vec::new();
        let mut seen = HashSet::new();
        let mut succeeded = 0usize;
        let mut last_error: Option<GutenbergError> = None;

        for term in &self.search_terms {
            let mut page = 1;
            while page <= self.max_pages {
                let response = match self.client.fetch_page(page, term).await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!(term = %term, page, error = %e, "Gutenberg search failed, skipping term");
                        last_error = Some(e);
                        break;
                    }
                };
                succeeded += 1;

                for raw in &response.results {
                    let book = map_gutenberg_book(raw);
                    if seen.insert(book.id.clone()) {
                        books.push(book);
                    }
                }

                if response.next.is_none() {
                    break;
                }
                page += 1;
            }
        }

        if succeeded == 0 {
            if let Some(e) = last_error {
                return Err(GutenbergError::NoResults(format!(
                    "all {} search terms failed, last error: {}",
                    self.search_terms.len(),
                    e
                )));
            }
        }

        info!(
            terms = self.search_terms.len(),
            requests = succeeded,
            books = books.len(),
            "Gutenberg import finished"
        );
        Ok(books)
    }
}

#[async_trait]
impl CatalogSource for GutenbergImporter {
    fn name(&self) -> &'static str {
        "gutenberg"
    }

    async fn fetch(&self) -> philo_common::Result<Vec<Book>> {
        self.import_books()
            .await
            .map_err(|e| philo_common::Error::CatalogSource(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_terms() {
        let terms = default_search_terms();
        assert_eq!(terms.len(), 51);
        assert_eq!(terms[0], "philosophy");
        assert_eq!(terms[18], "Plato");
        assert_eq!(terms.last().map(String::as_str), Some("Voltaire"));
    }

    #[test]
    fn test_page_deserialization() {
        let json = r#"{
            "count": 2,
            "next": "https://gutendex.com/books/?page=2&search=stoicism",
            "previous": null,
            "results": [{
                "id": 2680,
                "title": "Meditations",
                "authors": [{"name": "Marcus Aurelius, Emperor of Rome", "birth_year": 121, "death_year": 180}],
                "translators": [],
                "subjects": ["Stoics", "Ethics"],
                "bookshelves": ["Philosophy"],
                "languages": ["en"],
                "copyright": false,
                "media_type": "Text",
                "formats": {"text/plain; charset=us-ascii": "https://www.gutenberg.org/ebooks/2680.txt.utf-8"},
                "download_count": 12345
            }, {
                "id": 1,
                "title": "Bare"
            }]
        }"#;

        let page: GutendexPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 2);
        assert!(page.next.is_some());
        assert_eq!(page.results[0].authors[0].birth_year, Some(121));
        assert_eq!(page.results[0].subjects, vec!["Stoics", "Ethics"]);
        assert!(page.results[1].authors.is_empty());
        assert!(page.results[1].formats.is_empty());
    }

    #[test]
    fn test_from_config_uses_configured_terms() {
        let config = GutenbergConfig {
            search_terms: Some(vec!["stoicism".to_string()]),
            ..Default::default()
        };
        let importer = GutenbergImporter::from_config(&config).unwrap();
        assert_eq!(importer.search_terms().to_vec(), vec!["stoicism".to_string()]);

        let importer = GutenbergImporter::from_config(&GutenbergConfig::default()).unwrap();
        assert_eq!(importer.search_terms().len(), 51);
    }

    #[tokio::test]
    async fn test_rate_limiter_spacing() {
        let limiter = RateLimiter::new(50);
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
