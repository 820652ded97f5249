//! External catalog sources

pub mod gutenberg_client;
pub mod subject_mapper;

pub use gutenberg_client::{
    default_search_terms, GutenbergClient, GutenbergError, GutenbergImporter, GutendexPage,
};
pub use subject_mapper::map_gutenberg_book;
