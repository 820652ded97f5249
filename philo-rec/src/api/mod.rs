//! HTTP API handlers for philo-rec

pub mod buildinfo;
pub mod catalog;
pub mod compatibility;
pub mod health;
pub mod profile;
pub mod questions;
pub mod recommendations;

pub use buildinfo::buildinfo_routes;
pub use catalog::catalog_routes;
pub use compatibility::compatibility_routes;
pub use health::health_routes;
pub use profile::profile_routes;
pub use questions::question_routes;
pub use recommendations::recommendation_routes;
