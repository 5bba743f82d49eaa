//! Storefront engine library crate
//!
//! Catalog ranking and filtering for a game storefront: trending and
//! discounted lists, personalized recommendations, similar-game sampling and
//! wishlist curation over entity collections supplied by a [`CatalogStore`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod recommendation;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use models::{Game, GameStatus, Tag, User, UserRole, NOT_COMPUTED_COUNT, NOT_COMPUTED_SCORE};
pub use recommendation::{RecommendationScorer, ScoredGame, TagUsage};
pub use service::StorefrontService;
pub use store::{CatalogStore, SnapshotStore};
