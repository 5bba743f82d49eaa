//! Recommendation Module
//!
//! Provides personalized game recommendations for storefront users.
//!
//! ## Architecture
//!
//! 1. **Affinity** - Count owned games per tag and derive the user's favorite tags
//! 2. **Scoring** - Trending and tag scores, combined into a ranked list
//! 3. **Metrics** - Timing and quality summaries reported through `tracing`
//!
//! ## Algorithm Overview
//!
//! - Trending score (50%): recent purchases relative to the batch best seller
//! - Tag score (50%): favorite-tag usage counts, decayed by 1/3 after every
//!   favorite, so per owned game a match late in the favorites list weighs
//!   more than a match on the first

pub mod affinity;
pub mod metrics;
pub mod scoring;

// Re-export the types that are actually used externally
pub use affinity::{compute_tag_usage_counts, favorite_tags, TagUsage, DEFAULT_FAVORITE_TAGS};
pub use scoring::{
    compute_tag_scores, compute_trending_scores, rank_by_trending, GameScores,
    RecommendationReason, RecommendationScorer, ScoredGame, ScoringWeights,
    DEFAULT_RECOMMENDATION_CAP,
};
