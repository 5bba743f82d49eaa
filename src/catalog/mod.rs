//! Catalog Module
//!
//! Non-personalized views over the catalog and a user's wishlist.
//!
//! - **Query** - search, filter, trending and discounted lists, similar-game sampling
//! - **Wishlist** - rating buckets, sorting and name search

pub mod query;
pub mod wishlist;

pub use query::{
    discounted_games, filter, search, similar_games, similar_games_with, trending_games,
    FilterCriteria, DEFAULT_LIST_CAP, DEFAULT_SIMILAR_COUNT,
};
pub use wishlist::{RatingBucket, SortCriterion, WishlistQuery};
