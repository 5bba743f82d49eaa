//! Wishlist curation
//!
//! Rating-bucket filtering, sorting and name search over a user's wishlist.
//! Bucket and sort names arrive as strings from the UI layer; anything
//! unrecognized degrades to "no filter" and name order respectively.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use super::query::name_matches;
use crate::models::Game;

/// Rating range categories shown on the wishlist page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingBucket {
    /// rating >= 4.5
    OverwhelminglyPositive,
    /// 4.0 <= rating < 4.5
    VeryPositive,
    /// 2.0 <= rating < 4.0
    Mixed,
    /// rating < 2.0
    Negative,
}

impl RatingBucket {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "overwhelmingly-positive" => Some(RatingBucket::OverwhelminglyPositive),
            "very-positive" => Some(RatingBucket::VeryPositive),
            "mixed" => Some(RatingBucket::Mixed),
            "negative" => Some(RatingBucket::Negative),
            _ => None,
        }
    }

    pub fn contains(&self, rating: f64) -> bool {
        match self {
            RatingBucket::OverwhelminglyPositive => rating >= 4.5,
            RatingBucket::VeryPositive => (4.0..4.5).contains(&rating),
            RatingBucket::Mixed => (2.0..4.0).contains(&rating),
            RatingBucket::Negative => rating < 2.0,
        }
    }
}

/// Wishlist sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    Price,
    Rating,
    Discount,
    #[default]
    Name,
}

impl SortCriterion {
    /// Parse a criterion name, falling back to name order
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "price" => SortCriterion::Price,
            "rating" => SortCriterion::Rating,
            "discount" => SortCriterion::Discount,
            _ => SortCriterion::Name,
        }
    }

    fn compare(&self, a: &Game, b: &Game) -> Ordering {
        match self {
            SortCriterion::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            SortCriterion::Rating => a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal),
            SortCriterion::Discount => a
                .discount
                .partial_cmp(&b.discount)
                .unwrap_or(Ordering::Equal),
            SortCriterion::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

/// Combined wishlist view request, as sent by the wishlist page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub sort: String,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

impl Default for WishlistQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            bucket: None,
            sort: String::new(),
            ascending: true,
        }
    }
}

/// Games whose rating falls in `bucket`
pub fn filter_by_bucket(wishlist: &[Game], bucket: RatingBucket) -> Vec<Game> {
    wishlist
        .iter()
        .filter(|game| bucket.contains(game.rating))
        .cloned()
        .collect()
}

/// Games whose rating falls in the named bucket; unknown names filter nothing
pub fn filter_by_rating_bucket(wishlist: &[Game], bucket: &str) -> Vec<Game> {
    match RatingBucket::parse(bucket) {
        Some(bucket) => filter_by_bucket(wishlist, bucket),
        None => {
            debug!("Unrecognized rating bucket '{}', returning wishlist unfiltered", bucket);
            wishlist.to_vec()
        }
    }
}

/// Stable sort by `criterion`; `ascending = false` reverses the comparison
pub fn sort(wishlist: &[Game], criterion: SortCriterion, ascending: bool) -> Vec<Game> {
    let mut sorted = wishlist.to_vec();
    sorted.sort_by(|a, b| {
        if ascending {
            criterion.compare(a, b)
        } else {
            criterion.compare(b, a)
        }
    });
    sorted
}

/// Wishlist games whose name contains `query`, ignoring case
pub fn search_by_name(wishlist: &[Game], query: &str) -> Vec<Game> {
    wishlist
        .iter()
        .filter(|game| name_matches(game, query))
        .cloned()
        .collect()
}

/// Apply search, bucket filter and sort in that order
pub fn curate(wishlist: &[Game], request: &WishlistQuery) -> Vec<Game> {
    let mut games = search_by_name(wishlist, &request.query);
    if let Some(bucket) = &request.bucket {
        games = filter_by_rating_bucket(&games, bucket);
    }
    sort(&games, SortCriterion::parse(&request.sort), request.ascending)
}
