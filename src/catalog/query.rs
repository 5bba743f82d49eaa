//! Catalog queries
//!
//! Search, filtering, trending/discount lists and "similar games" sampling
//! over an already-loaded catalog.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Game;
use crate::recommendation::{rank_by_trending, ScoredGame};

/// Default size of the trending and discounted lists
pub const DEFAULT_LIST_CAP: usize = 10;

/// Default number of similar games sampled
pub const DEFAULT_SIMILAR_COUNT: usize = 3;

/// Multi-criterion catalog filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub min_rating: f64,
    /// Inclusive
    pub min_price: f64,
    /// Inclusive
    pub max_price: f64,
    /// Every tag here must be present on a matching game
    #[serde(default)]
    pub required_tags: Vec<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_rating: 0.0,
            min_price: 0.0,
            max_price: f64::INFINITY,
            required_tags: Vec::new(),
        }
    }
}

impl FilterCriteria {
    pub fn matches(&self, game: &Game) -> bool {
        game.rating >= self.min_rating
            && game.price >= self.min_price
            && game.price <= self.max_price
            && self.required_tags.iter().all(|tag| game.has_tag(tag))
    }
}

/// Case-insensitive substring match on the game name; empty query matches
pub(crate) fn name_matches(game: &Game, query: &str) -> bool {
    query.is_empty() || game.name.to_lowercase().contains(&query.to_lowercase())
}

/// Games whose name contains `query`, ignoring case
pub fn search(catalog: &[Game], query: &str) -> Vec<Game> {
    catalog
        .iter()
        .filter(|game| name_matches(game, query))
        .cloned()
        .collect()
}

/// Games passing the rating, price range and required-tag criteria
pub fn filter(catalog: &[Game], criteria: &FilterCriteria) -> Vec<Game> {
    let matches: Vec<Game> = catalog
        .iter()
        .filter(|game| criteria.matches(game))
        .cloned()
        .collect();

    debug!(
        "Filter {:?} matched {} of {} games",
        criteria,
        matches.len(),
        catalog.len()
    );
    matches
}

/// Best sellers of the whole catalog, at most `cap`
pub fn trending_games(catalog: &[Game], cap: usize) -> Vec<ScoredGame> {
    rank_by_trending(catalog, cap)
}

/// Best sellers among discounted games, at most `cap`.
///
/// Trending is normalized against the discounted subset only.
pub fn discounted_games(catalog: &[Game], cap: usize) -> Vec<ScoredGame> {
    let discounted: Vec<Game> = catalog
        .iter()
        .filter(|game| game.is_discounted())
        .cloned()
        .collect();

    debug!(
        "{} of {} catalog games are discounted",
        discounted.len(),
        catalog.len()
    );
    rank_by_trending(&discounted, cap)
}

/// Uniform sample of `count` distinct games other than `game_id`
pub fn similar_games_with<R: Rng + ?Sized>(
    catalog: &[Game],
    game_id: i64,
    count: usize,
    rng: &mut R,
) -> Vec<Game> {
    let candidates: Vec<&Game> = catalog.iter().filter(|game| game.id != game_id).collect();

    candidates
        .choose_multiple(rng, count)
        .map(|game| (*game).clone())
        .collect()
}

/// [`similar_games_with`] drawing from a fresh thread-local generator
pub fn similar_games(catalog: &[Game], game_id: i64, count: usize) -> Vec<Game> {
    similar_games_with(catalog, game_id, count, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn game(id: i64, name: &str, rating: f64, price: f64, tags: &[&str]) -> Game {
        Game {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            discount: 0.0,
            rating,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            recent_purchases: 0,
            publisher_id: 1,
            status: GameStatus::Approved,
        }
    }

    fn sales(id: i64, recent: u32, discount: f64) -> Game {
        Game {
            recent_purchases: recent,
            discount,
            ..game(id, &format!("Game {id}"), 4.0, 10.0, &[])
        }
    }

    fn ids(games: &[Game]) -> Vec<i64> {
        games.iter().map(|g| g.id).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = vec![
            game(1, "Star Forge", 4.0, 10.0, &[]),
            game(2, "Dungeon Stars", 4.0, 10.0, &[]),
            game(3, "Farm Days", 4.0, 10.0, &[]),
        ];
        assert_eq!(ids(&search(&catalog, "STAR")), vec![1, 2]);
        assert_eq!(ids(&search(&catalog, "")), vec![1, 2, 3]);
        assert!(search(&catalog, "kart").is_empty());
    }

    #[test]
    fn test_filter_requires_every_tag() {
        let catalog = vec![
            game(1, "G1", 5.0, 20.0, &["A", "B"]),
            game(2, "G2", 7.0, 200.0, &["B"]),
        ];
        let criteria = FilterCriteria {
            min_rating: 1.0,
            min_price: 100.0,
            max_price: 400.0,
            required_tags: vec!["A".into(), "B".into(), "C".into()],
        };
        assert!(filter(&catalog, &criteria).is_empty());

        let criteria = FilterCriteria {
            min_rating: 1.0,
            min_price: 0.0,
            max_price: 400.0,
            required_tags: vec!["B".into()],
        };
        assert_eq!(ids(&filter(&catalog, &criteria)), vec![1, 2]);
    }

    #[test]
    fn test_filter_without_tags_keeps_rating_and_price_subset() {
        let catalog = vec![
            game(1, "Cheap", 4.5, 5.0, &["A"]),
            game(2, "Edge", 3.0, 50.0, &[]),
            game(3, "Low rated", 2.9, 20.0, &[]),
            game(4, "Pricey", 4.0, 50.01, &[]),
        ];
        let criteria = FilterCriteria {
            min_rating: 3.0,
            min_price: 5.0,
            max_price: 50.0,
            required_tags: vec![],
        };
        assert_eq!(ids(&filter(&catalog, &criteria)), vec![1, 2]);
    }

    #[test]
    fn test_trending_games_sorted_and_capped() {
        let catalog: Vec<Game> = (1..=15).map(|id| sales(id, id as u32 * 2, 0.0)).collect();
        let trending = trending_games(&catalog, DEFAULT_LIST_CAP);

        assert_eq!(trending.len(), DEFAULT_LIST_CAP);
        assert_eq!(trending[0].game.id, 15);
        assert!((trending[0].scores.trending - 1.0).abs() < 1e-9);
        assert!(trending
            .windows(2)
            .all(|w| w[0].scores.trending >= w[1].scores.trending));
    }

    #[test]
    fn test_trending_ties_keep_catalog_order() {
        let catalog = vec![sales(1, 5, 0.0), sales(2, 9, 0.0), sales(3, 5, 0.0)];
        let trending = trending_games(&catalog, 10);
        let order: Vec<i64> = trending.iter().map(|s| s.game.id).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn test_discounted_games_scores_against_subset() {
        let catalog = vec![
            sales(1, 100, 0.0),
            sales(2, 10, 20.0),
            sales(3, 5, 50.0),
            sales(4, 80, -5.0),
        ];
        let discounted = discounted_games(&catalog, 10);

        let order: Vec<i64> = discounted.iter().map(|s| s.game.id).collect();
        assert_eq!(order, vec![2, 3]);
        assert!(discounted.iter().all(|s| s.game.discount > 0.0));
        // Normalized against game 2, not the full-catalog best seller
        assert!((discounted[0].scores.trending - 1.0).abs() < 1e-9);
        assert!((discounted[1].scores.trending - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_discounted_games_without_sales_score_zero() {
        let catalog = vec![sales(1, 0, 10.0), sales(2, 0, 15.0)];
        let discounted = discounted_games(&catalog, 1);
        assert_eq!(discounted.len(), 1);
        assert_eq!(discounted[0].scores.trending, 0.0);
    }

    #[test]
    fn test_similar_games_excludes_self_without_duplicates() {
        let catalog: Vec<Game> = (1..=6).map(|id| sales(id, 0, 0.0)).collect();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let sample = similar_games_with(&catalog, 3, DEFAULT_SIMILAR_COUNT, &mut rng);
            let unique: HashSet<i64> = sample.iter().map(|g| g.id).collect();
            assert_eq!(sample.len(), 3);
            assert_eq!(unique.len(), 3);
            assert!(!unique.contains(&3));
        }
    }

    #[test]
    fn test_similar_games_count_bounded_by_remainder() {
        let catalog = vec![sales(1, 0, 0.0), sales(2, 0, 0.0), sales(3, 0, 0.0)];
        assert_eq!(similar_games(&catalog, 1, 3).len(), 2);
        assert!(similar_games(&catalog[..1], 1, 3).is_empty());
        // Unknown id excludes nothing
        assert_eq!(similar_games(&catalog, 99, 3).len(), 3);
    }

    #[test]
    fn test_similar_games_is_deterministic_for_a_seed() {
        let catalog: Vec<Game> = (1..=10).map(|id| sales(id, 0, 0.0)).collect();
        let a = similar_games_with(&catalog, 1, 3, &mut StdRng::seed_from_u64(42));
        let b = similar_games_with(&catalog, 1, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_similar_games_vary_between_calls() {
        let catalog: Vec<Game> = (1..=10).map(|id| sales(id, 0, 0.0)).collect();
        let draws: HashSet<Vec<i64>> = (0..30)
            .map(|_| ids(&similar_games(&catalog, 1, DEFAULT_SIMILAR_COUNT)))
            .collect();
        assert!(draws.len() > 1, "30 draws all produced the same sample");
    }
}
