//! Recommendation Scoring
//!
//! Core algorithm for ranking catalog games.
//! Combines a batch-relative trending score with a decayed favorite-tag score.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::affinity::{self, TagUsage, DEFAULT_FAVORITE_TAGS};
use super::metrics::{PerformanceTimer, QueryMetrics, SLOW_QUERY_THRESHOLD_MS};
use crate::error::Result;
use crate::models::{Game, Tag, NOT_COMPUTED_SCORE};

/// Default number of recommendations returned
pub const DEFAULT_RECOMMENDATION_CAP: usize = 10;

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    tag_affinity: 0.5,
    trending: 0.5,
    tag_decay: 1.0 / 3.0,
};

/// Derived scores for one game, recomputed per query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameScores {
    pub trending: f64,
    pub tag: f64,
}

impl Default for GameScores {
    fn default() -> Self {
        Self {
            trending: NOT_COMPUTED_SCORE,
            tag: NOT_COMPUTED_SCORE,
        }
    }
}

impl GameScores {
    pub fn has_trending(&self) -> bool {
        self.trending != NOT_COMPUTED_SCORE
    }

    pub fn has_tag(&self) -> bool {
        self.tag != NOT_COMPUTED_SCORE
    }
}

/// A game annotated with its scores for a single query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredGame {
    pub game: Game,
    pub scores: GameScores,
    /// Value the result list is ordered by
    pub score: f64,
    pub reason: RecommendationReason,
}

/// Why a game ended up in a ranked list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationReason {
    /// Carries tags from the user's favorites
    TagMatch { matching_tags: Vec<String> },
    /// Selling well in the scored batch
    Trending { trending_score: f64 },
    /// Nothing in particular; filler for small catalogs
    Discovery,
}

/// Recommendation weights (can be tuned)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Weight of the tag score in the combined score (default: 0.5)
    pub tag_affinity: f64,
    /// Weight of the trending score in the combined score (default: 0.5)
    pub trending: f64,
    /// Multiplier applied after every favorite tag (default: 1/3)
    pub tag_decay: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

// ---- Scoring helpers (pure functions) ----

/// Trending score of every game, relative to the best seller of the batch.
///
/// Scores depend on the batch: the same game scores differently against the
/// full catalog and against the discounted subset. A batch with no recent
/// purchases at all scores every game 0.
pub fn compute_trending_scores(games: &[Game]) -> HashMap<i64, f64> {
    let max_recent = games.iter().map(|g| g.recent_purchases).max().unwrap_or(0);

    games
        .iter()
        .map(|game| {
            let score = if max_recent == 0 {
                0.0
            } else {
                f64::from(game.recent_purchases) / f64::from(max_recent)
            };
            (game.id, score)
        })
        .collect()
}

/// Tag score of every game against the ordered favorite tags.
///
/// For each favorite, a matching game adds the favorite's owned-game count;
/// the running score is then multiplied by `decay` whether or not it matched.
/// With a decay below 1, a match on an earlier favorite is decayed more times
/// than a match on a later one, so later favorites weigh more.
pub fn compute_tag_scores(games: &[Game], favorites: &[TagUsage], decay: f64) -> HashMap<i64, f64> {
    games
        .iter()
        .map(|game| {
            let mut score = 0.0;
            for favorite in favorites {
                if game.has_tag(&favorite.name) {
                    score += favorite.owned_games.max(0) as f64;
                }
                score *= decay;
            }
            (game.id, score)
        })
        .collect()
}

/// Score `games` by trending alone, best first, at most `cap` entries
pub fn rank_by_trending(games: &[Game], cap: usize) -> Vec<ScoredGame> {
    let trending = compute_trending_scores(games);

    let mut ranked: Vec<ScoredGame> = games
        .iter()
        .map(|game| {
            let score = trending.get(&game.id).copied().unwrap_or(0.0);
            ScoredGame {
                game: game.clone(),
                scores: GameScores {
                    trending: score,
                    ..GameScores::default()
                },
                score,
                reason: if score > 0.0 {
                    RecommendationReason::Trending {
                        trending_score: score,
                    }
                } else {
                    RecommendationReason::Discovery
                },
            }
        })
        .collect();

    sort_descending(&mut ranked);
    ranked.truncate(cap);
    ranked
}

/// Stable descending sort by combined score
fn sort_descending(scored: &mut [ScoredGame]) {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Personalized recommendation scorer
#[derive(Debug, Clone)]
pub struct RecommendationScorer {
    weights: ScoringWeights,
    favorite_tags: usize,
}

impl RecommendationScorer {
    pub fn new() -> Self {
        Self {
            weights: ScoringWeights::default(),
            favorite_tags: DEFAULT_FAVORITE_TAGS,
        }
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self {
            weights,
            favorite_tags: DEFAULT_FAVORITE_TAGS,
        }
    }

    /// Number of favorite tags considered when personalizing
    pub fn favorite_tag_count(mut self, n: usize) -> Self {
        self.favorite_tags = n;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Weighted combination of tag and trending scores
    pub fn combined_score(&self, scores: &GameScores) -> f64 {
        scores.tag * self.weights.tag_affinity + scores.trending * self.weights.trending
    }

    /// The user's favorite tags, in the order tag scoring consumes them
    pub fn favorite_tags(&self, owned_games: &[Game], all_tags: &[Tag]) -> Result<Vec<TagUsage>> {
        affinity::favorite_tags(owned_games, all_tags, self.favorite_tags)
    }

    /// Tag scores with this scorer's decay factor
    pub fn tag_scores(&self, games: &[Game], favorites: &[TagUsage]) -> HashMap<i64, f64> {
        compute_tag_scores(games, favorites, self.weights.tag_decay)
    }

    /// Rank the catalog for a user who owns `owned_games`.
    ///
    /// Trending is computed over the whole catalog, favorites over the owned
    /// library; the first `cap` games by combined score are returned.
    pub fn recommended_games(
        &self,
        catalog: &[Game],
        owned_games: &[Game],
        all_tags: &[Tag],
        cap: usize,
    ) -> Result<Vec<ScoredGame>> {
        let timer = PerformanceTimer::new("recommended_games");
        let mut metrics = QueryMetrics::new("recommended_games");

        let trending = compute_trending_scores(catalog);
        let favorites = self.favorite_tags(owned_games, all_tags)?;
        let tag_scores = self.tag_scores(catalog, &favorites);

        let mut scored: Vec<ScoredGame> = catalog
            .iter()
            .map(|game| {
                let scores = GameScores {
                    trending: trending.get(&game.id).copied().unwrap_or(0.0),
                    tag: tag_scores.get(&game.id).copied().unwrap_or(0.0),
                };
                ScoredGame {
                    game: game.clone(),
                    score: self.combined_score(&scores),
                    reason: self.explain(game, &scores, &favorites),
                    scores,
                }
            })
            .collect();

        sort_descending(&mut scored);
        scored.truncate(cap);

        metrics.duration_ms = timer.elapsed_ms();
        metrics.record_results(catalog.len(), &scored);
        metrics.log();
        timer.log_if_slow(SLOW_QUERY_THRESHOLD_MS);

        debug!(
            "Generated {} recommendations from {} catalog games ({} owned)",
            scored.len(),
            catalog.len(),
            owned_games.len()
        );

        Ok(scored)
    }

    /// Pick the dominant factor behind a game's combined score
    fn explain(
        &self,
        game: &Game,
        scores: &GameScores,
        favorites: &[TagUsage],
    ) -> RecommendationReason {
        let tag_contrib = scores.tag * self.weights.tag_affinity;
        let trending_contrib = scores.trending * self.weights.trending;

        if tag_contrib > 0.0 && tag_contrib >= trending_contrib {
            let matching_tags = favorites
                .iter()
                .filter(|f| game.has_tag(&f.name))
                .map(|f| f.name.clone())
                .collect();
            RecommendationReason::TagMatch { matching_tags }
        } else if trending_contrib > 0.0 {
            RecommendationReason::Trending {
                trending_score: scores.trending,
            }
        } else {
            RecommendationReason::Discovery
        }
    }
}

impl Default for RecommendationScorer {
    fn default() -> Self {
        Self::new()
    }
}
