//! Storefront service
//!
//! Wires a [`CatalogStore`] to the ranking engine. Each call fetches fresh
//! collections from the store, runs one engine operation and returns new view
//! values; nothing derived is kept between calls.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

use crate::catalog::{self, wishlist, FilterCriteria, WishlistQuery};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::models::Game;
use crate::recommendation::{RecommendationScorer, ScoredGame, TagUsage};
use crate::store::CatalogStore;

/// Catalog and wishlist queries for the UI layer
pub struct StorefrontService<S: CatalogStore> {
    store: S,
    config: EngineConfig,
    scorer: RecommendationScorer,
    rng: Option<StdRng>,
}

impl<S: CatalogStore> StorefrontService<S> {
    /// Build the service, rejecting an engine configuration that would break
    /// score ranges (e.g. a negative tag decay).
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let scorer =
            RecommendationScorer::with_weights(config.weights()).favorite_tag_count(config.favorite_tags);
        let rng = config.rng_seed.map(StdRng::seed_from_u64);

        Ok(Self {
            store,
            config,
            scorer,
            rng,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Catalog games visible in storefront listings
    fn listed_games(&self) -> Result<Vec<Game>> {
        let mut games = self.store.fetch_all_games()?;
        if self.config.approved_only {
            games.retain(Game::is_listed);
        }
        Ok(games)
    }

    pub fn search(&self, query: &str) -> Result<Vec<Game>> {
        Ok(catalog::search(&self.listed_games()?, query))
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Result<Vec<Game>> {
        Ok(catalog::filter(&self.listed_games()?, criteria))
    }

    pub fn trending(&self) -> Result<Vec<ScoredGame>> {
        Ok(catalog::trending_games(
            &self.listed_games()?,
            self.config.trending_cap,
        ))
    }

    pub fn discounted(&self) -> Result<Vec<ScoredGame>> {
        Ok(catalog::discounted_games(
            &self.listed_games()?,
            self.config.discounted_cap,
        ))
    }

    /// Random games to browse next to `game_id`.
    ///
    /// Uses the configured seed when one is set, otherwise a fresh generator
    /// per call.
    #[instrument(skip(self))]
    pub fn similar_to(&mut self, game_id: i64) -> Result<Vec<Game>> {
        let games = self.listed_games()?;
        if !games.iter().any(|g| g.id == game_id) {
            return Err(Error::not_found("game", game_id));
        }

        let count = self.config.similar_count;
        let sample = match self.rng.as_mut() {
            Some(rng) => catalog::similar_games_with(&games, game_id, count, rng),
            None => catalog::similar_games(&games, game_id, count),
        };

        debug!("Sampled {} similar games", sample.len());
        Ok(sample)
    }

    pub fn favorite_tags_for(&self, user_id: i64) -> Result<Vec<TagUsage>> {
        let owned = self.store.fetch_owned_games(user_id)?;
        let tags = self.store.fetch_all_tags()?;
        self.scorer.favorite_tags(&owned, &tags)
    }

    #[instrument(skip(self))]
    pub fn recommended_for(&self, user_id: i64) -> Result<Vec<ScoredGame>> {
        let catalog = self.listed_games()?;
        let owned = self.store.fetch_owned_games(user_id)?;
        let tags = self.store.fetch_all_tags()?;

        self.scorer
            .recommended_games(&catalog, &owned, &tags, self.config.recommendation_cap)
    }

    pub fn wishlist_for(&self, user_id: i64, request: &WishlistQuery) -> Result<Vec<Game>> {
        let games = self.store.fetch_wishlist(user_id)?;
        Ok(wishlist::curate(&games, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameStatus, Tag, User, UserRole};
    use crate::store::{Snapshot, SnapshotStore, UserGame};

    fn game(id: i64, recent: u32, discount: f64, tags: &[&str], status: GameStatus) -> Game {
        Game {
            id,
            name: format!("Game {id}"),
            description: String::new(),
            price: 10.0 * id as f64,
            discount,
            rating: 4.0,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            recent_purchases: recent,
            publisher_id: 1,
            status,
        }
    }

    fn store() -> SnapshotStore {
        SnapshotStore::new(Snapshot {
            games: vec![
                game(1, 5, 0.0, &["RPG"], GameStatus::Approved),
                game(2, 50, 10.0, &["Puzzle"], GameStatus::Approved),
                game(3, 500, 0.0, &["RPG"], GameStatus::Pending),
                game(4, 1, 20.0, &["RPG", "Puzzle"], GameStatus::Approved),
                game(5, 0, 0.0, &[], GameStatus::Approved),
            ],
            tags: vec![
                Tag {
                    id: 1,
                    name: "RPG".to_string(),
                },
                Tag {
                    id: 2,
                    name: "Puzzle".to_string(),
                },
            ],
            users: vec![User {
                id: 1,
                username: "sam".to_string(),
                wallet_balance: 25.0,
                points_balance: 10,
                role: UserRole::Customer,
            }],
            ownership: vec![UserGame {
                user_id: 1,
                game_id: 1,
            }],
            wishlists: vec![
                UserGame {
                    user_id: 1,
                    game_id: 4,
                },
                UserGame {
                    user_id: 1,
                    game_id: 2,
                },
            ],
        })
    }

    #[test]
    fn test_listings_hide_unapproved_games() {
        let service = StorefrontService::new(store(), EngineConfig::default()).unwrap();
        let trending = service.trending().unwrap();
        assert_eq!(trending[0].game.id, 2);
        assert!(trending.iter().all(|s| s.game.id != 3));
        assert!(service.search("game 3").unwrap().is_empty());
    }

    #[test]
    fn test_listings_include_everything_when_configured() {
        let config = EngineConfig {
            approved_only: false,
            ..EngineConfig::default()
        };
        let service = StorefrontService::new(store(), config).unwrap();
        assert_eq!(service.trending().unwrap()[0].game.id, 3);
    }

    #[test]
    fn test_discounted_respects_cap() {
        let config = EngineConfig {
            discounted_cap: 1,
            ..EngineConfig::default()
        };
        let service = StorefrontService::new(store(), config).unwrap();
        let discounted = service.discounted().unwrap();
        assert_eq!(discounted.len(), 1);
        assert_eq!(discounted[0].game.id, 2);
    }

    #[test]
    fn test_similar_to_with_seed_is_repeatable() {
        let config = EngineConfig {
            rng_seed: Some(11),
            ..EngineConfig::default()
        };
        let mut a = StorefrontService::new(store(), config.clone()).unwrap();
        let mut b = StorefrontService::new(store(), config).unwrap();

        let first: Vec<i64> = a.similar_to(1).unwrap().iter().map(|g| g.id).collect();
        let second: Vec<i64> = b.similar_to(1).unwrap().iter().map(|g| g.id).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(!first.contains(&1));
        assert!(!first.contains(&3));
    }

    #[test]
    fn test_new_rejects_negative_decay() {
        let config = EngineConfig {
            tag_decay: -0.5,
            ..EngineConfig::default()
        };
        assert!(matches!(
            StorefrontService::new(store(), config),
            Err(Error::InvalidConfig {
                key: "STOREFRONT_TAG_DECAY",
                ..
            })
        ));
    }

    #[test]
    fn test_similar_to_unknown_game() {
        let mut service = StorefrontService::new(store(), EngineConfig::default()).unwrap();
        assert!(matches!(
            service.similar_to(3),
            Err(Error::NotFound {
                entity_type: "game",
                ..
            })
        ));
    }

    #[test]
    fn test_recommended_for_user() {
        let service = StorefrontService::new(store(), EngineConfig::default()).unwrap();
        let favorites = service.favorite_tags_for(1).unwrap();
        assert_eq!(favorites[0].name, "RPG");
        assert_eq!(favorites[0].owned_games, 1);

        let recs = service.recommended_for(1).unwrap();
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0].game.id, 2);
        assert!(service.recommended_for(99).is_err());
    }

    #[test]
    fn test_wishlist_for_user() {
        let service = StorefrontService::new(store(), EngineConfig::default()).unwrap();
        let request = WishlistQuery {
            sort: "price".to_string(),
            ascending: false,
            ..WishlistQuery::default()
        };
        let ids: Vec<i64> = service
            .wishlist_for(1, &request)
            .unwrap()
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![4, 2]);
    }
}
