//! Catalog store
//!
//! Read-only access to the entity collections the engine ranks. The real
//! persistence layer lives outside this crate; it plugs in by implementing
//! [`CatalogStore`]. [`SnapshotStore`] serves an in-memory snapshot loaded
//! from JSON for the binary and tests.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{Game, GameStatus, Tag, User};

/// Read operations the engine needs from persistence.
///
/// Every call returns a fresh snapshot owned by the caller.
pub trait CatalogStore {
    /// Every game in the catalog, in catalog order
    fn fetch_all_games(&self) -> Result<Vec<Game>>;

    /// The full tag universe, in catalog order
    fn fetch_all_tags(&self) -> Result<Vec<Tag>>;

    /// Games in the user's library
    fn fetch_owned_games(&self, user_id: i64) -> Result<Vec<Game>>;

    /// Games on the user's wishlist
    fn fetch_wishlist(&self, user_id: i64) -> Result<Vec<Game>>;

    fn fetch_user(&self, user_id: i64) -> Result<User>;
}

/// A user-to-game link row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGame {
    pub user_id: i64,
    pub game_id: i64,
}

/// Serialized store contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub ownership: Vec<UserGame>,
    #[serde(default)]
    pub wishlists: Vec<UserGame>,
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub games: usize,
    pub tags: usize,
    pub users: usize,
}

/// In-memory store backed by a [`Snapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    snapshot: Snapshot,
    game_index: HashMap<i64, usize>,
    user_ids: HashSet<i64>,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        let game_index = snapshot
            .games
            .iter()
            .enumerate()
            .map(|(idx, game)| (game.id, idx))
            .collect();
        let user_ids = snapshot.users.iter().map(|u| u.id).collect();

        Self {
            snapshot,
            game_index,
            user_ids,
        }
    }

    /// Parse a snapshot from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    /// Load a snapshot file
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::store_with_source(format!("Failed to read snapshot {}", path.display()), e)
        })?;
        let store = Self::from_json(&contents)?;

        let stats = store.stats();
        info!(
            "Loaded snapshot: {} games ({}), {} tags, {} users",
            stats.games,
            store.status_summary(),
            stats.tags,
            stats.users
        );
        Ok(store)
    }

    /// Game counts per publication status, e.g. `approved=3, pending=1`
    pub fn status_summary(&self) -> String {
        [
            GameStatus::Approved,
            GameStatus::Pending,
            GameStatus::Rejected,
            GameStatus::Removed,
        ]
        .into_iter()
        .filter_map(|status| {
            let count = self
                .snapshot
                .games
                .iter()
                .filter(|g| g.status == status)
                .count();
            (count > 0).then(|| format!("{}={}", status, count))
        })
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            games: self.snapshot.games.len(),
            tags: self.snapshot.tags.len(),
            users: self.snapshot.users.len(),
        }
    }

    fn ensure_user(&self, user_id: i64) -> Result<()> {
        if self.user_ids.contains(&user_id) {
            Ok(())
        } else {
            Err(Error::not_found("user", user_id))
        }
    }

    /// Resolve link rows for `user_id`, skipping dangling game ids
    fn games_for(&self, links: &[UserGame], user_id: i64, relation: &str) -> Vec<Game> {
        let games: Vec<Game> = links
            .iter()
            .filter(|link| link.user_id == user_id)
            .filter_map(|link| match self.game_index.get(&link.game_id) {
                Some(&idx) => Some(self.snapshot.games[idx].clone()),
                None => {
                    warn!(
                        "Skipping {} row for user {}: game {} not in catalog",
                        relation, user_id, link.game_id
                    );
                    None
                }
            })
            .collect();

        debug!("User {} has {} {} games", user_id, games.len(), relation);
        games
    }
}

impl CatalogStore for SnapshotStore {
    fn fetch_all_games(&self) -> Result<Vec<Game>> {
        Ok(self.snapshot.games.clone())
    }

    fn fetch_all_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.snapshot.tags.clone())
    }

    fn fetch_owned_games(&self, user_id: i64) -> Result<Vec<Game>> {
        self.ensure_user(user_id)?;
        Ok(self.games_for(&self.snapshot.ownership, user_id, "owned"))
    }

    fn fetch_wishlist(&self, user_id: i64) -> Result<Vec<Game>> {
        self.ensure_user(user_id)?;
        Ok(self.games_for(&self.snapshot.wishlists, user_id, "wishlist"))
    }

    fn fetch_user(&self, user_id: i64) -> Result<User> {
        self.snapshot
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| Error::not_found("user", user_id))
    }
}
