//! Tag Affinity
//!
//! Counts how many of a user's owned games carry each catalog tag and derives
//! the user's favorite tags from those counts.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Game, Tag, NOT_COMPUTED_COUNT};

/// Default number of favorite tags used for personalization
pub const DEFAULT_FAVORITE_TAGS: usize = 3;

/// A tag annotated with the number of owned games that carry it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagUsage {
    pub tag_id: i64,
    pub name: String,
    pub owned_games: i64,
}

impl TagUsage {
    /// Usage record for `tag` with the count not yet computed
    pub fn pending(tag: &Tag) -> Self {
        Self {
            tag_id: tag.id,
            name: tag.name.clone(),
            owned_games: NOT_COMPUTED_COUNT,
        }
    }

    pub fn is_computed(&self) -> bool {
        self.owned_games != NOT_COMPUTED_COUNT
    }
}

/// Count, for every tag in `all_tags`, the owned games carrying it.
///
/// The result keeps the order of `all_tags`. A tag listed twice on one game
/// counts that game once. A game tag missing from `all_tags` fails with
/// [`Error::UnknownTag`].
pub fn compute_tag_usage_counts(owned_games: &[Game], all_tags: &[Tag]) -> Result<Vec<TagUsage>> {
    let mut usage: Vec<TagUsage> = all_tags
        .iter()
        .map(|tag| TagUsage {
            owned_games: 0,
            ..TagUsage::pending(tag)
        })
        .collect();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(all_tags.len());
    for (idx, tag) in all_tags.iter().enumerate() {
        index.entry(tag.name.as_str()).or_insert(idx);
    }

    let mut seen: HashSet<usize> = HashSet::new();
    for game in owned_games {
        seen.clear();
        for tag_name in &game.tags {
            let idx = index
                .get(tag_name.as_str())
                .copied()
                .ok_or_else(|| Error::unknown_tag(game.id, tag_name.clone()))?;
            if seen.insert(idx) {
                usage[idx].owned_games += 1;
            }
        }
    }

    Ok(usage)
}

/// Top `n` tags by owned-game count.
///
/// Ties keep their relative order from `all_tags`; the tag score decay makes
/// this order observable downstream, so the sort must stay stable.
pub fn favorite_tags(owned_games: &[Game], all_tags: &[Tag], n: usize) -> Result<Vec<TagUsage>> {
    let mut usage = compute_tag_usage_counts(owned_games, all_tags)?;
    usage.sort_by(|a, b| b.owned_games.cmp(&a.owned_games));
    usage.truncate(n);

    debug!(
        "Favorite tags from {} owned games: {:?}",
        owned_games.len(),
        usage.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
    );

    Ok(usage)
}
