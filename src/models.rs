//! Catalog entities
//!
//! Plain records handed over by the persistence collaborator. The engine only
//! borrows them; anything derived (trending score, tag score, tag usage) lives
//! on the view types in `recommendation` and is recomputed per query.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marks a derived score that has not been populated by the scorer yet
pub const NOT_COMPUTED_SCORE: f64 = -1.0;

/// Marks a derived tag usage count that has not been populated yet
pub const NOT_COMPUTED_COUNT: i64 = -1;

/// Publication status of a game in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Removed,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Pending => write!(f, "pending"),
            GameStatus::Approved => write!(f, "approved"),
            GameStatus::Rejected => write!(f, "rejected"),
            GameStatus::Removed => write!(f, "removed"),
        }
    }
}

/// A game listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Discount percentage, 0-100
    #[serde(default)]
    pub discount: f64,
    /// Average user rating, nominally 0-5
    #[serde(default)]
    pub rating: f64,
    /// Tag names in catalog order; a repeated name counts once per game
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub recent_purchases: u32,
    pub publisher_id: i64,
    #[serde(default)]
    pub status: GameStatus,
}

impl Game {
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    pub fn is_discounted(&self) -> bool {
        self.discount > 0.0
    }

    /// Price after applying the discount percentage
    pub fn final_price(&self) -> f64 {
        self.price * (1.0 - self.discount / 100.0)
    }

    pub fn is_listed(&self) -> bool {
        self.status == GameStatus::Approved
    }
}

/// A catalog tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Publisher,
    Admin,
}

impl UserRole {
    /// Parse a role name; anything unrecognized is a customer
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "publisher" | "developer" => UserRole::Publisher,
            "admin" | "administrator" => UserRole::Admin,
            _ => UserRole::Customer,
        }
    }
}

/// A storefront account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub wallet_balance: f64,
    #[serde(default)]
    pub points_balance: u64,
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    pub fn can_afford(&self, game: &Game) -> bool {
        self.wallet_balance >= game.final_price()
    }
}
