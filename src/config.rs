//! Configuration management for the storefront engine
//!
//! Provides strongly-typed configuration with validation, environment variable
//! parsing, and sensible defaults.
//!
//! # Example
//! ```no_run
//! use storefront::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Trending cap: {}", config.engine.trending_cap);
//! ```

use crate::error::{Error, Result};
use crate::recommendation::ScoringWeights;
use std::path::PathBuf;
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Ranking and sampling parameters
    pub engine: EngineConfig,
    /// Snapshot source for the catalog store
    pub snapshot: SnapshotConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// Ranking engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Entries in the trending list
    pub trending_cap: usize,
    /// Entries in the discounted list
    pub discounted_cap: usize,
    /// Entries in the recommendation list
    pub recommendation_cap: usize,
    /// Favorite tags considered for personalization
    pub favorite_tags: usize,
    /// Games drawn for "similar games"
    pub similar_count: usize,
    /// Weight of the tag score
    pub tag_weight: f64,
    /// Weight of the trending score
    pub trending_weight: f64,
    /// Multiplier applied after every favorite tag
    pub tag_decay: f64,
    /// Fixed seed for similar-game sampling; `None` draws fresh entropy
    pub rng_seed: Option<u64>,
    /// List only approved games in catalog views
    pub approved_only: bool,
}

/// Snapshot store configuration
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// JSON snapshot file
    pub path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let weights = ScoringWeights::default();
        Self {
            trending_cap: crate::catalog::DEFAULT_LIST_CAP,
            discounted_cap: crate::catalog::DEFAULT_LIST_CAP,
            recommendation_cap: crate::recommendation::DEFAULT_RECOMMENDATION_CAP,
            favorite_tags: crate::recommendation::DEFAULT_FAVORITE_TAGS,
            similar_count: crate::catalog::DEFAULT_SIMILAR_COUNT,
            tag_weight: weights.tag_affinity,
            trending_weight: weights.trending,
            tag_decay: weights.tag_decay,
            rng_seed: None,
            approved_only: true,
        }
    }
}

impl EngineConfig {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            tag_affinity: self.tag_weight,
            trending: self.trending_weight,
            tag_decay: self.tag_decay,
        }
    }

    /// Reject parameters that would break score ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.tag_decay > 0.0 && self.tag_decay.is_finite()) {
            return Err(Error::InvalidConfig {
                key: "STOREFRONT_TAG_DECAY",
                message: format!("decay must be a positive number, got {}", self.tag_decay)
                    .into(),
            });
        }

        for (key, weight) in [
            ("STOREFRONT_TAG_WEIGHT", self.tag_weight),
            ("STOREFRONT_TRENDING_WEIGHT", self.trending_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(Error::InvalidConfig {
                    key,
                    message: format!("weight must be within 0..=1, got {}", weight).into(),
                });
            }
        }

        if self.favorite_tags == 0 {
            return Err(Error::InvalidConfig {
                key: "STOREFRONT_FAVORITE_TAGS",
                message: "at least one favorite tag is required".into(),
            });
        }

        Ok(())
    }

    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let rng_seed = match std::env::var("STOREFRONT_RNG_SEED") {
            Ok(value) if !value.trim().is_empty() => Some(get_env_parsed("STOREFRONT_RNG_SEED")?),
            _ => None,
        };

        Ok(Self {
            trending_cap: get_env_or("STOREFRONT_TRENDING_CAP", &defaults.trending_cap.to_string())
                .parse()
                .unwrap_or(defaults.trending_cap),
            discounted_cap: get_env_or(
                "STOREFRONT_DISCOUNTED_CAP",
                &defaults.discounted_cap.to_string(),
            )
            .parse()
            .unwrap_or(defaults.discounted_cap),
            recommendation_cap: get_env_or(
                "STOREFRONT_RECOMMENDATION_CAP",
                &defaults.recommendation_cap.to_string(),
            )
            .parse()
            .unwrap_or(defaults.recommendation_cap),
            favorite_tags: get_env_or(
                "STOREFRONT_FAVORITE_TAGS",
                &defaults.favorite_tags.to_string(),
            )
            .parse()
            .unwrap_or(defaults.favorite_tags),
            similar_count: get_env_or(
                "STOREFRONT_SIMILAR_COUNT",
                &defaults.similar_count.to_string(),
            )
            .parse()
            .unwrap_or(defaults.similar_count),
            tag_weight: get_env_or("STOREFRONT_TAG_WEIGHT", &defaults.tag_weight.to_string())
                .parse()
                .unwrap_or(defaults.tag_weight),
            trending_weight: get_env_or(
                "STOREFRONT_TRENDING_WEIGHT",
                &defaults.trending_weight.to_string(),
            )
                .parse()
                .unwrap_or(defaults.trending_weight),
            tag_decay: match std::env::var("STOREFRONT_TAG_DECAY") {
                Ok(_) => get_env_parsed("STOREFRONT_TAG_DECAY")?,
                Err(_) => defaults.tag_decay,
            },
            rng_seed,
            approved_only: get_env_or("STOREFRONT_APPROVED_ONLY", "true")
                .parse()
                .unwrap_or(true),
        })
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore if not found)
        dotenvy::dotenv().ok();

        let config = Self {
            engine: EngineConfig::from_env()?,
            snapshot: SnapshotConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()
    }

    /// Log configuration summary
    fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  Engine:");
        info!(
            "    Caps: trending={} discounted={} recommended={}",
            self.engine.trending_cap, self.engine.discounted_cap, self.engine.recommendation_cap
        );
        info!(
            "    Weights: tag={} trending={} decay={:.4}",
            self.engine.tag_weight, self.engine.trending_weight, self.engine.tag_decay
        );
        info!("    Favorite tags: {}", self.engine.favorite_tags);
        match self.engine.rng_seed {
            Some(seed) => info!("    Similar-game sampling: seeded ({})", seed),
            None => info!("    Similar-game sampling: entropy"),
        }
        info!("  Snapshot: {}", self.snapshot.path.display());
    }
}

impl SnapshotConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            path: PathBuf::from(get_env("STOREFRONT_SNAPSHOT_PATH")?),
        })
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            filter: get_env_or("STOREFRONT_LOG", "storefront=debug,info"),
            json: get_env_or("STOREFRONT_LOG_JSON", "false")
                .parse()
                .unwrap_or(false),
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get required environment variable
fn get_env(key: &'static str) -> Result<String> {
    std::env::var(key).map_err(|_| Error::MissingEnvVar { var: key })
}

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get and parse environment variable
fn get_env_parsed<T: std::str::FromStr>(key: &'static str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let value = get_env(key)?;
    value.trim().parse().map_err(|e: T::Err| Error::InvalidConfig {
        key,
        message: format!("Invalid value '{}': {}", value, e).into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(engine: EngineConfig) -> Config {
        Config {
            engine,
            snapshot: SnapshotConfig {
                path: PathBuf::from("catalog.json"),
            },
            logging: LoggingConfig {
                filter: "info".to_string(),
                json: false,
            },
        }
    }

    #[test]
    fn test_defaults_validate() {
        let engine = EngineConfig::default();
        assert_eq!(engine.trending_cap, 10);
        assert_eq!(engine.favorite_tags, 3);
        assert!((engine.tag_decay - 1.0 / 3.0).abs() < 1e-12);
        assert!(config(engine).validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_decay() {
        let engine = EngineConfig {
            tag_decay: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config(engine).validate(),
            Err(Error::InvalidConfig {
                key: "STOREFRONT_TAG_DECAY",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let engine = EngineConfig {
            trending_weight: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config(engine).validate(),
            Err(Error::InvalidConfig {
                key: "STOREFRONT_TRENDING_WEIGHT",
                ..
            })
        ));
    }

    #[test]
    fn test_weight_defaults_render_from_scoring_defaults() {
        let defaults = EngineConfig::default();
        assert_eq!(defaults.tag_weight.to_string().parse::<f64>().unwrap(), 0.5);
        assert_eq!(
            defaults.trending_weight.to_string().parse::<f64>().unwrap(),
            defaults.weights().trending
        );
    }

    #[test]
    fn test_weights_follow_engine_config() {
        let engine = EngineConfig {
            tag_weight: 0.7,
            trending_weight: 0.3,
            ..EngineConfig::default()
        };
        let weights = engine.weights();
        assert_eq!(weights.tag_affinity, 0.7);
        assert_eq!(weights.trending, 0.3);
    }
}
