//! Storefront catalog report
//!
//! Loads a catalog snapshot and prints the storefront's ranked views as JSON:
//! trending and discounted lists, plus favorite tags, recommendations and the
//! curated wishlist when `STOREFRONT_USER_ID` names a user.

use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront::catalog::WishlistQuery;
use storefront::config::LoggingConfig;
use storefront::error::Error;
use storefront::{CatalogStore, Config, Game, Result, ScoredGame, SnapshotStore, StorefrontService, TagUsage, User};

#[derive(Debug, Serialize)]
struct Report {
    trending: Vec<ScoredGame>,
    discounted: Vec<ScoredGame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserReport>,
}

#[derive(Debug, Serialize)]
struct UserReport {
    user: User,
    favorite_tags: Vec<TagUsage>,
    recommended: Vec<ScoredGame>,
    wishlist: Vec<Game>,
}

fn main() -> Result<()> {
    // Tracing first so the configuration summary is logged
    dotenvy::dotenv().ok();
    init_tracing(&LoggingConfig::from_env());

    run().map_err(|err| {
        error!(
            code = err.error_code(),
            caller_error = err.is_caller_error(),
            "Storefront report failed: {}",
            err
        );
        err
    })
}

fn run() -> Result<()> {
    let config = Config::from_env()?;

    info!("Storefront engine v{}", env!("CARGO_PKG_VERSION"));

    let store = SnapshotStore::load(&config.snapshot.path)?;
    let service = StorefrontService::new(store, config.engine.clone())?;

    let user = match std::env::var("STOREFRONT_USER_ID") {
        Ok(raw) => {
            let user_id: i64 = raw.trim().parse().map_err(|_| Error::InvalidConfig {
                key: "STOREFRONT_USER_ID",
                message: format!("expected an integer user id, got '{}'", raw).into(),
            })?;
            Some(user_report(&service, user_id)?)
        }
        Err(_) => None,
    };

    let report = Report {
        trending: service.trending()?,
        discounted: service.discounted()?,
        user,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report).context("Failed to serialize report")?;
    writeln!(out).context("Failed to write report")?;

    info!("Report written");
    Ok(())
}

fn user_report(service: &StorefrontService<SnapshotStore>, user_id: i64) -> Result<UserReport> {
    let wishlist_request = WishlistQuery {
        query: std::env::var("STOREFRONT_WISHLIST_QUERY").unwrap_or_default(),
        bucket: std::env::var("STOREFRONT_WISHLIST_BUCKET").ok(),
        sort: std::env::var("STOREFRONT_WISHLIST_SORT").unwrap_or_default(),
        ascending: std::env::var("STOREFRONT_WISHLIST_ASC")
            .map(|v| v != "false")
            .unwrap_or(true),
    };

    Ok(UserReport {
        user: service.store().fetch_user(user_id)?,
        favorite_tags: service.favorite_tags_for(user_id)?,
        recommended: service.recommended_for(user_id)?,
        wishlist: service.wishlist_for(user_id, &wishlist_request)?,
    })
}

/// Initialize structured logging with tracing
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    // Logs go to stderr so stdout carries only the report
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(std::env::var("NO_COLOR").is_err())
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
