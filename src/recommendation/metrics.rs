//! Query Metrics and Performance Monitoring
//!
//! Timing and quality summaries for ranking queries. Everything here is
//! reported through `tracing`; nothing is persisted.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::scoring::{RecommendationReason, ScoredGame};

/// Operations slower than this are reported at warn level
pub const SLOW_QUERY_THRESHOLD_MS: u64 = 50;

/// Summary of a single ranking query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMetrics {
    pub request_id: String,
    pub timestamp: i64,
    pub operation: String,

    // Performance metrics
    pub duration_ms: u64,

    // Quality metrics
    pub candidates_considered: usize,
    pub results_returned: usize,
    pub avg_score: f64,
    pub tag_match_count: usize,
    pub trending_count: usize,
    pub discovery_count: usize,
}

impl QueryMetrics {
    pub fn new(operation: &str) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            operation: operation.to_string(),
            duration_ms: 0,
            candidates_considered: 0,
            results_returned: 0,
            avg_score: 0.0,
            tag_match_count: 0,
            trending_count: 0,
            discovery_count: 0,
        }
    }

    /// Fill the quality fields from a finished result list
    pub fn record_results(&mut self, candidates: usize, results: &[ScoredGame]) {
        self.candidates_considered = candidates;
        self.results_returned = results.len();
        self.avg_score = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
        };

        for result in results {
            match result.reason {
                RecommendationReason::TagMatch { .. } => self.tag_match_count += 1,
                RecommendationReason::Trending { .. } => self.trending_count += 1,
                RecommendationReason::Discovery => self.discovery_count += 1,
            }
        }
    }

    /// Share of results explained by the user's favorite tags
    pub fn personalization_ratio(&self) -> f64 {
        if self.results_returned == 0 {
            return 0.0;
        }
        self.tag_match_count as f64 / self.results_returned as f64
    }

    pub fn log(&self) {
        tracing::debug!(
            request_id = %self.request_id,
            operation = %self.operation,
            duration_ms = self.duration_ms,
            candidates = self.candidates_considered,
            returned = self.results_returned,
            avg_score = self.avg_score,
            personalization = self.personalization_ratio(),
            "query metrics"
        );
    }
}

/// Performance timer for tracking operation duration
pub struct PerformanceTimer {
    start: Instant,
    label: String,
}

impl PerformanceTimer {
    pub fn new(label: &str) -> Self {
        Self {
            start: Instant::now(),
            label: label.to_string(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn log_if_slow(&self, threshold_ms: u64) {
        let elapsed = self.elapsed_ms();
        if elapsed > threshold_ms {
            tracing::warn!(
                "Slow operation: {} took {}ms (threshold: {}ms)",
                self.label,
                elapsed,
                threshold_ms
            );
        }
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed_ms();
        tracing::debug!("{} completed in {}ms", self.label, elapsed);
    }
}
