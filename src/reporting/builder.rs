//! Final report assembly.
//!
//! Called exclusively by the review supervisor once every task has settled.
//! Sealing the aggregator first means any result that straggles in later is
//! logged and dropped instead of mutating a published report.

use chrono::Utc;

use crate::aggregate::{summarize, ResultAggregator};
use crate::models::ReviewReport;

/// Seal the aggregator, stamp timing, and produce the immutable report.
pub async fn finalize_report(
    pr_number: u64,
    repo_name: &str,
    aggregator: &ResultAggregator,
) -> ReviewReport {
    let file_results = aggregator.seal().await;

    let start_time = aggregator.start_time();
    let end_time = Utc::now();
    let duration_seconds = (end_time - start_time).num_milliseconds().max(0) as f64 / 1000.0;

    ReviewReport {
        pr_number,
        repo_name: repo_name.to_string(),
        start_time,
        end_time,
        summary: summarize(&file_results, duration_seconds),
        file_results,
    }
}
