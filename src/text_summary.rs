//! Text summary builder for CLI output.
//!
//! This module formats the human-readable lines printed between pipeline stages.

use crate::model::{RawRecord, ReportSummary, ScenarioAggregate, ScoredRecord};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Preview of the rows as loaded, before any filtering.
pub(crate) fn build_raw_preview(
    summary: &ReportSummary,
    raw: &[RawRecord],
    rows: usize,
) -> TextSummary {
    let mut lines = vec![format!("--- Data read from '{}' ---", summary.source.display())];
    lines.push(format!(
        "{:>6} {:>6} {:>7} {:>6} {:>10} {:>9} {:>9} {:>9} {:>9} {:>8} {:>6}",
        "Round",
        "Srv",
        "Clients",
        "Msgs",
        "Mean",
        "Min",
        "Max",
        "Median",
        "StdDev",
        "Success",
        "Fail"
    ));
    for r in raw.iter().take(rows) {
        lines.push(format!(
            "{:>6} {:>6} {:>7} {:>6} {:>10.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>8} {:>6}",
            r.round,
            r.server_count,
            r.client_count,
            r.messages_per_client,
            r.latency_mean,
            r.latency_min,
            r.latency_max,
            r.latency_median,
            r.latency_std_dev,
            r.success_count,
            r.failure_count
        ));
    }
    if raw.len() > rows {
        lines.push(format!("... {} more rows", raw.len() - rows));
    }
    lines.push(format!(
        "Total records BEFORE outlier removal: {}",
        summary.rows_before_filter
    ));
    TextSummary { lines }
}

/// Outlier report: which rounds were dropped and with what Z-score.
/// Purely informational; nothing downstream reads it.
pub(crate) fn build_filter_report(summary: &ReportSummary) -> TextSummary {
    let Some(threshold) = summary.z_threshold else {
        return TextSummary {
            lines: vec!["Outlier removal disabled; using every round.".to_string()],
        };
    };

    let mut lines = vec![format!(
        "--- Z-score outlier detection (threshold = ±{threshold}) ---",
    )];
    if summary.outliers.is_empty() {
        lines.push("No outliers detected for this threshold.".to_string());
    } else {
        lines.push(format!(
            "Outliers detected ({} records):",
            summary.outliers.len()
        ));
        lines.extend(summary.outliers.iter().map(outlier_line));
        lines.push(format!(
            "Total records AFTER outlier removal: {}",
            summary.rows_after_filter
        ));
    }
    TextSummary { lines }
}

fn outlier_line(scored: &ScoredRecord) -> String {
    let r = &scored.record;
    format!(
        "  round {} {}: latency {:.2} ms, z = {:+.3}",
        r.round,
        r.scenario(),
        r.latency_mean,
        scored.z_score
    )
}

/// Preview of the per-scenario aggregate table.
pub(crate) fn build_aggregate_preview(
    aggregates: &[ScenarioAggregate],
    rows: usize,
) -> TextSummary {
    let mut lines = vec!["--- Aggregated statistics per test scenario ---".to_string()];
    if aggregates.is_empty() {
        lines.push("(no scenarios)".to_string());
        return TextSummary { lines };
    }
    lines.push(format!(
        "{:<16} {:>10} {:>10} {:>9} {:>9} {:>9} {:>9} {:>7} {:>5}",
        "Scenario", "AvgLat", "MedLat", "MinLat", "MaxLat", "StdDev", "Success", "Fail", "Runs"
    ));
    for a in aggregates.iter().take(rows) {
        lines.push(format!(
            "{:<16} {:>10.2} {:>10.2} {:>9.2} {:>9.2} {:>9.2} {:>9} {:>7} {:>5}",
            a.scenario().to_string(),
            a.mean_latency,
            a.median_latency,
            a.min_latency,
            a.max_latency,
            a.std_dev_latency,
            a.total_successes,
            a.total_failures,
            a.runs_remaining
        ));
    }
    if aggregates.len() > rows {
        lines.push(format!("... {} more scenarios", aggregates.len() - rows));
    }
    TextSummary { lines }
}
