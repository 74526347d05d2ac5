//! Per-scenario Z-score outlier removal.
//!
//! Statistics are computed inside each scenario only. A single pass is made;
//! the reduced set is never re-scored.

use crate::metrics;
use crate::model::{RawRecord, ScenarioKey, ScoredRecord, Threshold};
use std::collections::BTreeMap;
use tracing::debug;

/// Result of filtering: the surviving rounds and the dropped ones with their scores.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub kept: Vec<RawRecord>,
    pub outliers: Vec<ScoredRecord>,
}

/// Score every record against its own scenario's latency distribution.
/// Output order matches input order.
pub fn score_records(records: &[RawRecord], threshold: Threshold) -> Vec<ScoredRecord> {
    let mut groups: BTreeMap<ScenarioKey, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        groups.entry(record.scenario()).or_default().push(idx);
    }

    let mut scores = vec![0.0; records.len()];
    for (key, indices) in &groups {
        let latencies: Vec<f64> = indices.iter().map(|&i| records[i].latency_mean).collect();
        let z = metrics::z_scores(&latencies);
        debug!(scenario = %key, rounds = indices.len(), "scored scenario");
        for (&i, score) in indices.iter().zip(z) {
            scores[i] = score;
        }
    }

    records
        .iter()
        .zip(scores)
        .map(|(record, z_score)| ScoredRecord {
            record: record.clone(),
            z_score,
            kept: z_score.abs() <= threshold.get(),
        })
        .collect()
}

/// Drop every round whose |Z| exceeds `threshold`.
pub fn filter_outliers(records: &[RawRecord], threshold: Threshold) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for scored in score_records(records, threshold) {
        if scored.kept {
            outcome.kept.push(scored.record);
        } else {
            outcome.outliers.push(scored);
        }
    }
    outcome
}
