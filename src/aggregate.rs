use crate::metrics;
use crate::model::{RawRecord, ScenarioAggregate, ScenarioKey};
use std::collections::BTreeMap;

/// Reduce per-round records into one statistics row per scenario, ordered by scenario key.
/// Scenarios with no rows produce nothing.
pub fn aggregate(records: &[RawRecord]) -> Vec<ScenarioAggregate> {
    let mut groups: BTreeMap<ScenarioKey, Vec<&RawRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.scenario()).or_default().push(record);
    }

    groups
        .into_iter()
        .filter_map(|(key, rounds)| {
            let latencies: Vec<f64> = rounds.iter().map(|r| r.latency_mean).collect();
            let stats = metrics::compute_latency_metrics(&latencies)?;
            Some(ScenarioAggregate {
                servers: key.servers,
                clients: key.clients,
                messages_per_client: key.messages_per_client,
                mean_latency: stats.mean,
                median_latency: stats.median,
                min_latency: stats.min,
                max_latency: stats.max,
                std_dev_latency: stats.std_dev,
                total_successes: rounds.iter().map(|r| r.success_count).sum(),
                total_failures: rounds.iter().map(|r| r.failure_count).sum(),
                runs_remaining: rounds.len(),
            })
        })
        .collect()
}
