//! Chart generation for aggregated load-test results.
//!
//! `data` lays out the three chart families from the aggregate table; `render`
//! draws them to PNG with plotters and is only present with the `charts` feature.

pub mod data;
#[cfg(feature = "charts")]
mod render;

#[cfg(feature = "charts")]
use crate::model::ScenarioAggregate;
use std::path::PathBuf;
#[cfg(feature = "charts")]
use std::path::Path;
#[cfg(feature = "charts")]
use tracing::{info, warn};

/// Result of rendering one chart file. A failed chart never stops the others.
#[derive(Debug)]
pub struct ChartOutcome {
    pub path: PathBuf,
    pub error: Option<anyhow::Error>,
}

impl ChartOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Render every chart family into `dir`. Charts are attempted in order:
/// latency vs. clients, latency vs. servers, then success/failure totals.
#[cfg(feature = "charts")]
pub fn render_all(rows: &[ScenarioAggregate], dir: &Path, suffix: &str) -> Vec<ChartOutcome> {
    use data::{LatencyAxis, OutcomeChart};

    let mut outcomes = Vec::new();
    for axis in [LatencyAxis::Clients, LatencyAxis::Servers] {
        for chart in data::latency_charts(rows, axis) {
            let path = data::chart_path(dir, axis.file_stem(), chart.messages_per_client, suffix);
            let result = render::render_latency_chart(&chart, &path);
            outcomes.push(record(path, result));
        }
    }
    for chart in data::outcome_charts(rows) {
        let path = data::chart_path(
            dir,
            OutcomeChart::FILE_STEM,
            chart.messages_per_client,
            suffix,
        );
        let result = render::render_outcome_chart(&chart, &path);
        outcomes.push(record(path, result));
    }
    outcomes
}

#[cfg(feature = "charts")]
fn record(path: PathBuf, result: anyhow::Result<()>) -> ChartOutcome {
    match result {
        Ok(()) => {
            info!(path = %path.display(), "chart written");
            ChartOutcome { path, error: None }
        }
        Err(e) => {
            warn!(path = %path.display(), "chart failed: {e:#}");
            ChartOutcome {
                path,
                error: Some(e),
            }
        }
    }
}

#[cfg(all(test, feature = "charts"))]
mod tests {
    use super::*;

    fn row(servers: u32, clients: u32, msgs: u32) -> ScenarioAggregate {
        ScenarioAggregate {
            servers,
            clients,
            messages_per_client: msgs,
            mean_latency: 10.0 * servers as f64,
            median_latency: 10.0,
            min_latency: 5.0,
            max_latency: 20.0,
            std_dev_latency: 1.5,
            total_successes: 100,
            total_failures: 2,
            runs_remaining: 3,
        }
    }

    #[test]
    fn no_rows_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render_all(&[], dir.path(), "_cleaned").is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn one_attempt_per_family_and_message_count() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![row(1, 10, 1), row(2, 10, 1), row(1, 20, 5)];
        let outcomes = render_all(&rows, dir.path(), "_cleaned");
        let names: Vec<String> = outcomes
            .iter()
            .map(|o| o.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "avg_latency_vs_clients_msg1_cleaned.png",
                "avg_latency_vs_clients_msg5_cleaned.png",
                "avg_latency_vs_servers_msg1_cleaned.png",
                "avg_latency_vs_servers_msg5_cleaned.png",
                "total_success_failure_msg1_cleaned.png",
                "total_success_failure_msg5_cleaned.png",
            ]
        );
        assert!(outcomes.iter().all(|o| o.path.starts_with(dir.path())));
        for outcome in &outcomes {
            assert!(outcome.is_ok(), "{:?}", outcome.error);
            let meta = std::fs::metadata(&outcome.path).unwrap();
            assert!(meta.len() > 0, "{} is empty", outcome.path.display());
        }
    }

    #[tracing_test::traced_test]
    #[test]
    fn unwritable_directory_fails_each_chart_independently() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let rows = vec![row(1, 10, 1), row(1, 10, 2)];
        let outcomes = render_all(&rows, &missing, "");
        assert_eq!(outcomes.len(), 6);
        assert!(outcomes.iter().all(|o| !o.is_ok()));
        assert!(logs_contain("chart failed"));
    }
}
