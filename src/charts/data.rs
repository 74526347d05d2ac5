//! Chart layout derived from the aggregate table.
//!
//! Nothing here touches a drawing backend, so the grouping and ordering of
//! every chart can be checked without rendering.

use crate::model::ScenarioAggregate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which scenario dimension runs along the x axis of a latency chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyAxis {
    Clients,
    Servers,
}

impl LatencyAxis {
    fn x_of(self, row: &ScenarioAggregate) -> u32 {
        match self {
            LatencyAxis::Clients => row.clients,
            LatencyAxis::Servers => row.servers,
        }
    }

    fn series_of(self, row: &ScenarioAggregate) -> u32 {
        match self {
            LatencyAxis::Clients => row.servers,
            LatencyAxis::Servers => row.clients,
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            LatencyAxis::Clients => "avg_latency_vs_clients",
            LatencyAxis::Servers => "avg_latency_vs_servers",
        }
    }

    pub fn x_label(self) -> &'static str {
        match self {
            LatencyAxis::Clients => "Concurrent clients",
            LatencyAxis::Servers => "Server replicas",
        }
    }

    pub fn series_title(self) -> &'static str {
        match self {
            LatencyAxis::Clients => "servers",
            LatencyAxis::Servers => "clients",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyPoint {
    pub x: u32,
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatencySeries {
    pub label: String,
    pub points: Vec<LatencyPoint>,
}

/// One line chart: mean latency against clients or servers for a single message count.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyChart {
    pub axis: LatencyAxis,
    pub messages_per_client: u32,
    pub series: Vec<LatencySeries>,
    /// Every distinct x value across all scenarios, used as tick positions.
    pub x_ticks: Vec<u32>,
}

impl LatencyChart {
    pub fn title(&self) -> String {
        let what = match self.axis {
            LatencyAxis::Clients => "Clients",
            LatencyAxis::Servers => "Servers",
        };
        format!(
            "Mean latency vs. {what} ({} messages/client, rounds aggregated)",
            self.messages_per_client
        )
    }

    /// Tick positions and their labels. Only scenario values get a tick, so
    /// uneven client or server counts never show interpolated labels.
    pub fn tick_labels(&self) -> Vec<(f64, String)> {
        self.x_ticks
            .iter()
            .map(|&x| (x as f64, x.to_string()))
            .collect()
    }

    /// Upper bound of the y axis, covering every error bar.
    pub fn y_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.mean + p.std_dev)
            .fold(0.0, f64::max)
    }

    /// Lower bound of the y axis: 0 unless an error bar reaches below it.
    pub fn y_min(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.mean - p.std_dev)
            .fold(0.0, f64::min)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeBar {
    pub label: String,
    pub successes: u64,
    pub failures: u64,
}

/// Grouped success/failure bars for a single message count.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeChart {
    pub messages_per_client: u32,
    pub bars: Vec<OutcomeBar>,
}

impl OutcomeChart {
    pub const FILE_STEM: &'static str = "total_success_failure";

    pub fn title(&self) -> String {
        format!(
            "Total successes and failures over retained rounds ({} messages/client)",
            self.messages_per_client
        )
    }

    pub fn y_max(&self) -> u64 {
        self.bars
            .iter()
            .map(|b| b.successes.max(b.failures))
            .max()
            .unwrap_or(0)
    }
}

/// Scenario label used on the bar chart's x axis.
pub fn scenario_label(servers: u32, clients: u32) -> String {
    format!("S{servers}-C{clients}")
}

/// Build one latency chart per messages-per-client value, ascending.
pub fn latency_charts(rows: &[ScenarioAggregate], axis: LatencyAxis) -> Vec<LatencyChart> {
    let mut x_ticks: Vec<u32> = rows.iter().map(|r| axis.x_of(r)).collect();
    x_ticks.sort_unstable();
    x_ticks.dedup();

    let mut by_messages: BTreeMap<u32, BTreeMap<u32, Vec<LatencyPoint>>> = BTreeMap::new();
    for row in rows {
        by_messages
            .entry(row.messages_per_client)
            .or_default()
            .entry(axis.series_of(row))
            .or_default()
            .push(LatencyPoint {
                x: axis.x_of(row),
                mean: row.mean_latency,
                std_dev: row.std_dev_latency,
            });
    }

    by_messages
        .into_iter()
        .map(|(messages_per_client, series)| LatencyChart {
            axis,
            messages_per_client,
            series: series
                .into_iter()
                .map(|(value, mut points)| {
                    points.sort_by_key(|p| p.x);
                    LatencySeries {
                        label: format!("{value} {}", axis.series_title()),
                        points,
                    }
                })
                .collect(),
            x_ticks: x_ticks.clone(),
        })
        .collect()
}

/// Build one success/failure chart per messages-per-client value.
/// Bars are ordered by servers, then clients.
pub fn outcome_charts(rows: &[ScenarioAggregate]) -> Vec<OutcomeChart> {
    let mut by_messages: BTreeMap<u32, BTreeMap<(u32, u32), (u64, u64)>> = BTreeMap::new();
    for row in rows {
        let totals = by_messages
            .entry(row.messages_per_client)
            .or_default()
            .entry((row.servers, row.clients))
            .or_default();
        totals.0 += row.total_successes;
        totals.1 += row.total_failures;
    }

    by_messages
        .into_iter()
        .map(|(messages_per_client, scenarios)| OutcomeChart {
            messages_per_client,
            bars: scenarios
                .into_iter()
                .map(|((servers, clients), (successes, failures))| OutcomeBar {
                    label: scenario_label(servers, clients),
                    successes,
                    failures,
                })
                .collect(),
        })
        .collect()
}

/// `<stem>_msg<M><suffix>.png` inside `dir`.
pub fn chart_path(dir: &Path, stem: &str, messages_per_client: u32, suffix: &str) -> PathBuf {
    dir.join(format!("{stem}_msg{messages_per_client}{suffix}.png"))
}

/// Directory charts are written to by default: the CSV's own directory.
pub fn default_output_dir(csv_path: &Path) -> PathBuf {
    match csv_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
