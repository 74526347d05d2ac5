use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Column names of the load-test results file, in the order the load client writes them.
pub const COLUMNS: [&str; 11] = [
    "Rodada",
    "Servidores",
    "Clientes",
    "MensagensPorCliente",
    "LatenciaMedia(ms)",
    "LatenciaMin(ms)",
    "LatenciaMax(ms)",
    "LatenciaMediana(ms)",
    "LatenciaStdDev(ms)",
    "Sucessos",
    "Falhas",
];

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub csv_path: PathBuf,
    pub output_dir: PathBuf,
    /// `None` runs the basic variant without outlier removal.
    pub threshold: Option<Threshold>,
    pub preview_rows: usize,
    pub json: bool,
    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl ReportConfig {
    /// Suffix appended to chart file names for the outlier-aware variant.
    pub fn file_suffix(&self) -> &'static str {
        if self.threshold.is_some() {
            "_cleaned"
        } else {
            ""
        }
    }
}

/// Z-score cutoff. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: f64 = 3.0;

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One executed test round, as written by the load client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Rodada")]
    pub round: u32,
    #[serde(rename = "Servidores")]
    pub server_count: u32,
    #[serde(rename = "Clientes")]
    pub client_count: u32,
    #[serde(rename = "MensagensPorCliente")]
    pub messages_per_client: u32,
    #[serde(rename = "LatenciaMedia(ms)")]
    pub latency_mean: f64,
    #[serde(rename = "LatenciaMin(ms)")]
    pub latency_min: f64,
    #[serde(rename = "LatenciaMax(ms)")]
    pub latency_max: f64,
    #[serde(rename = "LatenciaMediana(ms)")]
    pub latency_median: f64,
    #[serde(rename = "LatenciaStdDev(ms)")]
    pub latency_std_dev: f64,
    #[serde(rename = "Sucessos")]
    pub success_count: u64,
    #[serde(rename = "Falhas")]
    pub failure_count: u64,
}

impl RawRecord {
    pub fn scenario(&self) -> ScenarioKey {
        ScenarioKey {
            servers: self.server_count,
            clients: self.client_count,
            messages_per_client: self.messages_per_client,
        }
    }

    /// Round and scenario fields paired with their column names; all must be positive.
    pub fn identifiers(&self) -> [(&'static str, u32); 4] {
        [
            ("Rodada", self.round),
            ("Servidores", self.server_count),
            ("Clientes", self.client_count),
            ("MensagensPorCliente", self.messages_per_client),
        ]
    }

    /// Latency fields paired with their column names, for validation and display.
    pub fn latencies(&self) -> [(&'static str, f64); 5] {
        [
            ("LatenciaMedia(ms)", self.latency_mean),
            ("LatenciaMin(ms)", self.latency_min),
            ("LatenciaMax(ms)", self.latency_max),
            ("LatenciaMediana(ms)", self.latency_median),
            ("LatenciaStdDev(ms)", self.latency_std_dev),
        ]
    }
}

/// A test configuration. Rounds sharing a key are repeated measurements of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScenarioKey {
    pub servers: u32,
    pub clients: u32,
    pub messages_per_client: u32,
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S{}-C{}-M{}",
            self.servers, self.clients, self.messages_per_client
        )
    }
}

/// A round annotated with its Z-score within its scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: RawRecord,
    pub z_score: f64,
    pub kept: bool,
}

/// Per-scenario statistics over the rounds that survived filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioAggregate {
    #[serde(rename = "Servidores")]
    pub servers: u32,
    #[serde(rename = "Clientes")]
    pub clients: u32,
    #[serde(rename = "MensagensPorCliente")]
    pub messages_per_client: u32,
    #[serde(rename = "AvgLatencyAcrossRuns")]
    pub mean_latency: f64,
    #[serde(rename = "MedianLatencyAcrossRuns")]
    pub median_latency: f64,
    #[serde(rename = "MinLatencyAcrossRuns")]
    pub min_latency: f64,
    #[serde(rename = "MaxLatencyAcrossRuns")]
    pub max_latency: f64,
    #[serde(rename = "StdDevLatencyAcrossRuns")]
    pub std_dev_latency: f64,
    #[serde(rename = "TotalSucessos")]
    pub total_successes: u64,
    #[serde(rename = "TotalFalhas")]
    pub total_failures: u64,
    #[serde(rename = "NumRunsRemaining")]
    pub runs_remaining: usize,
}

impl ScenarioAggregate {
    pub fn scenario(&self) -> ScenarioKey {
        ScenarioKey {
            servers: self.servers,
            clients: self.clients,
            messages_per_client: self.messages_per_client,
        }
    }
}

/// Everything a run produces before rendering, as printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub generated_utc: String,
    pub source: PathBuf,
    pub z_threshold: Option<Threshold>,
    pub rows_before_filter: usize,
    pub rows_after_filter: usize,
    pub outliers: Vec<ScoredRecord>,
    pub aggregates: Vec<ScenarioAggregate>,
}
