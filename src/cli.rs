use crate::model::{ReportConfig, ReportSummary, Threshold};
use crate::{aggregate, charts, loader, outlier, text_summary};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "loadtest-report",
    version,
    about = "Aggregate load-test rounds per scenario, drop Z-score outliers and chart the results"
)]
pub struct Cli {
    /// Path to the consolidated CSV written by the load client
    #[arg(long, default_value = "full_load_test_results.csv")]
    pub csv: PathBuf,

    /// Z-score cutoff; rounds with |z| above it are removed
    #[arg(long, default_value_t = Threshold::DEFAULT, value_parser = parse_threshold)]
    pub z_threshold: f64,

    /// Skip outlier removal and aggregate every round
    #[arg(long)]
    pub no_outlier_filter: bool,

    /// Directory for chart images (defaults to the CSV's directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Rows shown in the raw data and aggregate previews
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,

    /// Print the report as JSON instead of the text previews
    #[arg(long)]
    pub json: bool,

    /// Export the report (aggregates and outliers) as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Export the aggregate table as CSV
    #[arg(long)]
    pub export_csv: Option<PathBuf>,
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    Threshold::new(value)
        .map(Threshold::get)
        .ok_or_else(|| format!("threshold must be a positive number, got {value}"))
}

/// Build a `ReportConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ReportConfig {
    let threshold = if args.no_outlier_filter {
        None
    } else {
        Some(Threshold::new(args.z_threshold).unwrap_or_default())
    };
    ReportConfig {
        csv_path: args.csv.clone(),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| charts::data::default_output_dir(&args.csv)),
        threshold,
        preview_rows: args.preview_rows,
        json: args.json,
        export_json: args.export_json.clone(),
        export_csv: args.export_csv.clone(),
    }
}

pub fn run(args: Cli) -> Result<()> {
    #[cfg(not(feature = "charts"))]
    {
        anyhow::bail!(
            "chart rendering is not available in this build; rebuild with `--features charts`"
        );
    }

    #[cfg(feature = "charts")]
    {
        let cfg = build_config(&args);
        run_report(&cfg)
    }
}

/// Load, filter, aggregate and export. Chart rendering happens last.
#[cfg(feature = "charts")]
fn run_report(cfg: &ReportConfig) -> Result<()> {
    let raw = loader::load_records(&cfg.csv_path)
        .with_context(|| format!("failed to load {}", cfg.csv_path.display()))?;
    info!(rows = raw.len(), "loaded load-test results");

    let (kept, outliers) = match cfg.threshold {
        Some(threshold) => {
            let outcome = outlier::filter_outliers(&raw, threshold);
            (outcome.kept, outcome.outliers)
        }
        None => (raw.clone(), Vec::new()),
    };
    debug!(kept = kept.len(), dropped = outliers.len(), "outlier filter done");

    let summary = ReportSummary {
        generated_utc: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
        source: cfg.csv_path.clone(),
        z_threshold: cfg.threshold,
        rows_before_filter: raw.len(),
        rows_after_filter: kept.len(),
        outliers,
        aggregates: aggregate::aggregate(&kept),
    };

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let sections = [
            text_summary::build_raw_preview(&summary, &raw, cfg.preview_rows),
            text_summary::build_filter_report(&summary),
            text_summary::build_aggregate_preview(&summary.aggregates, cfg.preview_rows),
        ];
        for section in sections {
            for line in section.lines {
                println!("{line}");
            }
        }
    }

    handle_exports(cfg, &summary)?;

    let outcomes = charts::render_all(&summary.aggregates, &cfg.output_dir, cfg.file_suffix());
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    for outcome in &outcomes {
        match &outcome.error {
            None => eprintln!("Saved chart: {}", outcome.path.display()),
            Some(e) => eprintln!("Chart failed: {}: {e:#}", outcome.path.display()),
        }
    }
    info!(
        charts = outcomes.len() - failed,
        failed, "chart generation finished"
    );
    Ok(())
}

/// Handle export operations (JSON and CSV); errors propagate.
fn handle_exports(cfg: &ReportConfig, summary: &ReportSummary) -> Result<()> {
    if let Some(p) = cfg.export_json.as_deref() {
        crate::storage::export_json(p, summary)?;
        eprintln!("Exported JSON: {}", p.display());
    }
    if let Some(p) = cfg.export_csv.as_deref() {
        crate::storage::export_csv(p, &summary.aggregates)?;
        eprintln!("Exported CSV: {}", p.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_load_client_output() {
        let args = Cli::parse_from(["loadtest-report"]);
        assert_eq!(args.csv, PathBuf::from("full_load_test_results.csv"));
        assert_eq!(args.z_threshold, 3.0);
        let cfg = build_config(&args);
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert_eq!(cfg.threshold, Some(Threshold::default()));
        assert_eq!(cfg.file_suffix(), "_cleaned");
        assert_eq!(cfg.preview_rows, 5);
    }

    #[test]
    fn charts_go_next_to_the_csv() {
        let args = Cli::parse_from(["loadtest-report", "--csv", "runs/day1/results.csv"]);
        assert_eq!(build_config(&args).output_dir, PathBuf::from("runs/day1"));

        let args = Cli::parse_from([
            "loadtest-report",
            "--csv",
            "runs/day1/results.csv",
            "--output-dir",
            "plots",
        ]);
        assert_eq!(build_config(&args).output_dir, PathBuf::from("plots"));
    }

    #[test]
    fn basic_variant_has_no_threshold_or_suffix() {
        let args = Cli::parse_from(["loadtest-report", "--no-outlier-filter"]);
        let cfg = build_config(&args);
        assert!(cfg.threshold.is_none());
        assert_eq!(cfg.file_suffix(), "");
    }

    #[test]
    fn threshold_must_be_positive() {
        assert!(Cli::try_parse_from(["loadtest-report", "--z-threshold", "2.5"]).is_ok());
        assert!(Cli::try_parse_from(["loadtest-report", "--z-threshold", "0"]).is_err());
        assert!(Cli::try_parse_from(["loadtest-report", "--z-threshold", "-1"]).is_err());
        assert!(Cli::try_parse_from(["loadtest-report", "--z-threshold", "inf"]).is_err());
        assert!(Cli::try_parse_from(["loadtest-report", "--z-threshold", "abc"]).is_err());
    }
}
