//! File exports of a finished report.

use crate::model::{ReportSummary, ScenarioAggregate};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the whole summary (aggregates plus outlier report) as pretty JSON.
pub fn export_json(path: &Path, summary: &ReportSummary) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, summary)
        .with_context(|| format!("serialize report to {}", path.display()))?;
    out.write_all(b"\n")?;
    out.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// Write the aggregate table as CSV, one row per scenario.
pub fn export_csv(path: &Path, aggregates: &[ScenarioAggregate]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for row in aggregates {
        writer
            .serialize(row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
