use super::data::{LatencyChart, OutcomeChart};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const LINE_CHART_SIZE: (u32, u32) = (1400, 800);
const BAR_CHART_SIZE: (u32, u32) = (1600, 800);
const FONT: &str = "sans-serif";

const SUCCESS_COLOR: RGBColor = RGBColor(144, 238, 144);
const FAILURE_COLOR: RGBColor = RGBColor(250, 128, 114);

/// Draw mean latency lines with one-std-dev error bars and write the PNG to `path`.
pub fn render_latency_chart(chart: &LatencyChart, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, LINE_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_lo = chart.x_ticks.first().copied().unwrap_or(0) as f64;
    let x_hi = chart.x_ticks.last().copied().unwrap_or(1) as f64;
    let x_pad = ((x_hi - x_lo) * 0.05).max(1.0);
    let y_lo = chart.y_min();
    let y_hi = chart.y_max().max(1.0) * 1.1;

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.title(), (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((x_lo - x_pad)..(x_hi + x_pad), y_lo..y_hi)?;

    ctx.configure_mesh()
        .x_desc(chart.axis.x_label())
        .y_desc("Mean latency (ms)")
        .x_labels(0)
        .y_label_formatter(&|y| format!("{y:.1}"))
        .label_style((FONT, 16))
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        ctx.draw_series(LineSeries::new(
            series.points.iter().map(|p| (p.x as f64, p.mean)),
            color.stroke_width(2),
        ))?
        .label(series.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        ctx.draw_series(series.points.iter().map(|p| {
            ErrorBar::new_vertical(
                p.x as f64,
                p.mean - p.std_dev,
                p.mean,
                p.mean + p.std_dev,
                color.stroke_width(1),
                10,
            )
        }))?;
        ctx.draw_series(
            series
                .points
                .iter()
                .map(|p| Circle::new((p.x as f64, p.mean), 4, color.filled())),
        )?;
    }

    // Ticks go on the measured client/server counts only.
    let tick_style = (FONT, 16)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (x, label) in chart.tick_labels() {
        let (px, py) = ctx.backend_coord(&(x, y_lo));
        root.draw(&PathElement::new(vec![(px, py), (px, py + 5)], BLACK))?;
        root.draw(&Text::new(label, (px, py + 8), tick_style.clone()))?;
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font((FONT, 16))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Draw paired success/failure bars per scenario and write the PNG to `path`.
pub fn render_outcome_chart(chart: &OutcomeChart, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, BAR_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = chart.bars.len();
    let y_hi = (chart.y_max().max(1) as f64) * 1.1;
    let width = 0.35;

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.title(), (FONT, 28))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.75..(n as f64 - 0.25), 0f64..y_hi)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc("Scenario (servers-clients)")
        .y_desc("Total count")
        .y_label_formatter(&|y| format!("{y:.0}"))
        .label_style((FONT, 16))
        .draw()?;

    ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
        let x = i as f64;
        Rectangle::new(
            [(x - width, 0.0), (x, bar.successes as f64)],
            SUCCESS_COLOR.filled(),
        )
    }))?
    .label("Total successes")
    .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], SUCCESS_COLOR.filled()));

    ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
        let x = i as f64;
        Rectangle::new(
            [(x, 0.0), (x + width, bar.failures as f64)],
            FAILURE_COLOR.filled(),
        )
    }))?
    .label("Total failures")
    .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], FAILURE_COLOR.filled()));

    // Scenario labels are drawn by hand so each one sits under its own bar pair.
    let label_style = (FONT, 14)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK);
    for (i, bar) in chart.bars.iter().enumerate() {
        let (px, py) = ctx.backend_coord(&(i as f64, 0.0));
        root.draw(&Text::new(bar.label.clone(), (px + 7, py + 8), label_style.clone()))?;
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font((FONT, 16))
        .draw()?;

    root.present()?;
    Ok(())
}
