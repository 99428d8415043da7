use std::collections::HashMap;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::models::{power, PowerTable};
use crate::utils::errors::PowerError;

/// Options for the stacked area chart.
///
/// Named fields instead of a long positional argument list, so the
/// recognized knobs are self-documenting. `start`/`end` restrict the
/// plotted window (inclusive calendar dates); `scale_factors` multiplies
/// the named columns before stacking without touching the caller's table.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Columns to stack, bottom band first
    pub columns_to_plot: Vec<String>,
    /// Per-column multiplier; columns not listed keep factor 1.0
    pub scale_factors: HashMap<String, f64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub title: String,
    /// Overlay TotalLoad as a separate line on the same axes
    pub plot_load: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            columns_to_plot: Vec::new(),
            scale_factors: HashMap::new(),
            start: None,
            end: None,
            title: "Danmarks elsystem".to_string(),
            plot_load: true,
            width: 1280,
            height: 640,
        }
    }
}

/// One filled band of the stacked chart
#[derive(Debug, Clone)]
pub struct StackBand {
    pub column: String,
    pub label: String,
    pub color: RGBColor,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Fully computed chart data, ready to draw.
///
/// This is the explicit figure handle: all filtering, scaling and stacking
/// happens here, so tests can check the numbers without a rendering backend.
#[derive(Debug, Clone)]
pub struct PreparedChart {
    pub timestamps: Vec<NaiveDateTime>,
    pub bands: Vec<StackBand>,
    /// Legend label and values for the load overlay, if requested
    pub load: Option<(String, Vec<f64>)>,
    /// Highest stacked total, before the 5% axis headroom
    pub y_max: f64,
}

/// Validate, filter, scale and stack a table into a [`PreparedChart`].
///
/// Bands stack bottom-to-top in `columns_to_plot` order. The input table is
/// never modified; scaling operates on a copy.
pub fn prepare_chart(
    table: &PowerTable,
    options: &PlotOptions,
) -> Result<PreparedChart, PowerError> {
    for column in &options.columns_to_plot {
        if !table.has_column(column) {
            return Err(PowerError::UnknownColumn(column.clone()));
        }
    }
    if options.plot_load && !table.has_column(power::TOTAL_LOAD) {
        return Err(PowerError::UnknownColumn(power::TOTAL_LOAD.to_string()));
    }

    let restricted = table.restricted(options.start, options.end);
    if restricted.is_empty() {
        let open = || "(open)".to_string();
        return Err(PowerError::EmptyRange {
            start: options.start.map(|d| d.to_string()).unwrap_or_else(open),
            end: options.end.map(|d| d.to_string()).unwrap_or_else(open),
        });
    }
    let scaled = restricted.scaled(&options.scale_factors);
    debug!(
        "prepared window of {} rows from table of {}",
        scaled.len(),
        table.len()
    );

    let mut running = vec![0.0; scaled.len()];
    let mut bands = Vec::with_capacity(options.columns_to_plot.len());
    for column in &options.columns_to_plot {
        let values = scaled
            .column(column)
            .ok_or_else(|| PowerError::UnknownColumn(column.clone()))?;
        let lower = running.clone();
        let upper: Vec<f64> = lower.iter().zip(values).map(|(l, v)| l + v).collect();
        bands.push(StackBand {
            column: column.clone(),
            label: series_label(column, &options.scale_factors),
            color: power::series_color(column),
            lower,
            upper: upper.clone(),
        });
        running = upper;
    }

    // Axis headroom tracks the stacked generation, as the original chart did
    let y_max = running.iter().copied().fold(0.0, f64::max);

    let load = if options.plot_load {
        let values = scaled
            .column(power::TOTAL_LOAD)
            .ok_or_else(|| PowerError::UnknownColumn(power::TOTAL_LOAD.to_string()))?
            .to_vec();
        Some((load_label(&options.scale_factors), values))
    } else {
        None
    };

    Ok(PreparedChart {
        timestamps: scaled.timestamps().to_vec(),
        bands,
        load,
        y_max,
    })
}

/// Legend label: Danish technology name, raw column name as fallback,
/// with the scale factor appended when one applies
fn series_label(column: &str, scale_factors: &HashMap<String, f64>) -> String {
    let base = power::danish_label(column).unwrap_or(column);
    match scale_factors.get(column) {
        Some(factor) => format!("{} (×{})", base, factor),
        None => base.to_string(),
    }
}

fn load_label(scale_factors: &HashMap<String, f64>) -> String {
    match scale_factors.get(power::TOTAL_LOAD) {
        Some(factor) => format!("Forbrug (×{})", factor),
        None => "Forbrug".to_string(),
    }
}

/// Draw a prepared chart as a PNG file at `path`
pub fn render_chart(
    prepared: &PreparedChart,
    options: &PlotOptions,
    path: &Path,
) -> Result<(), PowerError> {
    let render_err = |e: &dyn std::fmt::Display| PowerError::Render(e.to_string());

    let (x_min, x_max) = match (prepared.timestamps.first(), prepared.timestamps.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(PowerError::Render("nothing to draw".to_string())),
    };
    let y_max = (prepared.y_max * 1.05).max(1.0);
    let date_format = label_format(x_max - x_min);

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 40.0).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(RangedDateTime::from(x_min..x_max), 0f64..y_max)
        .map_err(|e| render_err(&e))?;

    chart
        .configure_mesh()
        .x_desc("Dato")
        .y_desc("Effekt (MW)")
        .x_label_formatter(&move |t: &NaiveDateTime| t.format(date_format).to_string())
        .draw()
        .map_err(|e| render_err(&e))?;

    for band in &prepared.bands {
        let upper: Vec<(NaiveDateTime, f64)> = prepared
            .timestamps
            .iter()
            .zip(&band.upper)
            .map(|(t, v)| (*t, *v))
            .collect();
        let mut polygon = upper.clone();
        polygon.extend(
            prepared
                .timestamps
                .iter()
                .zip(&band.lower)
                .rev()
                .map(|(t, v)| (*t, *v)),
        );

        let color = band.color;
        chart
            .draw_series(std::iter::once(Polygon::new(polygon, color.mix(0.6))))
            .map_err(|e| render_err(&e))?
            .label(band.label.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.mix(0.6).filled())
            });

        // Thin black edge along the top of each band
        chart
            .draw_series(std::iter::once(PathElement::new(upper, BLACK.stroke_width(1))))
            .map_err(|e| render_err(&e))?;
    }

    if let Some((label, values)) = &prepared.load {
        let line: Vec<(NaiveDateTime, f64)> = prepared
            .timestamps
            .iter()
            .zip(values)
            .map(|(t, v)| (*t, *v))
            .collect();
        chart
            .draw_series(std::iter::once(PathElement::new(line, BLACK.stroke_width(2))))
            .map_err(|e| render_err(&e))?
            .label(label.clone())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLACK.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()
        .map_err(|e| render_err(&e))?;

    root.present().map_err(|e| render_err(&e))?;
    info!("chart written to {}", path.display());
    Ok(())
}

/// Prepare and render in one call. The rendered PNG at `path` is the
/// documented output form of the plotter.
pub fn plot_power_system(
    table: &PowerTable,
    options: &PlotOptions,
    path: &Path,
) -> Result<(), PowerError> {
    let prepared = prepare_chart(table, options)?;
    render_chart(&prepared, options, path)
}

/// Pick an axis label format to match the plotted span
fn label_format(span: Duration) -> &'static str {
    if span <= Duration::days(1) {
        "%H:%M"
    } else if span <= Duration::days(14) {
        "%d-%m %H:%M"
    } else if span <= Duration::days(365) {
        "%d-%m-%Y"
    } else {
        "%Y-%m"
    }
}
