// src/plot_framework.rs

use plotters::backend::{BitMapBackend, DrawingBackend};
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Rectangle, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use log::{info, warn};
use ndarray::Array1;
use ndarray_stats::QuantileExt;

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::constants::{
    CHART_HEIGHT, CHART_WIDTH, COLOR_ERROR_BAR, COLOR_REFERENCE_LINE, ERROR_BAR_CAP_HALF_WIDTH,
    FONT_FAMILY, FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND,
    FONT_SIZE_MAIN_TITLE, FONT_SIZE_MESSAGE, LINE_WIDTH_ERROR_BAR, LINE_WIDTH_LEGEND,
    LINE_WIDTH_REFERENCE, PLOT_HEIGHT, PLOT_WIDTH, REFERENCE_LINE_DASHES, SCATTER_POINT_SIZE,
};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Y tick label: "k"/"M" notation for large values, one decimal for small
/// fractional values, integers otherwise.
pub fn format_y_tick(y: f64, y_label: &str) -> String {
    // Below the one-decimal resolution; avoids "-0.0" and "-0".
    let y = if y.abs() < 5e-2 { 0.0 } else { y };
    if y.abs() >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if y.abs() >= 1000.0 {
        format!("{:.0}k", y / 1000.0)
    } else if y.abs() < 10.0 && (y.fract() != 0.0 || y_label.contains("Amplitude")) {
        format!("{:.1}", y)
    } else {
        format!("{:.0}", y)
    }
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
    /// Y values drawn as dashed horizontal lines (e.g. the zero baseline).
    pub reference_lines: Vec<f64>,
}

impl PlotConfig {
    /// Builds a config whose ranges cover every series point, padded.
    pub fn fitted(
        title: String,
        series: Vec<PlotSeries>,
        x_label: &str,
        y_label: &str,
        reference_lines: Vec<f64>,
    ) -> PlotConfig {
        let points: Vec<(f64, f64)> = series
            .iter()
            .flat_map(|s| s.data.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        let xs: Array1<f64> = points.iter().map(|&(x, _)| x).collect();
        let ys: Array1<f64> = points
            .iter()
            .map(|&(_, y)| y)
            .chain(reference_lines.iter().copied())
            .collect();

        let (x_range, y_range) = match (xs.min(), xs.max(), ys.min(), ys.max()) {
            (Ok(&x_min), Ok(&x_max), Ok(&y_min), Ok(&y_max)) => {
                let x_range = if x_max > x_min {
                    x_min..x_max
                } else {
                    (x_min - 0.5)..(x_max + 0.5)
                };
                let (y_lo, y_hi) = calculate_range(y_min, y_max);
                (x_range, y_lo..y_hi)
            }
            _ => (0.0..0.0, 0.0..0.0),
        };

        PlotConfig {
            title,
            x_range,
            y_range,
            series,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            reference_lines,
        }
    }

    pub fn has_data(&self) -> bool {
        self.series.iter().any(|s| !s.data.is_empty())
    }

    pub fn has_valid_ranges(&self) -> bool {
        self.x_range.end > self.x_range.start && self.y_range.end > self.y_range.start
    }
}

#[derive(Clone)]
pub struct BarChartConfig {
    pub title: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    /// Optional (low, high) whisker per bar.
    pub intervals: Vec<Option<(f64, f64)>>,
    pub x_label: String,
    pub y_label: String,
    pub color: RGBColor,
}

#[derive(Clone)]
pub struct ScatterConfig {
    pub title: String,
    pub points: Vec<(f64, f64)>,
    pub x_label: String,
    pub y_label: String,
    pub color: RGBColor,
}

/// A chart placed on a grid cell, optionally spanning several rows/columns.
#[derive(Clone)]
pub struct GridPanel {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub config: PlotConfig,
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &Area,
    panel_title: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{panel_title} Data Unavailable:\n{reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;
    let estimated_text_height = lines.len().saturating_mul(estimated_line_height as usize) as i32;

    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let center_y = height as i32 / 2 - estimated_text_height / 2;

    let text_style = (FONT_FAMILY, FONT_SIZE_MESSAGE).into_font().color(&RED);
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.to_string(),
            (center_x, center_y + i as i32 * estimated_line_height),
            text_style.clone(),
        ))?;
    }
    Ok(())
}

/// Draws one line chart with legend and dashed reference lines.
pub fn draw_line_chart(area: &Area, plot_config: &PlotConfig) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, (FONT_FAMILY, FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(10)
        .y_labels(10)
        .y_label_formatter(&|y| format_y_tick(*y, &plot_config.y_label))
        .light_line_style(WHITE.mix(0.7))
        .label_style((FONT_FAMILY, FONT_SIZE_AXIS_LABEL))
        .draw()?;

    // Reference lines go under the data, dashed.
    let (x0, x1) = (plot_config.x_range.start, plot_config.x_range.end);
    let segment_length = (x1 - x0) / (REFERENCE_LINE_DASHES as f64 * 2.0);
    for &level in &plot_config.reference_lines {
        if !level.is_finite() || level < plot_config.y_range.start || level > plot_config.y_range.end
        {
            continue;
        }
        for i in 0..REFERENCE_LINE_DASHES {
            let x_start = x0 + (i as f64 * 2.0) * segment_length;
            let x_end = (x_start + segment_length).min(x1);
            chart.draw_series(LineSeries::new(
                vec![(x_start, level), (x_end, level)],
                COLOR_REFERENCE_LINE.stroke_width(LINE_WIDTH_REFERENCE),
            ))?;
        }
    }

    let mut legend_series_count = 0;
    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let series = chart.draw_series(LineSeries::new(
            s.data.iter().cloned(),
            s.color.stroke_width(s.stroke_width),
        ))?;

        if !s.label.is_empty() {
            series.label(&s.label).legend(move |(x, y)| {
                PathElement::new(
                    vec![(x, y), (x + 20, y)],
                    s.color.stroke_width(LINE_WIDTH_LEGEND),
                )
            });
            legend_series_count += 1;
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT_FAMILY, FONT_SIZE_LEGEND))
            .draw()?;
    }
    Ok(())
}

/// Draws one bar per category, bars starting at zero.
pub fn draw_bar_chart(area: &Area, config: &BarChartConfig) -> Result<(), Box<dyn Error>> {
    let n = config.categories.len();
    let (min_val, max_val) = bar_value_bounds(config);
    let (y_lo, y_hi) = calculate_range(min_val, max_val);
    let y_lo = if min_val >= 0.0 { 0.0 } else { y_lo };
    let x_range = -0.5..(n as f64 - 0.5);

    let mut chart = ChartBuilder::on(area)
        .caption(&config.title, (FONT_FAMILY, FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_lo..y_hi)?;

    let categories = &config.categories;
    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_labels(n.clamp(1, 40))
        .x_label_formatter(&|x| category_label(*x, categories))
        .y_labels(10)
        .y_label_formatter(&|y| format_y_tick(*y, &config.y_label))
        .disable_x_mesh()
        .light_line_style(WHITE.mix(0.7))
        .label_style((FONT_FAMILY, FONT_SIZE_AXIS_LABEL))
        .draw()?;

    chart.draw_series(config.values.iter().enumerate().map(|(i, &v)| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, v)], config.color.filled())
    }))?;

    for (i, interval) in config.intervals.iter().enumerate() {
        let Some((lo, hi)) = *interval else {
            continue;
        };
        for path in whisker_paths(i as f64, lo, hi) {
            chart.draw_series(LineSeries::new(
                path,
                COLOR_ERROR_BAR.stroke_width(LINE_WIDTH_ERROR_BAR),
            ))?;
        }
    }
    Ok(())
}

/// Smallest and largest value a bar chart must show: zero, every bar top and
/// every whisker end.
pub fn bar_value_bounds(config: &BarChartConfig) -> (f64, f64) {
    let whisker_ends = config
        .intervals
        .iter()
        .flatten()
        .flat_map(|&(lo, hi)| [lo, hi]);
    config
        .values
        .iter()
        .copied()
        .chain(whisker_ends)
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Vertical whisker at bar `x` plus its two caps.
pub fn whisker_paths(x: f64, lo: f64, hi: f64) -> [Vec<(f64, f64)>; 3] {
    let w = ERROR_BAR_CAP_HALF_WIDTH;
    [
        vec![(x, lo), (x, hi)],
        vec![(x - w, lo), (x + w, lo)],
        vec![(x - w, hi), (x + w, hi)],
    ]
}

/// Category name for an x tick sitting on a bar centre, empty otherwise.
pub fn category_label(x: f64, categories: &[String]) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    categories
        .get(nearest as usize)
        .cloned()
        .unwrap_or_default()
}

pub fn draw_scatter_chart(area: &Area, config: &ScatterConfig) -> Result<(), Box<dyn Error>> {
    let fitted = PlotConfig::fitted(
        config.title.clone(),
        vec![PlotSeries {
            data: config.points.clone(),
            label: String::new(),
            color: config.color,
            stroke_width: 0,
        }],
        &config.x_label,
        &config.y_label,
        vec![],
    );
    let (x_lo, x_hi) = calculate_range(fitted.x_range.start, fitted.x_range.end);

    let mut chart = ChartBuilder::on(area)
        .caption(&config.title, (FONT_FAMILY, FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, fitted.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_labels(10)
        .y_labels(10)
        .y_label_formatter(&|y| format_y_tick(*y, &config.y_label))
        .light_line_style(WHITE.mix(0.7))
        .label_style((FONT_FAMILY, FONT_SIZE_AXIS_LABEL))
        .draw()?;

    chart.draw_series(
        config
            .points
            .iter()
            .map(|&p| Circle::new(p, SCATTER_POINT_SIZE, config.color.filled())),
    )?;
    Ok(())
}

fn draw_title(root_area: &Area, root_name: &str) -> Result<(), Box<dyn Error>> {
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        (FONT_FAMILY, FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    Ok(())
}

/// Renders a single bar chart image.
pub fn draw_bar_plot<'a>(
    output_path: &'a Path,
    root_name: &str,
    config: &BarChartConfig,
) -> Result<(), Box<dyn Error>>
where
    <BitMapBackend<'a> as DrawingBackend>::ErrorType: 'static,
{
    let root_area = BitMapBackend::new(output_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    draw_title(&root_area, root_name)?;
    let area = root_area.margin(50, 5, 5, 5);
    if config.values.is_empty() {
        draw_unavailable_message(&area, &config.title, "No data points")?;
    } else {
        draw_bar_chart(&area, config)?;
    }
    root_area.present()?;
    info!("Bar chart saved as '{}'.", output_path.display());
    Ok(())
}

/// Renders a single scatter plot image.
pub fn draw_scatter_plot<'a>(
    output_path: &'a Path,
    root_name: &str,
    config: &ScatterConfig,
) -> Result<(), Box<dyn Error>>
where
    <BitMapBackend<'a> as DrawingBackend>::ErrorType: 'static,
{
    let root_area = BitMapBackend::new(output_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    draw_title(&root_area, root_name)?;
    let area = root_area.margin(50, 5, 5, 5);
    if config.points.is_empty() {
        draw_unavailable_message(&area, &config.title, "No data points")?;
    } else {
        draw_scatter_chart(&area, config)?;
    }
    root_area.present()?;
    info!("Scatter plot saved as '{}'.", output_path.display());
    Ok(())
}

/// Pixel rectangle `(left, top, width, height)` of a panel on a
/// `rows` x `cols` grid covering `width` x `height` pixels.
pub fn panel_rect(
    panel: &GridPanel,
    rows: usize,
    cols: usize,
    width: u32,
    height: u32,
) -> (i32, i32, u32, u32) {
    let rows = rows.max(1) as u32;
    let cols = cols.max(1) as u32;
    let cell_w = width / cols;
    let cell_h = height / rows;
    let row = (panel.row as u32).min(rows - 1);
    let col = (panel.col as u32).min(cols - 1);
    let row_span = (panel.row_span.max(1) as u32).min(rows - row);
    let col_span = (panel.col_span.max(1) as u32).min(cols - col);
    (
        (col * cell_w) as i32,
        (row * cell_h) as i32,
        col_span * cell_w,
        row_span * cell_h,
    )
}

/// Creates a figure with panels laid out on a grid; a panel may span
/// several rows and columns.
pub fn draw_grid_plot<'a>(
    output_path: &'a Path,
    root_name: &str,
    plot_type_name: &str,
    rows: usize,
    cols: usize,
    panels: &[GridPanel],
) -> Result<(), Box<dyn Error>>
where
    <BitMapBackend<'a> as DrawingBackend>::ErrorType: 'static,
{
    let root_area = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    draw_title(&root_area, root_name)?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let (width, height) = margined_root_area.dim_in_pixel();
    let mut any_panel_plotted = false;

    for panel in panels {
        let (left, top, w, h) = panel_rect(panel, rows, cols, width, height);
        let area = margined_root_area
            .clone()
            .shrink((left, top), (w as i32, h as i32));
        let config = &panel.config;
        if config.has_data() && config.has_valid_ranges() {
            draw_line_chart(&area, config)?;
            any_panel_plotted = true;
        } else {
            let reason = if !config.has_data() {
                "No data points"
            } else {
                "Invalid ranges"
            };
            draw_unavailable_message(&area, &format!("{plot_type_name}: {}", config.title), reason)?;
        }
    }

    root_area.present()?;
    if any_panel_plotted {
        info!("Grid plot saved as '{}'.", output_path.display());
    } else {
        warn!(
            "'{}' saved with placeholder messages only: no panel had data to plot.",
            output_path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(row: usize, col: usize, row_span: usize, col_span: usize) -> GridPanel {
        GridPanel {
            row,
            col,
            row_span,
            col_span,
            config: PlotConfig::fitted(String::new(), vec![], "", "", vec![]),
        }
    }

    #[test]
    fn test_calculate_range() {
        assert_eq!(calculate_range(0.0, 10.0), (-1.5, 11.5));
        assert_eq!(calculate_range(10.0, 0.0), (-1.5, 11.5));
        assert_eq!(calculate_range(3.0, 3.0), (2.5, 3.5));
    }

    #[test]
    fn test_panel_rect_spans() {
        // 3x3 grid on 900x600 pixels: cells are 300x200.
        assert_eq!(panel_rect(&panel(1, 0, 2, 2), 3, 3, 900, 600), (0, 200, 600, 400));
        assert_eq!(panel_rect(&panel(0, 2, 1, 1), 3, 3, 900, 600), (600, 0, 300, 200));
        assert_eq!(panel_rect(&panel(2, 2, 1, 1), 3, 3, 900, 600), (600, 400, 300, 200));
        // Spans are clipped to the grid.
        assert_eq!(panel_rect(&panel(2, 1, 5, 5), 3, 2, 900, 600), (450, 400, 450, 200));
    }

    #[test]
    fn test_fitted_config_covers_series_and_reference() {
        let series = vec![PlotSeries {
            data: vec![(0.0, 2.0), (4.0, 6.0)],
            label: "s".to_string(),
            color: RGBColor(0, 0, 255),
            stroke_width: 1,
        }];
        let config = PlotConfig::fitted("t".to_string(), series, "x", "y", vec![0.0]);
        assert_eq!(config.x_range, 0.0..4.0);
        // y covers 0..6 plus 15% padding.
        assert!((config.y_range.start - -0.9).abs() < 1e-9);
        assert!((config.y_range.end - 6.9).abs() < 1e-9);
        assert!(config.has_data());
        assert!(config.has_valid_ranges());
    }

    #[test]
    fn test_fitted_config_without_data() {
        let config = PlotConfig::fitted("empty".to_string(), vec![], "x", "y", vec![]);
        assert!(!config.has_data());
        assert!(!config.has_valid_ranges());
    }

    #[test]
    fn test_category_label() {
        let cats = vec!["Low".to_string(), "High".to_string()];
        assert_eq!(category_label(0.0, &cats), "Low");
        assert_eq!(category_label(1.0, &cats), "High");
        assert_eq!(category_label(0.5, &cats), "");
        assert_eq!(category_label(2.0, &cats), "");
        assert_eq!(category_label(-1.0, &cats), "");
    }

    fn bar_config(values: Vec<f64>, intervals: Vec<Option<(f64, f64)>>) -> BarChartConfig {
        BarChartConfig {
            title: String::new(),
            categories: values.iter().map(|v| v.to_string()).collect(),
            values,
            intervals,
            x_label: String::new(),
            y_label: String::new(),
            color: RGBColor(0, 0, 255),
        }
    }

    #[test]
    fn test_bar_bounds_include_whiskers() {
        let config = bar_config(vec![10.0, 20.0], vec![Some((8.0, 12.0)), Some((15.0, 26.0))]);
        assert_eq!(bar_value_bounds(&config), (0.0, 26.0));

        let negative = bar_config(vec![-5.0, 3.0], vec![Some((-9.0, -1.0)), None]);
        assert_eq!(bar_value_bounds(&negative), (-9.0, 3.0));
    }

    #[test]
    fn test_whisker_paths() {
        let [stem, low_cap, high_cap] = whisker_paths(0.0, 1.0, 5.0);
        assert_eq!(stem, vec![(0.0, 1.0), (0.0, 5.0)]);
        assert_eq!(low_cap, vec![(-0.1, 1.0), (0.1, 1.0)]);
        assert_eq!(high_cap, vec![(-0.1, 5.0), (0.1, 5.0)]);
    }
}
