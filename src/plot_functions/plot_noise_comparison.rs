// src/plot_functions/plot_noise_comparison.rs

use ndarray::Array3;
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::constants::{COLOR_DIFFERENCE, COLOR_NOISY_CHANNEL, COLOR_PRODUCT, LINE_WIDTH_PLOT};
use crate::data_analysis::signal_ops::{column_trace, compare_channels, ChannelComparison};
use crate::error::Result;
use crate::plot_framework::{draw_grid_plot, GridPanel, PlotConfig, PlotSeries};
use crate::plot_functions::{output_file, sanitize_for_filename};

pub const NOISE_GRID: (usize, usize) = (3, 2);

/// Channels picked by the user for the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSelection {
    pub first: usize,
    pub second: usize,
    pub noisy: usize,
}

fn single_trace_panel(
    title: String,
    label: &str,
    y_label: &str,
    data: Vec<(f64, f64)>,
    color: plotters::style::RGBColor,
) -> PlotConfig {
    PlotConfig::fitted(
        title,
        vec![PlotSeries {
            data,
            label: label.to_string(),
            color,
            stroke_width: LINE_WIDTH_PLOT,
        }],
        "Time (samples)",
        y_label,
        vec![0.0],
    )
}

/// Noisy channel on the left (two rows), product and difference stacked on
/// the right. Every panel shows the first epoch.
pub fn noise_comparison_panels(
    name: &str,
    comparison: &ChannelComparison,
    selection: ChannelSelection,
) -> Vec<GridPanel> {
    let noisy = single_trace_panel(
        format!("Channel {} with noise of '{name}' vs time", selection.noisy + 1),
        "Channel with noise",
        "Amplitude (channel + noise)",
        column_trace(&comparison.noisy.view(), 0),
        *COLOR_NOISY_CHANNEL,
    );
    let product = single_trace_panel(
        format!("Product of channels of '{name}' vs time"),
        "Product",
        "Amplitude (product)",
        column_trace(&comparison.product.view(), 0),
        *COLOR_PRODUCT,
    );
    let difference = single_trace_panel(
        format!("Difference of channels of '{name}' vs time"),
        "Difference",
        "Amplitude (difference)",
        column_trace(&comparison.difference.view(), 0),
        *COLOR_DIFFERENCE,
    );

    vec![
        GridPanel {
            row: 0,
            col: 0,
            row_span: 2,
            col_span: 1,
            config: noisy,
        },
        GridPanel {
            row: 0,
            col: 1,
            row_span: 1,
            col_span: 1,
            config: product,
        },
        GridPanel {
            row: 1,
            col: 1,
            row_span: 1,
            col_span: 1,
            config: difference,
        },
    ]
}

/// Generates the noise/arithmetic comparison figure.
pub fn plot_noise_comparison<R: Rng + ?Sized>(
    name: &str,
    matrix: &Array3<f64>,
    selection: ChannelSelection,
    noise_std_dev: f64,
    rng: &mut R,
    output_dir: &Path,
    root_name: &str,
) -> Result<PathBuf> {
    let comparison = compare_channels(
        matrix,
        selection.first,
        selection.second,
        selection.noisy,
        noise_std_dev,
        rng,
    )?;
    let panels = noise_comparison_panels(name, &comparison, selection);
    let output_path = output_file(
        output_dir,
        root_name,
        &format!(
            "{}_noise_ch{}_ch{}_ch{}",
            sanitize_for_filename(name),
            selection.first,
            selection.second,
            selection.noisy
        ),
    )?;
    let (rows, cols) = NOISE_GRID;
    draw_grid_plot(
        &output_path,
        &format!("{root_name} - {name}"),
        "Noise",
        rows,
        cols,
        &panels,
    )?;
    Ok(output_path)
}
