// src/plot_functions/plot_matrix_overview.rs

use log::debug;
use ndarray::{Array3, Axis};
use plotters::style::RGBColor;
use std::path::{Path, PathBuf};

use crate::config::SignalPlotSettings;
use crate::constants::{
    COLOR_ALL_EPOCHS_MEAN, COLOR_CHANNEL_MEAN, LINE_WIDTH_PLOT, TRACE_PALETTE,
};
use crate::data_analysis::signal_ops::{
    column_trace, last_epochs, mean_along_axis, stacked_traces, CHANNEL_AXIS, EPOCH_AXIS,
    SAMPLE_AXIS,
};
use crate::error::Result;
use crate::plot_framework::{draw_grid_plot, GridPanel, PlotConfig, PlotSeries};
use crate::plot_functions::{output_file, sanitize_for_filename};

pub const OVERVIEW_GRID: (usize, usize) = (3, 3);

fn trace_color(i: usize) -> RGBColor {
    *TRACE_PALETTE[i % TRACE_PALETTE.len()]
}

/// The three panels of the overview figure:
/// stacked channel traces (averaged over epochs), the channel mean of the
/// first epoch, and the per-channel mean of the trailing epochs.
pub fn matrix_overview_panels(
    name: &str,
    matrix: &Array3<f64>,
    settings: &SignalPlotSettings,
) -> Result<Vec<GridPanel>> {
    let (n_channels, n_samples, n_epochs) = matrix.dim();
    debug!("Overview of '{name}': {n_channels} channels, {n_samples} samples, {n_epochs} epochs");

    // 1. Channels vs time, each channel shifted up by its offset.
    let over_epochs = mean_along_axis(matrix, EPOCH_AXIS)?;
    let stacked_series: Vec<PlotSeries> = stacked_traces(&over_epochs, settings.channel_offset)
        .into_iter()
        .enumerate()
        .map(|(i, data)| PlotSeries {
            data,
            label: format!("Channel {}", i + 1),
            color: trace_color(i),
            stroke_width: LINE_WIDTH_PLOT,
        })
        .collect();
    let stacked = PlotConfig::fitted(
        format!("EEG signal of '{name}' (channels vs time)"),
        stacked_series,
        "Samples (time)",
        "Amplitude",
        vec![],
    );

    // 2. Mean over channels, first epoch.
    let over_channels = mean_along_axis(matrix, CHANNEL_AXIS)?;
    let channel_mean = PlotConfig::fitted(
        format!("Mean EEG signal of '{name}' vs time"),
        vec![PlotSeries {
            data: column_trace(&over_channels.view(), 0),
            label: "Mean (channels)".to_string(),
            color: *COLOR_CHANNEL_MEAN,
            stroke_width: LINE_WIDTH_PLOT,
        }],
        "Samples (time)",
        "Amplitude (mean)",
        vec![0.0],
    );

    // 3. Mean over samples, per channel, for the trailing epochs.
    let wanted = settings.last_epochs.max(1);
    let epoch_series: Vec<PlotSeries> = if n_epochs >= wanted {
        let tail = last_epochs(matrix, wanted).to_owned();
        let over_samples = mean_along_axis(&tail, SAMPLE_AXIS)?;
        (0..wanted)
            .map(|i| PlotSeries {
                data: column_trace(&over_samples.view(), i),
                label: format!("Epoch {}", n_epochs - wanted + i + 1),
                color: trace_color(i),
                stroke_width: LINE_WIDTH_PLOT,
            })
            .collect()
    } else {
        let over_samples = mean_along_axis(matrix, SAMPLE_AXIS)?;
        (0..over_samples.len_of(Axis(1)))
            .map(|i| PlotSeries {
                data: column_trace(&over_samples.view(), i),
                label: if i == 0 {
                    "Mean (all)".to_string()
                } else {
                    String::new()
                },
                color: *COLOR_ALL_EPOCHS_MEAN,
                stroke_width: LINE_WIDTH_PLOT,
            })
            .collect()
    };
    let epoch_mean = PlotConfig::fitted(
        format!("Mean EEG signal of '{name}' vs last {wanted} epochs"),
        epoch_series,
        "Channels",
        "Amplitude (mean)",
        vec![0.0],
    );

    Ok(vec![
        GridPanel {
            row: 1,
            col: 0,
            row_span: 2,
            col_span: 2,
            config: stacked,
        },
        GridPanel {
            row: 0,
            col: 2,
            row_span: 1,
            col_span: 1,
            config: channel_mean,
        },
        GridPanel {
            row: 2,
            col: 2,
            row_span: 1,
            col_span: 1,
            config: epoch_mean,
        },
    ])
}

/// Generates the three-panel overview figure for a signal matrix.
pub fn plot_matrix_overview(
    name: &str,
    matrix: &Array3<f64>,
    settings: &SignalPlotSettings,
    output_dir: &Path,
    root_name: &str,
) -> Result<PathBuf> {
    let panels = matrix_overview_panels(name, matrix, settings)?;
    let output_path = output_file(
        output_dir,
        root_name,
        &format!("{}_overview", sanitize_for_filename(name)),
    )?;
    let (rows, cols) = OVERVIEW_GRID;
    draw_grid_plot(
        &output_path,
        &format!("{root_name} - {name}"),
        "Overview",
        rows,
        cols,
        &panels,
    )?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    /// value = 100*c + 10*s + e
    fn signal(channels: usize, samples: usize, epochs: usize) -> Array3<f64> {
        Array::from_shape_fn((channels, samples, epochs), |(c, s, e)| {
            (100 * c + 10 * s + e) as f64
        })
    }

    #[test]
    fn test_overview_layout() {
        let panels =
            matrix_overview_panels("data", &signal(3, 4, 8), &SignalPlotSettings::default())
                .unwrap();
        let placement: Vec<_> = panels
            .iter()
            .map(|p| (p.row, p.col, p.row_span, p.col_span))
            .collect();
        assert_eq!(placement, vec![(1, 0, 2, 2), (0, 2, 1, 1), (2, 2, 1, 1)]);
    }

    #[test]
    fn test_stacked_panel_offsets_channels() {
        let settings = SignalPlotSettings {
            channel_offset: 5.0,
            ..SignalPlotSettings::default()
        };
        let panels = matrix_overview_panels("data", &signal(3, 4, 8), &settings).unwrap();
        let stacked = &panels[0].config;
        assert_eq!(stacked.series.len(), 3);
        assert_eq!(stacked.series[2].label, "Channel 3");
        // channel 2, sample 1: 200 + 10 + mean(0..8)=3.5, plus offset 2*5
        assert_eq!(stacked.series[2].data[1], (1.0, 223.5));
    }

    #[test]
    fn test_channel_mean_panel_uses_first_epoch() {
        let panels =
            matrix_overview_panels("data", &signal(3, 4, 8), &SignalPlotSettings::default())
                .unwrap();
        let mean = &panels[1].config;
        assert_eq!(mean.series.len(), 1);
        // mean over channels of 100*c is 100; sample 2 adds 20; epoch 0.
        assert_eq!(mean.series[0].data[2], (2.0, 120.0));
        assert_eq!(mean.reference_lines, vec![0.0]);
    }

    #[test]
    fn test_epoch_panel_labels_last_epochs() {
        let panels =
            matrix_overview_panels("data", &signal(2, 4, 8), &SignalPlotSettings::default())
                .unwrap();
        let epochs = &panels[2].config;
        let labels: Vec<&str> = epochs.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Epoch 4", "Epoch 5", "Epoch 6", "Epoch 7", "Epoch 8"]);
        // Epoch 4 is index 3; channel 1 mean over samples: 100 + 15 + 3.
        assert_eq!(epochs.series[0].data[1], (1.0, 118.0));
        assert_eq!(epochs.x_label, "Channels");
    }

    #[test]
    fn test_epoch_panel_with_few_epochs() {
        let panels =
            matrix_overview_panels("data", &signal(2, 4, 3), &SignalPlotSettings::default())
                .unwrap();
        let epochs = &panels[2].config;
        assert_eq!(epochs.series.len(), 3);
        assert_eq!(epochs.series[0].label, "Mean (all)");
        assert!(epochs.series[1].label.is_empty());
        assert_eq!(epochs.series[0].color, *COLOR_ALL_EPOCHS_MEAN);
    }
}
