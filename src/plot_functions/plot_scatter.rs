// src/plot_functions/plot_scatter.rs

use log::debug;
use std::path::{Path, PathBuf};

use crate::constants::COLOR_SCATTER;
use crate::data_input::tabular::Table;
use crate::error::Result;
use crate::plot_framework::{draw_scatter_plot, ScatterConfig};
use crate::plot_functions::{output_file, sanitize_for_filename};

/// Points for every row where both columns hold a number.
pub fn scatter_points(table: &Table, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    table.require_columns(x, y)?;
    let xs = table.numeric_column(x)?;
    let ys = table.numeric_column(y)?;
    let points: Vec<(f64, f64)> = xs
        .into_iter()
        .zip(ys)
        .filter_map(|pair| match pair {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        })
        .collect();
    debug!("Scatter '{y}' vs '{x}': {} points", points.len());
    Ok(points)
}

/// Generates the scatter plot of `y` against `x`.
pub fn plot_scatter(
    table: &Table,
    x: &str,
    y: &str,
    output_dir: &Path,
    root_name: &str,
) -> Result<PathBuf> {
    let points = scatter_points(table, x, y)?;
    let output_path = output_file(
        output_dir,
        root_name,
        &format!(
            "scatter_{}_vs_{}",
            sanitize_for_filename(y),
            sanitize_for_filename(x)
        ),
    )?;

    let config = ScatterConfig {
        title: format!("Scatter plot: {y} vs {x}"),
        points,
        x_label: x.to_string(),
        y_label: y.to_string(),
        color: *COLOR_SCATTER,
    };
    draw_scatter_plot(&output_path, root_name, &config)?;
    Ok(output_path)
}
