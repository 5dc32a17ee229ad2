// src/plot_functions/plot_bar_chart.rs

use log::debug;
use ndarray::Array1;
use std::path::{Path, PathBuf};

use crate::constants::{COLOR_BAR, CONFIDENCE_Z_95};
use crate::data_input::tabular::Table;
use crate::error::Result;
use crate::plot_framework::{draw_bar_plot, BarChartConfig};
use crate::plot_functions::{output_file, sanitize_for_filename};

/// Per-category bar heights and their whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartData {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub intervals: Vec<Option<(f64, f64)>>,
}

/// Normal-approximation 95% interval of the mean. Needs at least two values.
pub fn mean_confidence_interval(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let values = Array1::from(values.to_vec());
    let mean = values.mean()?;
    let half_width = CONFIDENCE_Z_95 * values.std(1.0) / (values.len() as f64).sqrt();
    Some((mean - half_width, mean + half_width))
}

/// Mean of `y` for each distinct value of `x`, with a 95% interval.
///
/// Categories keep their first-appearance order unless every category is a
/// number, in which case they are sorted numerically. Rows missing either
/// value are skipped.
pub fn bar_chart_data(table: &Table, x: &str, y: &str) -> Result<BarChartData> {
    table.require_columns(x, y)?;
    let categories_col = table.text_column(x)?;
    let values_col = table.numeric_column(y)?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (category, value) in categories_col.into_iter().zip(values_col) {
        let (Some(category), Some(value)) = (category, value) else {
            continue;
        };
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(value),
            None => groups.push((category, vec![value])),
        }
    }

    let all_numeric = groups.iter().all(|(name, _)| name.trim().parse::<f64>().is_ok());
    if all_numeric {
        groups.sort_by(|a, b| {
            let a = a.0.trim().parse::<f64>().unwrap_or(0.0);
            let b = b.0.trim().parse::<f64>().unwrap_or(0.0);
            a.total_cmp(&b)
        });
    }
    debug!("Bar chart '{y}' vs '{x}': {} categories", groups.len());

    let mut data = BarChartData {
        categories: Vec::with_capacity(groups.len()),
        values: Vec::with_capacity(groups.len()),
        intervals: Vec::with_capacity(groups.len()),
    };
    for (name, members) in groups {
        data.values
            .push(members.iter().sum::<f64>() / members.len() as f64);
        data.intervals.push(mean_confidence_interval(&members));
        data.categories.push(name);
    }
    Ok(data)
}

/// Generates the bar chart of `y` against the categories of `x`.
pub fn plot_bar_chart(
    table: &Table,
    x: &str,
    y: &str,
    output_dir: &Path,
    root_name: &str,
) -> Result<PathBuf> {
    let data = bar_chart_data(table, x, y)?;
    let output_path = output_file(
        output_dir,
        root_name,
        &format!(
            "bar_{}_vs_{}",
            sanitize_for_filename(y),
            sanitize_for_filename(x)
        ),
    )?;

    let config = BarChartConfig {
        title: format!("Bar chart: {y} vs {x}"),
        categories: data.categories,
        values: data.values,
        intervals: data.intervals,
        x_label: x.to_string(),
        y_label: y.to_string(),
        color: *COLOR_BAR,
    };
    draw_bar_plot(&output_path, root_name, &config)?;
    Ok(output_path)
}
