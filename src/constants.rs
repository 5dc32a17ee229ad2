// src/constants.rs

use plotters::style::colors::full_palette::{BLUE, GREEN, ORANGE, PURPLE, RED, TEAL};
use plotters::style::colors::full_palette::{BROWN, GREY, INDIGO, PINK};
use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;
pub const CHART_WIDTH: u32 = 1280;
pub const CHART_HEIGHT: u32 = 768;

// Font sizes.
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 18;
pub const FONT_SIZE_AXIS_LABEL: i32 = 13;
pub const FONT_SIZE_LEGEND: i32 = 13;
pub const FONT_SIZE_MESSAGE: i32 = 16;

pub const FONT_FAMILY: &str = "sans-serif";

// Matrix overview defaults.
pub const DEFAULT_CHANNEL_OFFSET: f64 = 5.0;
pub const DEFAULT_LAST_EPOCHS: usize = 5;

// Noise injection defaults (zero-mean Gaussian).
pub const DEFAULT_NOISE_STD_DEV: f64 = 1.0;

// Name of the column added by the multiply-and-save operation.
pub const PRODUCT_COLUMN_NAME: &str = "multiplication";

pub const DEFAULT_OUTPUT_DIR: &str = "plots";

pub const DEFAULT_CSV_FILES: [&str; 2] = ["cancer patient data sets.csv", "MMSE 1.csv"];
pub const DEFAULT_MAT_FILES: [&str; 2] = ["S1.mat", "S2.mat"];

// Cell values read as missing, matching the usual dataframe defaults.
pub const MISSING_MARKERS: [&str; 18] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
    "<NA>", "#NA", "-1.#IND", "1.#QNAN", "-1.#QNAN", "1.#IND",
];

// --- Plot Color Assignments ---
pub const COLOR_BAR: &RGBColor = &BLUE;
pub const COLOR_SCATTER: &RGBColor = &BLUE;
pub const COLOR_CHANNEL_MEAN: &RGBColor = &BLUE;
pub const COLOR_ALL_EPOCHS_MEAN: &RGBColor = &ORANGE;
pub const COLOR_NOISY_CHANNEL: &RGBColor = &BLUE;
pub const COLOR_PRODUCT: &RGBColor = &GREEN;
pub const COLOR_DIFFERENCE: &RGBColor = &RED;
pub const COLOR_REFERENCE_LINE: RGBColor = RGBColor(0, 0, 0);
pub const COLOR_ERROR_BAR: RGBColor = RGBColor(40, 40, 40);

// Cycled for multi-trace panels (channels, epochs).
pub const TRACE_PALETTE: [&RGBColor; 10] = [
    &BLUE, &ORANGE, &GREEN, &RED, &PURPLE, &BROWN, &PINK, &GREY, &INDIGO, &TEAL,
];

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;
pub const LINE_WIDTH_REFERENCE: u32 = 1;
pub const LINE_WIDTH_ERROR_BAR: u32 = 2;

// Scatter marker radius in pixels.
pub const SCATTER_POINT_SIZE: i32 = 3;

// Bar chart whiskers: 95% interval of the mean, cap half-width in bar units.
pub const CONFIDENCE_Z_95: f64 = 1.96;
pub const ERROR_BAR_CAP_HALF_WIDTH: f64 = 0.1;

// Number of dashes drawn for a horizontal reference line.
pub const REFERENCE_LINE_DASHES: usize = 40;

// src/constants.rs
