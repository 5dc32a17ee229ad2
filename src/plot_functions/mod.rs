// src/plot_functions/mod.rs

pub mod plot_bar_chart;
pub mod plot_matrix_overview;
pub mod plot_noise_comparison;
pub mod plot_scatter;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Keeps letters, digits, '-' and '_' so column names are safe in file names.
pub fn sanitize_for_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// `<output_dir>/<root>_<suffix>.png`, creating the directory if needed.
pub fn output_file(output_dir: &Path, root_name: &str, suffix: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    Ok(output_dir.join(format!(
        "{}_{}.png",
        sanitize_for_filename(root_name),
        suffix
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_for_filename() {
        assert_eq!(sanitize_for_filename("Air Pollution"), "Air_Pollution");
        assert_eq!(sanitize_for_filename("a/b:c"), "a_b_c");
        assert_eq!(sanitize_for_filename("  "), "unnamed");
    }

    #[test]
    fn test_output_file_creates_directory() {
        let dir = std::env::temp_dir().join(format!("signal_explorer_out_{}", std::process::id()));
        let path = output_file(&dir, "MMSE 1", "bar").unwrap();
        assert!(dir.is_dir());
        assert_eq!(path, dir.join("MMSE_1_bar.png"));
        fs::remove_dir_all(dir).ok();
    }
}
