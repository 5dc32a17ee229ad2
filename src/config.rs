// src/config.rs

use std::fmt;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CHANNEL_OFFSET, DEFAULT_CSV_FILES, DEFAULT_LAST_EPOCHS, DEFAULT_MAT_FILES,
    DEFAULT_NOISE_STD_DEV, DEFAULT_OUTPUT_DIR,
};

/// Settings for the matrix plots.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalPlotSettings {
    /// Vertical distance between stacked channel traces.
    pub channel_offset: f64,
    /// How many trailing epochs the epoch panel shows.
    pub last_epochs: usize,
    pub noise_std_dev: f64,
}

impl Default for SignalPlotSettings {
    fn default() -> Self {
        Self {
            channel_offset: DEFAULT_CHANNEL_OFFSET,
            last_epochs: DEFAULT_LAST_EPOCHS,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub csv_files: Vec<PathBuf>,
    pub mat_files: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Seed for the noise generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub signal: SignalPlotSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_files: DEFAULT_CSV_FILES.into_iter().map(PathBuf::from).collect(),
            mat_files: DEFAULT_MAT_FILES.into_iter().map(PathBuf::from).collect(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            seed: None,
            signal: SignalPlotSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    HelpRequested,
    MissingValue(String),
    InvalidValue { flag: String, value: String },
    UnknownArgument(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HelpRequested => write!(f, "help requested"),
            ConfigError::MissingValue(flag) => write!(f, "missing value for '{flag}'"),
            ConfigError::InvalidValue { flag, value } => {
                write!(f, "invalid value '{value}' for '{flag}'")
            }
            ConfigError::UnknownArgument(arg) => write!(f, "unknown argument '{arg}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--csv <file.csv>]... [--mat <file.mat>]... [--output-dir <dir>]\n\
         \x20         [--seed <u64>] [--offset <f64>] [--epochs <n>] [--noise-std <f64>]\n\
         \n\
         Without --csv/--mat the default data files in the current directory are offered.\n\
         Set RUST_LOG (e.g. RUST_LOG=debug) to control log output."
    )
}

impl AppConfig {
    /// Parses command-line arguments (without the program name).
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = AppConfig::default();
        let mut csv_files = Vec::new();
        let mut mat_files = Vec::new();

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            let mut value_for = |flag: &str| {
                args.next()
                    .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
            };
            match arg.as_str() {
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                "--csv" => csv_files.push(PathBuf::from(value_for("--csv")?)),
                "--mat" => mat_files.push(PathBuf::from(value_for("--mat")?)),
                "--output-dir" => config.output_dir = PathBuf::from(value_for("--output-dir")?),
                "--seed" => config.seed = Some(parse_value("--seed", value_for("--seed")?)?),
                "--offset" => {
                    config.signal.channel_offset = parse_value("--offset", value_for("--offset")?)?
                }
                "--epochs" => {
                    let epochs: usize = parse_value("--epochs", value_for("--epochs")?)?;
                    if epochs == 0 {
                        return Err(ConfigError::InvalidValue {
                            flag: "--epochs".to_string(),
                            value: "0".to_string(),
                        });
                    }
                    config.signal.last_epochs = epochs;
                }
                "--noise-std" => {
                    let std_dev: f64 = parse_value("--noise-std", value_for("--noise-std")?)?;
                    if !std_dev.is_finite() || std_dev < 0.0 {
                        return Err(ConfigError::InvalidValue {
                            flag: "--noise-std".to_string(),
                            value: std_dev.to_string(),
                        });
                    }
                    config.signal.noise_std_dev = std_dev;
                }
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }

        if !csv_files.is_empty() {
            config.csv_files = csv_files;
        }
        if !mat_files.is_empty() {
            config.mat_files = mat_files;
        }
        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value,
    })
}
