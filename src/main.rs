// src/main.rs

use env_logger::Env;
use log::{error, info};
use std::env;
use std::io;

use signal_explorer::config::{usage, AppConfig, ConfigError};
use signal_explorer::crate_version;
use signal_explorer::menu::Session;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // --- Argument Parsing ---
    let program = env::args()
        .next()
        .unwrap_or_else(|| "signal-explorer".to_string());
    let config = match AppConfig::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            println!("signal-explorer {}", crate_version());
            println!("{}", usage(&program));
            return;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage(&program));
            std::process::exit(1);
        }
    };
    info!(
        "signal-explorer {} (output directory: {})",
        crate_version(),
        config.output_dir.display()
    );

    // --- Interactive Session ---
    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), config);
    if let Err(e) = session.run() {
        error!("Session aborted: {e}");
        std::process::exit(1);
    }
}
