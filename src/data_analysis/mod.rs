// src/data_analysis/mod.rs

pub mod signal_ops;

// src/data_analysis/mod.rs
