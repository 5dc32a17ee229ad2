// src/data_input/mod.rs

pub mod matrix;
pub mod tabular;

// src/data_input/mod.rs
