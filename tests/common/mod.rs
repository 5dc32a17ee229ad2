// tests/common/mod.rs - shared fixtures for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

// MAT v5 element type codes.
const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MX_DOUBLE_CLASS: u32 = 6;
const COMPLEX_FLAG: u32 = 0x0800;

pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "signal_explorer_it_{}_{name}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Tag + payload, padded to an 8-byte boundary.
fn element(data_type: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 16);
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    while out.len() % 8 != 0 {
        out.push(0);
    }
    out
}

fn doubles(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A little-endian MAT v5 file holding one double matrix. `real` (and
/// `imag`) are in column-major order, as MATLAB stores them.
pub fn mat_v5_bytes(name: &str, dims: &[usize], real: &[f64], imag: Option<&[f64]>) -> Vec<u8> {
    let mut out = b"MATLAB 5.0 MAT-file, Platform: test".to_vec();
    out.resize(116, b' ');
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&0x0100u16.to_le_bytes());
    out.extend_from_slice(b"IM");

    let flags = MX_DOUBLE_CLASS | if imag.is_some() { COMPLEX_FLAG } else { 0 };
    let mut body = Vec::new();
    body.extend(element(
        MI_UINT32,
        &[flags.to_le_bytes(), 0u32.to_le_bytes()].concat(),
    ));
    let dims_bytes: Vec<u8> = dims.iter().flat_map(|&d| (d as i32).to_le_bytes()).collect();
    body.extend(element(MI_INT32, &dims_bytes));
    body.extend(element(MI_INT8, name.as_bytes()));
    body.extend(element(MI_DOUBLE, &doubles(real)));
    if let Some(imag) = imag {
        body.extend(element(MI_DOUBLE, &doubles(imag)));
    }

    out.extend(element(MI_MATRIX, &body));
    out
}

/// Column-major values of a (channels, samples, epochs) signal where
/// element [c, s, e] is `100*c + 10*s + e`.
pub fn signal_column_major(channels: usize, samples: usize, epochs: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(channels * samples * epochs);
    for e in 0..epochs {
        for s in 0..samples {
            for c in 0..channels {
                values.push((100 * c + 10 * s + e) as f64);
            }
        }
    }
    values
}

/// Writes a 2x3x4 signal matrix named `data` to `<dir>/<file_name>`.
pub fn write_signal_mat(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    let bytes = mat_v5_bytes("data", &[2, 3, 4], &signal_column_major(2, 3, 4), None);
    fs::write(&path, bytes).unwrap();
    path
}
