// src/data_analysis/signal_ops.rs

// Numeric helpers for (channel, sample, epoch) signal matrices.

use log::debug;
use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3, Axis};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{ExplorerError, Result};

pub const CHANNEL_AXIS: usize = 0;
pub const SAMPLE_AXIS: usize = 1;
pub const EPOCH_AXIS: usize = 2;

/// Averages a 3D matrix along `axis`, keeping the other two axes in order.
pub fn mean_along_axis(matrix: &Array3<f64>, axis: usize) -> Result<Array2<f64>> {
    if axis > EPOCH_AXIS {
        return Err(ExplorerError::InvalidAxis(axis));
    }
    let reduced = matrix
        .mean_axis(Axis(axis))
        .ok_or(ExplorerError::EmptyAxis(axis))?;
    debug!(
        "Mean along axis {axis}: {:?} -> {:?}",
        matrix.shape(),
        reduced.shape()
    );
    Ok(reduced)
}

/// View of the last `n` epochs, or of every epoch when fewer exist.
pub fn last_epochs(matrix: &Array3<f64>, n: usize) -> ArrayView3<'_, f64> {
    let n_epochs = matrix.len_of(Axis(EPOCH_AXIS));
    let start = n_epochs.saturating_sub(n);
    matrix.slice(s![.., .., start..])
}

/// One point series per row of a (channel, sample) matrix, each shifted up
/// by `row_index * offset`.
pub fn stacked_traces(reduced: &Array2<f64>, offset: f64) -> Vec<Vec<(f64, f64)>> {
    reduced
        .outer_iter()
        .enumerate()
        .map(|(i, row)| {
            let shift = i as f64 * offset;
            row.iter()
                .enumerate()
                .map(|(sample, &v)| (sample as f64, v + shift))
                .collect()
        })
        .collect()
}

/// `(row_index, value)` points for one column of a 2D matrix.
pub fn column_trace(matrix: &ArrayView2<f64>, column: usize) -> Vec<(f64, f64)> {
    if column >= matrix.ncols() {
        return Vec::new();
    }
    matrix
        .column(column)
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

pub fn validate_channel(channel: i64, n_channels: usize) -> Result<usize> {
    if channel >= 0 && (channel as u64) < n_channels as u64 {
        Ok(channel as usize)
    } else {
        Err(ExplorerError::InvalidChannel {
            channel,
            n_channels,
        })
    }
}

fn channel_slice(matrix: &Array3<f64>, channel: usize) -> Result<ArrayView2<'_, f64>> {
    validate_channel(channel as i64, matrix.len_of(Axis(CHANNEL_AXIS)))?;
    Ok(matrix.index_axis(Axis(CHANNEL_AXIS), channel))
}

/// `matrix[a] - matrix[b]` over the (sample, epoch) plane.
pub fn channel_difference(matrix: &Array3<f64>, a: usize, b: usize) -> Result<Array2<f64>> {
    Ok(&channel_slice(matrix, a)? - &channel_slice(matrix, b)?)
}

/// `matrix[a] * matrix[b]` over the (sample, epoch) plane.
pub fn channel_product(matrix: &Array3<f64>, a: usize, b: usize) -> Result<Array2<f64>> {
    Ok(&channel_slice(matrix, a)? * &channel_slice(matrix, b)?)
}

/// Adds zero-mean Gaussian noise with the given standard deviation.
pub fn add_gaussian_noise<R: Rng + ?Sized>(
    slice: &ArrayView2<f64>,
    std_dev: f64,
    rng: &mut R,
) -> Result<Array2<f64>> {
    let normal = Normal::new(0.0, std_dev).map_err(|_| ExplorerError::InvalidNoise(std_dev))?;
    let noise = Array2::from_shape_simple_fn(slice.raw_dim(), || normal.sample(&mut *rng));
    Ok(slice + &noise)
}

/// The noisy channel plus the difference and product of two channels.
#[derive(Debug, Clone)]
pub struct ChannelComparison {
    pub noisy: Array2<f64>,
    pub difference: Array2<f64>,
    pub product: Array2<f64>,
}

pub fn compare_channels<R: Rng + ?Sized>(
    matrix: &Array3<f64>,
    channel_a: usize,
    channel_b: usize,
    noise_channel: usize,
    std_dev: f64,
    rng: &mut R,
) -> Result<ChannelComparison> {
    let difference = channel_difference(matrix, channel_a, channel_b)?;
    let product = channel_product(matrix, channel_a, channel_b)?;
    let noisy = add_gaussian_noise(&channel_slice(matrix, noise_channel)?, std_dev, rng)?;
    Ok(ChannelComparison {
        noisy,
        difference,
        product,
    })
}
