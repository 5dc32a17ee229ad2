// src/data_input/matrix.rs

use log::{debug, info, warn};
use ndarray::{Array2, Array3, ArrayD, Ix3, IxDyn, ShapeBuilder};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::{ExplorerError, Result};

/// Outcome of [`MatData::flatten_to_2d`].
#[derive(Debug, Clone, PartialEq)]
pub enum FlattenOutcome {
    Flattened { from: Vec<usize>, to: (usize, usize) },
    AlreadyTwoDimensional,
}

/// Named numeric arrays read from a MAT (v5) file, kept in file order.
#[derive(Debug, Clone)]
pub struct MatData {
    pub source: PathBuf,
    arrays: Vec<(String, ArrayD<f64>)>,
}

impl MatData {
    pub fn load(path: &Path) -> Result<MatData> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExplorerError::FileNotFound(path.to_path_buf()),
            _ => ExplorerError::Io(e),
        })?;
        let mat_file =
            matfile::MatFile::parse(BufReader::new(file)).map_err(|e| ExplorerError::MatParse {
                path: path.to_path_buf(),
                reason: format!("{e:?}"),
            })?;

        let mut arrays = Vec::new();
        for array in mat_file.arrays() {
            let name = array.name().to_string();
            let dims = array.size().clone();
            let (values, had_imaginary) = numeric_to_f64(array.data());
            if had_imaginary {
                warn!("Matrix '{name}' is complex; only the real part is kept");
            }
            // MAT files store elements column-major.
            let matrix = ArrayD::from_shape_vec(IxDyn(&dims).f(), values).map_err(|e| {
                ExplorerError::MatParse {
                    path: path.to_path_buf(),
                    reason: format!("matrix '{name}' with shape {dims:?}: {e}"),
                }
            })?;
            debug!("Matrix '{name}' shape {:?}", matrix.shape());
            arrays.push((name, matrix));
        }

        info!(
            "Loaded '{}': {} matrices",
            path.display(),
            arrays.len()
        );
        Ok(MatData {
            source: path.to_path_buf(),
            arrays,
        })
    }

    pub fn from_arrays(arrays: Vec<(String, ArrayD<f64>)>) -> MatData {
        MatData {
            source: PathBuf::new(),
            arrays,
        }
    }

    /// Names of the listed matrices; names starting with `_` are internal.
    pub fn matrix_names(&self) -> Vec<String> {
        self.arrays
            .iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn first_matrix_name(&self) -> Result<String> {
        self.matrix_names()
            .into_iter()
            .next()
            .ok_or(ExplorerError::NoMatrices)
    }

    pub fn get_matrix(&self, name: &str) -> Result<&ArrayD<f64>> {
        self.arrays
            .iter()
            .find(|(n, _)| n == name && !n.starts_with('_'))
            .map(|(_, m)| m)
            .ok_or_else(|| ExplorerError::MatrixNotFound(name.to_string()))
    }

    /// The named matrix as (channel, sample, epoch).
    pub fn get_signal_matrix(&self, name: &str) -> Result<Array3<f64>> {
        let matrix = self.get_matrix(name)?;
        matrix
            .clone()
            .into_dimensionality::<Ix3>()
            .map_err(|_| ExplorerError::NotThreeDimensional {
                name: name.to_string(),
                shape: matrix.shape().to_vec(),
            })
    }

    /// Replaces an N-D matrix (N > 2) with its (rows, last dim) 2D form,
    /// reading elements in row-major logical order.
    pub fn flatten_to_2d(&mut self, name: &str) -> Result<FlattenOutcome> {
        let matrix = self.get_matrix(name)?;
        if matrix.ndim() <= 2 {
            return Ok(FlattenOutcome::AlreadyTwoDimensional);
        }
        let from = matrix.shape().to_vec();
        let flat = flatten_matrix(matrix);
        let to = flat.dim();

        if let Some(slot) = self.arrays.iter_mut().find(|(n, _)| n == name) {
            slot.1 = flat.into_dyn();
        }
        info!("Matrix '{name}' flattened from {from:?} to {to:?}");
        Ok(FlattenOutcome::Flattened { from, to })
    }

    /// Name and shape of each listed matrix.
    pub fn summaries(&self) -> Vec<(String, Vec<usize>)> {
        self.arrays
            .iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .map(|(name, m)| (name.clone(), m.shape().to_vec()))
            .collect()
    }
}

/// Reshapes to (product of leading dims, last dim).
pub fn flatten_matrix(matrix: &ArrayD<f64>) -> Array2<f64> {
    let last = matrix.shape().last().copied().unwrap_or(1).max(1);
    let rows = matrix.len() / last;
    let values: Vec<f64> = matrix.iter().copied().collect();
    Array2::from_shape_vec((rows, last), values)
        .unwrap_or_else(|_| Array2::zeros((0, last)))
}

fn numeric_to_f64(data: &matfile::NumericData) -> (Vec<f64>, bool) {
    use matfile::NumericData;

    fn convert<T: Copy + Into<f64>, I>(real: &[T], imag: &Option<I>) -> (Vec<f64>, bool) {
        (real.iter().map(|&v| v.into()).collect(), imag.is_some())
    }

    match data {
        NumericData::Int8 { real, imag } => convert(real.as_slice(), imag),
        NumericData::UInt8 { real, imag } => convert(real.as_slice(), imag),
        NumericData::Int16 { real, imag } => convert(real.as_slice(), imag),
        NumericData::UInt16 { real, imag } => convert(real.as_slice(), imag),
        NumericData::Int32 { real, imag } => convert(real.as_slice(), imag),
        NumericData::UInt32 { real, imag } => convert(real.as_slice(), imag),
        NumericData::Int64 { real, imag } => {
            (real.iter().map(|&v| v as f64).collect(), imag.is_some())
        }
        NumericData::UInt64 { real, imag } => {
            (real.iter().map(|&v| v as f64).collect(), imag.is_some())
        }
        NumericData::Single { real, imag } => convert(real.as_slice(), imag),
        NumericData::Double { real, imag } => convert(real.as_slice(), imag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn sample_data() -> MatData {
        let signal = Array::from_shape_fn((2, 3, 4), |(c, s, e)| (c * 100 + s * 10 + e) as f64);
        MatData::from_arrays(vec![
            ("__header__".to_string(), ArrayD::zeros(IxDyn(&[1, 1]))),
            ("data".to_string(), signal.into_dyn()),
            ("labels".to_string(), ArrayD::zeros(IxDyn(&[1, 4]))),
        ])
    }

    #[test]
    fn test_matrix_names_skip_internal_entries() {
        let data = sample_data();
        assert_eq!(data.matrix_names(), vec!["data", "labels"]);
        assert_eq!(data.first_matrix_name().unwrap(), "data");
        assert!(matches!(
            data.get_matrix("__header__"),
            Err(ExplorerError::MatrixNotFound(_))
        ));
    }

    #[test]
    fn test_no_matrices() {
        let data = MatData::from_arrays(vec![]);
        assert!(matches!(data.first_matrix_name(), Err(ExplorerError::NoMatrices)));
    }

    #[test]
    fn test_get_signal_matrix() {
        let data = sample_data();
        let signal = data.get_signal_matrix("data").unwrap();
        assert_eq!(signal.dim(), (2, 3, 4));
        assert_eq!(signal[[1, 2, 3]], 123.0);

        match data.get_signal_matrix("labels") {
            Err(ExplorerError::NotThreeDimensional { shape, .. }) => assert_eq!(shape, vec![1, 4]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_flatten_to_2d() {
        let mut data = sample_data();
        let outcome = data.flatten_to_2d("data").unwrap();
        assert_eq!(
            outcome,
            FlattenOutcome::Flattened {
                from: vec![2, 3, 4],
                to: (6, 4)
            }
        );
        let flat = data.get_matrix("data").unwrap();
        assert_eq!(flat.shape(), &[6, 4]);
        // Row 4 is channel 1, sample 1.
        assert_eq!(flat[[4, 2]], 112.0);

        assert_eq!(
            data.flatten_to_2d("labels").unwrap(),
            FlattenOutcome::AlreadyTwoDimensional
        );
        assert!(matches!(
            data.flatten_to_2d("missing"),
            Err(ExplorerError::MatrixNotFound(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("signal_explorer_missing_file.mat");
        assert!(matches!(
            MatData::load(&path),
            Err(ExplorerError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_load_garbage_file() {
        let path = std::env::temp_dir().join(format!(
            "signal_explorer_garbage_{}.mat",
            std::process::id()
        ));
        std::fs::write(&path, b"definitely not a MAT file").unwrap();
        assert!(matches!(
            MatData::load(&path),
            Err(ExplorerError::MatParse { .. })
        ));
        std::fs::remove_file(path).ok();
    }
}
