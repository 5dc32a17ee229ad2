// tests/mat_file_test.rs

mod common;

use std::fs;

use common::{mat_v5_bytes, scratch_dir, signal_column_major, write_signal_mat};
use signal_explorer::data_input::matrix::MatData;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_keeps_logical_order() {
        let dir = scratch_dir("mat_real");
        let path = write_signal_mat(&dir, "S1.mat");

        let mat = MatData::load(&path).unwrap();
        assert_eq!(mat.matrix_names(), vec!["data"]);
        assert_eq!(mat.summaries(), vec![("data".to_string(), vec![2, 3, 4])]);

        let signal = mat.get_signal_matrix("data").unwrap();
        assert_eq!(signal.dim(), (2, 3, 4));
        assert_eq!(signal[[0, 0, 0]], 0.0);
        assert_eq!(signal[[1, 0, 0]], 100.0);
        assert_eq!(signal[[0, 2, 1]], 21.0);
        assert_eq!(signal[[1, 2, 3]], 123.0);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_complex_matrix_keeps_real_part() {
        let dir = scratch_dir("mat_complex");
        let path = dir.join("complex.mat");
        let real = signal_column_major(2, 3, 4);
        let imag = vec![-1.0; real.len()];
        fs::write(&path, mat_v5_bytes("z", &[2, 3, 4], &real, Some(&imag))).unwrap();

        let mat = MatData::load(&path).unwrap();
        let signal = mat.get_signal_matrix("z").unwrap();
        assert_eq!(signal[[1, 2, 3]], 123.0);
        assert!(signal.iter().all(|&v| v >= 0.0));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_two_dimensional_matrix() {
        let dir = scratch_dir("mat_2d");
        let path = dir.join("labels.mat");
        // [[1, 2, 3], [4, 5, 6]] stored column-major.
        let bytes = mat_v5_bytes("labels", &[2, 3], &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0], None);
        fs::write(&path, bytes).unwrap();

        let mat = MatData::load(&path).unwrap();
        let labels = mat.get_matrix("labels").unwrap();
        assert_eq!(labels.shape(), &[2, 3]);
        assert_eq!(labels[[0, 2]], 3.0);
        assert_eq!(labels[[1, 0]], 4.0);

        fs::remove_dir_all(&dir).ok();
    }
}
