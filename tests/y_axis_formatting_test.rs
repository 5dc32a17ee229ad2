// tests/y_axis_formatting_test.rs

use signal_explorer::plot_framework::format_y_tick;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_y_axis_formatting() {
        // Signal panels carry "Amplitude" labels and always get one decimal below 10
        let amplitude_label = "Amplitude (mean)";

        assert_eq!(format_y_tick(0.0, amplitude_label), "0.0");
        assert_eq!(format_y_tick(0.5, amplitude_label), "0.5");
        assert_eq!(format_y_tick(-2.0, amplitude_label), "-2.0");
        assert_eq!(format_y_tick(5.7, amplitude_label), "5.7");
        assert_eq!(format_y_tick(25.0, amplitude_label), "25");
    }

    #[test]
    fn test_column_y_axis_formatting() {
        // Bar and scatter charts use the column name as the label
        let column_label = "Age";

        // Integer values stay integers
        assert_eq!(format_y_tick(0.0, column_label), "0");
        assert_eq!(format_y_tick(10.0, column_label), "10");
        assert_eq!(format_y_tick(100.0, column_label), "100");

        // Small fractional values keep a decimal
        assert_eq!(format_y_tick(0.5, column_label), "0.5");
        assert_eq!(format_y_tick(7.3, column_label), "7.3");

        // Large values use k notation
        assert_eq!(format_y_tick(1000.0, column_label), "1k");
        assert_eq!(format_y_tick(5000.0, column_label), "5k");
        assert_eq!(format_y_tick(12500.0, column_label), "12k");
    }

    #[test]
    fn test_large_value_formatting() {
        assert_eq!(format_y_tick(1_000_000.0, "Amplitude"), "1.0M");
        assert_eq!(format_y_tick(2_500_000.0, "Income"), "2.5M");
        assert_eq!(format_y_tick(-3_000.0, "Income"), "-3k");
    }

    #[test]
    fn test_near_zero_ticks_have_no_sign() {
        // Tick positions computed around zero can come out as tiny negatives
        assert_eq!(format_y_tick(-1e-12, "Amplitude (difference)"), "0.0");
        assert_eq!(format_y_tick(-0.0, "Amplitude"), "0.0");
        assert_eq!(format_y_tick(-0.04, "Age"), "0");
        assert_eq!(format_y_tick(-0.0, "Age"), "0");
        assert_eq!(format_y_tick(-0.2, "Amplitude"), "-0.2");
    }
}
