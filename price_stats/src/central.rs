//! Measures of central tendency over price samples
//!
//! Both functions treat an empty sample as `0.0` rather than an error:
//! callers check for emptiness themselves when "no data" has a meaning
//! distinct from a zero price.

/// Median of a sample.
///
/// Odd lengths return the middle element of the sorted sample, even lengths
/// the mean of the two middle elements. Empty input returns `0.0`.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Arithmetic mean of a sample. Empty input returns `0.0`.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_median_odd_length() {
        assert_eq!(median(&[14.0, 10.0, 12.0]), 12.0);
        assert_eq!(median(&[7.5]), 7.5);
    }

    #[test]
    fn test_median_even_length() {
        // Sorted: 10, 12, 14, 20 -> (12 + 14) / 2
        assert_eq!(median(&[20.0, 12.0, 10.0, 14.0]), 13.0);
        assert_eq!(median(&[3.0, 1.0]), 2.0);
    }

    #[test]
    fn test_median_does_not_reorder_input() {
        let values = vec![3.0, 1.0, 2.0];
        let _ = median(&values);
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_median_with_duplicates() {
        assert_eq!(median(&[5.0, 5.0, 1.0, 5.0]), 5.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[10.0, 12.0, 14.0]), 12.0);
        assert_eq!(average(&[1.0, 2.0]), 1.5);
    }
}
