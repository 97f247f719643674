//! Order-statistic quantiles over small sample sets

use std::cmp::Ordering;

/// `p`-quantile of `values` with linear interpolation between order statistics.
///
/// The position is `h = (n - 1) * p`; the result interpolates between the
/// `floor(h)`-th and `ceil(h)`-th smallest values, which matches the default
/// ("linear", type 7) definition used by NumPy and R. `values` is sorted in
/// place so callers can reuse a scratch buffer. Returns `None` for an empty
/// slice.
pub fn quantile_in_place(values: &mut [f64], p: f64) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;

    Some(values[lo] + frac * (values[hi] - values[lo]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty() {
        assert_eq!(quantile_in_place(&mut [], 0.5), None);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(quantile_in_place(&mut [3.5], 0.0), Some(3.5));
        assert_eq!(quantile_in_place(&mut [3.5], 0.73), Some(3.5));
    }

    #[test]
    fn test_median_even_count() {
        let mut v = [4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(quantile_in_place(&mut v, 0.5).unwrap(), 2.5);
        assert_eq!(v, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_linear_interpolation() {
        // numpy.quantile([10, 20, 30, 40, 50], 0.3) == 22.0
        let mut v = [50.0, 10.0, 40.0, 20.0, 30.0];
        assert_relative_eq!(quantile_in_place(&mut v, 0.3).unwrap(), 22.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extremes() {
        let mut v = [-0.2, 0.7, 0.1];
        assert_eq!(quantile_in_place(&mut v, 0.0), Some(-0.2));
        assert_eq!(quantile_in_place(&mut v, 1.0), Some(0.7));
    }
}
