//! Generalized bell membership function
//!
//! ```text
//! bell(x; a, b, c) = 1 / (1 + |(x - c) / a|^(2b))
//! ```
//!
//! `c` is the centre (membership 1), `a` the half-width at membership 0.5
//! and `b` the steepness of the flanks.

use pra_core::{Error, Result};

/// Slope bell: centred on 43° with half-width 11°
pub const SLOPE_BELL: BellCurve = BellCurve::new(11.0, 4.0, 43.0);

/// Wind-shelter bell over the shelter index (radians)
pub const WIND_SHELTER_BELL: BellCurve = BellCurve::new(2.0, 5.0, 2.0);

/// Generalized bell curve parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BellCurve {
    /// Half-width
    pub a: f64,
    /// Flank steepness
    pub b: f64,
    /// Centre
    pub c: f64,
}

impl BellCurve {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Reject a zero or non-finite width
    pub fn validate(&self) -> Result<()> {
        if !(self.a.is_finite() && self.a != 0.0) {
            return Err(Error::invalid_parameter("a", self.a, "must be finite and non-zero"));
        }
        if !(self.b.is_finite() && self.b > 0.0) {
            return Err(Error::invalid_parameter("b", self.b, "must be positive"));
        }
        Ok(())
    }

    /// Membership of `x`
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let t = ((x - self.c) / self.a).abs();
        1.0 / (1.0 + t.powf(2.0 * self.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_peak_at_centre() {
        assert_eq!(SLOPE_BELL.eval(43.0), 1.0);
        assert_eq!(WIND_SHELTER_BELL.eval(2.0), 1.0);
    }

    #[test]
    fn test_half_width() {
        assert_relative_eq!(SLOPE_BELL.eval(32.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(SLOPE_BELL.eval(54.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetric_and_monotonic() {
        let bell = BellCurve::new(40.0, 3.5, -15.0);
        let mut prev = bell.eval(-15.0);
        for step in 1..50 {
            let d = step as f64 * 2.0;
            assert_relative_eq!(bell.eval(-15.0 + d), bell.eval(-15.0 - d), epsilon = 1e-12);
            let v = bell.eval(-15.0 + d);
            assert!(v < prev);
            assert!(v > 0.0);
            prev = v;
        }
    }

    #[test]
    fn test_fractional_exponent() {
        // 2b = 3 with a negative offset: the absolute value keeps it real
        let bell = BellCurve::new(50.0, 1.5, 0.0);
        assert_relative_eq!(bell.eval(-50.0), 0.5, epsilon = 1e-12);
        assert!(bell.eval(-25.0).is_finite());
    }

    #[test]
    fn test_validate() {
        assert!(SLOPE_BELL.validate().is_ok());
        assert!(BellCurve::new(0.0, 1.0, 0.0).validate().is_err());
        assert!(BellCurve::new(1.0, -1.0, 0.0).validate().is_err());
    }
}
