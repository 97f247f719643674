//! Terrain memberships
//!
//! Every function keeps the input grid and no-data cells: a no-data input
//! yields a no-data membership.

use super::bell::{BellCurve, SLOPE_BELL, WIND_SHELTER_BELL};
use pra_core::raster::Raster;
use pra_core::{Result, DEFAULT_NODATA};

/// Slopes below this angle (degrees) have membership 0
pub const SLOPE_MIN: f64 = 28.0;

/// Slopes above this angle (degrees) have membership 0
pub const SLOPE_MAX: f64 = 60.0;

/// Apply `f` to every valid cell of `input`, keeping its no-data cells.
///
/// The output sentinel is the input's own, or [`DEFAULT_NODATA`] when the
/// input has none.
pub fn map_membership<F>(input: &Raster<f64>, f: F) -> Result<Raster<f64>>
where
    F: Fn(f64) -> f64,
{
    let nodata = input.nodata().filter(|v| !v.is_nan()).unwrap_or(DEFAULT_NODATA);
    let data = input
        .data()
        .mapv(|v| if input.is_nodata(v) { nodata } else { f(v) });
    input.derive(data, Some(nodata))
}

/// Slope membership `slopeC`: [`SLOPE_BELL`], forced to 0 outside
/// `[SLOPE_MIN, SLOPE_MAX]`
pub fn slope_membership(slope: &Raster<f64>) -> Result<Raster<f64>> {
    map_membership(slope, |s| {
        if !(SLOPE_MIN..=SLOPE_MAX).contains(&s) {
            0.0
        } else {
            SLOPE_BELL.eval(s)
        }
    })
}

/// Wind-shelter membership `windshelterC`: [`WIND_SHELTER_BELL`]
pub fn wind_shelter_membership(wind_shelter: &Raster<f64>) -> Result<Raster<f64>> {
    bell_membership(wind_shelter, WIND_SHELTER_BELL)
}

pub(crate) fn bell_membership(input: &Raster<f64>, bell: BellCurve) -> Result<Raster<f64>> {
    map_membership(input, |v| bell.eval(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raster(values: Vec<f64>) -> Raster<f64> {
        let n = values.len();
        let mut r = Raster::from_vec(values, 1, n).unwrap();
        r.set_nodata(Some(-9999.0));
        r
    }

    #[test]
    fn test_slope_band() {
        let out = slope_membership(&raster(vec![10.0, 27.9, 28.0, 43.0, 60.0, 60.1, 85.0])).unwrap();
        let v: Vec<f64> = out.data().iter().copied().collect();
        assert_eq!(v[0], 0.0);
        assert_eq!(v[1], 0.0);
        assert!(v[2] > 0.0);
        assert_eq!(v[3], 1.0);
        assert!(v[4] > 0.0);
        assert_eq!(v[5], 0.0);
        assert_eq!(v[6], 0.0);
    }

    #[test]
    fn test_slope_membership_in_unit_interval() {
        let out = slope_membership(&raster((0..=90).map(f64::from).collect())).unwrap();
        assert!(out.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_wind_shelter_membership() {
        let out = wind_shelter_membership(&raster(vec![0.0, 2.0, -0.5])).unwrap();
        // bell(0; 2, 5, 2) = 1 / (1 + 1) at |x - c| = a
        assert_relative_eq!(out.get(0, 0).unwrap(), 0.5, epsilon = 1e-12);
        assert_eq!(out.get(0, 1).unwrap(), 1.0);
        assert!(out.get(0, 2).unwrap() < 0.5);
    }

    #[test]
    fn test_nodata_kept() {
        let out = slope_membership(&raster(vec![40.0, -9999.0])).unwrap();
        assert_eq!(out.nodata(), Some(-9999.0));
        assert_eq!(out.get(0, 1).unwrap(), -9999.0);

        let out = wind_shelter_membership(&raster(vec![-9999.0])).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), -9999.0);
    }

    #[test]
    fn test_default_sentinel() {
        let mut r = Raster::from_vec(vec![f64::NAN, 43.0], 1, 2).unwrap();
        r.set_nodata(None);
        let out = slope_membership(&r).unwrap();
        assert_eq!(out.nodata(), Some(DEFAULT_NODATA));
        assert_eq!(out.get(0, 0).unwrap(), DEFAULT_NODATA);
        assert_eq!(out.get(0, 1).unwrap(), 1.0);
    }
}
