//! Aspect calculation from DEMs
//!
//! Calculates the direction of the steepest descent using the Horn (1981) method.

use super::horn::map_gradient;
use super::output_nodata;
use pra_core::raster::Raster;
use pra_core::{Algorithm, Error, Result};
use std::f64::consts::PI;

/// Gradients below this magnitude count as flat
const FLAT_THRESHOLD: f64 = 1e-10;

/// Aspect algorithm
#[derive(Debug, Clone, Default)]
pub struct Aspect;

impl Algorithm for Aspect {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Aspect"
    }

    fn description(&self) -> &'static str {
        "Calculate aspect (compass direction of steepest descent) from a DEM"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        aspect(&input)
    }
}

/// Calculate aspect in degrees from a DEM
///
/// Aspect is a compass bearing in `[0, 360)`, measured clockwise from north:
/// - 0° = North
/// - 90° = East
/// - 180° = South
/// - 270° = West
///
/// Flat cells get 0°. Edge cells use replicated borders; cells whose window
/// contains no-data are no-data.
pub fn aspect(dem: &Raster<f64>) -> Result<Raster<f64>> {
    let nodata = output_nodata(dem);

    let data = map_gradient(dem, nodata, |g| {
        if g.dz_dx.abs() < FLAT_THRESHOLD && g.dz_dy.abs() < FLAT_THRESHOLD {
            return 0.0;
        }

        // Descent direction in (east, north): east = -dz_dx, north = dz_dy
        // (row index grows southward on a north-up grid)
        let bearing = (-g.dz_dx).atan2(g.dz_dy);
        let bearing = if bearing < 0.0 { bearing + 2.0 * PI } else { bearing };

        // atan2 can land exactly on 2π after the shift
        let deg = bearing.to_degrees();
        if deg >= 360.0 { 0.0 } else { deg }
    })?;

    dem.derive(data, Some(nodata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pra_core::GeoTransform;

    fn dem_from(f: impl Fn(usize, usize) -> f64) -> Raster<f64> {
        let mut dem: Raster<f64> = Raster::new(10, 10);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));
        for row in 0..10 {
            for col in 0..10 {
                dem.set(row, col, f(row, col)).unwrap();
            }
        }
        dem
    }

    #[test]
    fn test_aspect_north_slope() {
        // Higher in south (high row), lower in north (low row)
        let result = aspect(&dem_from(|row, _| row as f64)).unwrap();
        let val = result.get(5, 5).unwrap();
        assert!(val < 1e-9 || val > 359.999, "Expected aspect ~0° (North), got {}°", val);
    }

    #[test]
    fn test_aspect_cardinal_directions() {
        let east = aspect(&dem_from(|_, col| -(col as f64))).unwrap();
        assert!((east.get(5, 5).unwrap() - 90.0).abs() < 1e-9);

        let south = aspect(&dem_from(|row, _| -(row as f64))).unwrap();
        assert!((south.get(5, 5).unwrap() - 180.0).abs() < 1e-9);

        let west = aspect(&dem_from(|_, col| col as f64)).unwrap();
        assert!((west.get(5, 5).unwrap() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_flat_is_zero() {
        let result = aspect(&dem_from(|_, _| 100.0)).unwrap();
        assert_eq!(result.get(5, 5).unwrap(), 0.0);
        assert_eq!(result.get(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_aspect_range() {
        let result = aspect(&dem_from(|row, col| ((row * 7 + col * 13) % 17) as f64)).unwrap();
        for &v in result.data().iter() {
            assert!((0.0..360.0).contains(&v), "aspect {} out of range", v);
        }
    }
}
