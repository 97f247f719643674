//! Slope calculation from DEMs
//!
//! Calculates the steepest-descent angle using the Horn (1981) method,
//! which uses a 3x3 neighborhood to compute partial derivatives.

use super::horn::map_gradient;
use super::output_nodata;
use pra_core::raster::Raster;
use pra_core::{Algorithm, Error, Result};

/// Slope algorithm
#[derive(Debug, Clone, Default)]
pub struct Slope;

impl Algorithm for Slope {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Slope"
    }

    fn description(&self) -> &'static str {
        "Calculate slope in degrees from a DEM using Horn's method"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        slope(&input)
    }
}

/// Calculate slope in degrees (0-90) from a DEM
///
/// dz/dx = ((c + 2f + i) - (a + 2d + g)) / (8 * cellsize)
/// dz/dy = ((g + 2h + i) - (a + 2b + c)) / (8 * cellsize)
/// slope = atan(sqrt(dz/dx² + dz/dy²))
///
/// Edge cells use replicated borders, so the output has the DEM's shape.
/// Cells whose window contains no-data are no-data.
pub fn slope(dem: &Raster<f64>) -> Result<Raster<f64>> {
    let cell_size = dem.cell_size();
    if !(cell_size > 0.0) {
        return Err(Error::invalid_parameter("cell_size", cell_size, "must be positive"));
    }

    let nodata = output_nodata(dem);
    let eight_cell_size = 8.0 * cell_size;

    let data = map_gradient(dem, nodata, |g| {
        let dz_dx = g.dz_dx / eight_cell_size;
        let dz_dy = g.dz_dy / eight_cell_size;
        (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan().to_degrees()
    })?;

    dem.derive(data, Some(nodata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pra_core::GeoTransform;

    fn ramp(rows: usize, cols: usize, rise_per_col: f64) -> Raster<f64> {
        let mut dem = Raster::new(rows, cols);
        dem.set_transform(GeoTransform::new(0.0, rows as f64 * 10.0, 10.0, -10.0));
        for row in 0..rows {
            for col in 0..cols {
                dem.set(row, col, 1000.0 + rise_per_col * col as f64).unwrap();
            }
        }
        dem
    }

    #[test]
    fn test_slope_flat() {
        let mut dem: Raster<f64> = Raster::filled(10, 10, 100.0);
        dem.set_transform(GeoTransform::new(0.0, 100.0, 10.0, -10.0));

        let result = slope(&dem).unwrap();
        assert_eq!(result.shape(), (10, 10));
        for &v in result.data().iter() {
            assert!(v.abs() < 1e-12, "Expected 0 slope for flat surface, got {}", v);
        }
    }

    #[test]
    fn test_slope_45_degrees() {
        // 10 m rise per 10 m cell
        let result = slope(&ramp(6, 6, 10.0)).unwrap();
        assert_relative_eq!(result.get(3, 3).unwrap(), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slope_edges_computed() {
        let result = slope(&ramp(5, 5, 10.0)).unwrap();
        // Replicated borders keep edge cells valid (gradient halved across the edge)
        let edge = result.get(2, 0).unwrap();
        assert!(!result.is_nodata(edge));
        assert_relative_eq!(edge, (0.5_f64).atan().to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn test_slope_range_and_nodata() {
        let mut dem = ramp(8, 8, 25.0);
        dem.set_nodata(Some(-9999.0));
        dem.set(4, 4, -9999.0).unwrap();

        let result = slope(&dem).unwrap();
        assert_eq!(result.nodata(), Some(-9999.0));
        for row in 0..8 {
            for col in 0..8 {
                let v = result.get(row, col).unwrap();
                let touches = row.abs_diff(4) <= 1 && col.abs_diff(4) <= 1;
                if touches {
                    assert_eq!(v, -9999.0);
                } else {
                    assert!((0.0..=90.0).contains(&v), "slope {} out of range", v);
                }
            }
        }
    }

    #[test]
    fn test_algorithm_trait() {
        let result = Slope.execute_default(ramp(4, 4, 10.0)).unwrap();
        assert_eq!(Slope.name(), "Slope");
        assert_eq!(result.shape(), (4, 4));
    }
}
