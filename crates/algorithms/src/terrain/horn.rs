//! Horn (1981) 3x3 gradient shared by slope and aspect
//!
//! ```text
//! a b c
//! d e f
//! g h i
//! ```
//!
//! Cells outside the grid are replaced by the nearest edge cell, so every
//! cell of the input gets a gradient and no output shrinks.

use ndarray::Array2;
use pra_core::{Raster, Result, Error};

/// Unscaled Horn gradient: `dz_dx` positive eastward, `dz_dy` positive with
/// increasing row (southward on a north-up grid). Divide by `8 * cell_size`
/// for a true gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Gradient {
    pub dz_dx: f64,
    pub dz_dy: f64,
}

/// Gradient at (row, col), `None` if any window cell is no-data
pub(crate) fn horn_gradient(dem: &Raster<f64>, row: usize, col: usize) -> Option<Gradient> {
    let data = dem.data();
    let (rows, cols) = dem.shape();

    let up = row.saturating_sub(1);
    let down = (row + 1).min(rows - 1);
    let left = col.saturating_sub(1);
    let right = (col + 1).min(cols - 1);

    let mut w = [0.0; 9];
    for (k, &(r, c)) in [
        (up, left), (up, col), (up, right),
        (row, left), (row, col), (row, right),
        (down, left), (down, col), (down, right),
    ]
    .iter()
    .enumerate()
    {
        let v = data[[r, c]];
        if dem.is_nodata(v) {
            return None;
        }
        w[k] = v;
    }
    let [a, b, c, d, _e, f, g, h, i] = w;

    Some(Gradient {
        dz_dx: (c + 2.0 * f + i) - (a + 2.0 * d + g),
        dz_dy: (g + 2.0 * h + i) - (a + 2.0 * b + c),
    })
}

/// Evaluate `cell` over every gradient of the DEM, writing `nodata` where the
/// window touches no-data
pub(crate) fn map_gradient<F>(dem: &Raster<f64>, nodata: f64, cell: F) -> Result<Array2<f64>>
where
    F: Fn(Gradient) -> f64,
{
    if dem.is_empty() {
        return Err(Error::InvalidDimensions {
            width: dem.cols(),
            height: dem.rows(),
        });
    }

    Ok(Array2::from_shape_fn(dem.shape(), |(row, col)| {
        horn_gradient(dem, row, col).map_or(nodata, &cell)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_replication_plane() {
        // z = 2 * col on a 3x4 grid; replicated edges halve the x-gradient
        let mut dem = Raster::new(3, 4);
        for row in 0..3 {
            for col in 0..4 {
                dem.set(row, col, 2.0 * col as f64).unwrap();
            }
        }

        let interior = horn_gradient(&dem, 1, 1).unwrap();
        assert_eq!(interior.dz_dx, 16.0);
        assert_eq!(interior.dz_dy, 0.0);

        let corner = horn_gradient(&dem, 0, 0).unwrap();
        assert_eq!(corner.dz_dx, 8.0);
    }

    #[test]
    fn test_nodata_neighbor() {
        let mut dem = Raster::filled(3, 3, 10.0);
        dem.set_nodata(Some(-9999.0));
        dem.set(0, 0, -9999.0).unwrap();
        assert!(horn_gradient(&dem, 1, 1).is_none());
        assert!(horn_gradient(&dem, 2, 2).is_some());
    }
}
