//! Terrain ruggedness from slope and aspect
//!
//! Measures ruggedness as the dispersion of unit surface normals over a
//! 3×3 neighborhood, the Vector Ruggedness Measure:
//!
//! ```text
//! x = sin(s)·sin(a)   y = sin(s)·cos(a)   z = cos(s)
//! ruggedness = 1 - |(Σx, Σy, Σz)| / 9
//! ```
//!
//! Ruggedness ranges from 0 (flat or uniformly tilted) to 1 (maximally
//! rugged). A steep but planar hillside has ruggedness 0.
//!
//! Reference:
//! Sappington, J.M., Longshore, K.M. & Thompson, D.B. (2007).
//! Quantifying landscape ruggedness for animal habitat analysis.
//! Journal of Wildlife Management, 71(5), 1419–1425.

use crate::maybe_rayon::*;
use ndarray::Array2;
use pra_core::raster::Raster;
use pra_core::{Algorithm, Error, Result, DEFAULT_NODATA};

/// Ruggedness at or above this value marks a cell as rugged
pub const RUGGEDNESS_CUTOFF: f64 = 0.02;

/// Parameters for the ruggedness class raster
#[derive(Debug, Clone)]
pub struct RuggednessParams {
    /// Cutoff for `ruggC` (default [`RUGGEDNESS_CUTOFF`])
    pub cutoff: f64,
}

impl Default for RuggednessParams {
    fn default() -> Self {
        Self {
            cutoff: RUGGEDNESS_CUTOFF,
        }
    }
}

/// Ruggedness algorithm: `(slope, aspect)` to `(ruggedness, ruggC)`
#[derive(Debug, Clone, Default)]
pub struct Ruggedness;

impl Algorithm for Ruggedness {
    type Input = (Raster<f64>, Raster<f64>);
    type Output = (Raster<f64>, Raster<u8>);
    type Params = RuggednessParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Ruggedness"
    }

    fn description(&self) -> &'static str {
        "Vector ruggedness of slope/aspect normals and its rugged/smooth class"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (slope, aspect) = input;
        let rugg = ruggedness(&slope, &aspect)?;
        let class = ruggedness_class(&rugg, params.cutoff)?;
        Ok((rugg, class))
    }
}

/// Compute ruggedness from slope and aspect rasters (degrees).
///
/// The outer one-cell ring is 0 so the output keeps the input shape.
/// An interior cell is no-data if any of its nine slope or aspect cells is
/// no-data.
pub fn ruggedness(slope: &Raster<f64>, aspect: &Raster<f64>) -> Result<Raster<f64>> {
    slope.ensure_same_shape(aspect)?;
    if slope.is_empty() {
        return Err(Error::InvalidDimensions {
            width: slope.cols(),
            height: slope.rows(),
        });
    }

    let (rows, cols) = slope.shape();
    let nodata = slope.nodata().filter(|v| !v.is_nan()).unwrap_or(DEFAULT_NODATA);

    // Unit normals; `None` marks cells where either input is no-data
    let normals: Array2<Option<[f64; 3]>> = Array2::from_shape_fn((rows, cols), |(row, col)| {
        let s = slope.data()[[row, col]];
        let a = aspect.data()[[row, col]];
        if slope.is_nodata(s) || aspect.is_nodata(a) {
            return None;
        }
        let (sin_s, cos_s) = s.to_radians().sin_cos();
        let (sin_a, cos_a) = a.to_radians().sin_cos();
        Some([sin_s * sin_a, sin_s * cos_a, cos_s])
    });

    let mut output = Array2::zeros((rows, cols));

    if rows >= 3 && cols >= 3 {
        let buffer = output
            .as_slice_mut()
            .ok_or_else(|| Error::Algorithm("output buffer is not contiguous".into()))?;

        buffer
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row, out_row)| {
                if row == 0 || row == rows - 1 {
                    return;
                }
                for col in 1..cols - 1 {
                    out_row[col] = dispersion(&normals, row, col).unwrap_or(nodata);
                }
            });
    }

    slope.derive(output, Some(nodata))
}

/// `1 - |R| / 9` over the 3×3 window at (row, col)
fn dispersion(normals: &Array2<Option<[f64; 3]>>, row: usize, col: usize) -> Option<f64> {
    let mut sum = [0.0; 3];
    for r in row - 1..=row + 1 {
        for c in col - 1..=col + 1 {
            let n = normals[[r, c]]?;
            sum[0] += n[0];
            sum[1] += n[1];
            sum[2] += n[2];
        }
    }
    let resultant = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
    Some(1.0 - resultant / 9.0)
}

/// Classify ruggedness: 1 where `ruggedness >= cutoff`, else 0.
///
/// No-data ruggedness maps to 0, so the result has no sentinel.
pub fn ruggedness_class(rugg: &Raster<f64>, cutoff: f64) -> Result<Raster<u8>> {
    let data = rugg
        .data()
        .mapv(|v| u8::from(!rugg.is_nodata(v) && v >= cutoff));
    rugg.derive(data, None)
}
