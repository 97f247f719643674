//! Wind shelter index
//!
//! Measures how sheltered a cell is from wind coming from a given direction
//! by looking at the elevation angles towards upwind neighbors. For each
//! cell, every neighbor inside a circular sector (radius `r`, centred on the
//! wind direction, half-width `tolerance`) contributes
//! `atan((z_neighbor - z_center) / distance)`; the index is a quantile of
//! those angles (radians). Positive values mean upwind terrain is higher.
//!
//! Reference:
//! Veitinger, J., Purves, R.S. & Sovilla, B. (2016). Multi-scale fuzzy-logic
//! identification of potential slab-avalanche release areas.
//! Natural Hazards and Earth System Sciences, 16(10), 2211–2225.

use crate::maybe_rayon::*;
use crate::statistics::quantile_in_place;
use ndarray::Array2;
use pra_core::raster::Raster;
use pra_core::{Algorithm, Error, Result};
use tracing::debug;

use super::output_nodata;

/// Largest accepted search radius in cells
pub const MAX_RADIUS: usize = 1000;

/// Parameters for the wind shelter index
#[derive(Debug, Clone)]
pub struct WindShelterParams {
    /// Search radius in cells (window is `2r+1` wide)
    pub radius: usize,
    /// Compass direction the wind comes from, degrees (0 = north)
    pub wind_direction: f64,
    /// Half-width of the sector around `wind_direction`, degrees, in (0, 180)
    pub wind_tolerance: f64,
    /// Quantile of the sampled angles, in [0, 1]
    pub quantile: f64,
}

impl Default for WindShelterParams {
    fn default() -> Self {
        Self {
            radius: 6,
            wind_direction: 0.0,
            // widest sector that does not wrap onto itself
            wind_tolerance: 179.0,
            quantile: 0.5,
        }
    }
}

impl WindShelterParams {
    /// Check parameter ranges.
    ///
    /// A tolerance of 180° or more would make the sector a full circle or
    /// overlap itself and is rejected.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RADIUS).contains(&self.radius) {
            return Err(Error::invalid_parameter(
                "radius",
                self.radius,
                format!("must be in [1, {}]", MAX_RADIUS),
            ));
        }
        if !self.wind_direction.is_finite() {
            return Err(Error::invalid_parameter("wind_direction", self.wind_direction, "must be finite"));
        }
        if !(self.wind_tolerance > 0.0 && self.wind_tolerance < 180.0) {
            return Err(Error::invalid_parameter(
                "wind_tolerance",
                self.wind_tolerance,
                "must be in (0, 180); wider sectors overlap themselves",
            ));
        }
        if !(0.0..=1.0).contains(&self.quantile) {
            return Err(Error::invalid_parameter("quantile", self.quantile, "must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Sector mask and distance kernel for one wind shelter run.
///
/// Both kernels are `(2r+1) x (2r+1)` and centred on `(r, r)`. The mask is
/// `true` for cells within `r` cells of the centre whose compass bearing lies
/// in `[direction - tolerance, direction + tolerance)` (mod 360), plus the
/// centre itself.
#[derive(Debug, Clone)]
pub struct SectorKernel {
    radius: usize,
    mask: Array2<bool>,
    distance: Array2<f64>,
    /// (row, col, distance) of every sampled kernel cell; the centre is excluded
    samples: Vec<(usize, usize, f64)>,
}

impl SectorKernel {
    pub fn new(radius: usize, direction: f64, tolerance: f64, cell_size: f64) -> Self {
        let size = 2 * radius + 1;
        let r = radius as f64;

        let theta_min = (direction - tolerance).rem_euclid(360.0);
        let mut theta_max = (direction + tolerance).rem_euclid(360.0);
        if theta_max < theta_min {
            theta_max += 360.0;
        }
        let width = theta_max - theta_min;

        let distance = Array2::from_shape_fn((size, size), |(i, j)| {
            let di = i as f64 - r;
            let dj = j as f64 - r;
            (di * di + dj * dj).sqrt() * cell_size
        });

        let mask = Array2::from_shape_fn((size, size), |(i, j)| {
            if i == radius && j == radius {
                return true;
            }
            let north = r - i as f64;
            let east = j as f64 - r;
            if north * north + east * east > r * r {
                return false;
            }
            let bearing = east.atan2(north).to_degrees().rem_euclid(360.0);
            (bearing - theta_min).rem_euclid(360.0) < width
        });

        let samples = mask
            .indexed_iter()
            .filter(|&((i, j), &inside)| inside && !(i == radius && j == radius))
            .map(|((i, j), _)| (i, j, distance[[i, j]]))
            .collect();

        Self {
            radius,
            mask,
            distance,
            samples,
        }
    }

    /// Sector mask (centre included)
    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }

    /// Planar distance of each kernel cell to the centre, world units
    pub fn distance(&self) -> &Array2<f64> {
        &self.distance
    }

    /// Number of neighbors sampled per pixel, at most `(2r+1)² - 1`
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Wind shelter value at (row, col), whose window must lie inside the grid.
    ///
    /// `scratch` is cleared and refilled with the sampled angles.
    fn shelter_at(
        &self,
        dem: &Raster<f64>,
        row: usize,
        col: usize,
        quantile: f64,
        scratch: &mut Vec<f64>,
    ) -> Option<f64> {
        let data = dem.data();
        let center = data[[row, col]];
        if dem.is_nodata(center) {
            return None;
        }

        let top = row - self.radius;
        let left = col - self.radius;

        scratch.clear();
        for &(i, j, dist) in &self.samples {
            let z = data[[top + i, left + j]];
            // zero marks an absent sample, like no-data
            if dem.is_nodata(z) || z == 0.0 {
                continue;
            }
            scratch.push(((z - center) / dist).atan());
        }

        quantile_in_place(scratch, quantile)
    }
}

/// Wind shelter algorithm
#[derive(Debug, Clone, Default)]
pub struct WindShelter;

impl Algorithm for WindShelter {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = WindShelterParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "WindShelter"
    }

    fn description(&self) -> &'static str {
        "Quantile of elevation angles to upwind neighbors inside a directional sector"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        wind_shelter(&input, &params)
    }
}

/// Compute the wind shelter index.
///
/// Cells closer than `radius` to any grid edge, cells that are no-data and
/// cells without any valid upwind sample are no-data. Rows are processed in
/// parallel; each worker owns one scratch buffer sized for the kernel.
///
/// # Returns
/// Raster<f64> of angles in radians, `(-π/2, π/2)`.
pub fn wind_shelter(dem: &Raster<f64>, params: &WindShelterParams) -> Result<Raster<f64>> {
    params.validate()?;

    let cell_size = dem.cell_size();
    if !(cell_size > 0.0) {
        return Err(Error::invalid_parameter("cell_size", cell_size, "must be positive"));
    }

    let (rows, cols) = dem.shape();
    let r = params.radius;
    let nodata = output_nodata(dem);

    let mut output = Array2::from_elem((rows, cols), nodata);
    if rows <= 2 * r || cols <= 2 * r {
        debug!("wind shelter: {}x{} grid is smaller than the {}-cell window", cols, rows, 2 * r + 1);
        return dem.derive(output, Some(nodata));
    }

    let kernel = SectorKernel::new(
        params.radius,
        params.wind_direction,
        params.wind_tolerance,
        cell_size,
    );
    debug!(
        "wind shelter kernel: radius={} samples={} direction={}±{}",
        params.radius,
        kernel.sample_count(),
        params.wind_direction,
        params.wind_tolerance
    );

    let quantile = params.quantile;

    let buffer = output
        .as_slice_mut()
        .ok_or_else(|| Error::Algorithm("output buffer is not contiguous".into()))?;
    let capacity = kernel.sample_count();

    buffer
        .par_chunks_mut(cols)
        .enumerate()
        .for_each_init(
            || Vec::with_capacity(capacity),
            |scratch, (row, out_row)| {
                if row < r || row + r >= rows {
                    return;
                }
                for col in r..cols - r {
                    if let Some(v) = kernel.shelter_at(dem, row, col, quantile, scratch) {
                        out_row[col] = v;
                    }
                }
            },
        );

    dem.derive(output, Some(nodata))
}
