//! Terrain indicators for release-area assessment
//!
//! Algorithms derived from Digital Elevation Models (DEMs):
//! - Slope and aspect: Horn gradients with replicated edges
//! - Wind shelter: sector-masked quantile of upwind elevation angles
//! - Ruggedness: vector dispersion of surface normals (VRM) and its class raster

mod aspect;
mod horn;
mod ruggedness;
mod slope;
mod wind_shelter;

pub use aspect::{aspect, Aspect};
pub use ruggedness::{ruggedness, ruggedness_class, Ruggedness, RuggednessParams, RUGGEDNESS_CUTOFF};
pub use slope::{slope, Slope};
pub use wind_shelter::{wind_shelter, SectorKernel, WindShelter, WindShelterParams, MAX_RADIUS};

use pra_core::{Raster, DEFAULT_NODATA};

/// No-data sentinel for layers derived from `dem`: the DEM's own sentinel,
/// or [`DEFAULT_NODATA`] when it has none (or uses NaN)
pub fn output_nodata(dem: &Raster<f64>) -> f64 {
    dem.nodata().filter(|v| !v.is_nan()).unwrap_or(DEFAULT_NODATA)
}
