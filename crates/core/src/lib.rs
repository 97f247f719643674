//! # PRA Core
//!
//! Core types and I/O for potential release area (PRA) delineation.
//!
//! This crate provides:
//! - `Raster<T>`: Georeferenced raster grid type
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `CRS`: Coordinate Reference System handling
//! - `LayerStore`: Single-assignment arena of named derived rasters
//! - Native GeoTIFF reading and writing
//! - Algorithm trait for a consistent API

pub mod crs;
pub mod error;
pub mod io;
pub mod layers;
pub mod raster;

pub use crs::CRS;
pub use error::{Error, Result};
pub use layers::LayerStore;
pub use raster::{GeoTransform, Raster, RasterElement};

/// Default no-data sentinel used when an input raster carries none
pub const DEFAULT_NODATA: f64 = -9999.0;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::layers::LayerStore;
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// Core trait for the pipeline stages.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
