//! # PRA Algorithms
//!
//! Potential release area (PRA) delineation for snow avalanches.
//!
//! ## Algorithm Categories
//!
//! - **terrain**: Slope, aspect, wind shelter, ruggedness
//! - **fuzzy**: Bell membership functions for slope and wind shelter
//! - **forest**: Forest variants, grid compatibility, forest membership
//! - **pra**: Aggregation, thresholding and the end-to-end pipeline
//! - **statistics**: Quantiles over neighborhood samples

pub(crate) mod maybe_rayon;

pub mod forest;
pub mod fuzzy;
pub mod pra;
pub mod statistics;
pub mod terrain;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::terrain::{
        aspect, ruggedness, ruggedness_class, slope, wind_shelter, Aspect, Ruggedness,
        RuggednessParams, Slope, WindShelter, WindShelterParams,
    };
    pub use crate::fuzzy::{slope_membership, wind_shelter_membership, BellCurve};
    pub use crate::forest::{check_grid_compatibility, forest_membership, ForestType, GridWarning};
    pub use crate::pra::{
        binary_mask, combine, mask_name, run, PraConfig, PraDiagnostics, PraOutputs, Thresholds,
    };
    pub use pra_core::prelude::*;
}
