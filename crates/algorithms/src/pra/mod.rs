//! Potential release area (PRA) delineation
//!
//! Combines the terrain indicators into one continuous release field and
//! extracts binary release masks from it:
//! - `config`: run parameters, loaded from YAML
//! - `combine`: fuzzy aggregation of the memberships
//! - `threshold`: binary masks at one cutoff or a full sweep
//! - `pipeline`: the end-to-end run over a DEM and forest grid

mod combine;
mod config;
mod diagnostics;
mod pipeline;
mod threshold;

pub use combine::combine;
pub use config::PraConfig;
pub use diagnostics::{PraDiagnostics, StageTiming};
pub use pipeline::{run, PraOutputs};
pub use threshold::{binary_mask, mask_name, Thresholds, MASK_NODATA};

/// Names of the layers a run produces
pub mod layer {
    pub const SLOPE: &str = "slope";
    pub const ASPECT: &str = "aspect";
    pub const WIND_SHELTER: &str = "windshelter";
    pub const RUGGEDNESS: &str = "ruggedness";
    pub const RUGGEDNESS_CLASS: &str = "ruggC";
    pub const SLOPE_MEMBERSHIP: &str = "slopeC";
    pub const WIND_SHELTER_MEMBERSHIP: &str = "windshelterC";
    pub const FOREST_MEMBERSHIP: &str = "forestC";
    pub const PRA: &str = "pra";
}
