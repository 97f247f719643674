//! Forest attenuation
//!
//! Forest cover reduces release probability. Each forest data product has
//! its own bell curve; the resulting membership `forestC` is 1 where there
//! is no forest and falls towards 0 with denser cover.

mod compat;
mod membership;
mod variant;

pub use compat::{check_grid_compatibility, summarize, GridWarning};
pub use membership::{forest_membership, synthesize_no_forest, NO_FOREST_FLOOR};
pub use variant::ForestType;
