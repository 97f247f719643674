//! Fuzzy membership functions
//!
//! Maps terrain indicators onto `[0, 1]` release-area memberships:
//! - Generalized bell curve
//! - Slope membership (bell, zeroed outside the release slope band)
//! - Wind-shelter membership

mod bell;
mod membership;

pub use bell::{BellCurve, SLOPE_BELL, WIND_SHELTER_BELL};
pub use membership::{
    map_membership, slope_membership, wind_shelter_membership, SLOPE_MAX, SLOPE_MIN,
};
