//! Forest membership `forestC`

use super::variant::ForestType;
use crate::fuzzy::map_membership;
use crate::terrain::output_nodata;
use pra_core::raster::Raster;
use pra_core::{Error, Result};

/// Elevations at or below this value are treated as outside the terrain
/// when synthesizing an empty forest grid
pub const NO_FOREST_FLOOR: f64 = -100.0;

/// Empty forest grid on the DEM's grid: 0 wherever the elevation is valid
/// and above [`NO_FOREST_FLOOR`], no-data elsewhere.
pub fn synthesize_no_forest(dem: &Raster<f64>) -> Result<Raster<f64>> {
    let nodata = output_nodata(dem);
    let data = dem.data().mapv(|z| {
        if !dem.is_nodata(z) && z > NO_FOREST_FLOOR {
            0.0
        } else {
            nodata
        }
    });
    dem.derive(data, Some(nodata))
}

/// Compute `forestC` for `forest_type`.
///
/// File-based variants need `forest` on the DEM's grid (a different shape is
/// [`Error::SizeMismatch`]); `no_forest` ignores it and synthesizes an empty
/// grid from the DEM. Memberships `<= 0` and no-data forest cells become 1.
pub fn forest_membership(
    dem: &Raster<f64>,
    forest_type: ForestType,
    forest: Option<&Raster<f64>>,
) -> Result<Raster<f64>> {
    let synthesized;
    let forest = if forest_type.requires_grid() {
        forest.ok_or_else(|| Error::Config(format!("forest type '{}' requires a forest grid", forest_type)))?
    } else {
        synthesized = synthesize_no_forest(dem)?;
        &synthesized
    };
    dem.ensure_same_shape(forest)?;

    let bell = forest_type.bell();
    bell.validate()?;

    // No-data forest cells map to the sentinel first, then to "no attenuation"
    let raw = map_membership(forest, |v| bell.eval(v))?;
    let data = raw.data().mapv(|m| if raw.is_nodata(m) || m <= 0.0 { 1.0 } else { m });

    dem.derive(data, Some(output_nodata(dem)))
}
