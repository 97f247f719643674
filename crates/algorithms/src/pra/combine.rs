//! Fuzzy aggregation of the release indicators
//!
//! ```text
//! m     = min(slopeC, windshelterC, forestC)
//! field = (1 - m)·m + m·(slopeC + windshelterC + forestC) / 3 - ruggC
//! ```
//!
//! with `field <= 0` clamped to 0.

use ndarray::Zip;
use pra_core::raster::Raster;
use pra_core::{Result, DEFAULT_NODATA};

/// Combine memberships into the continuous release field `pra`.
///
/// The field is no-data where `slope_c` is; a no-data wind-shelter
/// membership counts as 0 and a no-data forest membership as 1.
pub fn combine(
    slope_c: &Raster<f64>,
    wind_shelter_c: &Raster<f64>,
    forest_c: &Raster<f64>,
    rugg_c: &Raster<u8>,
) -> Result<Raster<f64>> {
    slope_c.ensure_same_shape(wind_shelter_c)?;
    slope_c.ensure_same_shape(forest_c)?;
    slope_c.ensure_same_shape(rugg_c)?;

    let nodata = slope_c.nodata().filter(|v| !v.is_nan()).unwrap_or(DEFAULT_NODATA);

    let data = Zip::from(slope_c.data())
        .and(wind_shelter_c.data())
        .and(forest_c.data())
        .and(rugg_c.data())
        .map_collect(|&s, &w, &f, &r| {
            if slope_c.is_nodata(s) {
                return nodata;
            }
            let w = if wind_shelter_c.is_nodata(w) { 0.0 } else { w };
            let f = if forest_c.is_nodata(f) { 1.0 } else { f };

            let m = s.min(w).min(f);
            let field = (1.0 - m) * m + m * (s + w + f) / 3.0 - f64::from(r);
            if field <= 0.0 { 0.0 } else { field }
        });

    slope_c.derive(data, Some(nodata))
}
