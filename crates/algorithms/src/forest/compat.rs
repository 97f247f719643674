//! DEM/forest grid compatibility
//!
//! Forest rasters are never resampled. Differences in CRS, transform or
//! size are reported; only a size difference stops the forest stage.

use pra_core::{GeoTransform, Raster};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// One difference between the elevation and forest grids
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GridWarning {
    Crs { dem: String, forest: String },
    Transform { dem: GeoTransform, forest: GeoTransform },
    Dimensions { dem: (usize, usize), forest: (usize, usize) },
}

impl GridWarning {
    /// Whether this difference breaks the shared-grid invariant
    pub fn is_fatal(&self) -> bool {
        matches!(self, GridWarning::Dimensions { .. })
    }
}

impl fmt::Display for GridWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridWarning::Crs { dem, forest } => {
                write!(f, "CRS differs: DEM={}, FOREST={}", dem, forest)
            }
            GridWarning::Transform { dem, forest } => write!(
                f,
                "transform differs: DEM origin=({}, {}) cell={}, FOREST origin=({}, {}) cell={}",
                dem.origin_x,
                dem.origin_y,
                dem.pixel_width,
                forest.origin_x,
                forest.origin_y,
                forest.pixel_width
            ),
            GridWarning::Dimensions { dem, forest } => write!(
                f,
                "dimensions differ: DEM={}x{}, FOREST={}x{}",
                dem.1, dem.0, forest.1, forest.0
            ),
        }
    }
}

/// All warnings on one line, `; `-separated
pub fn summarize(warnings: &[GridWarning]) -> String {
    warnings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Compare the forest grid against the DEM, logging each difference.
pub fn check_grid_compatibility(dem: &Raster<f64>, forest: &Raster<f64>) -> Vec<GridWarning> {
    let mut warnings = Vec::new();

    let crs_matches = match (dem.crs(), forest.crs()) {
        (None, None) => true,
        (Some(a), Some(b)) => a.is_equivalent(b),
        _ => false,
    };
    if !crs_matches {
        let describe = |r: &Raster<f64>| r.crs().map_or_else(|| "none".to_string(), |c| c.identifier());
        warnings.push(GridWarning::Crs {
            dem: describe(dem),
            forest: describe(forest),
        });
    }

    if !dem.transform().approx_eq(forest.transform()) {
        warnings.push(GridWarning::Transform {
            dem: *dem.transform(),
            forest: *forest.transform(),
        });
    }

    if dem.shape() != forest.shape() {
        warnings.push(GridWarning::Dimensions {
            dem: dem.shape(),
            forest: forest.shape(),
        });
    }

    for w in &warnings {
        warn!("DEM/FOREST grid mismatch: {}", w);
    }

    warnings
}
