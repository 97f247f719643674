//! End-to-end PRA delineation
//!
//! ```text
//! DEM ─┬─ slope ──┬─ ruggedness ─ ruggC ──────────────┐
//!      │  aspect ─┘                                   │
//!      ├─ slope ─ slopeC ─────────────────────────────┤
//!      ├─ windshelter ─ windshelterC ─────────────────┼─ pra ─ masks
//!      └─ forest grid (or synthesized) ─ forestC ─────┘
//! ```
//!
//! Every layer lands in a [`LayerStore`] under its output name; stages read
//! their inputs back from the store.

use super::combine::combine;
use super::config::PraConfig;
use super::diagnostics::PraDiagnostics;
use super::layer;
use super::threshold::{binary_mask, mask_name};
use crate::forest::{check_grid_compatibility, forest_membership, summarize, GridWarning};
use crate::fuzzy::{slope_membership, wind_shelter_membership};
use crate::terrain::{aspect, ruggedness, ruggedness_class, slope, wind_shelter};
use pra_core::raster::Raster;
use pra_core::{Error, LayerStore, Result};
use tracing::{debug, error, info, warn};

/// Everything a run produces
#[derive(Debug)]
pub struct PraOutputs {
    pub layers: LayerStore,
    pub diagnostics: PraDiagnostics,
}

/// Delineate potential release areas on `dem`.
///
/// `forest` is required unless `config.forest_type` is `no_forest`, in which
/// case it is ignored. Grid differences between DEM and forest are logged
/// and returned in the diagnostics; a size difference is fatal.
pub fn run(dem: &Raster<f64>, forest: Option<&Raster<f64>>, config: &PraConfig) -> Result<PraOutputs> {
    config.validate()?;
    if dem.is_empty() {
        return Err(Error::InvalidDimensions {
            width: dem.cols(),
            height: dem.rows(),
        });
    }

    info!(
        "PRA delineation: {}x{} cells, forest_type={}, thr={:.2}, radius={}, prob={:.2}, wind={}±{}",
        dem.cols(),
        dem.rows(),
        config.forest_type,
        config.single_threshold,
        config.radius,
        config.prob,
        config.wind_dir,
        config.wind_tol
    );

    if !dem.transform().is_square() {
        warn!(
            "DEM cells are not square; using the pixel width {} as cell size",
            dem.cell_size()
        );
    }

    let (rows, cols) = dem.shape();
    let mut layers = LayerStore::new(rows, cols);
    let mut diagnostics = PraDiagnostics::default();

    diagnostics.time("slope/aspect", || {
        layers.insert(layer::SLOPE, slope(dem)?)?;
        layers.insert(layer::ASPECT, aspect(dem)?)
    })?;

    diagnostics.time("windshelter", || {
        layers.insert(layer::WIND_SHELTER, wind_shelter(dem, &config.wind_shelter_params())?)
    })?;

    diagnostics.time("ruggedness", || {
        let rugg = ruggedness(layers.continuous(layer::SLOPE)?, layers.continuous(layer::ASPECT)?)?;
        let rugg_c = ruggedness_class(&rugg, config.ruggedness_cutoff)?;
        layers.insert(layer::RUGGEDNESS, rugg)?;
        layers.insert(layer::RUGGEDNESS_CLASS, rugg_c)
    })?;

    diagnostics.time("slopeC & windshelterC", || {
        let slope_c = slope_membership(layers.continuous(layer::SLOPE)?)?;
        let wind_c = wind_shelter_membership(layers.continuous(layer::WIND_SHELTER)?)?;
        layers.insert(layer::SLOPE_MEMBERSHIP, slope_c)?;
        layers.insert(layer::WIND_SHELTER_MEMBERSHIP, wind_c)
    })?;

    let forest = if config.forest_type.requires_grid() {
        if let Some(grid) = forest {
            let warnings = check_grid_compatibility(dem, grid);
            if warnings.iter().any(GridWarning::is_fatal) {
                error!("forest grid rejected: {}", summarize(&warnings));
                let (er, ec) = dem.shape();
                let (ar, ac) = grid.shape();
                return Err(Error::SizeMismatch { er, ec, ar, ac });
            }
            diagnostics.warnings.extend(warnings);
        }
        forest
    } else {
        if forest.is_some() {
            debug!("forest_type=no_forest: ignoring supplied forest grid");
        }
        None
    };
    diagnostics.time("forestC", || {
        layers.insert(
            layer::FOREST_MEMBERSHIP,
            forest_membership(dem, config.forest_type, forest)?,
        )
    })?;

    diagnostics.time("continuous PRA", || {
        let field = combine(
            layers.continuous(layer::SLOPE_MEMBERSHIP)?,
            layers.continuous(layer::WIND_SHELTER_MEMBERSHIP)?,
            layers.continuous(layer::FOREST_MEMBERSHIP)?,
            layers.class(layer::RUGGEDNESS_CLASS)?,
        )?;
        layers.insert(layer::PRA, field)
    })?;

    diagnostics.time("PRA thresholding", || {
        for cutoff in config.thresholds().values() {
            let mask = binary_mask(layers.continuous(layer::PRA)?, cutoff)?;
            layers.insert(mask_name(cutoff), mask)?;
        }
        Ok(())
    })?;

    info!(
        "PRA delineation done: {} layers, {} warnings, {:.2?}",
        layers.len(),
        diagnostics.warnings.len(),
        diagnostics.total()
    );

    Ok(PraOutputs { layers, diagnostics })
}
