//! Statistics helpers for raster algorithms
//!
//! - **quantile**: order-statistic quantiles over per-pixel sample sets

mod quantile;

pub use quantile::quantile_in_place;
