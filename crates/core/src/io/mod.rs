//! GeoTIFF reading and writing

mod native;

pub use native::{read_geotiff, write_geotiff, GeoTiffOptions, SampleFormat};
