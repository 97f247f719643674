//! Single-assignment store of named derived rasters
//!
//! Every layer produced by the delineation pipeline is inserted here exactly
//! once under its output name (`slope`, `windshelter`, `pra`, ...). Layers
//! must match the reference grid shape of the store.

use crate::error::{Error, Result};
use crate::io::{write_geotiff, GeoTiffOptions, SampleFormat};
use crate::raster::Raster;
use std::path::{Path, PathBuf};

/// A derived raster, continuous or categorical
#[derive(Debug, Clone)]
pub enum Layer {
    /// Continuous values (slope, memberships, the PRA field, ...)
    Continuous(Raster<f64>),
    /// Class raster with values `{0, 1}` (ruggedness class)
    Class(Raster<u8>),
    /// Binary mask with an integer no-data sentinel
    Mask(Raster<i16>),
}

impl Layer {
    /// Grid shape of the wrapped raster
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Layer::Continuous(r) => r.shape(),
            Layer::Class(r) => r.shape(),
            Layer::Mask(r) => r.shape(),
        }
    }

    fn write(&self, path: &Path) -> Result<()> {
        match self {
            Layer::Continuous(r) => write_geotiff(r, path, None),
            Layer::Class(r) => write_geotiff(r, path, Some(GeoTiffOptions::new(SampleFormat::Int16))),
            Layer::Mask(r) => write_geotiff(r, path, Some(GeoTiffOptions::new(SampleFormat::Int16))),
        }
    }
}

impl From<Raster<f64>> for Layer {
    fn from(r: Raster<f64>) -> Self {
        Layer::Continuous(r)
    }
}

impl From<Raster<u8>> for Layer {
    fn from(r: Raster<u8>) -> Self {
        Layer::Class(r)
    }
}

impl From<Raster<i16>> for Layer {
    fn from(r: Raster<i16>) -> Self {
        Layer::Mask(r)
    }
}

/// Insertion-ordered arena of named layers on one grid
#[derive(Debug, Clone)]
pub struct LayerStore {
    shape: (usize, usize),
    layers: Vec<(String, Layer)>,
}

impl LayerStore {
    /// Create an empty store for grids of `(rows, cols)`
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            shape: (rows, cols),
            layers: Vec::new(),
        }
    }

    /// Reference grid shape
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Insert a layer under `name`.
    ///
    /// Fails if the name was already produced or the layer's shape differs
    /// from the reference grid.
    pub fn insert(&mut self, name: impl Into<String>, layer: impl Into<Layer>) -> Result<()> {
        let name = name.into();
        let layer = layer.into();

        if self.contains(&name) {
            return Err(Error::DuplicateLayer(name));
        }
        let (er, ec) = self.shape;
        let (ar, ac) = layer.shape();
        if (er, ec) != (ar, ac) {
            return Err(Error::SizeMismatch { er, ec, ar, ac });
        }

        self.layers.push((name, layer));
        Ok(())
    }

    /// Whether a layer called `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.layers.iter().any(|(n, _)| n == name)
    }

    /// Look up any layer by name
    pub fn get(&self, name: &str) -> Result<&Layer> {
        self.layers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, l)| l)
            .ok_or_else(|| Error::MissingLayer(name.to_string()))
    }

    /// Look up a continuous layer
    pub fn continuous(&self, name: &str) -> Result<&Raster<f64>> {
        match self.get(name)? {
            Layer::Continuous(r) => Ok(r),
            _ => Err(Error::UnsupportedDataType(format!("layer '{}' is not continuous", name))),
        }
    }

    /// Look up a class layer
    pub fn class(&self, name: &str) -> Result<&Raster<u8>> {
        match self.get(name)? {
            Layer::Class(r) => Ok(r),
            _ => Err(Error::UnsupportedDataType(format!("layer '{}' is not a class raster", name))),
        }
    }

    /// Look up a mask layer
    pub fn mask(&self, name: &str) -> Result<&Raster<i16>> {
        match self.get(name)? {
            Layer::Mask(r) => Ok(r),
            _ => Err(Error::UnsupportedDataType(format!("layer '{}' is not a mask", name))),
        }
    }

    /// Layer names in production order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate `(name, layer)` in production order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Layer)> {
        self.layers.iter().map(|(n, l)| (n.as_str(), l))
    }

    /// Number of stored layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Write every layer as `<dir>/<name>.tif`, stopping at the first failure.
    ///
    /// Returns the written paths in production order.
    pub fn write_all(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.layers.len());
        for (name, layer) in &self.layers {
            let path = dir.join(format!("{}.tif", name));
            layer.write(&path)?;
            tracing::debug!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
