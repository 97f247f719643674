//! Native GeoTIFF reading/writing
//!
//! Uses the `tiff` crate for single-band TIFF I/O and handles the GeoTIFF
//! tags PRA delineation relies on: pixel scale + tiepoint (transform), the
//! GeoKey directory (EPSG code only) and the GDAL no-data tag.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{ColorType, Gray32Float, GrayI16};
use tiff::encoder::{TiffEncoder, TiffValue};
use tiff::tags::Tag;

const GT_MODEL_TYPE_KEY: u32 = 1024;
const GT_RASTER_TYPE_KEY: u32 = 1025;
const GEOGRAPHIC_TYPE_KEY: u32 = 2048;
const PROJECTED_CS_TYPE_KEY: u32 = 3072;

/// Cell encoding used when writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    /// 32-bit IEEE float (continuous layers)
    #[default]
    Float32,
    /// Signed 16-bit integer (class rasters and binary masks)
    Int16,
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// Output sample format
    pub sample_format: SampleFormat,
}

impl GeoTiffOptions {
    pub fn new(sample_format: SampleFormat) -> Self {
        Self { sample_format }
    }
}

/// Read the first band of a GeoTIFF file into a Raster
///
/// Transform, no-data value and EPSG code are read when present.
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(b) = band
        && b != 1
    {
        return Err(Error::invalid_parameter("band", b, "only single-band rasters are supported"));
    }

    let file = File::open(path).map_err(|e| Error::RasterRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    decode_geotiff(file).map_err(|e| Error::RasterRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn cast_all<S, T>(buf: Vec<S>) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter()
        .map(|v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder = Decoder::new(reader)
        .map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let data: Vec<T> = match result {
        DecodingResult::F32(buf) => cast_all(buf),
        DecodingResult::F64(buf) => cast_all(buf),
        DecodingResult::U8(buf) => cast_all(buf),
        DecodingResult::U16(buf) => cast_all(buf),
        DecodingResult::U32(buf) => cast_all(buf),
        DecodingResult::I8(buf) => cast_all(buf),
        DecodingResult::I16(buf) => cast_all(buf),
        DecodingResult::I32(buf) => cast_all(buf),
        _ => return Err(Error::UnsupportedDataType("Unsupported TIFF pixel format".to_string())),
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_epsg(&mut decoder).map(CRS::from_epsg));
    raster.set_nodata(read_nodata(&mut decoder).and_then(T::from_f64));

    Ok(raster)
}

/// GeoTransform from ModelPixelScaleTag + ModelTiepointTag
fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag).ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z]; scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

/// EPSG code from the GeoKey directory (projected or geographic type key)
fn read_epsg<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<u32> {
    let keys = decoder.get_tag_u32_vec(Tag::GeoKeyDirectoryTag).ok()?;
    let count = *keys.get(3)? as usize;

    keys.get(4..4 + 4 * count)?
        .chunks_exact(4)
        .find(|entry| {
            matches!(entry[0], PROJECTED_CS_TYPE_KEY | GEOGRAPHIC_TYPE_KEY) && entry[1] == 0
        })
        .map(|entry| entry[3])
        .filter(|&code| code != 0 && code != 32767)
}

/// No-data value from the GDAL_NODATA ASCII tag
fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder.get_tag_ascii_string(Tag::GdalNodata).ok()?;
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse().ok()
}

/// Write a Raster to a GeoTIFF file
///
/// The file is first written to `<path>.partial` and renamed once complete.
/// On failure the `.partial` file is left behind as a marker of the
/// interrupted write and [`Error::RasterWrite`] names it.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let options = options.unwrap_or_default();
    let partial = partial_path(path);

    let written = File::create(&partial)
        .map_err(Error::from)
        .and_then(|file| encode_geotiff(raster, file, options.sample_format))
        .and_then(|()| std::fs::rename(&partial, path).map_err(Error::from));

    written.map_err(|e| Error::RasterWrite {
        path: partial,
        reason: e.to_string(),
    })
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

/// Internal: encode a Raster as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, format: SampleFormat) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let nodata = raster.nodata().and_then(|v| v.to_f64());

    match format {
        SampleFormat::Float32 => {
            let fill = nodata.map_or(f32::NAN, |v| v as f32);
            let data: Vec<f32> = raster
                .data()
                .iter()
                .map(|&v| num_traits::cast(v).unwrap_or(fill))
                .collect();
            encode_band::<Gray32Float, _, _>(&mut encoder, raster, &data, nodata)
        }
        SampleFormat::Int16 => {
            let fill = nodata.and_then(|v| num_traits::cast(v)).unwrap_or(i16::MIN);
            let data: Vec<i16> = raster
                .data()
                .iter()
                .map(|&v| num_traits::cast(v).unwrap_or(fill))
                .collect();
            encode_band::<GrayI16, _, _>(&mut encoder, raster, &data, nodata)
        }
    }
}

fn encode_band<C, T, W>(
    encoder: &mut TiffEncoder<W>,
    raster: &Raster<T>,
    data: &[C::Inner],
    nodata: Option<f64>,
) -> Result<()>
where
    C: ColorType,
    T: RasterElement,
    W: Write + Seek,
    [C::Inner]: TiffValue,
{
    let tag_err = |what: &str, e: tiff::TiffError| Error::Other(format!("Cannot write {} tag: {}", what, e));

    let (rows, cols) = raster.shape();
    let mut image = encoder
        .new_image::<C>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();

    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &scale[..])
        .map_err(|e| tag_err("scale", e))?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, &tiepoint[..])
        .map_err(|e| tag_err("tiepoint", e))?;

    let geokeys = geokey_directory(raster.crs());
    image
        .encoder()
        .write_tag(Tag::GeoKeyDirectoryTag, geokeys.as_slice())
        .map_err(|e| tag_err("geokey", e))?;

    if let Some(nd) = nodata {
        let text = format!("{}", nd);
        image
            .encoder()
            .write_tag(Tag::GdalNodata, text.as_str())
            .map_err(|e| tag_err("nodata", e))?;
    }

    image
        .write_data(data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

/// GeoKeyDirectoryTag: model type, raster type (PixelIsArea) and, when the
/// EPSG code fits a SHORT, the projected or geographic CRS key.
fn geokey_directory(crs: Option<&CRS>) -> Vec<u16> {
    let geographic = crs.is_some_and(CRS::is_geographic);
    let epsg = crs.and_then(CRS::epsg).and_then(|c| u16::try_from(c).ok());

    let mut keys: Vec<[u16; 4]> = vec![
        [GT_MODEL_TYPE_KEY as u16, 0, 1, if geographic { 2 } else { 1 }],
        [GT_RASTER_TYPE_KEY as u16, 0, 1, 1],
    ];
    if let Some(code) = epsg {
        let key = if geographic { GEOGRAPHIC_TYPE_KEY } else { PROJECTED_CS_TYPE_KEY };
        keys.push([key as u16, 0, 1, code]);
    }

    let mut dir = vec![1, 1, 0, keys.len() as u16];
    dir.extend(keys.into_iter().flatten());
    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dem() -> Raster<f64> {
        let mut r = Raster::from_vec(vec![1000.0, 1010.5, -9999.0, 1020.25, 1030.0, 1040.0], 2, 3).unwrap();
        r.set_transform(GeoTransform::new(600_000.0, 5_200_000.0, 10.0, -10.0));
        r.set_crs(Some(CRS::from_epsg(31287)));
        r.set_nodata(Some(-9999.0));
        r
    }

    #[test]
    fn test_float_profile_survives_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dem.tif");
        write_geotiff(&dem(), &path, None).unwrap();

        let back: Raster<f64> = read_geotiff(&path, None).unwrap();
        assert_eq!(back.shape(), (2, 3));
        assert_eq!(back.nodata(), Some(-9999.0));
        assert_eq!(back.crs().and_then(|c| c.epsg()), Some(31287));
        assert_relative_eq!(back.transform().origin_x, 600_000.0);
        assert_relative_eq!(back.transform().origin_y, 5_200_000.0);
        assert_relative_eq!(back.cell_size(), 10.0);
        assert!(back.is_nodata(back.get(0, 2).unwrap()));
        assert_relative_eq!(back.get(1, 0).unwrap(), 1020.25);
        assert!(!dir.path().join("dem.tif.partial").exists());
    }

    #[test]
    fn test_geotiff_tags_are_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dem.tif");
        write_geotiff(&dem(), &path, None).unwrap();

        let mut decoder = Decoder::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(decoder.get_tag_ascii_string(Tag::GdalNodata).unwrap().trim_end_matches('\0'), "-9999");
        assert_eq!(decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).unwrap(), vec![10.0, 10.0, 0.0]);
        let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag).unwrap();
        assert_eq!(&tiepoint[3..5], &[600_000.0, 5_200_000.0]);
        assert!(decoder.get_tag_u32_vec(Tag::GeoKeyDirectoryTag).unwrap().contains(&31287));
    }

    #[test]
    fn test_int16_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.tif");
        let mut mask = Raster::<i16>::from_vec(vec![0, 1, -9999, 1], 2, 2).unwrap();
        mask.set_nodata(Some(-9999));
        write_geotiff(&mask, &path, Some(GeoTiffOptions::new(SampleFormat::Int16))).unwrap();

        let back: Raster<i16> = read_geotiff(&path, None).unwrap();
        assert_eq!(back.data(), mask.data());
        assert_eq!(back.nodata(), Some(-9999));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_geotiff::<f64, _>("/nonexistent/dem.tif", None).unwrap_err();
        match err {
            Error::RasterRead { path, .. } => assert!(path.ends_with("dem.tif")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failed_write_reports_partial_path() {
        let err = write_geotiff(&dem(), "/nonexistent/dir/slope.tif", None).unwrap_err();
        match err {
            Error::RasterWrite { path, .. } => {
                assert!(path.to_string_lossy().ends_with("slope.tif.partial"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_geokeys_geographic() {
        let keys = geokey_directory(Some(&CRS::from_epsg(4326)));
        assert_eq!(keys[3], 3);
        assert_eq!(&keys[4..8], &[1024, 0, 1, 2]);
        assert_eq!(&keys[12..16], &[2048, 0, 1, 4326]);
    }
}
