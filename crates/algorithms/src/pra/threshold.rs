//! Binary release masks

use pra_core::raster::Raster;
use pra_core::{Error, Result};

/// No-data sentinel of every mask
pub const MASK_NODATA: i16 = -9999;

/// Cutoffs to extract masks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Thresholds {
    /// One mask at this cutoff
    Single(f64),
    /// 101 masks at `0.00, 0.01, ..., 1.00`
    Sweep,
}

impl Thresholds {
    /// Cutoff values in ascending order
    pub fn values(&self) -> Vec<f64> {
        match *self {
            Thresholds::Single(t) => vec![t],
            // k / 100 avoids the drift of repeated 0.01 steps
            Thresholds::Sweep => (0..=100).map(|k| k as f64 / 100.0).collect(),
        }
    }
}

/// Output name of the mask at `cutoff`: `pra_binary_thXXX` with
/// `XXX = round(cutoff * 100)`, zero-padded to 3 digits
pub fn mask_name(cutoff: f64) -> String {
    format!("pra_binary_th{:03}", (cutoff * 100.0).round() as i64)
}

/// Mask of `field`: 1 where `field >= cutoff`, 0 elsewhere and
/// [`MASK_NODATA`] where the field is no-data
pub fn binary_mask(field: &Raster<f64>, cutoff: f64) -> Result<Raster<i16>> {
    if !cutoff.is_finite() {
        return Err(Error::invalid_parameter("threshold", cutoff, "must be finite"));
    }
    let data = field.data().mapv(|v| {
        if field.is_nodata(v) {
            MASK_NODATA
        } else {
            i16::from(v >= cutoff)
        }
    });
    field.derive(data, Some(MASK_NODATA))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Raster<f64> {
        let mut r = Raster::from_vec(vec![0.0, 0.29, 0.30, 0.31, 0.9, -9999.0], 2, 3).unwrap();
        r.set_nodata(Some(-9999.0));
        r
    }

    #[test]
    fn test_names() {
        assert_eq!(mask_name(0.30), "pra_binary_th030");
        assert_eq!(mask_name(0.0), "pra_binary_th000");
        assert_eq!(mask_name(1.0), "pra_binary_th100");
        // 0.29 * 100 is 28.999...; rounding keeps the intended label
        assert_eq!(mask_name(0.29), "pra_binary_th029");
        assert_eq!(mask_name(0.57), "pra_binary_th057");
    }

    #[test]
    fn test_sweep_values() {
        let v = Thresholds::Sweep.values();
        assert_eq!(v.len(), 101);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[100], 1.0);
        let names: std::collections::HashSet<_> = v.iter().map(|&t| mask_name(t)).collect();
        assert_eq!(names.len(), 101);
        assert_eq!(Thresholds::Single(0.3).values(), vec![0.3]);
    }

    #[test]
    fn test_binary_mask() {
        let m = binary_mask(&field(), 0.30).unwrap();
        assert_eq!(m.nodata(), Some(MASK_NODATA));
        assert_eq!(m.data().iter().copied().collect::<Vec<_>>(), vec![0, 0, 1, 1, 1, MASK_NODATA]);
    }

    #[test]
    fn test_zero_cutoff_selects_all_valid() {
        let m = binary_mask(&field(), 0.0).unwrap();
        assert_eq!(m.data().iter().filter(|&&v| v == 1).count(), 5);
    }

    #[test]
    fn test_regenerated_mask_is_identical() {
        let f = field();
        let a = binary_mask(&f, 0.30).unwrap();
        let b = binary_mask(&f, 0.30).unwrap();
        assert_eq!(a.data(), b.data());
        assert_eq!(a.nodata(), b.nodata());
        assert_eq!(a.transform(), b.transform());
    }

    #[test]
    fn test_mask_of_mask_is_unchanged() {
        let m = binary_mask(&field(), 0.30).unwrap();
        let as_field = m
            .derive(m.data().mapv(f64::from), Some(f64::from(MASK_NODATA)))
            .unwrap();
        let again = binary_mask(&as_field, 0.30).unwrap();
        assert_eq!(again.data(), m.data());
    }

    #[test]
    fn test_non_finite_cutoff() {
        assert!(binary_mask(&field(), f64::NAN).is_err());
    }
}
