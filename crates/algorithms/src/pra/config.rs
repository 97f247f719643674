//! Run configuration
//!
//! Loaded from YAML; every key is optional and falls back to the defaults
//! below. The camelCase key names of older INI setups are accepted as
//! aliases.
//!
//! ```yaml
//! forest_type: pcc
//! single_threshold: 0.30
//! save_all_thresholds: false
//! radius: 6
//! prob: 0.5
//! wind_dir: 0
//! wind_tol: 179
//! ```

use super::threshold::Thresholds;
use crate::forest::ForestType;
use crate::terrain::{WindShelterParams, RUGGEDNESS_CUTOFF};
use pra_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Parameters of one delineation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PraConfig {
    /// Kind of forest grid
    #[serde(alias = "forestType")]
    pub forest_type: ForestType,
    /// Cutoff of the single mask
    #[serde(alias = "singleThreshold")]
    pub single_threshold: f64,
    /// Write the 101-mask sweep instead of the single mask
    #[serde(alias = "saveAllThresholds")]
    pub save_all_thresholds: bool,
    /// Wind-shelter radius in cells
    pub radius: usize,
    /// Wind-shelter quantile
    pub prob: f64,
    /// Wind direction, degrees (0 = north)
    #[serde(alias = "windDir")]
    pub wind_dir: f64,
    /// Sector half-width around `wind_dir`, degrees
    #[serde(alias = "windTol")]
    pub wind_tol: f64,
    /// Ruggedness at or above this value is rugged
    pub ruggedness_cutoff: f64,
}

impl Default for PraConfig {
    fn default() -> Self {
        Self {
            forest_type: ForestType::Pcc,
            single_threshold: 0.30,
            save_all_thresholds: false,
            radius: 6,
            prob: 0.5,
            wind_dir: 0.0,
            wind_tol: 179.0,
            ruggedness_cutoff: RUGGEDNESS_CUTOFF,
        }
    }
}

impl PraConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: PraConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!("loaded configuration from {}", path.display());
        Self::from_yaml_str(&text)
    }

    /// Check every numeric parameter range
    pub fn validate(&self) -> Result<()> {
        self.wind_shelter_params().validate()?;
        if !(0.0..=1.0).contains(&self.single_threshold) {
            return Err(Error::invalid_parameter(
                "single_threshold",
                self.single_threshold,
                "must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.ruggedness_cutoff) {
            return Err(Error::invalid_parameter(
                "ruggedness_cutoff",
                self.ruggedness_cutoff,
                "must be in [0, 1]",
            ));
        }
        Ok(())
    }

    pub fn wind_shelter_params(&self) -> WindShelterParams {
        WindShelterParams {
            radius: self.radius,
            wind_direction: self.wind_dir,
            wind_tolerance: self.wind_tol,
            quantile: self.prob,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        if self.save_all_thresholds {
            Thresholds::Sweep
        } else {
            Thresholds::Single(self.single_threshold)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = PraConfig::default();
        assert_eq!(c.forest_type, ForestType::Pcc);
        assert_eq!(c.single_threshold, 0.30);
        assert_eq!(c.radius, 6);
        assert_eq!(c.prob, 0.5);
        assert_eq!(c.wind_tol, 179.0);
        assert!(c.validate().is_ok());
        assert_eq!(c.thresholds(), Thresholds::Single(0.30));
    }

    #[test]
    fn test_partial_yaml() {
        let c = PraConfig::from_yaml_str("forest_type: stems\nradius: 4\nsave_all_thresholds: true\n").unwrap();
        assert_eq!(c.forest_type, ForestType::Stems);
        assert_eq!(c.radius, 4);
        assert_eq!(c.prob, 0.5);
        assert_eq!(c.thresholds(), Thresholds::Sweep);
    }

    #[test]
    fn test_camel_case_aliases() {
        let c = PraConfig::from_yaml_str("forestType: no_forest\nwindDir: 270\nwindTol: 45\n").unwrap();
        assert_eq!(c.forest_type, ForestType::NoForest);
        assert_eq!(c.wind_dir, 270.0);
        assert_eq!(c.wind_tol, 45.0);
    }

    #[test]
    fn test_unknown_forest_type() {
        let err = PraConfig::from_yaml_str("forest_type: spruce\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("spruce"));
    }

    #[test]
    fn test_unknown_key() {
        assert!(PraConfig::from_yaml_str("radious: 4\n").is_err());
    }

    #[test]
    fn test_out_of_range() {
        for yaml in [
            "radius: 0\n",
            "prob: 1.5\n",
            "wind_tol: 180\n",
            "wind_tol: 0\n",
            "single_threshold: -0.1\n",
        ] {
            assert!(
                matches!(PraConfig::from_yaml_str(yaml), Err(Error::InvalidParameter { .. })),
                "{} should be rejected",
                yaml
            );
        }
    }

    #[test]
    fn test_radius_upper_bound() {
        let err = PraConfig::from_yaml_str("forest_type: no_forest\nradius: 9223372036854775808\n").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "radius", .. }));
        assert!(PraConfig::from_yaml_str("radius: 1000\n").is_ok());
        assert!(PraConfig::from_yaml_str("radius: 1001\n").is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "forest_type: bav\nprob: 0.75").unwrap();
        let c = PraConfig::load(file.path()).unwrap();
        assert_eq!(c.forest_type, ForestType::Bav);
        assert_eq!(c.prob, 0.75);

        assert!(matches!(PraConfig::load("/nonexistent/pra.yaml"), Err(Error::Config(_))));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let c = PraConfig {
            forest_type: ForestType::Sen2cc,
            ..PraConfig::default()
        };
        let yaml = serde_yaml::to_string(&c).unwrap();
        assert!(yaml.contains("forest_type: sen2cc"));
        assert_eq!(PraConfig::from_yaml_str(&yaml).unwrap(), c);
    }
}
