//! Forest data variants and their bell parameters

use crate::fuzzy::BellCurve;
use pra_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of forest grid supplied with the DEM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ForestType {
    /// Stem density (stems/ha)
    Stems,
    /// Percent canopy cover
    #[default]
    Pcc,
    /// Basal area (m²/ha)
    Bav,
    /// Sentinel-2 derived canopy cover
    Sen2cc,
    /// No forest grid; the DEM stands in as an empty forest
    NoForest,
}

impl ForestType {
    pub const ALL: [ForestType; 5] = [
        ForestType::Stems,
        ForestType::Pcc,
        ForestType::Bav,
        ForestType::Sen2cc,
        ForestType::NoForest,
    ];

    /// Bell curve mapping forest values to membership
    pub fn bell(self) -> BellCurve {
        match self {
            ForestType::Stems => BellCurve::new(350.0, 2.5, -150.0),
            ForestType::Pcc | ForestType::NoForest => BellCurve::new(40.0, 3.5, -15.0),
            ForestType::Bav => BellCurve::new(20.0, 3.5, -10.0),
            ForestType::Sen2cc => BellCurve::new(50.0, 1.5, 0.0),
        }
    }

    /// Whether a forest raster must be read for this variant
    pub fn requires_grid(self) -> bool {
        self != ForestType::NoForest
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ForestType::Stems => "stems",
            ForestType::Pcc => "pcc",
            ForestType::Bav => "bav",
            ForestType::Sen2cc => "sen2cc",
            ForestType::NoForest => "no_forest",
        }
    }
}

impl FromStr for ForestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForestType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownForestType(s.to_string()))
    }
}

impl TryFrom<String> for ForestType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for ForestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        for t in ForestType::ALL {
            assert_eq!(t.as_str().parse::<ForestType>().unwrap(), t);
        }
        assert!(matches!(
            "spruce".parse::<ForestType>(),
            Err(Error::UnknownForestType(name)) if name == "spruce"
        ));
        assert!("PCC".parse::<ForestType>().is_err());
    }

    #[test]
    fn test_bell_table() {
        assert_eq!(ForestType::Stems.bell(), BellCurve::new(350.0, 2.5, -150.0));
        assert_eq!(ForestType::Pcc.bell(), ForestType::NoForest.bell());
        assert_eq!(ForestType::Bav.bell(), BellCurve::new(20.0, 3.5, -10.0));
        assert_eq!(ForestType::Sen2cc.bell(), BellCurve::new(50.0, 1.5, 0.0));
    }

    #[test]
    fn test_requires_grid() {
        assert!(ForestType::Pcc.requires_grid());
        assert!(!ForestType::NoForest.requires_grid());
    }
}
