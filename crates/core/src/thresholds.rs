//! Safety bounds per asset kind.
//!
//! The registry is a plain value built once at startup (defaults plus any
//! configured overrides) and handed to the services that validate and roll
//! up readings.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::anomaly::Bounds;
use crate::error::CoreError;

/// Polar-compound percentage above which frying oil is flagged.
pub const DEFAULT_OIL_MAX_POLAR_PERCENTAGE: f64 = 24.0;

// ---------------------------------------------------------------------------
// Cold storage kinds
// ---------------------------------------------------------------------------

/// Sub-classification of a cold storage unit.
///
/// The serde names are the persisted wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColdStorageKind {
    #[serde(rename = "enceinte_positive")]
    PositiveChamber,
    #[serde(rename = "enceinte_negative")]
    NegativeChamber,
    #[serde(rename = "vitrine")]
    Showcase,
    #[serde(rename = "enceinte_fruits_legumes")]
    FruitsAndVegetables,
    #[serde(rename = "enceinte_sensible_positive")]
    SensitivePositive,
    #[serde(rename = "enceinte_produit_fini")]
    FinishedProducts,
    #[serde(rename = "carcasse_viande")]
    MeatCarcass,
    #[serde(rename = "enceinte_produit_laitier")]
    Dairy,
    #[serde(rename = "zone_refrigeree")]
    RefrigeratedZone,
}

impl ColdStorageKind {
    pub const ALL: [ColdStorageKind; 9] = [
        ColdStorageKind::PositiveChamber,
        ColdStorageKind::NegativeChamber,
        ColdStorageKind::Showcase,
        ColdStorageKind::FruitsAndVegetables,
        ColdStorageKind::SensitivePositive,
        ColdStorageKind::FinishedProducts,
        ColdStorageKind::MeatCarcass,
        ColdStorageKind::Dairy,
        ColdStorageKind::RefrigeratedZone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColdStorageKind::PositiveChamber => "enceinte_positive",
            ColdStorageKind::NegativeChamber => "enceinte_negative",
            ColdStorageKind::Showcase => "vitrine",
            ColdStorageKind::FruitsAndVegetables => "enceinte_fruits_legumes",
            ColdStorageKind::SensitivePositive => "enceinte_sensible_positive",
            ColdStorageKind::FinishedProducts => "enceinte_produit_fini",
            ColdStorageKind::MeatCarcass => "carcasse_viande",
            ColdStorageKind::Dairy => "enceinte_produit_laitier",
            ColdStorageKind::RefrigeratedZone => "zone_refrigeree",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| CoreError::UnknownKind(value.to_string()))
    }
}

impl fmt::Display for ColdStorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive acceptable temperature range in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::between(self.min, self.max)
    }
}

fn default_range(kind: ColdStorageKind) -> TemperatureRange {
    match kind {
        ColdStorageKind::PositiveChamber => TemperatureRange::new(0.0, 4.5),
        ColdStorageKind::NegativeChamber => TemperatureRange::new(-24.0, -16.0),
        ColdStorageKind::Showcase => TemperatureRange::new(0.0, 6.5),
        ColdStorageKind::FruitsAndVegetables => TemperatureRange::new(0.0, 10.0),
        ColdStorageKind::SensitivePositive => TemperatureRange::new(0.0, 2.0),
        ColdStorageKind::FinishedProducts => TemperatureRange::new(0.0, 3.0),
        ColdStorageKind::MeatCarcass => TemperatureRange::new(0.0, 7.0),
        ColdStorageKind::Dairy => TemperatureRange::new(0.0, 8.0),
        ColdStorageKind::RefrigeratedZone => TemperatureRange::new(0.0, 12.0),
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRegistry {
    temperature_ranges: HashMap<ColdStorageKind, TemperatureRange>,
    oil_max_polar_percentage: f64,
}

impl Default for ThresholdRegistry {
    fn default() -> Self {
        Self {
            temperature_ranges: ColdStorageKind::ALL
                .into_iter()
                .map(|kind| (kind, default_range(kind)))
                .collect(),
            oil_max_polar_percentage: DEFAULT_OIL_MAX_POLAR_PERCENTAGE,
        }
    }
}

impl ThresholdRegistry {
    /// A registry with no temperature profiles at all.
    pub fn empty() -> Self {
        Self {
            temperature_ranges: HashMap::new(),
            oil_max_polar_percentage: DEFAULT_OIL_MAX_POLAR_PERCENTAGE,
        }
    }

    pub fn with_temperature_range(mut self, kind: ColdStorageKind, range: TemperatureRange) -> Self {
        self.temperature_ranges.insert(kind, range);
        self
    }

    pub fn with_oil_max_polar_percentage(mut self, max: f64) -> Self {
        self.oil_max_polar_percentage = max;
        self
    }

    pub fn temperature_range(&self, kind: ColdStorageKind) -> Option<TemperatureRange> {
        self.temperature_ranges.get(&kind).copied()
    }

    /// Resolve a stored kind string to its range.
    ///
    /// Fails with [`CoreError::UnknownKind`] both for unrecognised strings and
    /// for recognised kinds missing from this registry.
    pub fn resolve_kind(&self, kind: &str) -> Result<TemperatureRange, CoreError> {
        let parsed = ColdStorageKind::parse(kind)?;
        self.temperature_range(parsed)
            .ok_or_else(|| CoreError::UnknownKind(kind.to_string()))
    }

    pub fn oil_max_polar_percentage(&self) -> f64 {
        self.oil_max_polar_percentage
    }

    pub fn oil_bounds(&self) -> Bounds {
        Bounds::at_most(self.oil_max_polar_percentage)
    }
}
