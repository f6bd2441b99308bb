// 🏷️ Names - Grammar constants shared by the tokenizer, resolvers and formatter
//
// Quality codes map to market labels through an explicit enum, never through
// string-keyed column lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MARKERS
// ============================================================================

pub const STATTRAK: &str = "StatTrak™";
pub const SOUVENIR: &str = "Souvenir";
pub const STAR: &str = "★";

/// Query token requesting the StatTrak variant
pub const ST_TOKEN: &str = "st";

/// Query token requesting the Souvenir variant
pub const SV_TOKEN: &str = "sv";

pub const T_SIDE_TOKEN: &str = "t";
pub const CT_SIDE_TOKEN: &str = "ct";

/// Result count at which the caller stops listing candidates and asks for a narrower query
pub const MAX_SELECTABLE: usize = 30;

// ============================================================================
// QUALITY
// ============================================================================

/// Wear bucket of a skin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    FactoryNew,
    MinimalWear,
    FieldTested,
    WellWorn,
    BattleScarred,
}

impl Quality {
    /// All qualities in market order (best wear first)
    pub const ALL: [Quality; 5] = [
        Quality::FactoryNew,
        Quality::MinimalWear,
        Quality::FieldTested,
        Quality::WellWorn,
        Quality::BattleScarred,
    ];

    /// Short code typed by users
    pub fn code(&self) -> &'static str {
        match self {
            Quality::FactoryNew => "fn",
            Quality::MinimalWear => "mw",
            Quality::FieldTested => "ft",
            Quality::WellWorn => "ww",
            Quality::BattleScarred => "bs",
        }
    }

    /// Label used inside canonical market names
    pub fn label(&self) -> &'static str {
        match self {
            Quality::FactoryNew => "Factory New",
            Quality::MinimalWear => "Minimal Wear",
            Quality::FieldTested => "Field-Tested",
            Quality::WellWorn => "Well-Worn",
            Quality::BattleScarred => "Battle-Scarred",
        }
    }

    pub fn from_code(code: &str) -> Option<Quality> {
        Quality::ALL.into_iter().find(|q| q.code() == code)
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// QUALITY SET
// ============================================================================

/// The wear buckets a catalog record is sold in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QualitySet(u8);

impl QualitySet {
    pub fn empty() -> Self {
        QualitySet(0)
    }

    pub fn all() -> Self {
        Quality::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, quality: Quality) {
        self.0 |= quality.bit();
    }

    pub fn contains(&self, quality: Quality) -> bool {
        self.0 & quality.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate in market order, independent of insertion order
    pub fn iter(&self) -> impl Iterator<Item = Quality> + '_ {
        Quality::ALL.into_iter().filter(move |q| self.contains(*q))
    }

    /// Parse a comma separated code list such as `"fn,mw,ft"`
    pub fn parse_codes(codes: &str) -> Result<Self, String> {
        let mut set = QualitySet::empty();
        for code in codes.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let quality = Quality::from_code(&code.to_lowercase())
                .ok_or_else(|| format!("Unknown quality code: {}", code))?;
            set.insert(quality);
        }
        Ok(set)
    }

    /// Render as the comma separated code list stored in the catalog
    pub fn to_codes(&self) -> String {
        self.iter().map(|q| q.code()).collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<Quality> for QualitySet {
    fn from_iter<I: IntoIterator<Item = Quality>>(iter: I) -> Self {
        let mut set = QualitySet::empty();
        for quality in iter {
            set.insert(quality);
        }
        set
    }
}

impl Serialize for QualitySet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_codes())
    }
}

impl<'de> Deserialize<'de> for QualitySet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let codes = String::deserialize(deserializer)?;
        QualitySet::parse_codes(&codes).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================
