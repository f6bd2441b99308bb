// 🔎 Catalog Lookup Interface
//
// find(family, predicates) -> records. Predicates are ANDed; containment is
// case-insensitive and runs against the family's designated text field.

use std::fmt;

use crate::catalog::records::{CatalogRecord, Family, Side, SkinType, StickerType};
use crate::error::CatalogError;
use crate::names::Quality;

// ============================================================================
// PREDICATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// The record is sold in this quality
    Quality(Quality),

    /// StatTrak flag equals the value
    StatTrak(bool),

    /// Souvenir flag equals the value
    Souvenir(bool),

    SkinType(SkinType),

    /// Knife without a painted pattern
    Vanilla,

    Side(Side),

    StickerTypeIn(Vec<StickerType>),

    /// Lowercased needle contained in the family's search text
    Contains(String),
}

impl Predicate {
    /// Build a containment test; the needle is lowercased here once
    pub fn contains(needle: &str) -> Self {
        Predicate::Contains(needle.to_lowercase())
    }

    /// Whether the predicate can be evaluated against the given table
    pub fn applies_to(&self, family: Family) -> bool {
        match self {
            Predicate::Quality(_)
            | Predicate::StatTrak(_)
            | Predicate::Souvenir(_)
            | Predicate::SkinType(_)
            | Predicate::Vanilla => family == Family::Skin,
            Predicate::Side(_) => family == Family::Agent,
            Predicate::StickerTypeIn(_) => family == Family::Sticker,
            Predicate::Contains(_) => true,
        }
    }

    /// Evaluate against a record held in memory
    pub fn matches(&self, record: &CatalogRecord) -> bool {
        match (self, record) {
            (Predicate::Contains(needle), record) => {
                record.search_text().to_lowercase().contains(needle.as_str())
            }
            (Predicate::Quality(quality), CatalogRecord::Skin(skin)) => {
                skin.qualities.contains(*quality)
            }
            (Predicate::StatTrak(flag), CatalogRecord::Skin(skin)) => skin.stattrak == *flag,
            (Predicate::Souvenir(flag), CatalogRecord::Skin(skin)) => skin.souvenir == *flag,
            (Predicate::SkinType(skin_type), CatalogRecord::Skin(skin)) => {
                skin.skin_type() == *skin_type
            }
            (Predicate::Vanilla, CatalogRecord::Skin(skin)) => skin.is_vanilla(),
            (Predicate::Side(side), CatalogRecord::Agent(agent)) => agent.side == *side,
            (Predicate::StickerTypeIn(types), CatalogRecord::Sticker(sticker)) => {
                types.contains(&sticker.sticker_type)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Quality(quality) => write!(f, "{} = true", quality.code()),
            Predicate::StatTrak(flag) => write!(f, "stattrak = {}", flag),
            Predicate::Souvenir(flag) => write!(f, "souvenir = {}", flag),
            Predicate::SkinType(skin_type) => write!(f, "skin_type = {}", skin_type.as_str()),
            Predicate::Vanilla => write!(f, "skin IS NULL"),
            Predicate::Side(side) => write!(f, "side = {}", side.as_str()),
            Predicate::StickerTypeIn(types) => {
                let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
                write!(f, "sticker_type IN ({})", names.join(", "))
            }
            Predicate::Contains(needle) => write!(f, "contains '{}'", needle),
        }
    }
}

/// Reject predicate sets that name columns the table does not have
pub fn check_predicates(family: Family, predicates: &[Predicate]) -> Result<(), CatalogError> {
    match predicates.iter().find(|p| !p.applies_to(family)) {
        Some(predicate) => Err(CatalogError::UnsupportedPredicate {
            family,
            predicate: predicate.to_string(),
        }),
        None => Ok(()),
    }
}

// ============================================================================
// CATALOG TRAIT
// ============================================================================

/// Read-only access to the item catalog
///
/// Implementations return records in storage order. A lookup never mutates the
/// catalog, so an abandoned call leaves nothing behind.
pub trait Catalog: Send + Sync {
    fn find(
        &self,
        family: Family,
        predicates: &[Predicate],
    ) -> Result<Vec<CatalogRecord>, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn find(
        &self,
        family: Family,
        predicates: &[Predicate],
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        (**self).find(family, predicates)
    }
}

impl<C: Catalog + ?Sized> Catalog for std::sync::Arc<C> {
    fn find(
        &self,
        family: Family,
        predicates: &[Predicate],
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        (**self).find(family, predicates)
    }
}
