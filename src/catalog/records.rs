// 🗃️ Catalog Records - One variant per item family
//
// Records are read-only from the resolver's side. They are produced by the
// importer (see db.rs) and queried through the Catalog trait.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::names::{QualitySet, CT_SIDE_TOKEN, T_SIDE_TOKEN};

// ============================================================================
// FAMILY
// ============================================================================

/// The five catalog tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Skin,
    Container,
    Agent,
    Sticker,
    Tool,
}

impl Family {
    pub const ALL: [Family; 5] = [
        Family::Skin,
        Family::Container,
        Family::Agent,
        Family::Sticker,
        Family::Tool,
    ];

    /// Storage table name
    pub fn table(&self) -> &'static str {
        match self {
            Family::Skin => "skins",
            Family::Container => "containers",
            Family::Agent => "agents",
            Family::Sticker => "stickers",
            Family::Tool => "tools",
        }
    }

    /// Column holding the text that name tokens are matched against
    pub fn search_column(&self) -> &'static str {
        match self {
            Family::Skin | Family::Sticker => "full_name",
            Family::Container | Family::Agent | Family::Tool => "name",
        }
    }

    pub fn from_name(name: &str) -> Option<Family> {
        match name.to_lowercase().as_str() {
            "skin" | "skins" => Some(Family::Skin),
            "container" | "containers" => Some(Family::Container),
            "agent" | "agents" => Some(Family::Agent),
            "sticker" | "stickers" => Some(Family::Sticker),
            "tool" | "tools" => Some(Family::Tool),
            _ => None,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

// ============================================================================
// SKINS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    Gun,
    Knife,
    Glove,
}

impl SkinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkinType::Gun => "gun",
            SkinType::Knife => "knife",
            SkinType::Glove => "glove",
        }
    }

    pub fn parse(s: &str) -> Option<SkinType> {
        match s.trim().to_lowercase().as_str() {
            "gun" => Some(SkinType::Gun),
            "knife" => Some(SkinType::Knife),
            "glove" => Some(SkinType::Glove),
            _ => None,
        }
    }
}

/// Knife finish: a painted pattern, or the bare "Vanilla" model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnifeSkin {
    Patterned { pattern_name: String },
    Vanilla,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinKind {
    Gun { pattern_name: String },
    Glove { pattern_name: String },
    Knife(KnifeSkin),
}

/// A weapon, knife or glove finish as sold on the market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinRecord {
    /// Base display name without markers or quality, e.g. "AK-47 | Redline"
    pub full_name: String,
    pub kind: SkinKind,
    pub qualities: QualitySet,
    pub stattrak: bool,
    pub souvenir: bool,
}

impl SkinRecord {
    pub fn gun(full_name: &str, pattern_name: &str, qualities: QualitySet) -> Self {
        SkinRecord {
            full_name: full_name.to_string(),
            kind: SkinKind::Gun {
                pattern_name: pattern_name.to_string(),
            },
            qualities,
            stattrak: false,
            souvenir: false,
        }
    }

    pub fn glove(full_name: &str, pattern_name: &str, qualities: QualitySet) -> Self {
        SkinRecord {
            full_name: full_name.to_string(),
            kind: SkinKind::Glove {
                pattern_name: pattern_name.to_string(),
            },
            qualities,
            stattrak: false,
            souvenir: false,
        }
    }

    pub fn knife(full_name: &str, finish: KnifeSkin, qualities: QualitySet) -> Self {
        SkinRecord {
            full_name: full_name.to_string(),
            kind: SkinKind::Knife(finish),
            qualities,
            stattrak: false,
            souvenir: false,
        }
    }

    /// Builder pattern: mark as StatTrak eligible
    pub fn with_stattrak(mut self) -> Self {
        self.stattrak = true;
        self
    }

    /// Builder pattern: mark as Souvenir eligible
    pub fn with_souvenir(mut self) -> Self {
        self.souvenir = true;
        self
    }

    pub fn skin_type(&self) -> SkinType {
        match self.kind {
            SkinKind::Gun { .. } => SkinType::Gun,
            SkinKind::Glove { .. } => SkinType::Glove,
            SkinKind::Knife(_) => SkinType::Knife,
        }
    }

    pub fn is_vanilla(&self) -> bool {
        matches!(self.kind, SkinKind::Knife(KnifeSkin::Vanilla))
    }

    /// Pattern name, `None` for Vanilla knives
    pub fn pattern_name(&self) -> Option<&str> {
        match &self.kind {
            SkinKind::Gun { pattern_name }
            | SkinKind::Glove { pattern_name }
            | SkinKind::Knife(KnifeSkin::Patterned { pattern_name }) => Some(pattern_name),
            SkinKind::Knife(KnifeSkin::Vanilla) => None,
        }
    }
}

// ============================================================================
// OTHER FAMILIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    T,
    Ct,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::T => T_SIDE_TOKEN,
            Side::Ct => CT_SIDE_TOKEN,
        }
    }

    pub fn parse(s: &str) -> Option<Side> {
        match s.trim().to_lowercase().as_str() {
            T_SIDE_TOKEN => Some(Side::T),
            CT_SIDE_TOKEN => Some(Side::Ct),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub side: Side,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerType {
    Regular,
    Tournament,
    Patch,
    Charm,
}

impl StickerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StickerType::Regular => "regular",
            StickerType::Tournament => "tournament",
            StickerType::Patch => "patch",
            StickerType::Charm => "charm",
        }
    }

    pub fn parse(s: &str) -> Option<StickerType> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Some(StickerType::Regular),
            "tournament" => Some(StickerType::Tournament),
            "patch" => Some(StickerType::Patch),
            "charm" => Some(StickerType::Charm),
            _ => None,
        }
    }
}

/// Stickers, patches and charms share one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerRecord {
    pub sticker_type: StickerType,
    /// For patches this already carries the "Patch | " prefix
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub name: String,
}

// ============================================================================
// CATALOG RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum CatalogRecord {
    Skin(SkinRecord),
    Container(ContainerRecord),
    Agent(AgentRecord),
    Sticker(StickerRecord),
    Tool(ToolRecord),
}

impl CatalogRecord {
    pub fn family(&self) -> Family {
        match self {
            CatalogRecord::Skin(_) => Family::Skin,
            CatalogRecord::Container(_) => Family::Container,
            CatalogRecord::Agent(_) => Family::Agent,
            CatalogRecord::Sticker(_) => Family::Sticker,
            CatalogRecord::Tool(_) => Family::Tool,
        }
    }

    /// The text name tokens are matched against
    pub fn search_text(&self) -> &str {
        match self {
            CatalogRecord::Skin(skin) => &skin.full_name,
            CatalogRecord::Container(container) => &container.name,
            CatalogRecord::Agent(agent) => &agent.name,
            CatalogRecord::Sticker(sticker) => &sticker.full_name,
            CatalogRecord::Tool(tool) => &tool.name,
        }
    }
}
