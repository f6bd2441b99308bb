// 🖋️ Name Formatter - Canonical market names for matched records
//
// Template: "[★ ][Souvenir |StatTrak™ ]{full_name}[ ({quality label})]"

use crate::catalog::SkinRecord;
use crate::names::{Quality, SOUVENIR, STAR, STATTRAK};

/// Markers that prefix a canonical name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub star: bool,
    pub stattrak: bool,
    pub souvenir: bool,
}

impl Markers {
    pub fn plain() -> Self {
        Markers::default()
    }

    /// Knives and gloves
    pub fn star() -> Self {
        Markers {
            star: true,
            ..Markers::default()
        }
    }

    pub fn stattrak() -> Self {
        Markers {
            stattrak: true,
            ..Markers::default()
        }
    }

    pub fn souvenir() -> Self {
        Markers {
            souvenir: true,
            ..Markers::default()
        }
    }

    pub fn star_stattrak() -> Self {
        Markers {
            star: true,
            stattrak: true,
            souvenir: false,
        }
    }

    /// Prefix written before the base name, including the trailing space
    pub fn prefix(&self) -> String {
        let mut prefix = String::new();
        if self.star {
            prefix.push_str(STAR);
            prefix.push(' ');
        }
        // Souvenir and StatTrak never share a listing; Souvenir wins.
        if self.souvenir {
            prefix.push_str(SOUVENIR);
            prefix.push(' ');
        } else if self.stattrak {
            prefix.push_str(STATTRAK);
            prefix.push(' ');
        }
        prefix
    }
}

/// Render one canonical name
pub fn compose(full_name: &str, quality: Option<Quality>, markers: Markers) -> String {
    match quality {
        Some(quality) => format!("{}{} ({})", markers.prefix(), full_name, quality.label()),
        None => format!("{}{}", markers.prefix(), full_name),
    }
}

/// All quality-suffixed names a record is sold under, in market order
///
/// A Vanilla knife with no quality restriction is listed under its bare name.
pub fn quality_variants(skin: &SkinRecord) -> Vec<String> {
    if skin.qualities.is_empty() && skin.is_vanilla() {
        return vec![skin.full_name.clone()];
    }

    skin.qualities
        .iter()
        .map(|quality| compose(&skin.full_name, Some(quality), Markers::plain()))
        .collect()
}

pub(crate) const STICKER_PREFIX: &str = "Sticker | ";

/// Regular and tournament stickers are listed with a "Sticker | " prefix
pub fn sticker_name(full_name: &str) -> String {
    format!("{}{}", STICKER_PREFIX, full_name)
}
