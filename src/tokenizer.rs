// ✂️ Query Tokenizer - Normalization, category prefixes and entry grammar
//
// A query is "<prefix> <tokens...>" where the one-letter prefix selects the
// category grammar. Entry patterns run on normalized text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::catalog::Family;

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Trim, collapse whitespace runs to one space, lowercase
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize and split into tokens; token 0 is the category prefix
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Weapon,
    Knife,
    Glove,
    Container,
    Agent,
    Sticker,
    Patch,
    Tool,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Weapon,
        Category::Knife,
        Category::Glove,
        Category::Container,
        Category::Agent,
        Category::Sticker,
        Category::Patch,
        Category::Tool,
    ];

    /// One-letter query prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Weapon => "w",
            Category::Knife => "k",
            Category::Glove => "g",
            Category::Container => "c",
            Category::Agent => "a",
            Category::Sticker => "s",
            Category::Patch => "p",
            Category::Tool => "t",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Weapon => "weapon",
            Category::Knife => "knife",
            Category::Glove => "glove",
            Category::Container => "container",
            Category::Agent => "agent",
            Category::Sticker => "sticker",
            Category::Patch => "patch",
            Category::Tool => "tool",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.prefix() == prefix)
    }

    /// Accepts either the prefix letter or the full category name
    pub fn parse(s: &str) -> Option<Category> {
        let s = s.trim().to_lowercase();
        Category::from_prefix(&s).or_else(|| Category::ALL.into_iter().find(|c| c.name() == s))
    }

    /// Catalog table queried for this category
    pub fn family(&self) -> Family {
        match self {
            Category::Weapon | Category::Knife | Category::Glove => Family::Skin,
            Category::Container => Family::Container,
            Category::Agent => Family::Agent,
            Category::Sticker | Category::Patch => Family::Sticker,
            Category::Tool => Family::Tool,
        }
    }

    /// Entry grammar a normalized query must match before it is resolved
    pub fn entry_pattern(&self) -> &'static Regex {
        static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            Category::ALL
                .iter()
                .map(|c| Regex::new(c.entry_source()).expect("entry pattern must compile"))
                .collect()
        });
        &patterns[*self as usize]
    }

    fn entry_source(&self) -> &'static str {
        match self {
            Category::Weapon => r"^w( \S+)+ (fn|mw|ft|ww|bs)( (st|sv))*$",
            Category::Glove => r"^g( \S+)+ (fn|mw|ft|ww|bs)$",
            Category::Knife => r"^k( \S+)+$",
            Category::Container => r"^c( \S+)+$",
            Category::Agent => r"^a( \S+)+$",
            Category::Sticker => r"^s( \S+)+$",
            Category::Patch => r"^p( \S+)+$",
            Category::Tool => r"^t( \S+)+$",
        }
    }

    /// Whether normalized text satisfies this category's entry grammar
    pub fn accepts(&self, text: &str) -> bool {
        self.entry_pattern().is_match(&normalize(text))
    }

    /// Pick the category from the prefix and check the entry grammar
    pub fn classify(text: &str) -> Option<Category> {
        let normalized = normalize(text);
        let prefix = normalized.split(' ').next()?;
        let category = Category::from_prefix(prefix)?;
        if category.entry_pattern().is_match(&normalized) {
            Some(category)
        } else {
            None
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// QUERY
// ============================================================================

/// Tokenized query; `tokens[0]` is the prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub category: Category,
    pub tokens: Vec<String>,
}

impl Query {
    /// A first token equal to the category prefix is always taken as the
    /// prefix. Name text starting with that letter needs the prefix in front:
    /// `Query::new(Category::Tool, "t t")` filters on "t", `"t"` alone does not.
    pub fn new(category: Category, text: &str) -> Self {
        let mut tokens = tokenize(text);
        // Callers may pass the name part alone when the category is already known
        if tokens.first().map(String::as_str) != Some(category.prefix()) {
            tokens.insert(0, category.prefix().to_string());
        }
        Query { category, tokens }
    }

    /// Tokens after the prefix
    pub fn body(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// Position of the first quality code after the prefix
    pub fn quality_index(&self) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, t)| crate::names::Quality::from_code(t).is_some())
            .map(|(i, _)| i)
    }

    /// Position of the first occurrence of `token` at or after `from`
    pub fn position_from(&self, token: &str, from: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, t)| t.as_str() == token)
            .map(|(i, _)| i)
    }

    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}
