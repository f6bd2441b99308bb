// 🧮 Selection - What the caller does with a resolved name list
//
// Zero names: nothing found. One: auto-select. Fewer than the limit: present a
// numbered list. At or past the limit: ask the user to refine.

use serde::Serialize;

use crate::names::MAX_SELECTABLE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Selection {
    NotFound,
    Single(String),
    Choose(Vec<String>),
    TooMany(usize),
}

impl Selection {
    /// Classify a resolver result against a result-count limit
    pub fn from_names(mut names: Vec<String>, limit: usize) -> Self {
        match names.len() {
            0 => Selection::NotFound,
            1 => Selection::Single(names.remove(0)),
            n if n >= limit => Selection::TooMany(n),
            _ => Selection::Choose(names),
        }
    }

    /// Same as `from_names` with the default limit
    pub fn with_default_limit(names: Vec<String>) -> Self {
        Selection::from_names(names, MAX_SELECTABLE)
    }

    /// Lines of a disambiguation prompt, numbered from 1
    pub fn numbered(&self) -> Vec<String> {
        match self {
            Selection::Single(name) => vec![format!("1. {}", name)],
            Selection::Choose(names) => names
                .iter()
                .enumerate()
                .map(|(i, name)| format!("{}. {}", i + 1, name))
                .collect(),
            Selection::NotFound | Selection::TooMany(_) => Vec::new(),
        }
    }

    /// Pick an entry by its 1-based number from the prompt
    pub fn pick(&self, index: usize) -> Option<&str> {
        match self {
            Selection::Single(name) if index == 1 => Some(name.as_str()),
            Selection::Choose(names) if index >= 1 => names.get(index - 1).map(String::as_str),
            _ => None,
        }
    }

    /// Short user-facing summary
    pub fn message(&self) -> String {
        match self {
            Selection::NotFound => "Nothing found".to_string(),
            Selection::Single(name) => name.clone(),
            Selection::Choose(names) => format!("{} matches, pick one", names.len()),
            Selection::TooMany(n) => format!("Too many matches ({}), refine your query", n),
        }
    }
}
