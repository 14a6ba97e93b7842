//! Upstream category slugs and the free-form string mapper.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five upstream category slugs, in display order.
pub const CATEGORY_SLUGS: [&str; 5] = ["creatures", "equipment", "materials", "monsters", "treasure"];

/// Synonym families, keyed by lowercased input.
const SYNONYMS: &[(&str, &str)] = &[
    ("material", "materials"),
    ("materials", "materials"),
    ("monster", "monsters"),
    ("monsters", "monsters"),
    ("creature", "creatures"),
    ("creatures", "creatures"),
    ("equipment", "equipment"),
    ("weapon", "equipment"),
    ("weapons", "equipment"),
    ("armor", "equipment"),
    ("armour", "equipment"),
    ("armors", "equipment"),
    ("treasure", "treasure"),
    ("all", "all"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Creatures,
    Equipment,
    Materials,
    Monsters,
    Treasure,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Creatures,
        Category::Equipment,
        Category::Materials,
        Category::Monsters,
        Category::Treasure,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Creatures => "creatures",
            Category::Equipment => "equipment",
            Category::Materials => "materials",
            Category::Monsters => "monsters",
            Category::Treasure => "treasure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Creatures => "Creatures",
            Category::Equipment => "Equipment",
            Category::Materials => "Materials",
            Category::Monsters => "Monsters",
            Category::Treasure => "Treasure",
        }
    }

    /// Strict lookup: only exact slugs (including `all`) match.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_slug() == slug)
    }

    /// Strict lookup restricted to the five upstream slugs.
    pub fn from_upstream_slug(slug: &str) -> Option<Self> {
        Self::from_slug(slug).filter(|c| *c != Category::All)
    }

    /// Runs `raw` through [`normalize`] before the strict lookup.
    pub fn parse_loose(raw: Option<&str>) -> Option<Self> {
        Self::from_slug(&normalize(raw))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_slug())
    }
}

/// Maps a free-form category string to an upstream slug.
///
/// Absent or empty input yields `all`. Unrecognized input is returned trimmed
/// and lowercased rather than rejected, so an unexpected upstream category
/// still produces a usable path segment.
pub fn normalize(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Category::All.as_slug().to_string(),
    };

    let lowered = raw.trim().to_lowercase();
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == lowered)
        .map(|(_, slug)| (*slug).to_string())
        .unwrap_or(lowered)
}
