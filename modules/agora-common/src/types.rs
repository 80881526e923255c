use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::normalized_key;

// --- Taxonomies ---

/// The five fixed classification axes for an academic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyCategory {
    Discipline,
    Tradition,
    Era,
    Methodology,
    Theme,
}

impl TaxonomyCategory {
    pub const ALL: [TaxonomyCategory; 5] = [
        TaxonomyCategory::Discipline,
        TaxonomyCategory::Tradition,
        TaxonomyCategory::Era,
        TaxonomyCategory::Methodology,
        TaxonomyCategory::Theme,
    ];

    /// Parse a category label: case-insensitive, trailing "s" optional
    /// ("Disciplines" and "discipline" both resolve).
    pub fn parse(label: &str) -> Option<Self> {
        let lowered = label.trim().to_lowercase();
        let singular = lowered.strip_suffix('s').unwrap_or(&lowered);
        match singular {
            "discipline" => Some(TaxonomyCategory::Discipline),
            "tradition" => Some(TaxonomyCategory::Tradition),
            "era" => Some(TaxonomyCategory::Era),
            "methodology" | "methodologie" => Some(TaxonomyCategory::Methodology),
            "theme" => Some(TaxonomyCategory::Theme),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaxonomyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxonomyCategory::Discipline => write!(f, "discipline"),
            TaxonomyCategory::Tradition => write!(f, "tradition"),
            TaxonomyCategory::Era => write!(f, "era"),
            TaxonomyCategory::Methodology => write!(f, "methodology"),
            TaxonomyCategory::Theme => write!(f, "theme"),
        }
    }
}

// --- Academic ---

/// A published work. `year` of `None` means the year is unknown; a literal
/// zero in incoming data is treated the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    #[serde(default, deserialize_with = "zero_year_is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub coauthors: Vec<String>,
}

/// A lecture, debate, or other dated appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    #[serde(default, deserialize_with = "zero_year_is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
}

fn zero_year_is_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let year = Option::<i32>::deserialize(deserializer)?;
    Ok(year.filter(|y| *y != 0))
}

/// A catalog record. Identity is the normalized key of `name`; every other
/// field is mergeable. Connections may name academics that do not (yet)
/// exist in the catalog — dangling references are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Academic {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub taxonomies: BTreeMap<TaxonomyCategory, Vec<String>>,
    #[serde(default)]
    pub papers: Vec<Paper>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub connections: Vec<String>,
}

impl Academic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: String::new(),
            taxonomies: BTreeMap::new(),
            papers: Vec::new(),
            events: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Normalized store key for this record.
    pub fn key(&self) -> String {
        normalized_key(&self.name)
    }

    /// First discipline value, used as the node group in the network view.
    pub fn primary_discipline(&self) -> Option<&str> {
        self.taxonomies
            .get(&TaxonomyCategory::Discipline)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

// --- Novelty tiles ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Academic,
    Connection,
}

/// Append-only announcement shown on the landing view. Capacity-bounded;
/// the store retains the most recent entries only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoveltyTile {
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TileKind,
}

impl NoveltyTile {
    pub fn academic_added(name: &str) -> Self {
        Self {
            title: format!("New academic: {name}"),
            content: format!("{name} has been added to the catalog."),
            date: Utc::now(),
            kind: TileKind::Academic,
        }
    }

    pub fn connection_added(from: &str, to: &str) -> Self {
        Self {
            title: format!("New connection: {from} ↔ {to}"),
            content: format!("{from} and {to} are now linked in the catalog."),
            date: Utc::now(),
            kind: TileKind::Connection,
        }
    }
}

// --- Pending submissions ---

/// A human-reviewed contribution waiting in the moderation queue.
/// Removable by queue position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSubmission {
    pub academic_name: String,
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}
