//! Catalog entry model
//!
//! A catalog entry is the unit of indexed, searchable data: one (classification code, title)
//! combination with its descriptions, category and skill level. Entries are immutable once
//! built; a changed title produces a new entry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Category assigned when no keyword rule matches
pub const DEFAULT_CATEGORY: &str = "General";

/// Field names of the catalog document schema, in schema order
pub const CATALOG_FIELDS: [&str; 8] = [
    "id",
    "noc_code",
    "title_en",
    "title_fr",
    "description_en",
    "description_fr",
    "category",
    "skill_level",
];

/// Coarse skill tier derived from the leading digit of a classification code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum SkillLevel {
    /// `0` - management occupations
    Management,
    /// `A` - professional occupations
    Professional,
    /// `B` - technical occupations
    Technical,
    /// `C` - intermediate occupations
    Intermediate,
    /// `D` - labour occupations
    Labour,
    #[default]
    Unknown,
}

impl SkillLevel {
    /// Derive the skill level from a classification code
    ///
    /// Only the first character is inspected; empty or non-digit codes map to `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('0') => SkillLevel::Management,
            Some('1' | '2' | '3') => SkillLevel::Professional,
            Some('4' | '5') => SkillLevel::Technical,
            Some('6' | '7') => SkillLevel::Intermediate,
            Some('8' | '9') => SkillLevel::Labour,
            _ => SkillLevel::Unknown,
        }
    }

    /// Wire representation (`0`, `A`, `B`, `C`, `D`, `Unknown`)
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Management => "0",
            SkillLevel::Professional => "A",
            SkillLevel::Technical => "B",
            SkillLevel::Intermediate => "C",
            SkillLevel::Labour => "D",
            SkillLevel::Unknown => "Unknown",
        }
    }
}

impl From<String> for SkillLevel {
    fn from(value: String) -> Self {
        match value.trim() {
            "0" => SkillLevel::Management,
            "A" => SkillLevel::Professional,
            "B" => SkillLevel::Technical,
            "C" => SkillLevel::Intermediate,
            "D" => SkillLevel::Labour,
            _ => SkillLevel::Unknown,
        }
    }
}

impl From<SkillLevel> for &'static str {
    fn from(value: SkillLevel) -> Self {
        value.as_str()
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true when `code` is exactly five ASCII digits
pub fn is_noc_code(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Searchable catalog entry
///
/// Serialized with the catalog document schema field names. Deserialization goes through
/// the same validation as [`CatalogEntry::new`] and fills absent optional fields with
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct CatalogEntry {
    id: String,
    noc_code: String,
    title_en: String,
    title_fr: String,
    description_en: String,
    description_fr: String,
    category: String,
    skill_level: SkillLevel,
}

impl CatalogEntry {
    /// Create an entry with default optional fields
    ///
    /// # Errors
    /// `InvalidInput` if `id` is blank or `noc_code` is not exactly five digits.
    pub fn new(id: impl Into<String>, noc_code: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let noc_code = noc_code.into();

        if id.trim().is_empty() {
            return Err(Error::InvalidInput("ID cannot be null or blank".to_string()));
        }
        if noc_code.trim().is_empty() {
            return Err(Error::InvalidInput(
                "NOC code cannot be null or blank".to_string(),
            ));
        }
        if !is_noc_code(&noc_code) {
            return Err(Error::InvalidInput(format!(
                "NOC code must be exactly 5 digits: {}",
                noc_code
            )));
        }

        Ok(Self {
            id,
            noc_code,
            title_en: String::new(),
            title_fr: String::new(),
            description_en: String::new(),
            description_fr: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            skill_level: SkillLevel::Unknown,
        })
    }

    pub fn with_titles(mut self, title_en: impl Into<String>, title_fr: impl Into<String>) -> Self {
        self.title_en = title_en.into();
        self.title_fr = title_fr.into();
        self
    }

    pub fn with_descriptions(
        mut self,
        description_en: impl Into<String>,
        description_fr: impl Into<String>,
    ) -> Self {
        self.description_en = description_en.into();
        self.description_fr = description_fr.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_skill_level(mut self, skill_level: SkillLevel) -> Self {
        self.skill_level = skill_level;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn noc_code(&self) -> &str {
        &self.noc_code
    }

    pub fn title_en(&self) -> &str {
        &self.title_en
    }

    pub fn title_fr(&self) -> &str {
        &self.title_fr
    }

    pub fn description_en(&self) -> &str {
        &self.description_en
    }

    pub fn description_fr(&self) -> &str {
        &self.description_fr
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn skill_level(&self) -> SkillLevel {
        self.skill_level
    }

    /// Look up a field by its document schema name
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "noc_code" => Some(&self.noc_code),
            "title_en" => Some(&self.title_en),
            "title_fr" => Some(&self.title_fr),
            "description_en" => Some(&self.description_en),
            "description_fr" => Some(&self.description_fr),
            "category" => Some(&self.category),
            "skill_level" => Some(self.skill_level.as_str()),
            _ => None,
        }
    }

    /// Copy of this entry carrying only the requested fields
    ///
    /// Identity fields (`id`, `noc_code`) are always kept; every other field that is not
    /// requested falls back to its default.
    pub fn project(&self, fields: &[&str]) -> Self {
        let keep = |name: &str| fields.contains(&name);
        Self {
            id: self.id.clone(),
            noc_code: self.noc_code.clone(),
            title_en: if keep("title_en") { self.title_en.clone() } else { String::new() },
            title_fr: if keep("title_fr") { self.title_fr.clone() } else { String::new() },
            description_en: if keep("description_en") {
                self.description_en.clone()
            } else {
                String::new()
            },
            description_fr: if keep("description_fr") {
                self.description_fr.clone()
            } else {
                String::new()
            },
            category: if keep("category") {
                self.category.clone()
            } else {
                DEFAULT_CATEGORY.to_string()
            },
            skill_level: if keep("skill_level") {
                self.skill_level
            } else {
                SkillLevel::Unknown
            },
        }
    }
}

/// Wire form of a catalog entry before validation
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    id: Option<String>,
    noc_code: Option<String>,
    title_en: Option<String>,
    title_fr: Option<String>,
    description_en: Option<String>,
    description_fr: Option<String>,
    category: Option<String>,
    skill_level: Option<SkillLevel>,
}

impl TryFrom<CatalogDocument> for CatalogEntry {
    type Error = Error;

    fn try_from(doc: CatalogDocument) -> Result<Self> {
        let entry = CatalogEntry::new(doc.id.unwrap_or_default(), doc.noc_code.unwrap_or_default())?
            .with_titles(
                doc.title_en.unwrap_or_default(),
                doc.title_fr.unwrap_or_default(),
            )
            .with_descriptions(
                doc.description_en.unwrap_or_default(),
                doc.description_fr.unwrap_or_default(),
            )
            .with_category(doc.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()))
            .with_skill_level(doc.skill_level.unwrap_or_default());
        Ok(entry)
    }
}
