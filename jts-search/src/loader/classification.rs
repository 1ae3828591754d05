//! Classification structure loading
//!
//! Parses the classification structure source into a code-keyed map and extracts the
//! unit-group (level 5) occupations as catalog entries.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jts_common::catalog::{CatalogEntry, SkillLevel};
use rayon::prelude::*;
use std::collections::HashMap;

use super::categorizer::categorize;
use super::csv::{normalize_code, parse_csv_line, strip_brackets};
use super::FRENCH_SUFFIX;

/// Hierarchy depth of unit groups (detailed occupations)
pub const UNIT_GROUP_LEVEL: i32 = 5;

/// One parsed classification record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationData {
    /// Five-digit zero-padded code
    pub code: String,
    pub title: String,
    pub definition: String,
    /// Hierarchy depth, 1 (broad category) to 5 (unit group)
    pub level: i32,
    pub category: &'static str,
}

/// Classification records keyed by code, iterable in source order
#[derive(Debug, Clone, Default)]
pub struct ClassificationMap {
    records: Vec<ClassificationData>,
    by_code: HashMap<String, usize>,
}

impl ClassificationMap {
    fn from_ordered(records: Vec<ClassificationData>) -> Self {
        let by_code = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.code.clone(), i))
            .collect();
        Self { records, by_code }
    }

    pub fn get(&self, code: &str) -> Option<&ClassificationData> {
        self.by_code.get(code).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the source order of their first occurrence
    pub fn iter(&self) -> impl Iterator<Item = &ClassificationData> {
        self.records.iter()
    }
}

/// Parse one classification line
///
/// Layout: `[level, ?, code, title, definition, ...]`. Returns `None` for lines with fewer
/// than five fields, a non-numeric level, or a code that does not normalize.
pub fn parse_classification_line(line: &str) -> Option<ClassificationData> {
    let fields = parse_csv_line(line);
    if fields.len() < 5 {
        return None;
    }

    let code = normalize_code(&fields[2])?;
    let level: i32 = fields[0].trim().parse().ok()?;
    let title = strip_brackets(fields[3].trim());
    let definition = strip_brackets(fields[4].trim());
    let category = categorize(&title);

    Some(ClassificationData {
        code,
        title,
        definition,
        level,
        category,
    })
}

/// Build the classification map from all source lines (header first)
///
/// Lines are parsed in parallel. When a code appears more than once, the record from the
/// earliest source line is kept.
pub fn load_classifications(lines: &[String]) -> ClassificationMap {
    let merged: DashMap<String, (usize, ClassificationData)> = DashMap::new();

    lines
        .par_iter()
        .enumerate()
        .skip(1)
        .for_each(|(line_no, line)| {
            let Some(record) = parse_classification_line(line) else {
                tracing::debug!(line = line_no + 1, "Skipping malformed classification line");
                return;
            };

            match merged.entry(record.code.clone()) {
                Entry::Occupied(mut slot) => {
                    if line_no < slot.get().0 {
                        slot.insert((line_no, record));
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert((line_no, record));
                }
            }
        });

    let mut ordered: Vec<(usize, ClassificationData)> = merged.into_iter().map(|(_, v)| v).collect();
    ordered.sort_by_key(|(line_no, _)| *line_no);

    ClassificationMap::from_ordered(ordered.into_iter().map(|(_, record)| record).collect())
}

/// One catalog entry per unit-group classification, ids numbered from 1 in source order
pub fn classification_titles(classifications: &ClassificationMap) -> Vec<CatalogEntry> {
    classifications
        .iter()
        .filter(|c| c.level == UNIT_GROUP_LEVEL)
        .enumerate()
        .filter_map(|(i, c)| {
            let entry = CatalogEntry::new((i + 1).to_string(), c.code.clone())
                .map_err(|e| tracing::warn!(code = %c.code, "Skipping classification: {}", e))
                .ok()?;
            Some(
                entry
                    .with_titles(c.title.clone(), format!("{}{}", c.title, FRENCH_SUFFIX))
                    .with_descriptions(
                        c.definition.clone(),
                        format!("{}{}", c.definition, FRENCH_SUFFIX),
                    )
                    .with_category(c.category)
                    .with_skill_level(SkillLevel::from_code(&c.code)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(rows: &[&str]) -> Vec<String> {
        std::iter::once("Level,Hierarchy,Code,Title,Definition")
            .chain(rows.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_line_strips_brackets() {
        let record =
            parse_classification_line("5,X,[00010],[Legislators],[Legislators enact laws]").unwrap();
        assert_eq!(record.code, "00010");
        assert_eq!(record.title, "Legislators");
        assert_eq!(record.definition, "Legislators enact laws");
        assert_eq!(record.level, 5);
        assert_eq!(record.category, "General");
    }

    #[test]
    fn test_parse_line_rejects_malformed() {
        assert!(parse_classification_line("5,X,[00010],Legislators").is_none());
        assert!(parse_classification_line("five,X,00010,Legislators,def").is_none());
        assert!(parse_classification_line("5,X,abc,Legislators,def").is_none());
    }

    #[test]
    fn test_parse_line_accepts_wide_levels() {
        let record = parse_classification_line("300,X,[00010],Legislators,def").unwrap();
        assert_eq!(record.level, 300);
        let record = parse_classification_line("-1,X,[00010],Legislators,def").unwrap();
        assert_eq!(record.level, -1);
    }

    #[test]
    fn test_out_of_range_level_still_supplies_definition() {
        let classifications = load_classifications(&lines(&["300,X,[00010],Legislators,Enact laws"]));
        assert_eq!(classifications.get("00010").unwrap().definition, "Enact laws");
        assert!(classification_titles(&classifications).is_empty());
    }

    #[test]
    fn test_header_is_skipped() {
        let map = load_classifications(&lines(&[]));
        assert!(map.is_empty());
    }

    #[test]
    fn test_first_seen_code_wins() {
        let map = load_classifications(&lines(&[
            "4,X,10,Senior managers,first",
            "5,X,11,Legislators,other",
            "5,X,[00010],Nurse managers,second",
        ]));

        assert_eq!(map.len(), 2);
        let record = map.get("00010").unwrap();
        assert_eq!(record.definition, "first");
        assert_eq!(record.level, 4);
    }

    #[test]
    fn test_iteration_follows_source_order() {
        let rows: Vec<String> = (0..200)
            .rev()
            .map(|n| format!("5,X,{},Title {},Definition", n, n))
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let map = load_classifications(&lines(&rows));

        let codes: Vec<&str> = map.iter().map(|c| c.code.as_str()).collect();
        let expected: Vec<String> = (0..200).rev().map(|n| format!("{:05}", n)).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_classification_titles_only_unit_groups() {
        let map = load_classifications(&lines(&[
            "1,X,0,Legislative and senior management occupations,broad",
            "5,X,[00010],[Legislators],[Legislators enact laws]",
            "5,X,21231,Software engineers and designers,Design software",
        ]));

        let entries = classification_titles(&map);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].id(), "1");
        assert_eq!(entries[0].noc_code(), "00010");
        assert_eq!(entries[0].title_fr(), "Legislators (FR)");
        assert_eq!(entries[0].description_fr(), "Legislators enact laws (FR)");
        assert_eq!(entries[0].skill_level(), SkillLevel::Management);

        assert_eq!(entries[1].id(), "2");
        assert_eq!(entries[1].category(), "Information Technology");
        assert_eq!(entries[1].skill_level(), SkillLevel::Professional);
    }
}
