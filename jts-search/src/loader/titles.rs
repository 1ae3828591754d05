//! Example job title extraction and deduplication

use dashmap::DashMap;
use jts_common::catalog::{CatalogEntry, SkillLevel, DEFAULT_CATEGORY};
use rayon::prelude::*;
use sha2::{Digest, Sha256};

use super::classification::ClassificationMap;
use super::csv::{normalize_code, parse_csv_line};
use super::FRENCH_SUFFIX;

/// Hex digits of the key digest kept in generated ids
const ID_DIGEST_LEN: usize = 16;

/// Deduplication key for a (code, title) pair
pub fn dedup_key(code: &str, title: &str) -> String {
    format!("{}:{}", code, title)
}

/// Stable id for a deduplicated title, derived from its dedup key
///
/// Prefixed `t-` so it never collides with the numeric ids of classification titles.
pub fn title_id(key: &str) -> String {
    let hex = format!("{:x}", Sha256::digest(key.as_bytes()));
    format!("t-{}", &hex[..ID_DIGEST_LEN])
}

/// Cheap substring check applied before a line is parsed
fn is_candidate(line: &str) -> bool {
    line.contains("example") || line.contains("Job title")
}

/// Parse one elements line into `(code, title)`
///
/// Layout: `[?, code, ?, elementType, titleText, ...]`.
pub fn parse_title_line(line: &str) -> Option<(String, String)> {
    let fields = parse_csv_line(line);
    if fields.len() < 5 {
        return None;
    }

    let title = fields[4].trim();
    if title.is_empty() {
        return None;
    }

    let code = normalize_code(&fields[1])?;
    Some((code, title.to_string()))
}

fn build_title_entry(
    key: &str,
    code: &str,
    title: &str,
    classifications: &ClassificationMap,
) -> Option<CatalogEntry> {
    let classification = classifications.get(code);

    let (description_en, description_fr, category) = match classification {
        Some(c) => (
            c.definition.clone(),
            format!("{}{}", c.definition, FRENCH_SUFFIX),
            c.category,
        ),
        None => (String::new(), String::new(), DEFAULT_CATEGORY),
    };

    let entry = CatalogEntry::new(title_id(key), code)
        .map_err(|e| tracing::debug!(code, "Skipping title: {}", e))
        .ok()?;

    Some(
        entry
            .with_titles(title, format!("{}{}", title, FRENCH_SUFFIX))
            .with_descriptions(description_en, description_fr)
            .with_category(category)
            .with_skill_level(SkillLevel::from_code(code)),
    )
}

/// Extract and deduplicate example titles from all source lines (header first)
///
/// Each distinct `code:title` pair yields exactly one entry. Output is sorted by code,
/// then title.
pub fn extract_job_titles(lines: &[String], classifications: &ClassificationMap) -> Vec<CatalogEntry> {
    let titles: DashMap<String, CatalogEntry> = DashMap::new();

    lines
        .par_iter()
        .skip(1)
        .filter(|line| is_candidate(line))
        .for_each(|line| {
            let Some((code, title)) = parse_title_line(line) else {
                tracing::debug!("Skipping malformed title line");
                return;
            };

            let key = dedup_key(&code, &title);
            if titles.contains_key(&key) {
                return;
            }
            if let Some(entry) = build_title_entry(&key, &code, &title, classifications) {
                titles.entry(key).or_insert(entry);
            }
        });

    let mut entries: Vec<CatalogEntry> = titles.into_iter().map(|(_, entry)| entry).collect();
    entries.sort_by(|a, b| {
        a.noc_code()
            .cmp(b.noc_code())
            .then_with(|| a.title_en().cmp(b.title_en()))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::classification::load_classifications;

    const HEADER: &str = "Level,Code,Class title,Element Type,Element Description";

    fn lines(rows: &[&str]) -> Vec<String> {
        std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .map(String::from)
            .collect()
    }

    fn classifications() -> ClassificationMap {
        load_classifications(&[
            "Level,Hierarchy,Code,Title,Definition".to_string(),
            "5,X,[00010],[Legislators],[Legislators enact laws]".to_string(),
        ])
    }

    #[test]
    fn test_title_id_is_stable() {
        let a = title_id("00010:Legislators");
        assert_eq!(a, title_id("00010:Legislators"));
        assert_ne!(a, title_id("00010:Senator"));
        assert_eq!(title_id("00010:Senator"), "t-407f57c5570b0d18");
        assert!(a.starts_with("t-"));
        assert_eq!(a.len(), 2 + ID_DIGEST_LEN);
    }

    #[test]
    fn test_parse_title_line() {
        assert_eq!(
            parse_title_line("X,[00010],X,example,Legislators"),
            Some(("00010".to_string(), "Legislators".to_string()))
        );
        assert_eq!(parse_title_line("X,[00010],X,example,   "), None);
        assert_eq!(parse_title_line("X,abc,X,example,Legislators"), None);
        assert_eq!(parse_title_line("X,00010,X,example"), None);
    }

    #[test]
    fn test_lines_without_marker_are_ignored() {
        let entries = extract_job_titles(
            &lines(&["X,[00010],X,Main duties,Enact laws"]),
            &classifications(),
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn test_duplicates_collapse_to_one_entry() {
        let rows = [
            "X,[00010],X,Illustrative example,Senator",
            "X,10,X,Job title example,Senator",
            "X,[00010],X,Illustrative example,Member of Parliament",
            "X,00010,X,Illustrative example,Senator",
        ];

        let forward = extract_job_titles(&lines(&rows), &classifications());
        let mut reversed_rows = rows;
        reversed_rows.reverse();
        let backward = extract_job_titles(&lines(&reversed_rows), &classifications());

        assert_eq!(forward.len(), 2);
        assert_eq!(forward, backward);
        assert_eq!(forward[0].title_en(), "Member of Parliament");
        assert_eq!(forward[1].title_en(), "Senator");
    }

    #[test]
    fn test_joins_classification_metadata() {
        let entries = extract_job_titles(
            &lines(&[
                "X,[00010],X,example,Senator",
                "X,[99999],X,example,Unlisted worker",
            ]),
            &classifications(),
        );

        let senator = &entries[0];
        assert_eq!(senator.noc_code(), "00010");
        assert_eq!(senator.title_fr(), "Senator (FR)");
        assert_eq!(senator.description_en(), "Legislators enact laws");
        assert_eq!(senator.description_fr(), "Legislators enact laws (FR)");
        assert_eq!(senator.skill_level(), SkillLevel::Management);

        let unlisted = &entries[1];
        assert_eq!(unlisted.description_en(), "");
        assert_eq!(unlisted.description_fr(), "");
        assert_eq!(unlisted.category(), "General");
        assert_eq!(unlisted.skill_level(), SkillLevel::Labour);
    }
}
