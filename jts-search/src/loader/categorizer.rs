//! Keyword categorization of job titles
//!
//! Rules are evaluated in table order and the first rule with any matching keyword wins,
//! so a title mentioning both "health" and "software" is a Health title.

use jts_common::catalog::DEFAULT_CATEGORY;

/// Category rule: label plus the lowercase keywords that select it
pub struct CategoryRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
}

/// Ordered category rules
pub const CATEGORY_RULES: [CategoryRule; 8] = [
    CategoryRule {
        category: "Health",
        keywords: &["health", "medical", "nurse"],
    },
    CategoryRule {
        category: "Information Technology",
        keywords: &["information", "computer", "software"],
    },
    CategoryRule {
        category: "Education",
        keywords: &["education", "teaching", "professor"],
    },
    CategoryRule {
        category: "Business and Finance",
        keywords: &["business", "management", "finance"],
    },
    CategoryRule {
        category: "Sales and Service",
        keywords: &["sales", "service"],
    },
    CategoryRule {
        category: "Trades and Manufacturing",
        keywords: &["trades", "construction", "manufacturing"],
    },
    CategoryRule {
        category: "Natural and Applied Sciences",
        keywords: &["natural", "science", "engineering"],
    },
    CategoryRule {
        category: "Art, Culture and Recreation",
        keywords: &["art", "culture", "recreation"],
    },
];

/// Assign a category label to a title by case-insensitive keyword match
pub fn categorize(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.category)
        .unwrap_or(DEFAULT_CATEGORY)
}
