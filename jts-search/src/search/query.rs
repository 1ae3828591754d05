//! Relevance query construction
//!
//! Turns a normalized [`SearchRequest`] into a [`RelevanceQuery`]: boosted fields chosen by
//! language, the query terms, a minimum-match policy, the fields to return and the page
//! window.

use jts_common::catalog::CATALOG_FIELDS;
use jts_common::config::SearchConfig;
use jts_common::search::SearchRequest;
use jts_common::{Error, Result};

/// Full-text searchable document fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    TitleEn,
    TitleFr,
    DescriptionEn,
    DescriptionFr,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::TitleEn,
        SearchField::TitleFr,
        SearchField::DescriptionEn,
        SearchField::DescriptionFr,
    ];

    /// Document schema name
    pub fn name(&self) -> &'static str {
        match self {
            SearchField::TitleEn => "title_en",
            SearchField::TitleFr => "title_fr",
            SearchField::DescriptionEn => "description_en",
            SearchField::DescriptionFr => "description_fr",
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self, SearchField::TitleEn | SearchField::TitleFr)
    }
}

/// Searched field with its relevance weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBoost {
    pub field: SearchField,
    pub boost: f32,
}

/// How many clauses a matching document needs, relative to the clause count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchValue {
    /// Positive: this many required. Negative: this many may be missing.
    Count(i64),
    /// Positive: this percentage required. Negative: this percentage may be missing.
    Percent(i64),
}

impl MatchValue {
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.strip_suffix('%') {
            Some(pct) => pct.trim().parse().ok().map(MatchValue::Percent),
            None => value.parse().ok().map(MatchValue::Count),
        }
    }

    fn required(&self, clauses: usize) -> i64 {
        let n = clauses as i64;
        match *self {
            MatchValue::Count(c) if c < 0 => n + c,
            MatchValue::Count(c) => c,
            MatchValue::Percent(p) if p < 0 => n - (n * -p) / 100,
            MatchValue::Percent(p) => (n * p) / 100,
        }
    }
}

/// Minimum-match policy in the conditional `N<value` grammar
///
/// `2<-1 5<-2 6<90%` reads: up to 2 clauses all are required; above 2, one may be missing;
/// above 5, two may be missing; above 6, 90% (rounded down) are required. A single bare
/// value (`75%`, `-1`, `3`) applies to every clause count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimumMatch {
    /// Conditions sorted by threshold ascending
    conditions: Vec<(usize, MatchValue)>,
    /// Bare value without threshold, if any
    unconditional: Option<MatchValue>,
}

impl MinimumMatch {
    /// Parse a minimum-match expression
    ///
    /// # Errors
    /// `Config` when the expression is empty or any clause is malformed.
    pub fn parse(expr: &str) -> Result<Self> {
        let invalid = || Error::Config(format!("Invalid minimum_match expression: '{}'", expr));

        let tokens: Vec<&str> = expr.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(invalid());
        }

        if tokens.len() == 1 && !tokens[0].contains('<') {
            let value = MatchValue::parse(tokens[0]).ok_or_else(invalid)?;
            return Ok(Self {
                conditions: Vec::new(),
                unconditional: Some(value),
            });
        }

        let mut conditions = Vec::with_capacity(tokens.len());
        for token in tokens {
            let (threshold, value) = token.split_once('<').ok_or_else(invalid)?;
            let threshold: usize = threshold.trim().parse().map_err(|_| invalid())?;
            let value = MatchValue::parse(value).ok_or_else(invalid)?;
            conditions.push((threshold, value));
        }
        conditions.sort_by_key(|(threshold, _)| *threshold);

        Ok(Self {
            conditions,
            unconditional: None,
        })
    }

    /// Number of clauses a document must match out of `clauses`
    ///
    /// Always within `1..=clauses` for a non-empty query, 0 for an empty one.
    pub fn required(&self, clauses: usize) -> usize {
        if clauses == 0 {
            return 0;
        }

        let value = match self.unconditional {
            Some(value) => Some(value),
            None => self
                .conditions
                .iter()
                .rev()
                .find(|(threshold, _)| clauses > *threshold)
                .map(|(_, value)| *value),
        };

        let required = value.map_or(clauses as i64, |v| v.required(clauses));
        required.clamp(1, clauses as i64) as usize
    }
}

impl Default for MinimumMatch {
    fn default() -> Self {
        Self {
            conditions: vec![
                (2, MatchValue::Count(-1)),
                (5, MatchValue::Count(-2)),
                (6, MatchValue::Percent(90)),
            ],
            unconditional: None,
        }
    }
}

/// Split text into lowercase alphanumeric terms
///
/// Used for both stored fields and query text so the two always agree.
pub fn split_terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Distinct query terms in first occurrence order
pub fn tokenize(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in split_terms(text) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Store-independent relevance query
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceQuery {
    /// Distinct query terms
    pub terms: Vec<String>,
    /// Fields searched, with weights
    pub fields: Vec<FieldBoost>,
    /// Minimum number of terms a document must contain
    pub required_terms: usize,
    /// Fields returned for each hit
    pub return_fields: Vec<&'static str>,
    /// Zero-based index of the first hit to return
    pub offset: u64,
    /// Maximum number of hits to return
    pub limit: u32,
}

/// Builds relevance queries with configured boosts and minimum-match policy
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    title_boost: f32,
    description_boost: f32,
    minimum_match: MinimumMatch,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            title_boost: 3.0,
            description_boost: 1.0,
            minimum_match: MinimumMatch::default(),
        }
    }
}

impl QueryBuilder {
    /// Build from search configuration
    ///
    /// # Errors
    /// `Config` when the minimum-match expression does not parse.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            title_boost: config.title_boost,
            description_boost: config.description_boost,
            minimum_match: MinimumMatch::parse(&config.minimum_match)?,
        })
    }

    /// Searched fields for a language
    ///
    /// `fr` and `en` search their own title and description; anything else searches all four.
    pub fn fields_for(&self, language: &str) -> Vec<FieldBoost> {
        let fields: &[SearchField] = match language {
            "fr" => &[SearchField::TitleFr, SearchField::DescriptionFr],
            "en" => &[SearchField::TitleEn, SearchField::DescriptionEn],
            _ => &SearchField::ALL,
        };

        fields
            .iter()
            .map(|&field| FieldBoost {
                field,
                boost: if field.is_title() {
                    self.title_boost
                } else {
                    self.description_boost
                },
            })
            .collect()
    }

    pub fn build(&self, request: &SearchRequest) -> RelevanceQuery {
        let terms = tokenize(&request.query);
        let required_terms = self.minimum_match.required(terms.len());

        RelevanceQuery {
            terms,
            fields: self.fields_for(&request.language),
            required_terms,
            return_fields: CATALOG_FIELDS.to_vec(),
            offset: request.offset(),
            limit: request.size,
        }
    }
}
