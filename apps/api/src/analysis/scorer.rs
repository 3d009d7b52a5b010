//! Match Scorer — pluggable, trait-based scorer that measures resume text against a role context.
//!
//! Default: `KeywordMatchScorer` (pure-Rust, deterministic, no external calls).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`, chosen at startup.

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::analysis::roles::ROLE_SKILLS;
use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// How a keyword was found in the resume text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// `\b<keyword>\b` matched.
    WordBoundary,
    /// Boundary match failed, raw containment succeeded (e.g. "react" in "reactjs").
    Substring,
}

/// Scorer output. `matched` and `missing` partition the parsed keywords, in keyword order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub score: u32, // 0 – 100
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl MatchReport {
    pub fn keyword_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer trait. Implement this to swap backends without touching handlers.
///
/// Carried in `AppState` as `Arc<dyn MatchScorer>`.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, resume_text: &str, context: &str) -> Result<MatchReport, AppError>;

    /// Label reported in logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordMatchScorer — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Keyword containment scorer.
///
/// Algorithm:
/// 1. Parse the context into keywords (split on ',', trim, drop empty, lowercase).
/// 2. For each keyword, try a word-boundary match against the lowercased resume,
///    then fall back to substring containment.
/// 3. score = floor(100 × matched / keywords), 0 when there are no keywords.
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(&self, resume_text: &str, context: &str) -> Result<MatchReport, AppError> {
        Ok(compute_keyword_match(resume_text, context))
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword match algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Splits a context string into keywords. Order and duplicates are preserved.
pub fn parse_keywords(context: &str) -> Vec<String> {
    context
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Keywords of one context with their word-boundary patterns compiled into a single set.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
    /// `None` only if the set exceeds the regex size limit; matching then relies on substrings.
    boundaries: Option<RegexSet>,
}

impl KeywordMatcher {
    pub fn from_context(context: &str) -> Self {
        let keywords = parse_keywords(context);
        let patterns = keywords
            .iter()
            .map(|keyword| format!(r"\b{}\b", regex::escape(keyword)));
        let boundaries = match RegexSet::new(patterns) {
            Ok(set) => Some(set),
            Err(e) => {
                tracing::warn!("Word-boundary patterns for {context:?} rejected: {e}");
                None
            }
        };
        Self {
            keywords,
            boundaries,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Tests every keyword against lowercased resume text, in keyword order.
    pub fn find(&self, resume_lower: &str) -> Vec<Option<MatchKind>> {
        let bounded = self
            .boundaries
            .as_ref()
            .map(|set| set.matches(resume_lower));

        self.keywords
            .iter()
            .enumerate()
            .map(|(i, keyword)| {
                if bounded.as_ref().is_some_and(|hits| hits.matched(i)) {
                    Some(MatchKind::WordBoundary)
                } else if resume_lower.contains(keyword.as_str()) {
                    Some(MatchKind::Substring)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Matchers for every role table context, compiled once per process.
fn table_matchers() -> &'static HashMap<String, KeywordMatcher> {
    static MATCHERS: OnceLock<HashMap<String, KeywordMatcher>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        ROLE_SKILLS
            .iter()
            .map(|row| {
                let context = row.context();
                let matcher = KeywordMatcher::from_context(&context);
                (context, matcher)
            })
            .collect()
    })
}

/// floor(100 × matched / total); 0 when there is nothing to match.
pub fn percentage(matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (matched * 100 / total) as u32
}

pub fn compute_keyword_match(resume_text: &str, context: &str) -> MatchReport {
    let owned;
    let matcher = match table_matchers().get(context) {
        Some(cached) => cached,
        None => {
            owned = KeywordMatcher::from_context(context);
            &owned
        }
    };

    let total = matcher.keywords().len();
    if total == 0 {
        return MatchReport::default();
    }

    let resume_lower = resume_text.to_lowercase();
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for (keyword, found) in matcher.keywords().iter().zip(matcher.find(&resume_lower)) {
        match found {
            Some(kind) => {
                tracing::trace!(keyword = %keyword, ?kind, "keyword matched");
                matched.push(keyword.clone());
            }
            None => missing.push(keyword.clone()),
        }
    }

    MatchReport {
        score: percentage(matched.len(), total),
        matched,
        missing,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
