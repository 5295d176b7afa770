//! Blocklist matching for comment text
//!
//! Terms are loaded once at startup from a JSON array of strings. Both the
//! terms and the text being classified are normalized with Unicode
//! compatibility decomposition followed by lower-casing, so stylised letters
//! (mathematical bold, full-width, etc.) fold onto their plain forms.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

/// Normalize text for blocklist comparison.
pub fn normalize(text: &str) -> String {
    text.nfkd().collect::<String>().to_lowercase()
}

/// Immutable set of normalized blocked terms
#[derive(Debug, Clone, Default)]
pub struct BlocklistMatcher {
    terms: HashSet<String>,
}

impl BlocklistMatcher {
    /// Build a matcher from raw terms. Terms keep their surrounding whitespace;
    /// blank terms are dropped since they would match every comment.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .filter(|t| !t.as_ref().trim().is_empty())
            .map(|t| normalize(t.as_ref()))
            .collect();
        Self { terms }
    }

    /// Load terms from a JSON file. Any failure falls back to an empty set.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read_terms(path) {
            Ok(terms) => {
                let matcher = Self::new(terms);
                info!(path = %path.display(), terms = matcher.len(), "Loaded blocked terms");
                matcher
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{:#}", e),
                    "Failed to load blocklist, proceeding with empty blocked terms list"
                );
                Self::default()
            }
        }
    }

    /// Number of distinct normalized terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True if any blocked term occurs in the normalized text
    pub fn is_spam(&self, text: &str) -> bool {
        if self.is_empty() || text.is_empty() {
            return false;
        }
        let normalized = normalize(text);
        self.terms.iter().any(|term| normalized.contains(term.as_str()))
    }
}

fn read_terms(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).context("Blocklist must be a JSON array of strings")
}
