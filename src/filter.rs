//! Path filtering for parsed diffs.
//!
//! Paths are selected with *path expressions*: plain strings in which `...`
//! stands for any run of characters. Everything else is handed to the regex
//! engine unchanged, so `.` in `src/.../*.rs` still means "any character".
//! Matching is a search, not a full match: `foo` selects `src/foo/bar.rs`.
//!
//! # Examples
//!
//! ```
//! use check_contents::filter::PathFilter;
//!
//! let filter = PathFilter::new(&["src/...".to_string()], &["src/gen/...".to_string()]).unwrap();
//! assert!(filter.matches("src/lib.rs"));
//! assert!(!filter.matches("src/gen/proto.rs"));
//! assert!(!filter.matches("docs/README.md"));
//! ```

use crate::{FileDiff, PatternError};
use regex::RegexSet;
use tracing::debug;

/// Wildcard token accepted in path expressions
pub const WILDCARD: &str = "...";

/// Translate a path expression into a regex by expanding the wildcard.
pub fn expression_to_regex(expression: &str) -> String {
    expression.replace(WILDCARD, ".*")
}

/// Include/exclude rules over diff paths
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: RegexSet,
    exclude: RegexSet,
}

impl PathFilter {
    /// Compile include and exclude expressions.
    ///
    /// An empty `include` list selects every path, the same as `["..."]`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPathExpression`] naming the first
    /// expression whose translation is not a valid regex.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, PatternError> {
        let include = if include.is_empty() {
            compile(&[WILDCARD.to_string()])?
        } else {
            compile(include)?
        };

        Ok(Self {
            include,
            exclude: compile(exclude)?,
        })
    }

    /// Whether `path` matches some include expression and no exclude expression
    pub fn matches(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }

    /// Keep the diffs whose path passes [`PathFilter::matches`], in their original order.
    pub fn filter(&self, diffs: Vec<FileDiff>) -> Vec<FileDiff> {
        let total = diffs.len();
        let kept: Vec<FileDiff> = diffs
            .into_iter()
            .filter(|diff| self.matches(&diff.path))
            .collect();

        debug!(total, kept = kept.len(), "filtered diffs by path");
        kept
    }
}

fn compile(expressions: &[String]) -> Result<RegexSet, PatternError> {
    let regexes: Vec<String> = expressions
        .iter()
        .map(|expr| expression_to_regex(expr))
        .collect();

    RegexSet::new(&regexes).map_err(|_| {
        // Recompile one at a time to name the offending expression
        let (expression, message) = expressions
            .iter()
            .zip(&regexes)
            .find_map(|(expr, re)| {
                regex::Regex::new(re)
                    .err()
                    .map(|e| (expr.clone(), e.to_string()))
            })
            .unwrap_or_else(|| (expressions.join(", "), "invalid expression".to_string()));
        PatternError::InvalidPathExpression {
            expression,
            message,
        }
    })
}
