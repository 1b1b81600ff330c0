use crate::{FileDiff, PatternError};
use regex::Regex;
use tracing::debug;

/// Where a prohibited regex was found in the added lines of a diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexLocation {
    /// Path of the file containing the match
    pub path: String,
    /// Line number in the new version of the file
    pub line_number: u32,
    /// Full text of the offending line
    pub line_contents: String,
    /// Exact text matched by the prohibited regex
    pub matched_text: String,
}

/// Searches added lines for a prohibited regex
#[derive(Debug, Clone)]
pub struct Scanner {
    prohibited: Regex,
    suppression: Option<Regex>,
}

impl Scanner {
    /// Compile the prohibited regex and the optional suppression regex.
    ///
    /// A line matching the suppression regex anywhere is never reported.
    pub fn new(prohibited: &str, suppression: Option<&str>) -> Result<Self, PatternError> {
        let prohibited =
            Regex::new(prohibited).map_err(|e| PatternError::InvalidProhibitedRegex {
                pattern: prohibited.to_string(),
                message: e.to_string(),
            })?;

        let suppression = suppression
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| PatternError::InvalidSuppressionRegex {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            prohibited,
            suppression,
        })
    }

    fn is_suppressed(&self, line: &str) -> bool {
        self.suppression
            .as_ref()
            .is_some_and(|regex| regex.is_match(line))
    }

    /// Report every non-overlapping match in every unsuppressed added line.
    ///
    /// Results are ordered by file, then line, then position within the line.
    pub fn scan(&self, diffs: &[FileDiff]) -> Vec<RegexLocation> {
        let mut locations = Vec::new();
        let mut suppressed = 0usize;

        for diff in diffs {
            for line in &diff.added_lines {
                if self.is_suppressed(&line.content) {
                    suppressed += 1;
                    continue;
                }

                locations.extend(self.prohibited.find_iter(&line.content).map(|m| {
                    RegexLocation {
                        path: diff.path.clone(),
                        line_number: line.new_line,
                        line_contents: line.content.clone(),
                        matched_text: m.as_str().to_string(),
                    }
                }));
            }
        }

        debug!(
            files = diffs.len(),
            suppressed,
            found = locations.len(),
            "scanned added lines"
        );
        locations
    }
}
