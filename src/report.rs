use crate::RegexLocation;
use std::fmt;

/// Diagnostic for one prohibited-regex match, as printed to stderr
pub struct Diagnostic<'a> {
    pub prohibited_regex: &'a str,
    pub location: &'a RegexLocation,
    pub failure_message: &'a str,
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ERROR: Found {} in {}:{}",
            self.prohibited_regex, self.location.path, self.location.line_number
        )?;
        writeln!(
            f,
            "Matched `{}` in line `{}`.",
            self.location.matched_text, self.location.line_contents
        )?;
        writeln!(f, "{}", self.failure_message)
    }
}

/// Render every finding, in order, followed by its failure message
pub fn render_findings(
    prohibited_regex: &str,
    locations: &[RegexLocation],
    failure_message: &str,
) -> String {
    locations
        .iter()
        .map(|location| {
            Diagnostic {
                prohibited_regex,
                location,
                failure_message,
            }
            .to_string()
        })
        .collect()
}

/// Message printed when nothing was found
pub fn render_success(prohibited_regex: &str) -> String {
    format!("Prohibited regex {prohibited_regex} not found in diff!")
}
