pub mod file;
pub mod hunk;

pub use file::FileDiff;
pub use hunk::AddedLine;

use tracing::{debug, warn};

const FILE_HEADER: &str = "diff --git ";

/// Parse the output of `git diff` into one [`FileDiff`] per file.
///
/// The text is split into segments at every `diff --git` line; anything
/// before the first one is discarded. Segments whose header cannot be parsed
/// are skipped. Files keep the order in which they appear in the diff.
pub fn parse_diff(text: &str) -> Vec<FileDiff> {
    let mut segments: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.starts_with(FILE_HEADER) {
            segments.push(String::new());
        }
        if let Some(segment) = segments.last_mut() {
            segment.push_str(line);
            segment.push('\n');
        }
    }

    let files: Vec<FileDiff> = segments
        .iter()
        .filter_map(|segment| {
            let parsed = FileDiff::parse(segment);
            if parsed.is_none() {
                warn!(
                    header = segment.lines().next().unwrap_or_default(),
                    "skipping diff segment with unrecognized header"
                );
            }
            parsed
        })
        .collect();

    debug!(
        segments = segments.len(),
        files = files.len(),
        "parsed diff"
    );
    files
}
