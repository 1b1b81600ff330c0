use super::hunk::{self, AddedLine, HunkHeader};
use nom::{IResult, Parser, bytes::complete::tag, combinator::rest, sequence::preceded};

/// The added lines of a single file in a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Destination path (the `b/` side of the `diff --git` header)
    pub path: String,
    /// Lines added to the file, in ascending new-file line order
    pub added_lines: Vec<AddedLine>,
}

impl FileDiff {
    /// Parse a single-file segment of a diff.
    ///
    /// Expects input starting with a `diff --git a/<path> b/<path>` line. Every
    /// hunk in the segment contributes to the same `FileDiff`; a segment with no
    /// hunks (mode change, rename, binary file) yields an empty `added_lines`.
    ///
    /// Returns `None` if the header does not have the expected shape.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines = text.lines();
        let path = destination_path(lines.next()?)?.to_string();

        // (header, body) pairs; metadata before the first header is dropped
        let mut hunks: Vec<(HunkHeader, Vec<&str>)> = Vec::new();
        for line in lines {
            if let Some(header) = HunkHeader::parse(line) {
                hunks.push((header, Vec::new()));
            } else if let Some((_, body)) = hunks.last_mut() {
                body.push(line);
            }
        }

        let added_lines = hunks
            .into_iter()
            .flat_map(|(header, body)| hunk::added_lines(header, body))
            .collect();

        Some(FileDiff { path, added_lines })
    }
}

fn git_header(input: &str) -> IResult<&str, &str> {
    preceded(tag("diff --git a/"), rest).parse(input)
}

/// Extract the destination path from a `diff --git a/<old> b/<new>` line.
///
/// Paths may themselves contain ` b/`, so the split happens at the last one.
pub fn destination_path(header: &str) -> Option<&str> {
    let (_, paths) = git_header(header).ok()?;
    let (_, new) = paths.rsplit_once(" b/")?;
    Some(new).filter(|p| !p.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn line(new_line: u32, content: &str) -> AddedLine {
        AddedLine {
            new_line,
            content: content.to_string(),
        }
    }

    #[test]
    fn destination_path_simple() {
        assert_eq!(
            destination_path("diff --git a/flake.nix b/flake.nix"),
            Some("flake.nix")
        );
    }

    #[test]
    fn destination_path_rename() {
        assert_eq!(
            destination_path("diff --git a/old/name.rs b/new/name.rs"),
            Some("new/name.rs")
        );
    }

    #[test]
    fn destination_path_with_spaces() {
        assert_eq!(
            destination_path("diff --git a/docs/my file.md b/docs/my file.md"),
            Some("docs/my file.md")
        );
    }

    #[test]
    fn destination_path_malformed() {
        assert_eq!(destination_path("diff --git x y"), None);
        assert_eq!(destination_path("diff --cc merged.rs"), None);
        assert_eq!(destination_path("diff --git a/foo b/"), None);
    }

    #[test]
    fn parse_single_hunk() {
        let diff = r#"diff --git a/flake.nix b/flake.nix
index abc1234..def5678 100644
--- a/flake.nix
+++ b/flake.nix
@@ -136,0 +137 @@
+      debug = true;
"#;
        let file_diff = FileDiff::parse(diff).unwrap();
        assert_eq!(file_diff.path, "flake.nix");
        assert_eq!(file_diff.added_lines, vec![line(137, "      debug = true;")]);
    }

    #[test]
    fn parse_multiple_hunks_merges_lines() {
        let diff = r#"diff --git a/config.nix b/config.nix
index fa2da6e..41114ff 100644
--- a/config.nix
+++ b/config.nix
@@ -2,0 +3 @@ line 2
+# FIRST INSERTION
@@ -8,0 +10 @@ line 8
+# SECOND INSERTION
"#;
        let file_diff = FileDiff::parse(diff).unwrap();
        assert_eq!(file_diff.path, "config.nix");
        assert_eq!(
            file_diff.added_lines,
            vec![line(3, "# FIRST INSERTION"), line(10, "# SECOND INSERTION")]
        );
    }

    #[test]
    fn parse_ignores_metadata_before_first_hunk() {
        // The +++ header must not be mistaken for an added line
        let diff = r#"diff --git a/src/lib.rs b/src/lib.rs
new file mode 100644
index 0000000..1111111
--- /dev/null
+++ b/src/lib.rs
@@ -0,0 +1,2 @@
+pub mod a;
+pub mod b;
"#;
        let file_diff = FileDiff::parse(diff).unwrap();
        assert_eq!(
            file_diff.added_lines,
            vec![line(1, "pub mod a;"), line(2, "pub mod b;")]
        );
    }

    #[test]
    fn parse_rename_without_hunks() {
        let diff = r#"diff --git a/old.rs b/new.rs
similarity index 100%
rename from old.rs
rename to new.rs
"#;
        let file_diff = FileDiff::parse(diff).unwrap();
        assert_eq!(file_diff.path, "new.rs");
        assert!(file_diff.added_lines.is_empty());
    }

    #[test]
    fn parse_binary_file() {
        let diff = r#"diff --git a/logo.png b/logo.png
index 1234567..89abcde 100644
Binary files a/logo.png and b/logo.png differ
"#;
        let file_diff = FileDiff::parse(diff).unwrap();
        assert_eq!(file_diff.path, "logo.png");
        assert!(file_diff.added_lines.is_empty());
    }

    #[test]
    fn parse_deleted_file() {
        let diff = r#"diff --git a/gone.rs b/gone.rs
deleted file mode 100644
index 1111111..0000000
--- a/gone.rs
+++ /dev/null
@@ -1,2 +0,0 @@
-fn a() {}
-fn b() {}
"#;
        let file_diff = FileDiff::parse(diff).unwrap();
        assert_eq!(file_diff.path, "gone.rs");
        assert!(file_diff.added_lines.is_empty());
    }

    #[test]
    fn parse_with_context_lines() {
        let diff = r#"diff --git a/src/main.rs b/src/main.rs
index 1111111..2222222 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,4 +1,5 @@
 fn main() {
-    let x = 1;
+    let x = 2;
+    let y = x;
     println!("{x}");
 }
"#;
        let file_diff = FileDiff::parse(diff).unwrap();
        assert_eq!(
            file_diff.added_lines,
            vec![line(2, "    let x = 2;"), line(3, "    let y = x;")]
        );
    }

    #[test]
    fn parse_malformed_header() {
        assert_eq!(FileDiff::parse("diff --git nonsense\n@@ -1 +1 @@\n+x\n"), None);
        assert_eq!(FileDiff::parse(""), None);
    }
}
