use error_set::error_set;
use std::io::Read;
use std::process::Command;
use tracing::debug;

pub mod diff;
pub mod filter;
pub mod report;
pub mod scan;

pub use diff::{AddedLine, FileDiff, parse_diff};
pub use filter::PathFilter;
pub use scan::{RegexLocation, Scanner};

error_set! {
    /// Top-level error for check-contents
    CheckContentsError := {
        #[display("Failed to read diff from {path}: {message}")]
        ReadFailed { path: String, message: String },
    } || PatternError || GitCommandError

    /// Errors from compiling user-supplied patterns
    PatternError := {
        #[display("Invalid prohibited regex '{pattern}': {message}")]
        InvalidProhibitedRegex { pattern: String, message: String },
        #[display("Invalid suppression regex '{pattern}': {message}")]
        InvalidSuppressionRegex { pattern: String, message: String },
        #[display("Invalid path expression '{expression}': {message}")]
        InvalidPathExpression { expression: String, message: String },
    }

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffFailed { message: String },
        #[display("git diff failed: {stderr}")]
        DiffExitError { stderr: String },
        #[display("Invalid UTF-8 in git diff output: {message}")]
        InvalidUtf8 { message: String },
    }
}

/// The rules a diff is checked against
#[derive(Debug, Clone)]
pub struct Policy {
    pub path_filter: PathFilter,
    pub scanner: Scanner,
}

impl Policy {
    /// Compile all patterns up front so a bad regex fails before any diff is read.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for the first invalid regex or path expression.
    pub fn new(
        path_expressions: &[String],
        path_expression_exclusions: &[String],
        prohibited_regex: &str,
        suppression_regex: Option<&str>,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            path_filter: PathFilter::new(path_expressions, path_expression_exclusions)?,
            scanner: Scanner::new(prohibited_regex, suppression_regex)?,
        })
    }

    /// Parse, filter and scan a diff, returning every unsuppressed match.
    ///
    /// # Examples
    /// ```
    /// # use check_contents::Policy;
    /// let policy = Policy::new(&[], &[], "bad", Some("nolint")).unwrap();
    /// let diff = "diff --git a/f.txt b/f.txt\n@@ -1,2 +1,3 @@\n ok\n+added bad line\n ok\n";
    /// let found = policy.check(diff);
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(found[0].line_number, 2);
    /// ```
    pub fn check(&self, diff_text: &str) -> Vec<RegexLocation> {
        let diffs = self.path_filter.filter(parse_diff(diff_text));
        self.scanner.scan(&diffs)
    }
}

/// A `git diff` between two revisions of a repository
pub struct GitDiff<'a> {
    repo_path: &'a str,
    base: &'a str,
    head: &'a str,
}

impl<'a> GitDiff<'a> {
    pub fn new(repo_path: &'a str, base: &'a str, head: &'a str) -> Self {
        Self {
            repo_path,
            base,
            head,
        }
    }

    /// Run `git diff <base> <head>` and capture its output.
    ///
    /// Prefixes, colors, quoting and external diff drivers are pinned so that
    /// user configuration cannot change the shape of the output.
    pub fn output(&self) -> Result<String, GitCommandError> {
        let args = [
            "-c",
            "core.quotepath=off",
            "-C",
            self.repo_path,
            "diff",
            "--no-ext-diff",
            "--no-color",
            "--src-prefix=a/",
            "--dst-prefix=b/",
            self.base,
            self.head,
        ];
        debug!(?args, "running git");

        let output =
            Command::new("git")
                .args(args)
                .output()
                .map_err(|e| GitCommandError::DiffFailed {
                    message: e.to_string(),
                })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::DiffExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }
}

/// Read diff text from a file, or from stdin when `path` is `-`
pub fn read_diff_file(path: &str) -> Result<String, CheckContentsError> {
    let read_failed = |e: std::io::Error| CheckContentsError::ReadFailed {
        path: path.to_string(),
        message: e.to_string(),
    };

    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(read_failed)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).map_err(read_failed)
    }
}
