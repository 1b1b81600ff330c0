use check_contents::{CheckContentsError, GitDiff, Policy, RegexLocation, read_diff_file, report};
use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit status when an unsuppressed match was found
const FOUND: u8 = 1;
/// Exit status when the check itself could not run
const FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "check-contents", version)]
#[command(about = "Check `git diff` for prohibited regexes")]
struct Cli {
    /// Only check paths matching one of these expressions (`...` matches anything) [default: all paths]
    #[arg(long = "path_expression", value_name = "EXPR", num_args = 0..)]
    path_expressions: Vec<String>,

    /// Skip paths matching any of these expressions, even if included
    #[arg(long = "path_expression_exclusion", value_name = "EXPR", num_args = 0..)]
    path_expression_exclusions: Vec<String>,

    /// Regex that must not appear in added lines
    #[arg(long = "prohibited_regex", value_name = "REGEX")]
    prohibited_regex: String,

    /// Regex that, when present on a line, allows the prohibited regex on that line
    #[arg(long = "suppression_regex", value_name = "REGEX")]
    suppression_regex: Option<String>,

    /// Explanation printed after every match
    #[arg(long = "failure_message", value_name = "TEXT")]
    failure_message: String,

    /// Revision to diff against
    #[arg(long, default_value = "origin/main")]
    base: String,

    /// Revision being checked
    #[arg(long, default_value = "HEAD")]
    head: String,

    /// Repository to run git in
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: String,

    /// Read the diff from this file (`-` for stdin) instead of running git
    #[arg(long = "diff_file", value_name = "PATH")]
    diff_file: Option<String>,

    /// Log filter (see tracing_subscriber's EnvFilter)
    #[arg(long, env = "CHECK_CONTENTS_LOG", default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<Vec<RegexLocation>, CheckContentsError> {
    let policy = Policy::new(
        &cli.path_expressions,
        &cli.path_expression_exclusions,
        &cli.prohibited_regex,
        cli.suppression_regex.as_deref(),
    )?;

    let diff_text = match &cli.diff_file {
        Some(path) => read_diff_file(path)?,
        None => GitDiff::new(&cli.repo, &cli.base, &cli.head).output()?,
    };
    info!(bytes = diff_text.len(), "obtained diff");

    Ok(policy.check(&diff_text))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli) {
        Ok(locations) if locations.is_empty() => {
            eprintln!("{}", report::render_success(&cli.prohibited_regex));
            ExitCode::SUCCESS
        }
        Ok(locations) => {
            eprint!(
                "{}",
                report::render_findings(&cli.prohibited_regex, &locations, &cli.failure_message)
            );
            ExitCode::from(FOUND)
        }
        Err(e) => {
            eprintln!("check-contents: {e}");
            ExitCode::from(FATAL)
        }
    }
}
