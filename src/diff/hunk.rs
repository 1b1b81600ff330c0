use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{map_res, opt},
    sequence::preceded,
};
use tracing::{trace, warn};

/// A line added by the diff, numbered by its position in the new file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedLine {
    pub new_line: u32,
    pub content: String,
}

/// Where a hunk starts in the new file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub new_start: u32,
}

impl HunkHeader {
    /// Parse a hunk header line.
    ///
    /// Format: `@@ -old_start[,old_count] +new_start[,new_count] @@ optional section`.
    /// Returns `None` for anything else, including combined (`@@@`) headers.
    pub fn parse(line: &str) -> Option<Self> {
        hunk_header(line).ok().map(|(_, header)| header)
    }
}

fn line_number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>).parse(input)
}

/// `start` or `start,count`; only the start matters for numbering
fn range_start(input: &str) -> IResult<&str, u32> {
    let (rest, (start, _count)) =
        (line_number, opt(preceded(char(','), line_number))).parse(input)?;
    Ok((rest, start))
}

fn hunk_header(input: &str) -> IResult<&str, HunkHeader> {
    let (rest, (_, _old_start, _, new_start, _)) =
        (tag("@@ -"), range_start, tag(" +"), range_start, tag(" @@")).parse(input)?;
    Ok((rest, HunkHeader { new_start }))
}

/// Walk the body lines of one hunk, returning the added lines with their
/// new-file line numbers.
///
/// Added (`+`) and context (` `) lines occupy a position in the new file and
/// advance the counter. Removed (`-`) lines and `\ No newline at end of file`
/// markers do not. Empty lines are treated as context whose leading space was
/// stripped by some tool along the way.
///
/// Numbering stops at the first line whose position would not fit in a `u32`.
pub fn added_lines<'a, I>(header: HunkHeader, body: I) -> Vec<AddedLine>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut added = Vec::new();
    // None once the counter has run past u32::MAX
    let mut next_line = Some(header.new_start);

    for line in body {
        let is_added = match line.as_bytes().first() {
            Some(b'+') => true,
            Some(b' ') | None => false,
            Some(b'-') | Some(b'\\') => continue,
            Some(_) => {
                warn!(line, "ignoring unrecognized line inside hunk");
                continue;
            }
        };

        let Some(new_line) = next_line else {
            warn!(
                new_start = header.new_start,
                "line number overflow, ignoring rest of hunk"
            );
            break;
        };

        if is_added {
            added.push(AddedLine {
                new_line,
                content: line[1..].to_string(),
            });
        }
        next_line = new_line.checked_add(1);
    }

    trace!(
        new_start = header.new_start,
        added = added.len(),
        "numbered hunk"
    );
    added
}
