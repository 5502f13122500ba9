//! Rewriting of the reviewer shorthand flag
//!
//! Scans a raw argument vector for `--rr` (separate-value and `--rr=` forms),
//! resolves the collected name fragments, and splices a single canonical
//! `--reviewers` flag into the remaining arguments. Arguments without the
//! shorthand pass through untouched and never trigger a directory query.

use crate::error::{ArcWrapError, Result};
use crate::resolver::ResolveReviewers;

/// Shorthand flag accepted by the wrapper
pub const SHORTHAND_FLAG: &str = "--rr";
/// Canonical flag understood by the underlying tool
pub const REVIEWERS_FLAG: &str = "--reviewers";

/// Replace every `--rr` occurrence with one `--reviewers` flag.
///
/// Fragments from all occurrences are comma-split, trimmed, and deduplicated
/// in first-seen order, then resolved in a single pass. The canonical flag is
/// spliced in immediately after the first surviving argument, which keeps it
/// behind the tool's subcommand. A trailing `--rr` with no value is an error.
pub fn rewrite_args<R: ResolveReviewers>(args: &[String], resolver: &mut R) -> Result<Vec<String>> {
    let mut fragments: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == SHORTHAND_FLAG {
            match iter.next() {
                Some(value) => collect_fragments(value, &mut fragments),
                None => {
                    return Err(ArcWrapError::MalformedArgument(SHORTHAND_FLAG.to_string()))
                }
            }
        } else if let Some(value) = arg.strip_prefix("--rr=") {
            collect_fragments(value, &mut fragments);
        } else {
            out.push(arg.clone());
        }
    }

    if fragments.is_empty() {
        return Ok(out);
    }

    let names = resolver.resolve(&fragments)?;
    let csv = names.join(",");
    if out.is_empty() {
        out.push(REVIEWERS_FLAG.to_string());
        out.push(csv);
    } else {
        out.insert(1, REVIEWERS_FLAG.to_string());
        out.insert(2, csv);
    }
    Ok(out)
}

fn collect_fragments(value: &str, fragments: &mut Vec<String>) {
    for piece in value.split(',') {
        let piece = piece.trim();
        if !fragments.iter().any(|f| f == piece) {
            fragments.push(piece.to_string());
        }
    }
}
