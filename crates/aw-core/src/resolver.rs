//! Fuzzy reviewer-name resolution
//!
//! Turns loosely-typed name fragments into canonical usernames. A fragment
//! that matches exactly one directory entry resolves silently; an ambiguous
//! fragment is put to the invoking user through an injected prompt. A
//! failure at any step aborts the whole resolution; nothing is guessed.

use crate::directory::{Candidate, DirectorySource, NameIndex};
use crate::error::{ArcWrapError, Result};
use tracing::debug;

/// Capability to present ambiguous candidates and obtain a reply.
///
/// Implementations show `candidates` (already sorted, 1-based as displayed)
/// for `fragment` and return the operator's raw reply exactly once - no
/// retry loop. Validation of the reply belongs to the resolver.
pub trait SelectionPrompt {
    /// Present the candidates and collect a single raw reply
    fn select(&mut self, fragment: &str, candidates: &[Candidate]) -> Result<String>;
}

impl<P: SelectionPrompt + ?Sized> SelectionPrompt for &mut P {
    fn select(&mut self, fragment: &str, candidates: &[Candidate]) -> Result<String> {
        (**self).select(fragment, candidates)
    }
}

/// Seam through which the argument rewriter reaches the resolver
pub trait ResolveReviewers {
    /// Resolve fragments into canonical usernames, preserving input order
    fn resolve(&mut self, fragments: &[String]) -> Result<Vec<String>>;
}

/// Resolves reviewer fragments against the directory service
pub struct ReviewerResolver<D, P> {
    directory: D,
    prompt: P,
}

impl<D: DirectorySource, P: SelectionPrompt> ReviewerResolver<D, P> {
    /// Create a resolver over a directory source and a prompt
    pub fn new(directory: D, prompt: P) -> Self {
        Self { directory, prompt }
    }

    /// Resolve every fragment into a canonical username.
    ///
    /// Returns usernames in the same order as the input fragments. An empty
    /// input returns an empty result without querying the directory. The
    /// directory is queried exactly once per call otherwise.
    pub fn resolve(&mut self, fragments: &[String]) -> Result<Vec<String>> {
        if fragments.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.directory.query_users()?;
        let index = NameIndex::build(&records);
        debug!(
            "resolving {} fragment(s) against {} directory keys",
            fragments.len(),
            index.len()
        );

        let mut resolved = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let needle = fragment.trim().to_lowercase();
            let candidates = index.candidates(&needle);
            match candidates.as_slice() {
                [] => return Err(ArcWrapError::NoMatch(fragment.clone())),
                [only] => resolved.push(only.user_name.clone()),
                several => {
                    let reply = self.prompt.select(fragment, several)?;
                    let pick = parse_selection(&reply, several.len())?;
                    resolved.push(several[pick - 1].user_name.clone());
                }
            }
        }

        Ok(resolved)
    }
}

impl<D: DirectorySource, P: SelectionPrompt> ResolveReviewers for ReviewerResolver<D, P> {
    fn resolve(&mut self, fragments: &[String]) -> Result<Vec<String>> {
        ReviewerResolver::resolve(self, fragments)
    }
}

/// Validate a raw prompt reply as a 1-based index into `limit` candidates
fn parse_selection(input: &str, limit: usize) -> Result<usize> {
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(n) if (1..=limit).contains(&n) => Ok(n),
        _ => Err(ArcWrapError::InvalidSelection {
            input: trimmed.to_string(),
            limit,
        }),
    }
}
