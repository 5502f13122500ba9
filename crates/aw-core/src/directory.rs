//! Directory records and the reviewer name index

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::warn;

/// Role that marks an account as closed
pub const ROLE_DISABLED: &str = "disabled";
/// Role that marks an account as not yet verified
pub const ROLE_UNVERIFIED: &str = "unverified";

/// A single account as reported by the directory service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    /// Canonical username
    pub user_name: String,
    /// Free-text real name
    pub real_name: String,
    /// Account roles (e.g. "verified", "approved", "disabled")
    pub roles: Vec<String>,
}

impl DirectoryRecord {
    /// Create a record from its parts
    pub fn new(
        user_name: impl Into<String>,
        real_name: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            real_name: real_name.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// An account is eligible as a reviewer unless it is disabled or unverified
    pub fn is_eligible(&self) -> bool {
        !self
            .roles
            .iter()
            .any(|r| r == ROLE_DISABLED || r == ROLE_UNVERIFIED)
    }
}

/// A `(username, real name)` pair a fragment can resolve to.
///
/// Ordering is derived field-by-field, so sorting candidates yields the
/// `(username, realName)` order used for interactive listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate {
    /// Canonical username
    pub user_name: String,
    /// Free-text real name
    pub real_name: String,
}

impl Candidate {
    /// Create a candidate pair
    pub fn new(user_name: impl Into<String>, real_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            real_name: real_name.into(),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user_name, self.real_name)
    }
}

/// Case-insensitive lookup table from name text to candidates.
///
/// Every eligible record contributes two keys: its lower-cased username and
/// its lower-cased real name. When two distinct people normalize to the same
/// key (a username that equals someone else's real name, say), the later
/// record wins and the earlier one becomes unreachable through that key.
/// A collision is logged but not treated as an error.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: HashMap<String, Candidate>,
}

impl NameIndex {
    /// Build the index from directory records, skipping ineligible accounts
    pub fn build(records: &[DirectoryRecord]) -> Self {
        let mut entries: HashMap<String, Candidate> = HashMap::new();
        for record in records.iter().filter(|r| r.is_eligible()) {
            let candidate = Candidate::new(&record.user_name, &record.real_name);
            for key in [
                record.user_name.to_lowercase(),
                record.real_name.to_lowercase(),
            ] {
                if let Some(previous) = entries.insert(key.clone(), candidate.clone()) {
                    if previous != candidate {
                        warn!(
                            "directory index collision on '{}': {} shadows {}",
                            key, candidate, previous
                        );
                    }
                }
            }
        }
        Self { entries }
    }

    /// Number of distinct lookup keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no keys at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All candidates whose username or real name contains `needle`.
    ///
    /// `needle` must already be normalized (trimmed, lower-cased). The result
    /// is de-duplicated and sorted by `(username, real name)` so interactive
    /// listings are reproducible.
    pub fn candidates(&self, needle: &str) -> Vec<Candidate> {
        let matches: BTreeSet<&Candidate> = self
            .entries
            .iter()
            .filter(|(key, _)| key.contains(needle))
            .map(|(_, candidate)| candidate)
            .collect();
        matches.into_iter().cloned().collect()
    }
}

/// Source of directory records.
///
/// The production implementation queries the review server's conduit API;
/// tests substitute in-memory fixtures.
pub trait DirectorySource {
    /// Fetch every record the directory knows about
    fn query_users(&self) -> Result<Vec<DirectoryRecord>>;
}

impl<D: DirectorySource + ?Sized> DirectorySource for &D {
    fn query_users(&self) -> Result<Vec<DirectoryRecord>> {
        (**self).query_users()
    }
}
