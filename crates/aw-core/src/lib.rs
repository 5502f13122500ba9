//! aw-core - Core library for arc-wrap
//!
//! This crate provides the core business logic for the arc wrapper tool,
//! including reviewer name resolution, config document reconciliation, and
//! rewriting of the reviewer shorthand flag.

pub mod directory;
pub mod error;
pub mod reconcile;
pub mod resolver;
pub mod rewrite;

pub use directory::{Candidate, DirectoryRecord, DirectorySource, NameIndex};
pub use error::{ArcWrapError, Result};
pub use reconcile::{reconcile, ExclusionPaths, FieldUpdate, ReconcileOutcome};
pub use resolver::{ResolveReviewers, ReviewerResolver, SelectionPrompt};
pub use rewrite::rewrite_args;
