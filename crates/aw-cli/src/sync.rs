//! Periodic config reconciliation
//!
//! Runs before anything else on each invocation, but only actually touches
//! the documents when the last-sync stamp says a pass is due. A completed
//! pass is stamped even when nothing changed; a missing default document
//! leaves the stamp alone so the next invocation checks again.

use anyhow::{Context, Result};
use aw_core::reconcile::{reconcile, ExclusionPaths, ReconcileOutcome};
use aw_storage::{DocumentStore, Settings, SyncStamp};
use colored::Colorize;
use std::path::Path;
use tracing::{debug, warn};

/// Reconcile the user document with the team defaults when a pass is due
pub fn maybe_sync(settings: &Settings) -> Result<()> {
    if !settings.sync_enabled() {
        debug!("Config sync is disabled");
        return Ok(());
    }

    let stamp = SyncStamp::new(settings.stamp_path());
    if !stamp.is_due(settings.sync.interval_hours) {
        debug!("Config sync not due yet");
        return Ok(());
    }

    let store = DocumentStore::new(settings.default_doc_path(), settings.user_doc_path());
    let default_doc = match store
        .load_default()
        .context("could not read the default config document")?
    {
        Some(doc) => doc,
        None => {
            debug!(
                "No default document at {:?}, skipping sync",
                store.default_path()
            );
            return Ok(());
        }
    };

    let user_doc = store.load_user();
    let exclusions = ExclusionPaths::from_doc(&user_doc);
    debug!(
        "Reconciling {:?} against {:?} ({} exclusion(s))",
        store.user_path(),
        store.default_path(),
        exclusions.len()
    );

    let outcome = reconcile(&default_doc, &user_doc, &exclusions);
    if outcome.is_unchanged() {
        debug!("User document already carries the team defaults");
    } else {
        let backup = store
            .save_user(&outcome.merged)
            .context("could not update the user config document")?;
        report_updates(&store, &outcome, backup.as_deref());
    }

    if let Err(e) = stamp.mark() {
        warn!("Could not record the sync time: {}", e);
    }
    Ok(())
}

/// Tell the user exactly what changed and where the previous version went
fn report_updates(store: &DocumentStore, outcome: &ReconcileOutcome, backup: Option<&Path>) {
    let noun = if outcome.update_count() == 1 {
        "team default"
    } else {
        "team defaults"
    };
    eprintln!(
        "{} applied {} {} to {}:",
        "arc-wrap:".bold(),
        outcome.update_count(),
        noun,
        store.user_path().display()
    );
    for update in &outcome.updates {
        eprintln!(
            "  {}: {} -> {}",
            update.path.cyan(),
            update.previous_text().dimmed(),
            update.value_text()
        );
    }
    if let Some(backup) = backup {
        eprintln!(
            "  previous version kept at {}",
            backup.display().to_string().dimmed()
        );
    }
}
