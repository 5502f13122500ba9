//! Config document reconciliation
//!
//! Merges the team-wide default document into the user's document, key by
//! key, depth first. The merge is an explicit builder: the user document is
//! never mutated in place; callers get back a fresh merged document plus the
//! ordered list of field updates, and decide themselves whether anything
//! needs to be written.

use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

/// Namespace object in the user document that holds wrapper-owned keys
pub const EXCLUSION_NAMESPACE: &str = "khan";
/// Key under the namespace listing paths the user opted out of
pub const EXCLUSION_KEY: &str = "do_not_auto_update";

/// Slash-joined key paths the reconciliation must never touch.
///
/// Read once from `user["khan"]["do_not_auto_update"]` at the start of a
/// pass; consulted, never mutated, while the pass runs.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPaths {
    paths: HashSet<String>,
}

impl ExclusionPaths {
    /// No exclusions
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the opt-out list from a user document.
    ///
    /// Missing namespace, missing key, or a non-array value all mean "no
    /// exclusions"; non-string entries are skipped with a warning.
    pub fn from_doc(doc: &Map<String, Value>) -> Self {
        let mut paths = HashSet::new();
        if let Some(Value::Object(namespace)) = doc.get(EXCLUSION_NAMESPACE) {
            if let Some(Value::Array(entries)) = namespace.get(EXCLUSION_KEY) {
                for entry in entries {
                    match entry.as_str() {
                        Some(path) => {
                            paths.insert(path.to_string());
                        }
                        None => warn!("ignoring non-string exclusion path: {}", entry),
                    }
                }
            }
        }
        Self { paths }
    }

    /// Whether `path` is opted out
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of excluded paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the user opted out of nothing
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionPaths {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// One field the merge changed
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    /// Slash-joined key path of the changed field
    pub path: String,
    /// Value before the merge; `None` when the key was absent
    pub previous: Option<Value>,
    /// Value after the merge
    pub value: Value,
}

impl FieldUpdate {
    /// The old value rendered for diagnostics, with a sentinel for absence
    pub fn previous_text(&self) -> String {
        match &self.previous {
            Some(value) => value.to_string(),
            None => "(absent)".to_string(),
        }
    }

    /// The new value rendered for diagnostics
    pub fn value_text(&self) -> String {
        self.value.to_string()
    }
}

/// Result of a reconciliation pass
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The user document with defaults merged in
    pub merged: Map<String, Value>,
    /// Every changed field, in sorted depth-first path order
    pub updates: Vec<FieldUpdate>,
}

impl ReconcileOutcome {
    /// Number of fields the merge changed
    pub fn update_count(&self) -> usize {
        self.updates.len()
    }

    /// Whether the merged document equals what the user already had
    pub fn is_unchanged(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Merge `default` into a copy of `user`, skipping excluded paths.
///
/// For every key in the default document: an excluded path is skipped
/// entirely (no recursion, no overwrite); two nested documents recurse; any
/// other mismatch copies the default value over the user value and records
/// a [`FieldUpdate`]. Keys that only the user document has are left alone.
pub fn reconcile(
    default: &Map<String, Value>,
    user: &Map<String, Value>,
    exclusions: &ExclusionPaths,
) -> ReconcileOutcome {
    let mut merged = user.clone();
    let mut updates = Vec::new();
    merge_into(&mut merged, default, "", exclusions, &mut updates);
    ReconcileOutcome { merged, updates }
}

fn merge_into(
    target: &mut Map<String, Value>,
    default: &Map<String, Value>,
    prefix: &str,
    exclusions: &ExclusionPaths,
    updates: &mut Vec<FieldUpdate>,
) {
    for (key, default_value) in default {
        let path = join_path(prefix, key);
        if exclusions.contains(&path) {
            continue;
        }

        if let (Value::Object(default_child), Some(Value::Object(target_child))) =
            (default_value, target.get_mut(key))
        {
            merge_into(target_child, default_child, &path, exclusions, updates);
            continue;
        }

        if target.get(key) != Some(default_value) {
            let previous = target.insert(key.clone(), default_value.clone());
            updates.push(FieldUpdate {
                path,
                previous,
                value: default_value.clone(),
            });
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", prefix, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().expect("test doc must be an object").clone()
    }

    fn paths(outcome: &ReconcileOutcome) -> Vec<&str> {
        outcome.updates.iter().map(|u| u.path.as_str()).collect()
    }

    #[test]
    fn test_overwrites_and_adds_nested_fields() {
        let default = doc(json!({"a": {"b": 1, "c": 2}}));
        let user = doc(json!({"a": {"b": 99}}));

        let outcome = reconcile(&default, &user, &ExclusionPaths::empty());

        assert_eq!(outcome.merged["a"]["b"], json!(1));
        assert_eq!(outcome.merged["a"]["c"], json!(2));
        assert_eq!(outcome.update_count(), 2);
        assert_eq!(paths(&outcome), vec!["a/b", "a/c"]);
        // The inputs are untouched.
        assert_eq!(user["a"]["b"], json!(99));
    }

    #[test]
    fn test_excluded_path_is_left_alone() {
        let default = doc(json!({"a": {"b": 1, "c": 2}}));
        let user = doc(json!({"a": {"b": 99}}));
        let exclusions: ExclusionPaths = ["a/b"].into_iter().collect();

        let outcome = reconcile(&default, &user, &exclusions);

        assert_eq!(outcome.merged["a"]["b"], json!(99));
        assert_eq!(outcome.merged["a"]["c"], json!(2));
        assert_eq!(outcome.update_count(), 1);
        assert_eq!(paths(&outcome), vec!["a/c"]);
    }

    #[test]
    fn test_excluding_a_subtree_skips_recursion() {
        let default = doc(json!({"a": {"b": 1, "c": 2}, "d": 3}));
        let user = doc(json!({"a": {}}));
        let exclusions: ExclusionPaths = ["a"].into_iter().collect();

        let outcome = reconcile(&default, &user, &exclusions);

        assert_eq!(outcome.merged["a"], json!({}));
        assert_eq!(outcome.merged["d"], json!(3));
        assert_eq!(paths(&outcome), vec!["d"]);
    }

    #[test]
    fn test_identical_documents_change_nothing() {
        let default = doc(json!({"a": {"b": 1}, "x": "y"}));
        let user = default.clone();

        let outcome = reconcile(&default, &user, &ExclusionPaths::empty());

        assert!(outcome.is_unchanged());
        assert_eq!(outcome.merged, user);
    }

    #[test]
    fn test_type_mismatch_replaces_wholesale() {
        let default = doc(json!({"a": {"b": 1}}));
        let user = doc(json!({"a": 5}));

        let outcome = reconcile(&default, &user, &ExclusionPaths::empty());

        assert_eq!(outcome.merged["a"], json!({"b": 1}));
        assert_eq!(outcome.update_count(), 1);
        assert_eq!(outcome.updates[0].previous, Some(json!(5)));
    }

    #[test]
    fn test_absent_key_records_sentinel() {
        let default = doc(json!({"fresh": true}));
        let user = doc(json!({}));

        let outcome = reconcile(&default, &user, &ExclusionPaths::empty());

        assert_eq!(outcome.update_count(), 1);
        assert_eq!(outcome.updates[0].path, "fresh");
        assert_eq!(outcome.updates[0].previous, None);
        assert_eq!(outcome.updates[0].previous_text(), "(absent)");
        assert_eq!(outcome.updates[0].value_text(), "true");
    }

    #[test]
    fn test_user_only_keys_survive() {
        let default = doc(json!({"a": 1}));
        let user = doc(json!({"mine": "kept"}));

        let outcome = reconcile(&default, &user, &ExclusionPaths::empty());

        assert_eq!(outcome.merged["mine"], json!("kept"));
        assert_eq!(outcome.merged["a"], json!(1));
    }

    #[test]
    fn test_updates_are_reported_in_sorted_path_order() {
        let default = doc(json!({"z": 1, "a": {"m": 2, "b": 3}}));
        let user = doc(json!({}));

        let outcome = reconcile(&default, &user, &ExclusionPaths::empty());

        assert_eq!(paths(&outcome), vec!["a", "z"]);
    }

    #[test]
    fn test_deeply_nested_merge() {
        let default = doc(json!({"config": {"lint": {"engine": "strict", "max": 10}}}));
        let user = doc(json!({"config": {"lint": {"engine": "lax"}}}));

        let outcome = reconcile(&default, &user, &ExclusionPaths::empty());

        assert_eq!(outcome.merged["config"]["lint"]["engine"], json!("strict"));
        assert_eq!(outcome.merged["config"]["lint"]["max"], json!(10));
        assert_eq!(paths(&outcome), vec!["config/lint/engine", "config/lint/max"]);
    }

    #[test]
    fn test_exclusions_parsed_from_user_doc() {
        let user = doc(json!({
            "khan": {"do_not_auto_update": ["config/lint.engine", "editor"]}
        }));

        let exclusions = ExclusionPaths::from_doc(&user);
        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.contains("config/lint.engine"));
        assert!(exclusions.contains("editor"));
        assert!(!exclusions.contains("config"));
    }

    #[test]
    fn test_exclusions_default_to_empty() {
        assert!(ExclusionPaths::from_doc(&doc(json!({}))).is_empty());
        assert!(ExclusionPaths::from_doc(&doc(json!({"khan": {}}))).is_empty());
        assert!(ExclusionPaths::from_doc(&doc(json!({"khan": 7}))).is_empty());
        assert!(
            ExclusionPaths::from_doc(&doc(json!({"khan": {"do_not_auto_update": "oops"}})))
                .is_empty()
        );
    }

    #[test]
    fn test_exclusions_skip_non_string_entries() {
        let user = doc(json!({"khan": {"do_not_auto_update": ["ok", 42, null]}}));

        let exclusions = ExclusionPaths::from_doc(&user);
        assert_eq!(exclusions.len(), 1);
        assert!(exclusions.contains("ok"));
    }
}
