//! Reading and safe rewriting of config documents
//!
//! The underlying tool owns the user document format; the wrapper only ever
//! rewrites the whole file. Every rewrite moves the current file aside as a
//! `.bak` sibling first, so a failed write can put the original back and a
//! successful one leaves the previous version around for inspection.

use aw_core::error::{ArcWrapError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File system access to the default and user config documents
pub struct DocumentStore {
    /// Team-wide default document, read only
    default_path: PathBuf,
    /// User document, read and rewritten
    user_path: PathBuf,
}

impl DocumentStore {
    /// Create a store over the two document locations
    pub fn new(default_path: impl Into<PathBuf>, user_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
            user_path: user_path.into(),
        }
    }

    /// Path of the default document
    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Path of the user document
    pub fn user_path(&self) -> &Path {
        &self.user_path
    }

    /// Path the previous user document is kept at after a rewrite
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .user_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config".into());
        name.push(".bak");
        self.user_path.with_file_name(name)
    }

    /// Load the default document; `None` when the file does not exist
    pub fn load_default(&self) -> Result<Option<Map<String, Value>>> {
        match fs::read_to_string(&self.default_path) {
            Ok(text) => Ok(Some(parse_document(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No default document at {:?}", self.default_path);
                Ok(None)
            }
            Err(e) => Err(ArcWrapError::Io(e)),
        }
    }

    /// Load the user document.
    ///
    /// Reads are permissive: a missing, unreadable, or malformed file is an
    /// empty document. The merge then fills it with defaults, and whatever
    /// was there before survives as the `.bak` sibling of the rewrite.
    pub fn load_user(&self) -> Map<String, Value> {
        let text = match fs::read_to_string(&self.user_path) {
            Ok(text) => text,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not read user document {:?}: {}", self.user_path, e);
                } else {
                    debug!("No user document at {:?}, starting empty", self.user_path);
                }
                return Map::new();
            }
        };
        match parse_document(&text) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(
                    "User document {:?} is not a JSON object ({}); treating it as empty",
                    self.user_path, e
                );
                Map::new()
            }
        }
    }

    /// Rewrite the user document, keeping the previous version as `.bak`.
    ///
    /// Returns the backup location when there was a previous version to keep.
    pub fn save_user(&self, doc: &Map<String, Value>) -> Result<Option<PathBuf>> {
        self.write_user(doc)
    }

    /// Backup, write, and on failure put the original back.
    ///
    /// Generic over the serialized value so the restore path stays testable;
    /// production callers only ever pass a document map.
    fn write_user<T: Serialize>(&self, doc: &T) -> Result<Option<PathBuf>> {
        let backup = self.backup_path();
        let had_original = self.user_path.exists();

        if had_original {
            fs::rename(&self.user_path, &backup).map_err(|e| ArcWrapError::ConfigWrite {
                path: self.user_path.clone(),
                message: format!("could not move previous version aside: {}", e),
            })?;
        }

        match self.write_pretty(doc) {
            Ok(()) => {
                debug!("Wrote config document {:?}", self.user_path);
                Ok(had_original.then_some(backup))
            }
            Err(e) => {
                // Drop any partial write, then put the original back.
                let _ = fs::remove_file(&self.user_path);
                if had_original {
                    if let Err(restore) = fs::rename(&backup, &self.user_path) {
                        warn!(
                            "Could not restore backup {:?} after failed write: {}",
                            backup, restore
                        );
                    }
                }
                Err(e)
            }
        }
    }

    fn write_pretty<T: Serialize>(&self, doc: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(doc).map_err(|e| ArcWrapError::ConfigWrite {
            path: self.user_path.clone(),
            message: format!("could not serialize document: {}", e),
        })?;
        fs::write(&self.user_path, text + "\n").map_err(|e| ArcWrapError::ConfigWrite {
            path: self.user_path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

fn parse_document(text: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ArcWrapError::Json(serde::de::Error::custom(format!(
            "expected a JSON object, got {}",
            kind_name(&other)
        )))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (DocumentStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(
            temp_dir.path().join("arcrc.default"),
            temp_dir.path().join(".arcrc"),
        );
        (store, temp_dir)
    }

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    /// Serializes to nothing; used to drive the write path into its failure arm
    struct FailingDoc;

    impl Serialize for FailingDoc {
        fn serialize<S: serde::Serializer>(
            &self,
            _serializer: S,
        ) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("simulated serialization failure"))
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (store, _temp) = create_test_store();
        let document = doc(json!({"editor": "vim", "khan": {"greeting": "hi"}}));

        store.save_user(&document).unwrap();
        let loaded = store.load_user();

        assert_eq!(loaded, document);
    }

    #[test]
    fn test_written_file_has_sorted_keys() {
        let (store, _temp) = create_test_store();
        store
            .save_user(&doc(json!({"zeta": 1, "alpha": 2})))
            .unwrap();

        let text = fs::read_to_string(store.user_path()).unwrap();
        assert!(text.find("\"alpha\"").unwrap() < text.find("\"zeta\"").unwrap());
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_missing_user_document_is_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.load_user().is_empty());
    }

    #[test]
    fn test_malformed_user_document_is_treated_as_empty() {
        let (store, _temp) = create_test_store();
        fs::write(store.user_path(), "not json").unwrap();

        assert!(store.load_user().is_empty());
    }

    #[test]
    fn test_non_object_user_document_is_treated_as_empty() {
        let (store, _temp) = create_test_store();
        fs::write(store.user_path(), "[1, 2, 3]").unwrap();

        assert!(store.load_user().is_empty());
    }

    #[test]
    fn test_missing_default_document_is_none() {
        let (store, _temp) = create_test_store();
        assert!(store.load_default().unwrap().is_none());
    }

    #[test]
    fn test_present_default_document_loads() {
        let (store, _temp) = create_test_store();
        fs::write(store.default_path(), r#"{"a": 1}"#).unwrap();

        let loaded = store.load_default().unwrap().unwrap();
        assert_eq!(loaded, doc(json!({"a": 1})));
    }

    #[test]
    fn test_non_object_default_document_is_an_error() {
        let (store, _temp) = create_test_store();
        fs::write(store.default_path(), "[1, 2, 3]").unwrap();

        let err = store.load_default().unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_rewrite_keeps_previous_version_as_backup() {
        let (store, _temp) = create_test_store();
        store.save_user(&doc(json!({"version": 1}))).unwrap();
        let first_text = fs::read_to_string(store.user_path()).unwrap();

        let backup = store.save_user(&doc(json!({"version": 2}))).unwrap();

        assert_eq!(backup, Some(store.backup_path()));
        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), first_text);
        let reloaded = store.load_user();
        assert_eq!(reloaded["version"], json!(2));
    }

    #[test]
    fn test_first_write_creates_no_backup() {
        let (store, _temp) = create_test_store();
        let backup = store.save_user(&doc(json!({"a": 1}))).unwrap();

        assert_eq!(backup, None);
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_failed_write_restores_original_bytes() {
        let (store, _temp) = create_test_store();
        // Deliberately odd formatting: the restore must be byte for byte.
        let original = "{\n    \"hand\":  \"edited\"\n}\n  \n";
        fs::write(store.user_path(), original).unwrap();

        let err = store.write_user(&FailingDoc).unwrap_err();

        assert!(matches!(err, ArcWrapError::ConfigWrite { .. }));
        assert_eq!(fs::read_to_string(store.user_path()).unwrap(), original);
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_failed_first_write_leaves_nothing_behind() {
        let (store, _temp) = create_test_store();

        assert!(store.write_user(&FailingDoc).is_err());
        assert!(!store.user_path().exists());
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_backup_path_is_a_dotfile_sibling() {
        let store = DocumentStore::new("/x/arcrc.default", "/home/u/.arcrc");
        assert_eq!(store.backup_path(), PathBuf::from("/home/u/.arcrc.bak"));
    }
}
