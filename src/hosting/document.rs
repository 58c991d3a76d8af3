//! firebase.json document handling
//!
//! The document is kept as raw JSON so keys this crate does not know about
//! (`firestore`, `functions`, extra hosting fields) survive a rewrite. Only
//! the `hosting` key is interpreted, and it is always a sequence once loaded.

use super::entry::HostingEntry;
use crate::{DeployerError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const HOSTING_KEY: &str = "hosting";

/// How a document came to be in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Parsed as-is
    Loaded,
    /// Parsed, but `hosting` was not a sequence and was reset to empty
    Coerced,
    /// No file yet; started from an empty document
    Missing,
    /// File exists but could not be read; started from an empty document
    Unreadable(String),
    /// File is not a JSON object; started from an empty document
    Invalid(String),
}

impl LoadState {
    /// True when existing content was discarded or reshaped
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            LoadState::Coerced | LoadState::Unreadable(_) | LoadState::Invalid(_)
        )
    }
}

/// A document read from disk together with how it was obtained
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: HostingDocument,
    pub state: LoadState,
}

/// In-memory firebase.json
///
/// Invariant: `root["hosting"]` is always an array.
#[derive(Debug, Clone, PartialEq)]
pub struct HostingDocument {
    root: Map<String, Value>,
}

impl Default for HostingDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HostingDocument {
    /// Create an empty document (`{"hosting": []}`)
    pub fn new() -> Self {
        let mut root = Map::new();
        root.insert(HOSTING_KEY.to_string(), Value::Array(Vec::new()));
        Self { root }
    }

    /// Resolve a parsed JSON value into a document
    ///
    /// Returns `None` when the value is not an object. The flag is true when
    /// `hosting` had to be reset to an empty sequence.
    pub fn from_value(value: Value) -> Option<(Self, bool)> {
        let Value::Object(mut root) = value else {
            return None;
        };

        let coerced = match root.get_mut(HOSTING_KEY) {
            Some(Value::Array(_)) => false,
            Some(other) => {
                *other = Value::Array(Vec::new());
                true
            }
            None => {
                root.insert(HOSTING_KEY.to_string(), Value::Array(Vec::new()));
                false
            }
        };

        Some((Self { root }, coerced))
    }

    /// Load a document, falling back to an empty one on any failure
    pub fn load(path: impl AsRef<Path>) -> LoadedDocument {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No hosting config yet, starting empty");
                return LoadedDocument {
                    document: Self::new(),
                    state: LoadState::Missing,
                };
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Hosting config unreadable, replacing with empty document"
                );
                return LoadedDocument {
                    document: Self::new(),
                    state: LoadState::Unreadable(e.to_string()),
                };
            }
        };

        let parsed = serde_json::from_str::<Value>(&content)
            .map_err(|e| e.to_string())
            .and_then(|value| {
                Self::from_value(value).ok_or_else(|| "top-level value is not an object".to_string())
            });

        match parsed {
            Ok((document, false)) => LoadedDocument {
                document,
                state: LoadState::Loaded,
            },
            Ok((document, true)) => {
                tracing::warn!(
                    path = %path.display(),
                    "Hosting config 'hosting' is not a list, resetting it"
                );
                LoadedDocument {
                    document,
                    state: LoadState::Coerced,
                }
            }
            Err(reason) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %reason,
                    "Hosting config is not valid, replacing with empty document"
                );
                LoadedDocument {
                    document: Self::new(),
                    state: LoadState::Invalid(reason),
                }
            }
        }
    }

    /// Raw hosting sequence, including entries this crate did not write
    pub fn hosting(&self) -> &[Value] {
        match self.root.get(HOSTING_KEY) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Entries that parse as a [`HostingEntry`]
    pub fn entries(&self) -> Vec<HostingEntry> {
        self.hosting()
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect()
    }

    /// Target names in document order
    pub fn targets(&self) -> Vec<&str> {
        self.hosting().iter().filter_map(target_of).collect()
    }

    /// Replace every entry for the entry's target with `entry`, appended last
    ///
    /// Returns how many previous entries were removed.
    pub fn upsert(&mut self, entry: &HostingEntry) -> Result<usize> {
        let value = serde_json::to_value(entry)?;
        let slot = self
            .root
            .entry(HOSTING_KEY)
            .or_insert(Value::Null);
        let mut hosting = match slot.take() {
            Value::Array(items) => items,
            _ => Vec::new(),
        };

        let before = hosting.len();
        hosting.retain(|item| target_of(item) != Some(entry.target.as_str()));
        let removed = before - hosting.len();

        hosting.push(value);
        *slot = Value::Array(hosting);
        Ok(removed)
    }

    /// The whole document as JSON
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Serialize with 2-space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Overwrite `path` with this document
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;

        fs::write(path, json).map_err(|source| DeployerError::HostingConfig {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            entries = self.hosting().len(),
            "Hosting config written"
        );
        Ok(())
    }
}

fn target_of(item: &Value) -> Option<&str> {
    item.get("target").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_new_document() {
        let doc = HostingDocument::new();
        assert!(doc.hosting().is_empty());
        assert_eq!(doc.to_value(), json!({ "hosting": [] }));
    }

    #[test]
    fn test_from_value_missing_hosting() {
        let (doc, coerced) = HostingDocument::from_value(json!({ "firestore": {} })).unwrap();
        assert!(!coerced);
        assert!(doc.hosting().is_empty());
        assert_eq!(doc.to_value(), json!({ "firestore": {}, "hosting": [] }));
    }

    #[test]
    fn test_from_value_coerces_non_sequence() {
        let (doc, coerced) =
            HostingDocument::from_value(json!({ "hosting": { "public": "dist" } })).unwrap();
        assert!(coerced);
        assert!(doc.hosting().is_empty());
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(HostingDocument::from_value(json!([1, 2])).is_none());
        assert!(HostingDocument::from_value(json!("hosting")).is_none());
    }

    #[test]
    fn test_upsert_appends_and_replaces() {
        let mut doc = HostingDocument::new();
        doc.upsert(&HostingEntry::redirect("a", "public", "a.com"))
            .unwrap();
        doc.upsert(&HostingEntry::redirect("b", "public", "b.com"))
            .unwrap();
        let removed = doc
            .upsert(&HostingEntry::redirect("a", "site", "c.com"))
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(doc.targets(), vec!["b", "a"]);
        let a = &doc.entries()[1];
        assert_eq!(a.public, "site");
        assert_eq!(a.destination(), Some("https://c.com/:splat"));
    }

    #[test]
    fn test_upsert_into_coerced_document() {
        let (mut doc, coerced) =
            HostingDocument::from_value(json!({ "hosting": "dist", "firestore": {} })).unwrap();
        assert!(coerced);

        doc.upsert(&HostingEntry::redirect("a", "public", "a.com"))
            .unwrap();
        assert_eq!(doc.targets(), vec!["a"]);
        assert_eq!(doc.to_value()["firestore"], json!({}));
    }

    #[test]
    fn test_upsert_removes_duplicate_targets() {
        let (mut doc, _) = HostingDocument::from_value(json!({
            "hosting": [
                { "target": "dup", "public": "one" },
                { "target": "keep", "public": "x" },
                { "target": "dup", "public": "two" }
            ]
        }))
        .unwrap();

        let removed = doc
            .upsert(&HostingEntry::redirect("dup", "public", "d.com"))
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(doc.targets(), vec!["keep", "dup"]);
    }

    #[test]
    fn test_upsert_keeps_foreign_entries_verbatim() {
        let (mut doc, _) = HostingDocument::from_value(json!({
            "hosting": [
                "not-an-object",
                { "public": "no-target" },
                { "target": "custom", "public": "dist", "headers": [] }
            ]
        }))
        .unwrap();

        doc.upsert(&HostingEntry::redirect("new", "public", "n.com"))
            .unwrap();

        let hosting = doc.hosting();
        assert_eq!(hosting.len(), 4);
        assert_eq!(hosting[0], json!("not-an-object"));
        assert_eq!(hosting[1], json!({ "public": "no-target" }));
        assert_eq!(
            hosting[2],
            json!({ "target": "custom", "public": "dist", "headers": [] })
        );
        // Only fully-shaped entries parse.
        assert_eq!(doc.entries().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let loaded = HostingDocument::load(temp.path().join("firebase.json"));
        assert_eq!(loaded.state, LoadState::Missing);
        assert!(!loaded.state.is_degraded());
        assert_eq!(loaded.document, HostingDocument::new());
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("firebase.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = HostingDocument::load(&path);
        assert!(matches!(loaded.state, LoadState::Invalid(_)));
        assert!(loaded.state.is_degraded());
        assert_eq!(loaded.document, HostingDocument::new());
    }

    #[test]
    fn test_load_non_object_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("firebase.json");
        fs::write(&path, "[]").unwrap();

        let loaded = HostingDocument::load(&path);
        assert!(matches!(loaded.state, LoadState::Invalid(_)));
    }

    #[test]
    fn test_load_directory_is_unreadable() {
        let temp = TempDir::new().unwrap();
        let loaded = HostingDocument::load(temp.path());
        assert!(matches!(loaded.state, LoadState::Unreadable(_)));
        assert!(loaded.document.hosting().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("firebase.json");

        let mut doc = HostingDocument::new();
        doc.upsert(&HostingEntry::redirect("a", "public", "a.com"))
            .unwrap();
        doc.save(&path).unwrap();

        let loaded = HostingDocument::load(&path);
        assert_eq!(loaded.state, LoadState::Loaded);
        assert_eq!(loaded.document, doc);
        assert_eq!(
            loaded.document.entries(),
            vec![HostingEntry::redirect("a", "public", "a.com")]
        );
    }

    #[test]
    fn test_pretty_output_uses_two_spaces() {
        let doc = HostingDocument::new();
        assert_eq!(doc.to_json_pretty().unwrap(), "{\n  \"hosting\": []\n}");
    }

    #[test]
    fn test_preserves_top_level_key_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("firebase.json");
        fs::write(
            &path,
            r#"{"functions": {"source": "fn"}, "hosting": [], "database": {"rules": "db.json"}}"#,
        )
        .unwrap();

        let mut doc = HostingDocument::load(&path).document;
        doc.upsert(&HostingEntry::redirect("a", "public", "a.com"))
            .unwrap();
        let json = doc.to_json_pretty().unwrap();

        let functions = json.find("\"functions\"").unwrap();
        let hosting = json.find("\"hosting\"").unwrap();
        let database = json.find("\"database\"").unwrap();
        assert!(functions < hosting && hosting < database);
    }
}
