//! Persistent settings store.
//!
//! A small JSON-document store with `has`/`get`/`get_all`/`set_all`
//! operations and dotted-path key lookup. The first time the store is
//! opened it is seeded from the bundled defaults document, so later runs
//! see a user-editable settings file.
//!
//! Fallback to the defaults is deliberately kept out of the store itself:
//! [`get_with_default`] is an explicit two-tier lookup taking both the
//! store and the static defaults document as parameters.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::resolver::ConfigError;
use crate::resources;

/// Persistent key-value settings document.
///
/// Keys are dotted paths (`"a.b.c"`) traversing nested JSON objects.
///
/// # Example
///
/// ```rust
/// use kiosk_browser::config::SettingsStore;
/// use serde_json::json;
///
/// let store = SettingsStore::in_memory(json!({ "zoom": 2.0 }));
/// assert!(store.has("zoom"));
/// assert_eq!(store.get("zoom").and_then(|v| v.as_f64()), Some(2.0));
/// ```
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    document: Value,
}

impl SettingsStore {
    /// Opens (and if necessary creates) the settings store at `path`.
    ///
    /// An absent, empty, or non-object document is replaced by the bundled
    /// defaults and written back to disk.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let document = match fs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => serde_json::from_str(&content)?,
            Ok(_) => Value::Null,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Value::Null,
            Err(err) => return Err(err.into()),
        };

        let mut store = Self {
            path: Some(path.to_path_buf()),
            document,
        };

        let empty = match &store.document {
            Value::Object(map) => map.is_empty(),
            _ => true,
        };
        if empty {
            store.set_all(resources::default_settings().clone())?;
        }

        Ok(store)
    }

    /// Opens the store at the platform-specific user data location.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(&default_store_path()?)
    }

    /// Creates a store that is never written to disk. Used by tests.
    pub fn in_memory(document: Value) -> Self {
        Self {
            path: None,
            document,
        }
    }

    /// Returns true if `key_path` resolves to a value in the store.
    pub fn has(&self, key_path: &str) -> bool {
        self.get(key_path).is_some()
    }

    /// Looks up `key_path` in the store document.
    pub fn get(&self, key_path: &str) -> Option<&Value> {
        lookup_path(&self.document, key_path)
    }

    /// The entire settings document.
    pub fn get_all(&self) -> &Value {
        &self.document
    }

    /// Replaces the entire document, persisting it when the store is
    /// file-backed.
    pub fn set_all(&mut self, document: Value) -> Result<(), ConfigError> {
        self.document = document;
        if let Some(ref path) = self.path {
            let pretty = serde_json::to_string_pretty(&self.document)?;
            fs::write(path, pretty)?;
        }
        Ok(())
    }
}

/// Platform-specific path of the persisted settings document.
pub fn default_store_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::ProjectDirs::from("org", "kiosk-browser", "kiosk-browser")
        .ok_or_else(|| {
            ConfigError::Validation("cannot determine the user data directory".to_string())
        })?;
    Ok(dirs.config_dir().join("settings.json"))
}

/// Two-tier lookup: the store value when present, otherwise a dotted-path
/// lookup in the static `defaults` document.
pub fn get_with_default<'a>(
    store: &'a SettingsStore,
    defaults: &'a Value,
    key_path: &str,
) -> Option<&'a Value> {
    if store.has(key_path) {
        store.get(key_path)
    } else {
        lookup_path(defaults, key_path)
    }
}

/// Dotted-path traversal of nested JSON objects.
fn lookup_path<'a>(document: &'a Value, key_path: &str) -> Option<&'a Value> {
    let mut current = document;
    for key in key_path.split('.') {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Converts a flat JSON object into a key/value map, used when renaming
/// settings keys to flag names.
pub fn as_flat_map(document: &Value) -> Map<String, Value> {
    document.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_seeds_defaults_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::open(&path).unwrap();
        assert!(store.has("fullscreen"));
        assert_eq!(store.get("home"), Some(&json!("kiosk://home")));

        // The seeded document must be on disk and survive a reopen.
        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get_all(), store.get_all());
    }

    #[test]
    fn open_preserves_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "zoom": 3.5 }"#).unwrap();

        let store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.get("zoom"), Some(&json!(3.5)));
        // Partial documents are kept as-is; missing keys come from the
        // defaults tier, not from re-seeding.
        assert!(!store.has("fullscreen"));
    }

    #[test]
    fn dotted_path_lookup() {
        let store = SettingsStore::in_memory(json!({ "a": { "b": { "c": 7 } } }));
        assert_eq!(store.get("a.b.c"), Some(&json!(7)));
        assert!(store.get("a.b.missing").is_none());
        assert!(store.get("a.b.c.d").is_none());
    }

    #[test]
    fn get_with_default_prefers_store() {
        let defaults = json!({ "zoom": 1.0, "menu": false });
        let store = SettingsStore::in_memory(json!({ "zoom": 2.0 }));

        assert_eq!(
            get_with_default(&store, &defaults, "zoom"),
            Some(&json!(2.0))
        );
        assert_eq!(
            get_with_default(&store, &defaults, "menu"),
            Some(&json!(false))
        );
        assert!(get_with_default(&store, &defaults, "absent").is_none());
    }

    #[test]
    fn set_all_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::open(&path).unwrap();
        store.set_all(json!({ "kiosk": true })).unwrap();

        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get("kiosk"), Some(&json!(true)));
    }
}
