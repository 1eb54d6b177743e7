//! Mapping between settings-store keys and CLI flag names.
//!
//! The settings document uses camelCase keys while the command line uses
//! kebab-case flags; most names coincide, a handful differ. The table must
//! stay total over the recognized options and bidirectionally unambiguous
//! (asserted by test).

use serde_json::{Map, Value};

/// Store key / CLI flag pairs for every recognized persisted option.
pub const SETTINGS_FLAG_MAP: &[(&str, &str)] = &[
    ("verbose", "verbose"),
    ("devTools", "dev"),
    ("remoteDebuggingPort", "port"),
    ("cursor", "cursor"),
    ("menu", "menu"),
    ("kiosk", "kiosk"),
    ("alwaysOnTop", "always-on-top"),
    ("fullscreen", "fullscreen"),
    ("integration", "integration"),
    ("localhost", "localhost"),
    ("zoom", "zoom"),
    ("transparent", "transparent"),
    ("retryTimeout", "retry"),
    ("home", "home"),
];

/// CLI flag name for a settings-store key.
pub fn flag_for(store_key: &str) -> Option<&'static str> {
    SETTINGS_FLAG_MAP
        .iter()
        .find(|(key, _)| *key == store_key)
        .map(|(_, flag)| *flag)
}

/// Settings-store key for a CLI flag name.
pub fn store_key_for(flag: &str) -> Option<&'static str> {
    SETTINGS_FLAG_MAP
        .iter()
        .find(|(_, f)| *f == flag)
        .map(|(key, _)| *key)
}

/// Renames the keys of a flat settings document to their CLI flag names.
/// Unmapped keys pass through unchanged.
pub fn convert_settings(settings: &Map<String, Value>) -> Map<String, Value> {
    settings
        .iter()
        .map(|(key, value)| {
            let name = flag_for(key).unwrap_or(key.as_str());
            (name.to_string(), value.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn map_is_bidirectionally_unambiguous() {
        let keys: HashSet<_> = SETTINGS_FLAG_MAP.iter().map(|(k, _)| *k).collect();
        let flags: HashSet<_> = SETTINGS_FLAG_MAP.iter().map(|(_, f)| *f).collect();
        assert_eq!(keys.len(), SETTINGS_FLAG_MAP.len());
        assert_eq!(flags.len(), SETTINGS_FLAG_MAP.len());
    }

    #[test]
    fn map_covers_all_bundled_defaults() {
        let defaults = crate::resources::default_settings();
        for key in defaults.as_object().unwrap().keys() {
            assert!(flag_for(key).is_some(), "no flag mapping for {key}");
        }
    }

    #[test]
    fn round_trips() {
        assert_eq!(flag_for("devTools"), Some("dev"));
        assert_eq!(store_key_for("dev"), Some("devTools"));
        assert_eq!(flag_for("alwaysOnTop"), Some("always-on-top"));
        assert_eq!(store_key_for("always-on-top"), Some("alwaysOnTop"));
        assert_eq!(flag_for("verbose"), Some("verbose"));
        assert!(flag_for("unknown").is_none());
    }

    #[test]
    fn convert_renames_only_mapped_keys() {
        let settings = json!({
            "devTools": true,
            "retryTimeout": 5,
            "custom": "kept"
        });
        let converted = convert_settings(settings.as_object().unwrap());
        assert_eq!(converted.get("dev"), Some(&json!(true)));
        assert_eq!(converted.get("retry"), Some(&json!(5)));
        assert_eq!(converted.get("custom"), Some(&json!("kept")));
        assert!(converted.get("devTools").is_none());
    }
}
