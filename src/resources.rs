//! Bundled static resources.
//!
//! The application ships two configuration documents (default settings and
//! the default Chromium command line) and two local HTML pages (the home and
//! test pages behind the `kiosk://` pseudo-scheme). The documents are
//! embedded at compile time and parsed once; the HTML pages are looked up on
//! disk next to the executable, falling back to the source tree during
//! development and tests.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::chrome::DefaultCommandLine;

static DEFAULT_SETTINGS: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/defaults.json"))
        .expect("bundled defaults.json is valid JSON")
});

static DEFAULT_COMMAND_LINE: Lazy<DefaultCommandLine> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/default_command_line.json"))
        .expect("bundled default_command_line.json is valid JSON")
});

/// The bundled default settings document.
pub fn default_settings() -> &'static Value {
    &DEFAULT_SETTINGS
}

/// The bundled default Chromium switch/argument lists.
pub fn default_command_line() -> &'static DefaultCommandLine {
    &DEFAULT_COMMAND_LINE
}

/// Root of the on-disk `resources/` directory.
///
/// Installed builds keep `resources/` next to the executable; otherwise the
/// copy in the source tree is used.
fn resources_root() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join("resources");
            if candidate.is_dir() {
                return candidate;
            }
        }
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

/// Absolute path of a bundled HTML page (`index.html`, `testapp.html`).
pub fn bundled_page(name: &str) -> PathBuf {
    resources_root().join("html").join(name)
}
