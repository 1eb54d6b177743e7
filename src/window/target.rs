//! Startup URL resolution.
//!
//! The window loads exactly one URL, chosen once at startup: the positional
//! CLI argument, then `--url`, then `index.html` when serving a directory,
//! then the persisted home URL. A `kiosk:` pseudo-scheme maps to the
//! bundled local pages; scheme-less values resolve against the local
//! server or the filesystem.

use std::path::Path;

use crate::config::ResolvedConfig;
use crate::resources;
use crate::window::LaunchError;

/// Resolves the URL the window should load. `url_prefix` is the local
/// server base (empty when serving is inactive).
pub fn resolve_target_url(
    config: &ResolvedConfig,
    url_prefix: &str,
) -> Result<String, LaunchError> {
    let partial = config
        .positional_url
        .clone()
        .or_else(|| config.url.clone())
        .unwrap_or_else(|| {
            if config.serve_active() {
                "index.html".to_string()
            } else {
                config.home.clone()
            }
        });

    match scheme_of(&partial) {
        Some("kiosk") => match kiosk_host(&partial) {
            "home" => Ok(file_url(&resources::bundled_page("index.html"))),
            "testapp" => Ok(file_url(&resources::bundled_page("testapp.html"))),
            _ => Err(LaunchError::UnknownKioskUrl(partial)),
        },
        Some(_) => Ok(partial),
        None => {
            if config.serve_active() {
                Ok(format!("{url_prefix}{partial}"))
            } else {
                Ok(file_url(Path::new(&partial)))
            }
        }
    }
}

/// Extracts a URL scheme, if present: an ASCII-alphabetic initial followed
/// by alphanumerics or `+`/`-`/`.`, terminated by `:`.
fn scheme_of(value: &str) -> Option<&str> {
    let (head, _) = value.split_once(':')?;
    let mut chars = head.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(head)
    } else {
        None
    }
}

/// Host portion of a `kiosk:` URL, accepting both `kiosk://host` and
/// `kiosk:host` spellings.
fn kiosk_host(value: &str) -> &str {
    let rest = value
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or("")
        .trim_start_matches("//");
    rest.split(['/', '?', '#']).next().unwrap_or("")
}

/// `file://` URL for a filesystem path, made absolute relative to the
/// working directory.
fn file_url(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}
