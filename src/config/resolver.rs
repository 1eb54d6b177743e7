//! Option resolution.
//!
//! Merges parsed CLI arguments with the persisted settings store into one
//! immutable [`ResolvedConfig`]. For every recognized option the precedence
//! is: CLI value > store value > bundled default. Validation and type
//! coercion happen here and nowhere else; downstream consumers (the
//! command-line builder and the window launcher) read the resolved values
//! without re-checking them.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::chrome::ChromeSwitch;
use crate::config::store::{get_with_default, SettingsStore};
use crate::resources;

/// Errors produced while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the settings document.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings document is not valid JSON.
    #[error("malformed settings document: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote debugging port outside `[0, 65535]` or not an integer.
    #[error("invalid remote debugging port: {0}")]
    InvalidPort(String),

    /// `--serve` target is missing or not a directory.
    #[error("no such directory: {0}")]
    NoSuchDirectory(PathBuf),

    /// `--append-chrome-switch` received an empty string.
    #[error("empty Chrome CLI switch")]
    EmptyChromeSwitch,

    /// `--append-chrome-switch` entry without the `--` prefix.
    #[error("Chrome CLI switch must start with '--': {0}")]
    ChromeSwitchPrefix(String),

    /// Zoom factor is not a positive finite number.
    #[error("invalid zoom factor: {0}")]
    InvalidZoom(f64),

    /// Any other invalid configuration value.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Options gathered from the command line. All fields are optional; absent
/// values fall back through the settings store to the bundled defaults.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    /// `-v` occurrences.
    pub verbose: Option<u8>,
    /// `--dev`
    pub dev: Option<bool>,
    /// `--port`
    pub port: Option<u16>,
    /// `--cursor`
    pub cursor: Option<bool>,
    /// `--menu`
    pub menu: Option<bool>,
    /// `--kiosk`
    pub kiosk: Option<bool>,
    /// `--always-on-top`
    pub always_on_top: Option<bool>,
    /// `--fullscreen`
    pub fullscreen: Option<bool>,
    /// `--integration`
    pub integration: Option<bool>,
    /// `--localhost`
    pub localhost: Option<bool>,
    /// `--zoom`
    pub zoom: Option<f64>,
    /// `--url`
    pub url: Option<String>,
    /// `--serve`
    pub serve: Option<PathBuf>,
    /// `--transparent`
    pub transparent: Option<bool>,
    /// `--retry`
    pub retry_secs: Option<u64>,
    /// `--preload`
    pub preload: Option<PathBuf>,
    /// `--append-chrome-switch` entries, raw.
    pub append_chrome_switches: Vec<String>,
    /// `--append-chrome-argument` entries.
    pub append_chrome_arguments: Vec<String>,
    /// `--use-minimal-chrome-cli`
    pub use_minimal_chrome_cli: bool,
    /// Trailing positional URL or path.
    pub positional_url: Option<String>,
}

/// The canonical runtime configuration. Built once per process start and
/// immutable thereafter; every field has a defined value.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub verbose: u8,
    pub dev: bool,
    pub port: u16,
    pub cursor: bool,
    pub menu: bool,
    pub kiosk: bool,
    pub always_on_top: bool,
    pub fullscreen: bool,
    pub integration: bool,
    pub localhost: bool,
    pub zoom: f64,
    pub url: Option<String>,
    pub serve: Option<PathBuf>,
    pub transparent: bool,
    pub retry_secs: u64,
    pub preload: Option<PathBuf>,
    /// User-appended switches followed by derived ones, in order.
    pub append_switches: Vec<ChromeSwitch>,
    pub append_arguments: Vec<String>,
    pub use_minimal_chrome_cli: bool,
    pub positional_url: Option<String>,
    /// Default start URL from the settings store.
    pub home: String,
    serve_active: bool,
}

impl ResolvedConfig {
    /// Merges `args` with the settings store into a resolved configuration.
    pub fn resolve(args: &CliArgs, store: &SettingsStore) -> Result<Self, ConfigError> {
        let port = match args.port {
            Some(port) => port,
            None => {
                let raw = setting_u64(store, "remoteDebuggingPort");
                u16::try_from(raw).map_err(|_| ConfigError::InvalidPort(raw.to_string()))?
            }
        };

        let zoom = args.zoom.unwrap_or_else(|| setting_f64(store, "zoom", 1.0));
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(ConfigError::InvalidZoom(zoom));
        }

        let serve = match args.serve {
            Some(ref path) => Some(validate_serve_dir(path)?),
            None => None,
        };

        // Faithful to the original resolution expression: activation hinges
        // on the CLI path being present, not on any persisted `serve` value.
        let serve_active = serve.is_some();

        let mut append_switches = args
            .append_chrome_switches
            .iter()
            .map(|raw| parse_chrome_switch(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let localhost = bool_option(args.localhost, store, "localhost");

        if port > 0 {
            append_switches.push(ChromeSwitch::with_value(
                "remote-debugging-port",
                port.to_string(),
            ));
        }
        if localhost {
            append_switches.push(ChromeSwitch::with_value("host-rules", "MAP * 127.0.0.1"));
        }

        let verbose = match args.verbose {
            Some(count) if count > 0 => count,
            _ => setting_u64(store, "verbose").min(u8::MAX as u64) as u8,
        };

        Ok(Self {
            verbose,
            dev: bool_option(args.dev, store, "devTools"),
            port,
            cursor: bool_option(args.cursor, store, "cursor"),
            menu: bool_option(args.menu, store, "menu"),
            kiosk: bool_option(args.kiosk, store, "kiosk"),
            always_on_top: bool_option(args.always_on_top, store, "alwaysOnTop"),
            fullscreen: bool_option(args.fullscreen, store, "fullscreen"),
            integration: bool_option(args.integration, store, "integration"),
            localhost,
            zoom,
            url: args.url.clone(),
            serve,
            transparent: bool_option(args.transparent, store, "transparent"),
            retry_secs: args
                .retry_secs
                .unwrap_or_else(|| setting_u64(store, "retryTimeout")),
            preload: args.preload.clone(),
            append_switches,
            append_arguments: args.append_chrome_arguments.clone(),
            use_minimal_chrome_cli: args.use_minimal_chrome_cli,
            positional_url: args.positional_url.clone(),
            home: setting_string(store, "home", "kiosk://home"),
            serve_active,
        })
    }

    /// Whether the local static file server should be started.
    pub fn serve_active(&self) -> bool {
        self.serve_active
    }
}

/// Parses and range-checks a `--port` value. Used as the clap value parser
/// so CLI errors carry this message, and by the resolver for store-sourced
/// values.
pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;
    if (0..=65535).contains(&value) {
        Ok(value as u16)
    } else {
        Err(ConfigError::InvalidPort(raw.to_string()))
    }
}

/// Validates a `--serve` target: must exist and be a directory. A missing
/// path and a non-directory path report the same error class; other
/// filesystem errors pass through untouched.
pub fn validate_serve_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(path.to_path_buf()),
        Ok(_) => Err(ConfigError::NoSuchDirectory(path.to_path_buf())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::NoSuchDirectory(path.to_path_buf()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Parses one `--append-chrome-switch` entry of the form `--key` or
/// `--key=value`.
pub fn parse_chrome_switch(raw: &str) -> Result<ChromeSwitch, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::EmptyChromeSwitch);
    }
    let stripped = raw
        .strip_prefix("--")
        .ok_or_else(|| ConfigError::ChromeSwitchPrefix(raw.to_string()))?;
    if stripped.is_empty() {
        return Err(ConfigError::EmptyChromeSwitch);
    }
    Ok(match stripped.split_once('=') {
        Some((key, value)) => ChromeSwitch::with_value(key, value),
        None => ChromeSwitch::bare(stripped),
    })
}

fn bool_option(cli: Option<bool>, store: &SettingsStore, key: &str) -> bool {
    cli.unwrap_or_else(|| {
        get_with_default(store, resources::default_settings(), key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    })
}

fn setting_u64(store: &SettingsStore, key: &str) -> u64 {
    get_with_default(store, resources::default_settings(), key)
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

fn setting_f64(store: &SettingsStore, key: &str, fallback: f64) -> f64 {
    get_with_default(store, resources::default_settings(), key)
        .and_then(Value::as_f64)
        .unwrap_or(fallback)
}

fn setting_string(store: &SettingsStore, key: &str, fallback: &str) -> String {
    get_with_default(store, resources::default_settings(), key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}
