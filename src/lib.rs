//! Kiosk wrapper around an embedded Chromium runtime.
//!
//! Turns a URL, a local HTML directory, or a bundled demo page into a
//! locked-down single-window browser session. Options come from three
//! layers with fixed precedence (command line, persisted settings file,
//! bundled defaults), are resolved once into an immutable configuration,
//! and drive the Chromium command line, an optional local static file
//! server, and the window lifecycle.
//!
//! # Modules
//!
//! - [`config`] - Settings store, key mapping, and option resolution
//! - [`chrome`] - Chromium switch and argument translation
//! - [`serve`] - Local static file server for `--serve`
//! - [`window`] - Window creation, lifecycle, menu, and start URL
//! - [`resources`] - Bundled defaults and local pages
//! - [`fatal`] - Fatal runtime error exit path

pub mod chrome;
pub mod config;
pub mod fatal;
pub mod resources;
pub mod serve;
pub mod window;

/// Crate version, reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Binary name used in usage and log output.
pub const NAME: &str = "kiosk";

pub use chrome::{apply_command_line, ChromeSwitch, CommandLine, RecordingCommandLine};
pub use config::{CliArgs, ConfigError, ResolvedConfig, SettingsStore};
pub use serve::LocalServer;
pub use window::{
    resolve_target_url, EventOutcome, LaunchError, WindowBackend, WindowEvent, WindowLauncher,
};
