//! Window launching and lifecycle management.
//!
//! One top-level browser window is created per process. The embedded
//! runtime sits behind the [`WindowBackend`]/[`WindowHandle`] seams; a
//! headless implementation records every operation so the full lifecycle
//! can run without a display.
//!
//! # Submodules
//!
//! - [`geometry`] - Display bounds and the virtual desktop rectangle
//! - [`options`] - Window and browser-preference options derived from the config
//! - [`menu`] - Declarative application menu and action dispatch
//! - [`backend`] - Runtime seam traits plus the headless implementation
//! - [`launcher`] - Window creation and the lifecycle state machine
//! - [`target`] - Startup URL resolution, including the `kiosk://` scheme

pub mod backend;
pub mod geometry;
pub mod launcher;
pub mod menu;
pub mod options;
pub mod target;

use thiserror::Error;

/// Errors raised while resolving the start URL or creating the window.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// `kiosk://<host>` with a host other than `home` or `testapp`.
    #[error("unknown kiosk:// URL: {0}")]
    UnknownKioskUrl(String),

    /// The window backend failed to create the window.
    #[error("window creation failed: {0}")]
    Backend(String),
}

pub use backend::{
    AppCommand, HeadlessBackend, HeadlessWindow, WindowBackend, WindowEvent, WindowHandle,
    WindowOp,
};
pub use geometry::{virtual_desktop, DisplayBounds, Screen, StaticScreen};
pub use launcher::{EventOutcome, WindowLauncher};
pub use menu::{dispatch, template, Menu, MenuAction, MenuEntry, MenuItem};
pub use options::{WebPreferences, WindowOptions};
pub use target::resolve_target_url;
