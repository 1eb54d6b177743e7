//! Window creation and lifecycle state machine.
//!
//! The launcher creates the one top-level window hidden, wires the kiosk
//! policies (no secondary windows, no downloads, back navigation only
//! outside kiosk mode), and reacts to load failures with a user-visible
//! overlay plus an optional scheduled reload.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::ResolvedConfig;
use crate::window::backend::{AppCommand, WindowBackend, WindowEvent, WindowHandle};
use crate::window::geometry::virtual_desktop;
use crate::window::menu;
use crate::window::options::WindowOptions;
use crate::window::LaunchError;

/// Load failure codes treated as benign: `-3` (aborted) and `0` (no error).
const BENIGN_LOAD_ERRORS: [i32; 2] = [-3, 0];

/// What the event loop should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Keep running.
    Continue,
    /// The event described a request that kiosk policy denies.
    Denied,
    /// The last window closed; the process should exit normally.
    Exit,
}

/// Owns the single browser window and drives its lifecycle.
pub struct WindowLauncher {
    config: Arc<ResolvedConfig>,
    window: Arc<dyn WindowHandle>,
}

impl WindowLauncher {
    /// Creates the window (hidden) and starts loading `target_url`.
    ///
    /// The target URL must already be resolved; unknown `kiosk://` hosts
    /// are rejected before any window exists.
    pub async fn launch(
        backend: &dyn WindowBackend,
        config: Arc<ResolvedConfig>,
        target_url: &str,
    ) -> Result<Self, LaunchError> {
        let bounds = virtual_desktop(&backend.screen().displays());
        info!(
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "virtual desktop"
        );

        let options = WindowOptions::from_config(&config, bounds);
        let window = backend.create_window(options).await?;

        if !config.menu || config.kiosk {
            window.set_menu(None);
        } else {
            window.set_menu(Some(menu::template()));
        }

        if config.fullscreen {
            window.set_minimum_size(bounds.width, bounds.height);
            window.set_content_size(bounds.width, bounds.height);
        }
        window.set_fullscreen(config.fullscreen);

        if config.dev {
            window.open_dev_tools();
        }

        info!(url = target_url, "loading");
        window.load_url(target_url);

        Ok(Self { config, window })
    }

    /// The launched window.
    pub fn window(&self) -> Arc<dyn WindowHandle> {
        Arc::clone(&self.window)
    }

    /// Advances the lifecycle state machine by one window event.
    pub fn handle_event(&self, event: WindowEvent) -> EventOutcome {
        match event {
            WindowEvent::ReadyToShow => {
                if self.config.fullscreen {
                    self.window.maximize();
                }
                self.window.show();
                self.window.focus();
                EventOutcome::Continue
            }
            WindowEvent::DidFinishLoad => {
                // Some navigations reset zoom and fullscreen; re-assert both.
                self.window.set_zoom_factor(self.config.zoom);
                self.window.set_fullscreen(self.config.fullscreen);
                EventOutcome::Continue
            }
            WindowEvent::DidFailLoad {
                error_code,
                description,
                url,
            } => {
                if BENIGN_LOAD_ERRORS.contains(&error_code) {
                    return EventOutcome::Continue;
                }
                self.show_load_failure(error_code, &description, &url);
                EventOutcome::Continue
            }
            WindowEvent::NewWindowRequested { url } => {
                warn!(url, "secondary window denied");
                EventOutcome::Denied
            }
            WindowEvent::WillDownload {
                filename,
                mime_type,
                total_bytes,
            } => {
                info!(filename, mime_type, total_bytes, "download cancelled");
                EventOutcome::Denied
            }
            WindowEvent::AppCommand(AppCommand::BrowserBackward) => {
                if !self.config.kiosk && self.window.can_go_back() {
                    self.window.go_back();
                }
                EventOutcome::Continue
            }
            WindowEvent::Closed => EventOutcome::Exit,
        }
    }

    /// Injects the failure overlay and, when a retry interval is set,
    /// schedules one reload. Each failure schedules its own reload; a
    /// successful load in between simply resets the page the timer acts on.
    fn show_load_failure(&self, error_code: i32, description: &str, url: &str) {
        warn!(error_code, description, url, "page load failed");

        let mut overlay = format!(
            r#"<div style="position:absolute;top:0px;left:0px;width: 100%;color: white;background-color: black;">Error {error_code}: {description}<br />URL: {url}<br />"#
        );
        if self.config.retry_secs > 0 {
            overlay.push_str(&format!("Reloading in {}s", self.config.retry_secs));
        }
        overlay.push_str("</div>");

        let escaped = serde_json::Value::String(overlay).to_string();
        self.window
            .execute_script(&format!("document.body.innerHTML += {escaped};"));

        if self.config.retry_secs > 0 {
            let window = self.window();
            let delay = Duration::from_secs(self.config.retry_secs);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                window.reload();
            });
        }
    }
}
