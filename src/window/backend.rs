//! Runtime seam for window creation and control.
//!
//! [`WindowBackend`] creates the single top-level window; [`WindowHandle`]
//! is the narrow control surface the launcher drives. The headless
//! implementation records every operation and lets callers inject lifecycle
//! events, so the full launcher state machine runs in tests and on machines
//! without a display runtime.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::window::geometry::{Screen, StaticScreen};
use crate::window::menu::Menu;
use crate::window::options::WindowOptions;
use crate::window::LaunchError;

/// App-level commands forwarded from input hardware (e.g. the mouse "back"
/// button).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    BrowserBackward,
}

/// Lifecycle and navigation events emitted by the window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// The first paint is ready; the hidden window may be shown.
    ReadyToShow,
    /// Top-level navigation finished successfully.
    DidFinishLoad,
    /// Top-level navigation failed.
    DidFailLoad {
        error_code: i32,
        description: String,
        url: String,
    },
    /// The page asked for a secondary window.
    NewWindowRequested { url: String },
    /// A download is about to start.
    WillDownload {
        filename: String,
        mime_type: String,
        total_bytes: u64,
    },
    /// Hardware/application command.
    AppCommand(AppCommand),
    /// The last window closed.
    Closed,
}

/// Control surface of the single browser window.
pub trait WindowHandle: Send + Sync {
    fn load_url(&self, url: &str);
    fn show(&self);
    fn focus(&self);
    fn maximize(&self);
    fn minimize(&self);
    fn close(&self);
    fn reload(&self);
    fn go_back(&self);
    fn can_go_back(&self) -> bool;
    fn is_fullscreen(&self) -> bool;
    fn set_fullscreen(&self, fullscreen: bool);
    fn set_zoom_factor(&self, zoom: f64);
    /// `None` removes the application menu entirely.
    fn set_menu(&self, menu: Option<Vec<Menu>>);
    fn set_minimum_size(&self, width: i32, height: i32);
    fn set_content_size(&self, width: i32, height: i32);
    fn execute_script(&self, script: &str);
    fn open_dev_tools(&self);
    fn toggle_dev_tools(&self);
}

/// Creates windows and reports the display arrangement.
#[async_trait]
pub trait WindowBackend: Send + Sync {
    async fn create_window(
        &self,
        options: WindowOptions,
    ) -> Result<Arc<dyn WindowHandle>, LaunchError>;

    fn screen(&self) -> &dyn Screen;
}

/// One recorded [`WindowHandle`] operation.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOp {
    LoadUrl(String),
    Show,
    Focus,
    Maximize,
    Minimize,
    Close,
    Reload,
    GoBack,
    SetFullscreen(bool),
    SetZoomFactor(f64),
    /// Number of top-level menus, or `None` when the menu was removed.
    SetMenu(Option<usize>),
    SetMinimumSize(i32, i32),
    SetContentSize(i32, i32),
    ExecuteScript(String),
    OpenDevTools,
    ToggleDevTools,
}

/// Recording window used by the headless backend and the test suite.
#[derive(Debug)]
pub struct HeadlessWindow {
    options: WindowOptions,
    ops: Mutex<Vec<WindowOp>>,
    fullscreen: Mutex<bool>,
    history_available: Mutex<bool>,
}

impl HeadlessWindow {
    pub fn new(options: WindowOptions) -> Self {
        let fullscreen = options.fullscreen;
        Self {
            options,
            ops: Mutex::new(Vec::new()),
            fullscreen: Mutex::new(fullscreen),
            history_available: Mutex::new(false),
        }
    }

    /// The options the window was created with.
    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// All recorded operations, in call order.
    pub fn ops(&self) -> Vec<WindowOp> {
        self.ops.lock().clone()
    }

    /// Clears the recorded operations.
    pub fn clear_ops(&self) {
        self.ops.lock().clear();
    }

    /// Controls what [`WindowHandle::can_go_back`] reports.
    pub fn set_history_available(&self, available: bool) {
        *self.history_available.lock() = available;
    }

    fn record(&self, op: WindowOp) {
        debug!(?op, "window operation");
        self.ops.lock().push(op);
    }
}

impl WindowHandle for HeadlessWindow {
    fn load_url(&self, url: &str) {
        self.record(WindowOp::LoadUrl(url.to_string()));
    }

    fn show(&self) {
        self.record(WindowOp::Show);
    }

    fn focus(&self) {
        self.record(WindowOp::Focus);
    }

    fn maximize(&self) {
        self.record(WindowOp::Maximize);
    }

    fn minimize(&self) {
        self.record(WindowOp::Minimize);
    }

    fn close(&self) {
        self.record(WindowOp::Close);
    }

    fn reload(&self) {
        self.record(WindowOp::Reload);
    }

    fn go_back(&self) {
        self.record(WindowOp::GoBack);
    }

    fn can_go_back(&self) -> bool {
        *self.history_available.lock()
    }

    fn is_fullscreen(&self) -> bool {
        *self.fullscreen.lock()
    }

    fn set_fullscreen(&self, fullscreen: bool) {
        *self.fullscreen.lock() = fullscreen;
        self.record(WindowOp::SetFullscreen(fullscreen));
    }

    fn set_zoom_factor(&self, zoom: f64) {
        self.record(WindowOp::SetZoomFactor(zoom));
    }

    fn set_menu(&self, menu: Option<Vec<Menu>>) {
        self.record(WindowOp::SetMenu(menu.map(|m| m.len())));
    }

    fn set_minimum_size(&self, width: i32, height: i32) {
        self.record(WindowOp::SetMinimumSize(width, height));
    }

    fn set_content_size(&self, width: i32, height: i32) {
        self.record(WindowOp::SetContentSize(width, height));
    }

    fn execute_script(&self, script: &str) {
        self.record(WindowOp::ExecuteScript(script.to_string()));
    }

    fn open_dev_tools(&self) {
        self.record(WindowOp::OpenDevTools);
    }

    fn toggle_dev_tools(&self) {
        self.record(WindowOp::ToggleDevTools);
    }
}

/// Headless backend: records window operations and lets the caller inject
/// window events through a channel.
pub struct HeadlessBackend {
    screen: StaticScreen,
    events_tx: mpsc::UnboundedSender<WindowEvent>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<WindowEvent>>>,
    window: Mutex<Option<Arc<HeadlessWindow>>>,
}

impl HeadlessBackend {
    pub fn new(screen: StaticScreen) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            screen,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            window: Mutex::new(None),
        }
    }

    /// Takes the event receiver. May be called once.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<WindowEvent>> {
        self.events_rx.lock().take()
    }

    /// Injects a window event, as the native runtime would.
    pub fn inject_event(&self, event: WindowEvent) {
        let _ = self.events_tx.send(event);
    }

    /// The created window, once `create_window` ran.
    pub fn window(&self) -> Option<Arc<HeadlessWindow>> {
        self.window.lock().clone()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(StaticScreen::single(1920, 1080))
    }
}

#[async_trait]
impl WindowBackend for HeadlessBackend {
    async fn create_window(
        &self,
        options: WindowOptions,
    ) -> Result<Arc<dyn WindowHandle>, LaunchError> {
        let window = Arc::new(HeadlessWindow::new(options));
        *self.window.lock() = Some(Arc::clone(&window));
        Ok(window)
    }

    fn screen(&self) -> &dyn Screen {
        &self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliArgs, ResolvedConfig, SettingsStore};
    use crate::window::geometry::DisplayBounds;
    use serde_json::json;

    fn options() -> WindowOptions {
        let store = SettingsStore::in_memory(json!({}));
        let config = ResolvedConfig::resolve(&CliArgs::default(), &store).unwrap();
        WindowOptions::from_config(&config, DisplayBounds::new(0, 0, 800, 600))
    }

    #[tokio::test]
    async fn backend_creates_and_exposes_window() {
        let backend = HeadlessBackend::default();
        assert!(backend.window().is_none());

        let handle = backend.create_window(options()).await.unwrap();
        handle.load_url("https://example.com");

        let window = backend.window().unwrap();
        assert_eq!(
            window.ops(),
            vec![WindowOp::LoadUrl("https://example.com".to_string())]
        );
    }

    #[tokio::test]
    async fn events_round_trip_through_the_channel() {
        let backend = HeadlessBackend::default();
        let mut events = backend.take_events().unwrap();

        backend.inject_event(WindowEvent::ReadyToShow);
        backend.inject_event(WindowEvent::Closed);

        assert_eq!(events.recv().await, Some(WindowEvent::ReadyToShow));
        assert_eq!(events.recv().await, Some(WindowEvent::Closed));
        assert!(backend.take_events().is_none());
    }

    #[test]
    fn fullscreen_state_tracks_set_calls() {
        let window = HeadlessWindow::new(options());
        assert!(window.is_fullscreen()); // fullscreen defaults on

        window.set_fullscreen(false);
        assert!(!window.is_fullscreen());
    }
}
