//! Window and browser-preference options.
//!
//! Both structs are derived 1:1 from the resolved configuration; nothing in
//! here consults the settings store or the command line directly.

use std::path::PathBuf;

use crate::config::ResolvedConfig;
use crate::window::geometry::DisplayBounds;

/// Per-page browser preferences handed to the embedded runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct WebPreferences {
    pub javascript: bool,
    pub images: bool,
    pub webaudio: bool,
    pub plugins: bool,
    pub webgl: bool,
    /// Kiosk pages are trusted content; the web-security sandbox is opted
    /// out so local pages can mix origins freely.
    pub web_security: bool,
    pub experimental_features: bool,
    pub allow_running_insecure_content: bool,
    pub zoom_factor: f64,
    pub node_integration: bool,
    /// Absolute path of an optional preload script.
    pub preload: Option<PathBuf>,
}

impl WebPreferences {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            javascript: true,
            images: true,
            webaudio: true,
            plugins: true,
            webgl: true,
            web_security: false,
            experimental_features: true,
            allow_running_insecure_content: true,
            zoom_factor: config.zoom,
            node_integration: config.integration,
            preload: config.preload.as_ref().map(|path| {
                std::path::absolute(path).unwrap_or_else(|_| path.clone())
            }),
        }
    }
}

/// Native options for the single top-level window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    /// Windows start hidden and are shown on `ready-to-show`.
    pub show: bool,
    pub bounds: DisplayBounds,
    pub frame: bool,
    pub fullscreenable: bool,
    pub fullscreen: bool,
    pub kiosk: bool,
    pub resizable: bool,
    pub transparent: bool,
    pub always_on_top: bool,
    pub accept_first_mouse: bool,
    pub web_preferences: WebPreferences,
}

impl WindowOptions {
    /// Derives window options from the resolved configuration and the
    /// virtual desktop rectangle.
    pub fn from_config(config: &ResolvedConfig, bounds: DisplayBounds) -> Self {
        Self {
            show: false,
            bounds,
            frame: !config.transparent,
            fullscreenable: true,
            fullscreen: config.fullscreen,
            kiosk: config.kiosk,
            resizable: !config.transparent,
            transparent: config.transparent,
            always_on_top: config.always_on_top,
            accept_first_mouse: true,
            web_preferences: WebPreferences::from_config(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliArgs, SettingsStore};
    use serde_json::json;

    fn config_with(args: CliArgs) -> ResolvedConfig {
        let store = SettingsStore::in_memory(json!({}));
        ResolvedConfig::resolve(&args, &store).unwrap()
    }

    #[test]
    fn transparent_window_is_frameless_and_fixed() {
        let config = config_with(CliArgs {
            transparent: Some(true),
            ..Default::default()
        });
        let options = WindowOptions::from_config(&config, DisplayBounds::new(0, 0, 800, 600));

        assert!(!options.frame);
        assert!(!options.resizable);
        assert!(options.transparent);
    }

    #[test]
    fn opaque_window_keeps_frame() {
        let config = config_with(CliArgs::default());
        let options = WindowOptions::from_config(&config, DisplayBounds::new(0, 0, 800, 600));

        assert!(options.frame);
        assert!(options.resizable);
        assert!(!options.show);
        assert!(options.accept_first_mouse);
    }

    #[test]
    fn flags_map_one_to_one() {
        let config = config_with(CliArgs {
            kiosk: Some(true),
            always_on_top: Some(true),
            fullscreen: Some(false),
            zoom: Some(1.5),
            integration: Some(false),
            ..Default::default()
        });
        let bounds = DisplayBounds::new(0, 0, 3840, 2160);
        let options = WindowOptions::from_config(&config, bounds);

        assert!(options.kiosk);
        assert!(options.always_on_top);
        assert!(!options.fullscreen);
        assert_eq!(options.bounds, bounds);
        assert_eq!(options.web_preferences.zoom_factor, 1.5);
        assert!(!options.web_preferences.node_integration);
        assert!(!options.web_preferences.web_security);
    }

    #[test]
    fn preload_path_is_absolute() {
        let config = config_with(CliArgs {
            preload: Some(PathBuf::from("scripts/preload.js")),
            ..Default::default()
        });
        let prefs = WebPreferences::from_config(&config);
        assert!(prefs.preload.unwrap().is_absolute());
    }
}
