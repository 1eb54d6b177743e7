//! Application menu.
//!
//! The menu is declarative data; handler logic lives in [`dispatch`],
//! keyed by a stable [`MenuAction`]. Edit actions are native runtime roles
//! and are not handled locally.

use crate::window::backend::WindowHandle;

/// Stable identifier for a menu entry's behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Reload,
    ToggleFullScreen,
    ToggleDevTools,
    Minimize,
    GoBack,
    Close,
    Quit,
}

/// One clickable menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub accelerator: Option<&'static str>,
    pub action: MenuAction,
}

/// Entry within a submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

/// A top-level menu. Items may be empty for plain entries such as Quit,
/// which appear directly in the menu bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub label: &'static str,
    pub entries: Vec<MenuEntry>,
}

fn item(label: &'static str, accelerator: Option<&'static str>, action: MenuAction) -> MenuEntry {
    MenuEntry::Item(MenuItem {
        label,
        accelerator,
        action,
    })
}

const FULLSCREEN_ACCELERATOR: &str = if cfg!(target_os = "macos") {
    "Ctrl+Command+F"
} else {
    "F11"
};

const DEVTOOLS_ACCELERATOR: &str = if cfg!(target_os = "macos") {
    "Alt+Command+I"
} else {
    "Ctrl+Shift+I"
};

/// The full menu template shown when `--menu` is active.
pub fn template() -> Vec<Menu> {
    vec![
        Menu {
            label: "Edit",
            entries: vec![
                item("Undo", Some("CmdOrCtrl+Z"), MenuAction::Undo),
                item("Redo", Some("Shift+CmdOrCtrl+Z"), MenuAction::Redo),
                MenuEntry::Separator,
                item("Cut", Some("CmdOrCtrl+X"), MenuAction::Cut),
                item("Copy", Some("CmdOrCtrl+C"), MenuAction::Copy),
                item("Paste", Some("CmdOrCtrl+V"), MenuAction::Paste),
                item("Select All", Some("CmdOrCtrl+A"), MenuAction::SelectAll),
            ],
        },
        Menu {
            label: "View",
            entries: vec![
                item("Reload", Some("CmdOrCtrl+R"), MenuAction::Reload),
                item(
                    "Toggle Full Screen",
                    Some(FULLSCREEN_ACCELERATOR),
                    MenuAction::ToggleFullScreen,
                ),
                item(
                    "Toggle Developer Tools",
                    Some(DEVTOOLS_ACCELERATOR),
                    MenuAction::ToggleDevTools,
                ),
            ],
        },
        Menu {
            label: "Window",
            entries: vec![
                item("Minimize", Some("CmdOrCtrl+M"), MenuAction::Minimize),
                item("GoBack", None, MenuAction::GoBack),
            ],
        },
        Menu {
            label: "Close",
            entries: vec![item("Close", Some("CmdOrCtrl+W"), MenuAction::Close)],
        },
        Menu {
            label: "Quit",
            entries: vec![item("Quit", Some("CmdOrCtrl+Q"), MenuAction::Quit)],
        },
    ]
}

/// Executes a menu action against the focused window. Returns `false` for
/// the edit roles, which the embedded runtime performs natively.
pub fn dispatch(action: MenuAction, window: &dyn WindowHandle) -> bool {
    match action {
        MenuAction::Undo
        | MenuAction::Redo
        | MenuAction::Cut
        | MenuAction::Copy
        | MenuAction::Paste
        | MenuAction::SelectAll => false,
        MenuAction::Reload => {
            window.reload();
            true
        }
        MenuAction::ToggleFullScreen => {
            window.set_fullscreen(!window.is_fullscreen());
            true
        }
        MenuAction::ToggleDevTools => {
            window.toggle_dev_tools();
            true
        }
        MenuAction::Minimize => {
            window.minimize();
            true
        }
        MenuAction::GoBack => {
            if window.can_go_back() {
                window.go_back();
            }
            true
        }
        MenuAction::Close | MenuAction::Quit => {
            window.close();
            true
        }
    }
}
