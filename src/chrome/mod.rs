//! Chromium command-line translation.
//!
//! The embedded runtime freezes its command line at startup, so the switch
//! and argument lists are applied exactly once, before the first window
//! exists. Validation happens in the option resolver; this stage is a
//! straight, order-preserving translation onto the runtime's native
//! command-line API, reached through the [`CommandLine`] seam.

use serde::{Deserialize, Serialize};

use crate::resources;

/// A single Chromium startup switch: `--key` or `--key=value`.
///
/// Invariant: `key` is non-empty and carries no leading `--`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeSwitch {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ChromeSwitch {
    /// A bare boolean switch.
    pub fn bare(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// A key/value switch.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

impl std::fmt::Display for ChromeSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(ref value) => write!(f, "--{}={}", self.key, value),
            None => write!(f, "--{}", self.key),
        }
    }
}

/// The bundled default switch and argument lists
/// (`resources/default_command_line.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultCommandLine {
    #[serde(default)]
    pub switches: Vec<ChromeSwitch>,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Seam to the embedded runtime's native command-line API.
pub trait CommandLine {
    /// Appends a bare or key/value switch.
    fn append_switch(&mut self, key: &str, value: Option<&str>);

    /// Appends a bare positional argument.
    fn append_argument(&mut self, argument: &str);
}

/// [`CommandLine`] implementation that records every call in order. Backs
/// the headless runtime and the test suite.
#[derive(Debug, Default)]
pub struct RecordingCommandLine {
    switches: Vec<ChromeSwitch>,
    arguments: Vec<String>,
}

impl RecordingCommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches appended so far, in application order.
    pub fn switches(&self) -> &[ChromeSwitch] {
        &self.switches
    }

    /// Positional arguments appended so far, in application order.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

impl CommandLine for RecordingCommandLine {
    fn append_switch(&mut self, key: &str, value: Option<&str>) {
        self.switches.push(ChromeSwitch {
            key: key.to_string(),
            value: value.map(str::to_string),
        });
    }

    fn append_argument(&mut self, argument: &str) {
        self.arguments.push(argument.to_string());
    }
}

/// Applies the resolved switch and argument lists to the runtime command
/// line. With `ignore_defaults` the bundled default lists are skipped and
/// only the caller-supplied entries are applied; otherwise defaults come
/// first, then the appended entries, in array order.
pub fn apply_command_line(
    ignore_defaults: bool,
    switches: &[ChromeSwitch],
    arguments: &[String],
    command_line: &mut dyn CommandLine,
) {
    let defaults = resources::default_command_line();

    if !ignore_defaults {
        for switch in &defaults.switches {
            command_line.append_switch(&switch.key, switch.value.as_deref());
        }
    }
    for switch in switches {
        command_line.append_switch(&switch.key, switch.value.as_deref());
    }

    if !ignore_defaults {
        for argument in &defaults.arguments {
            command_line.append_argument(argument);
        }
    }
    for argument in arguments {
        command_line.append_argument(argument);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_display() {
        assert_eq!(ChromeSwitch::bare("foo").to_string(), "--foo");
        assert_eq!(
            ChromeSwitch::with_value("foo", "bar").to_string(),
            "--foo=bar"
        );
    }

    #[test]
    fn minimal_cli_applies_only_caller_switches() {
        let mut recorder = RecordingCommandLine::new();
        apply_command_line(
            true,
            &[ChromeSwitch::with_value("x", "1")],
            &[],
            &mut recorder,
        );

        assert_eq!(recorder.switches(), &[ChromeSwitch::with_value("x", "1")]);
        assert!(recorder.arguments().is_empty());
    }

    #[test]
    fn defaults_precede_appended_switches() {
        let mut recorder = RecordingCommandLine::new();
        apply_command_line(
            false,
            &[ChromeSwitch::with_value("x", "1")],
            &["positional".to_string()],
            &mut recorder,
        );

        let defaults = resources::default_command_line();
        let recorded = recorder.switches();
        assert_eq!(recorded.len(), defaults.switches.len() + 1);
        assert_eq!(&recorded[..defaults.switches.len()], &defaults.switches[..]);
        assert_eq!(
            recorded.last().unwrap(),
            &ChromeSwitch::with_value("x", "1")
        );
        assert_eq!(
            recorder.arguments().last().map(String::as_str),
            Some("positional")
        );
    }

    #[test]
    fn order_is_preserved() {
        let switches = vec![
            ChromeSwitch::bare("a"),
            ChromeSwitch::with_value("b", "2"),
            ChromeSwitch::bare("c"),
        ];
        let mut recorder = RecordingCommandLine::new();
        apply_command_line(true, &switches, &[], &mut recorder);
        assert_eq!(recorder.switches(), &switches[..]);
    }
}
