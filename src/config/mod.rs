//! Configuration management.
//!
//! Three layers feed the resolved runtime configuration, in increasing
//! precedence: the bundled defaults document, the persisted settings store,
//! and the command line. The resolver merges them once at startup into an
//! immutable [`ResolvedConfig`].
//!
//! # Submodules
//!
//! - [`store`] - Persistent key-value settings store with two-tier lookup
//! - [`keymap`] - Mapping between settings keys and CLI flag names
//! - [`resolver`] - CLI merge, validation, and derived switches

pub mod keymap;
pub mod resolver;
pub mod store;

pub use keymap::{convert_settings, flag_for, store_key_for};
pub use resolver::{parse_port, CliArgs, ConfigError, ResolvedConfig};
pub use store::{get_with_default, SettingsStore};
