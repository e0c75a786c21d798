//! Logger options.
//!
//! # Data Flow
//! ```text
//! defaults (Options::new)
//!     → flags.rs (clap arguments) or loader.rs (TOML file)
//!     → validation.rs (level and format checks)
//!     → Logger::new / build.rs (engine construction)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads and validates
//!     → handler (by default global::init) swaps the logger
//! ```
//!
//! # Design Decisions
//! - Every field has a default, so partial files and flag sets are valid
//! - Serialized keys are kebab-case and shared by JSON, TOML and flag names

pub mod build;
pub mod flags;
pub mod loader;
pub mod validation;
pub mod watcher;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use loader::{from_toml_str, load_options};
pub use watcher::OptionsWatcher;

use crate::engine::encoder::CONSOLE_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    pub output_paths: Vec<String>,
    pub error_output_paths: Vec<String>,
    pub level: String,
    pub format: String,
    pub disable_caller: bool,
    pub disable_stacktrace: bool,
    /// Colored console levels, written even when the sink is not a terminal.
    pub enable_color: bool,
    #[serde(rename = "enable-full-caller")]
    pub encode_full_caller: bool,
    pub development: bool,
    pub name: String,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output_paths: vec!["stdout".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            level: "info".to_string(),
            format: CONSOLE_FORMAT.to_string(),
            disable_caller: false,
            disable_stacktrace: false,
            enable_color: true,
            encode_full_caller: false,
            development: false,
            name: String::new(),
        }
    }
}

impl fmt::Display for Options {
    /// Compact JSON; empty if serialization fails.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serde_json::to_string(self).unwrap_or_default())
    }
}
