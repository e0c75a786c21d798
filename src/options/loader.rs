//! Options loading from TOML.

use std::fs;
use std::path::Path;

use crate::error::LogError;
use crate::options::Options;

/// Parses and validates options from a TOML document. Missing keys keep their defaults.
pub fn from_toml_str(s: &str) -> Result<Options, LogError> {
    let opts: Options = toml::from_str(s)?;
    opts.validate()?;
    Ok(opts)
}

/// Loads and validates options from a TOML file.
pub fn load_options(path: &Path) -> Result<Options, LogError> {
    let content = fs::read_to_string(path)?;
    from_toml_str(&content)
}
