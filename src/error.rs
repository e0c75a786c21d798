//! Error types.
//!
//! # Design Decisions
//! - Configuration problems surface as values, never panics
//! - Validation collects every problem; an empty collection is `Ok(())`

use std::fmt;
use std::io;

use thiserror::Error;

/// A single configuration problem found by `Options::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unrecognized level: {0:?}")]
    UnrecognizedLevel(String),

    #[error("not a valid log format: {0:?}")]
    InvalidFormat(String),
}

/// Every problem found in one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Aggregates `errors`, flattening the empty case to `None`.
    pub fn from_errors(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.0.as_slice() {
            return write!(f, "{}", only);
        }
        write!(f, "[")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        write!(f, "]")
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors returned while building, installing or loading a logger.
#[derive(Debug, Error)]
pub enum LogError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("no encoder registered for format {0:?}")]
    UnknownFormat(String),

    #[error("couldn't open sink {path:?}: {source}")]
    OpenSink {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read options file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse options file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to install global subscriber: {0}")]
    Install(String),

    #[error("options watcher error: {0}")]
    Watch(#[from] notify::Error),
}
