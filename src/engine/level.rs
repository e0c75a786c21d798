//! Severity levels.
//!
//! Levels are signed: `Debug=-1 < Info=0 < ... < Fatal=5`. Verbosity levels
//! extend below `Debug`, so `V(n)` maps to `Info - n`.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::Arc;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i8);

impl Level {
    pub const DEBUG: Level = Level(-1);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(1);
    pub const ERROR: Level = Level(2);
    /// Developer-facing problems inside the logging call itself.
    pub const DPANIC: Level = Level(3);
    pub const PANIC: Level = Level(4);
    pub const FATAL: Level = Level(5);

    pub const fn from_i8(v: i8) -> Self {
        Level(v)
    }

    pub const fn as_i8(self) -> i8 {
        self.0
    }

    /// Engine severity for verbosity `v`. Negative verbosity is treated as 0.
    pub fn verbosity(v: i32) -> Self {
        let sev = Self::INFO.0 as i32 - v.max(0);
        Level(sev.max(i8::MIN as i32) as i8)
    }

    fn name(self) -> Option<&'static str> {
        match self.0 {
            -1 => Some("debug"),
            0 => Some("info"),
            1 => Some("warn"),
            2 => Some("error"),
            3 => Some("dpanic"),
            4 => Some("panic"),
            5 => Some("fatal"),
            _ => None,
        }
    }

    /// Upper-case name, e.g. `INFO`, or `LEVEL(-2)` for verbosity levels.
    pub fn capital_string(self) -> String {
        match self.name() {
            Some(n) => n.to_ascii_uppercase(),
            None => format!("LEVEL({})", self.0),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(n) => f.write_str(n),
            None => write!(f, "Level({})", self.0),
        }
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::DEBUG),
            "info" | "" => Ok(Self::INFO),
            "warn" => Ok(Self::WARN),
            "error" => Ok(Self::ERROR),
            "dpanic" => Ok(Self::DPANIC),
            "panic" => Ok(Self::PANIC),
            "fatal" => Ok(Self::FATAL),
            _ => Err(ValidationError::UnrecognizedLevel(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level(-2),
            tracing::Level::DEBUG => Self::DEBUG,
            tracing::Level::INFO => Self::INFO,
            tracing::Level::WARN => Self::WARN,
            tracing::Level::ERROR => Self::ERROR,
        }
    }
}

/// Minimum enabled level that can be changed while loggers are in use.
///
/// Clones share the same underlying value.
#[derive(Debug, Clone)]
pub struct AtomicLevel(Arc<AtomicI8>);

impl AtomicLevel {
    pub fn new(level: Level) -> Self {
        Self(Arc::new(AtomicI8::new(level.0)))
    }

    pub fn level(&self) -> Level {
        Level(self.0.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.0.store(level.0, Ordering::Relaxed);
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::DEBUG);
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::INFO);
        assert_eq!("".parse::<Level>().unwrap(), Level::INFO);
        assert_eq!("Fatal".parse::<Level>().unwrap(), Level::FATAL);
        assert_eq!(
            "invalid".parse::<Level>().unwrap_err(),
            ValidationError::UnrecognizedLevel("invalid".into())
        );
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(Level::verbosity(0), Level::INFO);
        assert_eq!(Level::verbosity(1), Level::DEBUG);
        assert_eq!(Level::verbosity(3), Level::from_i8(-3));
        assert_eq!(Level::verbosity(-4), Level::INFO);
        assert_eq!(Level::verbosity(i32::MAX), Level::from_i8(i8::MIN));
    }

    #[test]
    fn test_names() {
        assert_eq!(Level::WARN.capital_string(), "WARN");
        assert_eq!(Level::from_i8(-2).capital_string(), "LEVEL(-2)");
        assert_eq!(Level::DPANIC.to_string(), "dpanic");
    }

    #[test]
    fn test_atomic_level_shared() {
        let level = AtomicLevel::new(Level::INFO);
        let view = level.clone();
        assert!(!view.enabled(Level::DEBUG));
        level.set_level(Level::DEBUG);
        assert!(view.enabled(Level::DEBUG));
    }
}
