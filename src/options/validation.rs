//! Options validation.
//!
//! # Design Decisions
//! - Returns every problem, not just the first
//! - Pure check; never mutates or normalizes the options

use crate::engine::{Format, Level};
use crate::error::ValidationErrors;
use crate::options::Options;

impl Options {
    /// Checks that the level parses and the format is recognized.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = Vec::new();

        if let Err(e) = self.level.parse::<Level>() {
            errs.push(e);
        }
        if let Err(e) = self.format.parse::<Format>() {
            errs.push(e);
        }

        match ValidationErrors::from_errors(errs) {
            Some(errs) => Err(errs),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Options::default().validate().is_ok());
    }

    #[test]
    fn test_case_insensitive() {
        let opts = Options {
            level: "WARN".into(),
            format: "JSON".into(),
            ..Options::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_invalid_level() {
        let opts = Options {
            level: "invalid".into(),
            ..Options::default()
        };
        let errs = opts.validate().unwrap_err();
        assert_eq!(
            errs.errors(),
            &[ValidationError::UnrecognizedLevel("invalid".into())]
        );
        assert_eq!(errs.to_string(), "unrecognized level: \"invalid\"");
    }

    #[test]
    fn test_collects_all_errors() {
        let opts = Options {
            level: "loud".into(),
            format: "xml".into(),
            ..Options::default()
        };
        let errs = opts.validate().unwrap_err();
        assert_eq!(errs.errors().len(), 2);
        assert_eq!(
            errs.to_string(),
            "[unrecognized level: \"loud\", not a valid log format: \"xml\"]"
        );
    }
}
