//! Command-line flags for `Options`.
//!
//! # Responsibilities
//! - Register one `log.*` argument per option, defaulting to the current value
//! - Copy back only the values the user actually supplied
//! - `clap::Args` / `clap::FromArgMatches` so `Options` can be flattened into a derive parser
//!
//! # Design Decisions
//! - Boolean flags accept both `--flag` and `--flag=<bool>`
//! - Path lists are comma separated and may be repeated

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::options::Options;

pub const FLAG_LEVEL: &str = "log.level";
pub const FLAG_DISABLE_CALLER: &str = "log.disable-caller";
pub const FLAG_DISABLE_STACKTRACE: &str = "log.disable-stacktrace";
pub const FLAG_FORMAT: &str = "log.format";
pub const FLAG_ENABLE_COLOR: &str = "log.enable-color";
pub const FLAG_ENCODE_FULL_CALLER: &str = "log.enable-full-caller";
pub const FLAG_OUTPUT_PATHS: &str = "log.output-paths";
pub const FLAG_ERROR_OUTPUT_PATHS: &str = "log.error-output-paths";
pub const FLAG_DEVELOPMENT: &str = "log.development";
pub const FLAG_NAME: &str = "log.name";

fn string_flag(name: &'static str, current: &str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("STRING")
        .action(ArgAction::Set)
        .default_value(current.to_string())
        .help(help)
}

fn bool_flag(name: &'static str, current: bool, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("BOOL")
        .num_args(0..=1)
        .require_equals(true)
        .default_value(if current { "true" } else { "false" })
        .default_missing_value("true")
        .value_parser(value_parser!(bool))
        .action(ArgAction::Set)
        .help(help)
}

fn paths_flag(name: &'static str, current: &[String], help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("PATHS")
        .value_delimiter(',')
        .action(ArgAction::Append)
        .default_values(current.to_vec())
        .help(help)
}

impl Options {
    /// Registers every `log.*` flag on `cmd`, using the current values as defaults.
    pub fn add_flags(&self, cmd: Command) -> Command {
        cmd.arg(string_flag(
            FLAG_LEVEL,
            &self.level,
            "Minimum log level: debug, info, warn, error, dpanic, panic or fatal.",
        ))
        .arg(bool_flag(
            FLAG_DISABLE_CALLER,
            self.disable_caller,
            "Omit the file and line of the logging call from each entry.",
        ))
        .arg(bool_flag(
            FLAG_DISABLE_STACKTRACE,
            self.disable_stacktrace,
            "Never attach stacktraces, even at panic level and above.",
        ))
        .arg(string_flag(
            FLAG_FORMAT,
            &self.format,
            "Output format: console (plain text) or json.",
        ))
        .arg(bool_flag(
            FLAG_ENABLE_COLOR,
            self.enable_color,
            "Color level names in console output.",
        ))
        .arg(bool_flag(
            FLAG_ENCODE_FULL_CALLER,
            self.encode_full_caller,
            "Report the full source path of the caller instead of the last two segments.",
        ))
        .arg(paths_flag(
            FLAG_OUTPUT_PATHS,
            &self.output_paths,
            "Comma separated outputs: stdout, stderr or file paths.",
        ))
        .arg(paths_flag(
            FLAG_ERROR_OUTPUT_PATHS,
            &self.error_output_paths,
            "Comma separated outputs for the logger's own errors.",
        ))
        .arg(bool_flag(
            FLAG_DEVELOPMENT,
            self.development,
            "Development mode: stacktraces from warn level up.",
        ))
        .arg(string_flag(FLAG_NAME, &self.name, "Logger name."))
    }

    /// Copies every user-supplied flag value from `matches` into `self`.
    pub fn apply_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        if let Some(v) = supplied_one::<String>(matches, FLAG_LEVEL)? {
            self.level = v;
        }
        if let Some(v) = supplied_one::<bool>(matches, FLAG_DISABLE_CALLER)? {
            self.disable_caller = v;
        }
        if let Some(v) = supplied_one::<bool>(matches, FLAG_DISABLE_STACKTRACE)? {
            self.disable_stacktrace = v;
        }
        if let Some(v) = supplied_one::<String>(matches, FLAG_FORMAT)? {
            self.format = v;
        }
        if let Some(v) = supplied_one::<bool>(matches, FLAG_ENABLE_COLOR)? {
            self.enable_color = v;
        }
        if let Some(v) = supplied_one::<bool>(matches, FLAG_ENCODE_FULL_CALLER)? {
            self.encode_full_caller = v;
        }
        if let Some(v) = supplied_many(matches, FLAG_OUTPUT_PATHS)? {
            self.output_paths = v;
        }
        if let Some(v) = supplied_many(matches, FLAG_ERROR_OUTPUT_PATHS)? {
            self.error_output_paths = v;
        }
        if let Some(v) = supplied_one::<bool>(matches, FLAG_DEVELOPMENT)? {
            self.development = v;
        }
        if let Some(v) = supplied_one::<String>(matches, FLAG_NAME)? {
            self.name = v;
        }
        Ok(())
    }
}

fn user_supplied(matches: &ArgMatches, id: &str) -> bool {
    !matches!(
        matches.value_source(id),
        None | Some(ValueSource::DefaultValue)
    )
}

fn supplied_one<T>(matches: &ArgMatches, id: &str) -> Result<Option<T>, clap::Error>
where
    T: Clone + Send + Sync + 'static,
{
    if !user_supplied(matches, id) {
        return Ok(None);
    }
    matches
        .try_get_one::<T>(id)
        .map(|v| v.cloned())
        .map_err(|e| clap::Error::raw(ErrorKind::InvalidValue, e))
}

fn supplied_many(matches: &ArgMatches, id: &str) -> Result<Option<Vec<String>>, clap::Error> {
    if !user_supplied(matches, id) {
        return Ok(None);
    }
    matches
        .try_get_many::<String>(id)
        .map(|v| v.map(|vals| vals.cloned().collect()))
        .map_err(|e| clap::Error::raw(ErrorKind::InvalidValue, e))
}

impl clap::FromArgMatches for Options {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut opts = Options::default();
        opts.apply_matches(matches)?;
        Ok(opts)
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        self.apply_matches(matches)
    }
}

impl clap::Args for Options {
    fn augment_args(cmd: Command) -> Command {
        Options::default().add_flags(cmd)
    }

    fn augment_args_for_update(cmd: Command) -> Command {
        Options::default().add_flags(cmd)
    }
}
