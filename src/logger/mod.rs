//! Logger facade.
//!
//! # Responsibilities
//! - Leveled API in three arities: structured, formatted and loose key-value
//! - Verbosity emitters (`v`), derivation (`with_name`, `with_values`, `l`)
//! - `io::Write` adapters and flushing
//!
//! # Design Decisions
//! - A `Logger` is an immutable handle; every derivation returns a new one
//! - Formatting happens only after the level check passes
//! - `panic*` unwind and `fatal*` exit after the entry is written

pub mod fields;
pub mod info;

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::panic::Location;
use std::process;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriter;

use crate::context::Context;
use crate::engine::{Engine, Format, Level, Sink};
use crate::error::LogError;
use crate::field::{Arg, Field};
use crate::options::Options;

pub use fields::{parse_fields, Malformed, ParsedFields};
pub use info::{InfoLog, InfoLogger, NoopInfoLogger};

use fields::handle_fields;

macro_rules! leveled {
    ($($level:expr => $plain:ident, $f:ident, $w:ident;)*) => {
        $(
            #[track_caller]
            pub fn $plain(&self, msg: &str, fields: &[Field]) {
                self.log(Location::caller(), $level, msg, fields);
            }

            #[track_caller]
            pub fn $f(&self, args: fmt::Arguments<'_>) {
                self.logf(Location::caller(), $level, args);
            }

            #[track_caller]
            pub fn $w(&self, msg: &str, kvs: &[Arg]) {
                self.logw(Location::caller(), $level, msg, kvs);
            }
        )*
    };
}

#[derive(Debug, Clone)]
pub struct Logger {
    engine: Engine,
    info: InfoLogger,
}

impl Logger {
    /// Builds a logger from `opts`, or from defaults when `None`.
    pub fn new(opts: Option<&Options>) -> Result<Self, LogError> {
        let defaults;
        let opts = match opts {
            Some(opts) => opts,
            None => {
                defaults = Options::default();
                &defaults
            }
        };
        let engine = Engine::from_options(opts)?;
        Ok(Self::from_engine(engine.named(&opts.name)))
    }

    /// Builds a logger that writes entries to `make_writer` instead of the
    /// configured output paths.
    pub fn with_writer<M>(opts: &Options, make_writer: M) -> Result<Self, LogError>
    where
        M: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let format: Format = opts
            .format
            .parse()
            .map_err(|_| LogError::UnknownFormat(opts.format.clone()))?;
        let error_sinks = Sink::open_all(&opts.error_output_paths)?;
        let engine = Engine::assemble(
            opts,
            format,
            vec![Sink::from_make_writer(make_writer)],
            error_sinks,
        );
        Ok(Self::from_engine(engine.named(&opts.name)))
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self {
            info: InfoLogger::new(Level::INFO, engine.clone()),
            engine,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn name(&self) -> &str {
        self.engine.name()
    }

    fn log(&self, caller: &'static Location<'static>, level: Level, msg: &str, fields: &[Field]) {
        if let Some(checked) = self.engine.check(level) {
            checked.at(caller).write(msg, fields);
        }
    }

    fn logf(&self, caller: &'static Location<'static>, level: Level, args: fmt::Arguments<'_>) {
        if let Some(checked) = self.engine.check(level) {
            let msg = match args.as_str() {
                Some(s) => Cow::Borrowed(s),
                None => Cow::Owned(args.to_string()),
            };
            checked.at(caller).write(&msg, &[]);
        }
    }

    fn logw(&self, caller: &'static Location<'static>, level: Level, msg: &str, kvs: &[Arg]) {
        if let Some(checked) = self.engine.check(level) {
            let fields = handle_fields(&self.engine, kvs, Vec::new(), caller);
            checked.at(caller).write(msg, &fields);
        }
    }

    leveled! {
        Level::DEBUG => debug, debugf, debugw;
        Level::INFO => info, infof, infow;
        Level::WARN => warn, warnf, warnw;
        Level::ERROR => error, errorf, errorw;
    }

    /// Writes the entry, then panics with `msg`.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) -> ! {
        self.log(Location::caller(), Level::PANIC, msg, fields);
        panic!("{}", msg)
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        let msg = args.to_string();
        self.log(Location::caller(), Level::PANIC, &msg, &[]);
        panic!("{}", msg)
    }

    #[track_caller]
    pub fn panicw(&self, msg: &str, kvs: &[Arg]) -> ! {
        self.logw(Location::caller(), Level::PANIC, msg, kvs);
        panic!("{}", msg)
    }

    /// Writes the entry, flushes, then exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        self.log(Location::caller(), Level::FATAL, msg, fields);
        self.exit()
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.logf(Location::caller(), Level::FATAL, args);
        self.exit()
    }

    #[track_caller]
    pub fn fatalw(&self, msg: &str, kvs: &[Arg]) -> ! {
        self.logw(Location::caller(), Level::FATAL, msg, kvs);
        self.exit()
    }

    fn exit(&self) -> ! {
        self.flush();
        process::exit(1)
    }

    /// Emitter for verbosity `level` (`Info - level`). Negative levels count as 0.
    ///
    /// Disabled levels all share one no-op emitter.
    pub fn v(&self, level: i32) -> Arc<dyn InfoLog> {
        let severity = Level::verbosity(level);
        if self.engine.enabled(severity) {
            Arc::new(InfoLogger::new(severity, self.engine.clone()))
        } else {
            info::disabled()
        }
    }

    /// A child logger carrying the given loose key-value pairs.
    #[track_caller]
    pub fn with_values(&self, kvs: &[Arg]) -> Logger {
        let fields = handle_fields(&self.engine, kvs, Vec::new(), Location::caller());
        Self::from_engine(self.engine.with(&fields))
    }

    /// A child logger with `name` appended to this logger's name.
    pub fn with_name(&self, name: &str) -> Logger {
        Self::from_engine(self.engine.named(name))
    }

    /// A copy of `ctx` carrying this logger.
    pub fn with_context(&self, ctx: &Context) -> Context {
        ctx.with_logger(Arc::new(self.clone()))
    }

    /// A copy of this logger carrying the request and execution ids held by `ctx`.
    pub fn l(&self, ctx: &Context) -> Logger {
        let mut fields = Vec::with_capacity(2);
        if let Some(id) = ctx.request_id() {
            fields.push(Field::new("request-id", id.clone()));
        }
        if let Some(id) = ctx.execution_id() {
            fields.push(Field::new("e-id", id.clone()));
        }
        Self::from_engine(self.engine.with(&fields))
    }

    /// Flushes every sink. Failures are ignored.
    pub fn flush(&self) {
        let _ = self.engine.sync();
    }

    /// An `io::Write` adapter logging each write as one entry at `level`.
    pub fn writer_at(&self, level: Level) -> LevelWriter {
        LevelWriter {
            logger: self.clone(),
            level,
        }
    }
}

impl Default for Logger {
    /// Console output to stdout, errors to stderr, default options otherwise.
    fn default() -> Self {
        let opts = Options::default();
        let engine = Engine::assemble(&opts, Format::Console, vec![Sink::stdout()], vec![Sink::stderr()]);
        Self::from_engine(engine)
    }
}

impl InfoLog for Logger {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]) {
        self.info.info(msg, fields);
    }

    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>) {
        self.info.infof(args);
    }

    #[track_caller]
    fn infow(&self, msg: &str, kvs: &[Arg]) {
        self.info.infow(msg, kvs);
    }

    fn enabled(&self) -> bool {
        true
    }
}

/// Each `write` call becomes one Info entry. A single trailing `\n` or
/// `\r\n` is dropped so `writeln!` output doesn't end every message with a
/// line break; any other bytes are kept as given.
impl io::Write for Logger {
    #[track_caller]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.logf(
            Location::caller(),
            Level::INFO,
            format_args!("{}", trim_line(buf)),
        );
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Logger::flush(self);
        Ok(())
    }
}

/// Logs each write as one entry at a fixed level, trimming a trailing line
/// break like `Logger`'s `Write` impl. Never fails.
#[derive(Debug, Clone)]
pub struct LevelWriter {
    logger: Logger,
    level: Level,
}

impl io::Write for LevelWriter {
    #[track_caller]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.logger.logf(
            Location::caller(),
            self.level,
            format_args!("{}", trim_line(buf)),
        );
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.logger.flush();
        Ok(())
    }
}

fn trim_line(buf: &[u8]) -> Cow<'_, str> {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    let buf = buf.strip_suffix(b"\r").unwrap_or(buf);
    String::from_utf8_lossy(buf)
}
