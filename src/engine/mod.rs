//! Logging engine.
//!
//! # Responsibilities
//! - Own the encoding, level gate, sampling and sink I/O behind every `Logger`
//! - Check-then-write: confirm a level is enabled before paying for fields
//! - Bridge `tracing` and `log` records into the process-wide engine
//!
//! # Design Decisions
//! - `Engine` is an immutable handle; deriving one clones the handle and shares the core
//! - Caller and stacktrace capture are decided per handle, not per core

pub mod core;
pub mod encoder;
pub mod global;
pub mod layer;
pub mod level;
pub mod sampler;
pub mod sink;

use std::backtrace::Backtrace;
use std::io;
use std::sync::Arc;

use chrono::Local;

pub use self::core::Core;
pub use encoder::{Caller, CallerEncoder, EncoderConfig, Entry, Format, LevelEncoder};
pub use global::{global, replace_globals};
pub use layer::EngineLayer;
pub use level::{AtomicLevel, Level};
pub use sampler::Sampler;
pub use sink::Sink;

use crate::error::LogError;
use crate::field::Field;
use crate::options::Options;

#[derive(Clone)]
pub struct Engine {
    core: Arc<Core>,
    name: String,
    context: Arc<[Field]>,
    add_caller: bool,
    add_stack: Option<Level>,
}

impl Engine {
    pub fn new(core: Core) -> Self {
        Self {
            core: Arc::new(core),
            name: String::new(),
            context: Arc::from(Vec::new()),
            add_caller: false,
            add_stack: None,
        }
    }

    /// An engine that drops everything.
    pub fn nop() -> Self {
        let core = Core::new(
            AtomicLevel::new(Level::from_i8(i8::MAX)),
            encoder::new_encoder(
                Format::Json,
                EncoderConfig::new(LevelEncoder::Capital, CallerEncoder::Short),
            ),
            Vec::new(),
            Vec::new(),
        );
        Self::new(core)
    }

    /// Builds an engine from `opts`, opening every configured sink.
    ///
    /// An unparseable level falls back to `info`; an unknown format is an error.
    pub fn from_options(opts: &Options) -> Result<Self, LogError> {
        let format: Format = opts
            .format
            .parse()
            .map_err(|_| LogError::UnknownFormat(opts.format.clone()))?;
        let sinks = Sink::open_all(&opts.output_paths)?;
        let error_sinks = Sink::open_all(&opts.error_output_paths)?;
        Ok(Self::assemble(opts, format, sinks, error_sinks))
    }

    /// Builds an engine from `opts` over already-opened sinks.
    pub fn assemble(opts: &Options, format: Format, sinks: Vec<Sink>, error_sinks: Vec<Sink>) -> Self {
        let level = opts.level.parse().unwrap_or(Level::INFO);

        let level_encoder = if format == Format::Console && opts.enable_color {
            // color regardless of whether the sink is a terminal
            colored::control::set_override(true);
            LevelEncoder::CapitalColor
        } else {
            LevelEncoder::Capital
        };
        let caller_encoder = if opts.encode_full_caller {
            CallerEncoder::Full
        } else {
            CallerEncoder::Short
        };

        let core = Core::new(
            AtomicLevel::new(level),
            encoder::new_encoder(format, EncoderConfig::new(level_encoder, caller_encoder)),
            sinks,
            error_sinks,
        )
        .with_sampler(Sampler::standard());

        let add_stack = match (opts.disable_stacktrace, opts.development) {
            (true, _) => None,
            (false, true) => Some(Level::WARN),
            (false, false) => Some(Level::PANIC),
        };

        Self::new(core)
            .with_caller(!opts.disable_caller)
            .with_stacktrace(add_stack)
    }

    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    /// Attach a stacktrace to entries at or above `level`; `None` disables.
    pub fn with_stacktrace(mut self, level: Option<Level>) -> Self {
        self.add_stack = level;
        self
    }

    /// Appends a name segment, joined with `.`. An empty segment is a no-op.
    pub fn named(&self, segment: &str) -> Self {
        let mut child = self.clone();
        if segment.is_empty() {
            return child;
        }
        child.name = if self.name.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", self.name, segment)
        };
        child
    }

    /// A child handle carrying `fields` on every entry after the parent's.
    pub fn with(&self, fields: &[Field]) -> Self {
        let mut child = self.clone();
        if fields.is_empty() {
            return child;
        }
        child.context = self.context.iter().chain(fields).cloned().collect();
        child
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    /// Fields bound to this handle.
    pub fn fields(&self) -> &[Field] {
        &self.context
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    pub fn check(&self, level: Level) -> Option<CheckedEntry<'_>> {
        if !self.core.enabled(level) {
            return None;
        }
        Some(CheckedEntry {
            engine: self,
            level,
            caller: None,
        })
    }

    pub fn sync(&self) -> io::Result<()> {
        self.core.sync()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .field("fields", &self.context.len())
            .field("add_caller", &self.add_caller)
            .field("add_stack", &self.add_stack)
            .field("core", &self.core)
            .finish()
    }
}

/// An entry whose level already passed the engine's gate.
#[must_use]
pub struct CheckedEntry<'a> {
    engine: &'a Engine,
    level: Level,
    caller: Option<Caller>,
}

impl CheckedEntry<'_> {
    /// Records the call site, if this engine reports callers.
    pub fn at(mut self, caller: impl Into<Caller>) -> Self {
        if self.engine.add_caller {
            self.caller = Some(caller.into());
        }
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn write(self, message: &str, fields: &[Field]) {
        let stack = match self.engine.add_stack {
            Some(min) if self.level >= min => Some(Backtrace::force_capture().to_string()),
            _ => None,
        };
        let entry = Entry {
            level: self.level,
            time: Local::now(),
            logger_name: &self.engine.name,
            message,
            caller: self.caller,
            stack,
        };
        self.engine
            .core
            .write(&entry, &self.engine.context, fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Buf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buf {
        fn write(&mut self, b: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(b);
            Ok(b.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn json_engine(opts: &Options) -> (Engine, Buf) {
        let buf = Buf::default();
        let out = buf.clone();
        let engine = Engine::assemble(
            opts,
            Format::Json,
            vec![Sink::from_make_writer(move || out.clone())],
            Vec::new(),
        );
        (engine, buf)
    }

    fn lines(buf: &Buf) -> Vec<serde_json::Value> {
        let raw = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        raw.lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_console_color_on_any_sink() {
        let buf = Buf::default();
        let out = buf.clone();
        let engine = Engine::assemble(
            &Options::default(),
            Format::Console,
            vec![Sink::from_make_writer(move || out.clone())],
            Vec::new(),
        );
        if let Some(checked) = engine.check(Level::WARN) {
            checked.write("tinted", &[]);
        }
        let raw = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(raw.contains("\x1b[33mWARN\x1b[0m"), "{:?}", raw);
    }

    #[test]
    fn test_named_joins_segments() {
        let e = Engine::nop();
        assert_eq!(e.named("a").named("b").name(), "a.b");
        assert_eq!(e.named("a").named("").name(), "a");
        assert_eq!(e.named("").name(), "");
    }

    #[test]
    fn test_with_does_not_touch_parent() {
        let parent = Engine::nop().with(&[field::int("a", 1)]);
        let child = parent.with(&[field::int("b", 2)]);
        assert_eq!(parent.fields().len(), 1);
        assert_eq!(child.fields().len(), 2);
        assert_eq!(child.fields()[0].key, "a");
    }

    #[test]
    fn test_nop_checks_nothing() {
        let e = Engine::nop();
        assert!(e.check(Level::FATAL).is_none());
    }

    #[test]
    fn test_check_respects_level() {
        let (engine, _) = json_engine(&Options::default());
        assert!(engine.check(Level::DEBUG).is_none());
        assert!(engine.check(Level::INFO).is_some());
        engine.core().level().set_level(Level::DEBUG);
        assert!(engine.check(Level::DEBUG).is_some());
    }

    #[test]
    fn test_entry_carries_name_caller_fields() {
        let opts = Options {
            name: "svc".into(),
            ..Options::default()
        };
        let (engine, buf) = json_engine(&opts);
        let engine = engine.named(&opts.name).with(&[field::string("bound", "yes")]);

        engine
            .check(Level::INFO)
            .unwrap()
            .at(Caller::new("src/api/handler.rs", 7))
            .write("served", &[field::uint("status", 200)]);

        let out = lines(&buf);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["logger"], "svc");
        assert_eq!(out[0]["caller"], "api/handler.rs:7");
        assert_eq!(out[0]["message"], "served");
        assert_eq!(out[0]["bound"], "yes");
        assert_eq!(out[0]["status"], 200);
        assert!(out[0].get("stacktrace").is_none());
    }

    #[test]
    fn test_disable_caller() {
        let opts = Options {
            disable_caller: true,
            ..Options::default()
        };
        let (engine, buf) = json_engine(&opts);
        engine
            .check(Level::INFO)
            .unwrap()
            .at(Caller::new("src/main.rs", 1))
            .write("no caller", &[]);
        assert!(lines(&buf)[0].get("caller").is_none());
    }

    #[test]
    fn test_stacktrace_thresholds() {
        let (engine, buf) = json_engine(&Options::default());
        engine.check(Level::ERROR).unwrap().write("err", &[]);
        engine.check(Level::PANIC).unwrap().write("boom", &[]);
        let out = lines(&buf);
        assert!(out[0].get("stacktrace").is_none());
        assert!(out[1].get("stacktrace").is_some());

        let dev = Options {
            development: true,
            ..Options::default()
        };
        let (engine, buf) = json_engine(&dev);
        engine.check(Level::WARN).unwrap().write("careful", &[]);
        assert!(lines(&buf)[0].get("stacktrace").is_some());

        let off = Options {
            development: true,
            disable_stacktrace: true,
            ..Options::default()
        };
        let (engine, buf) = json_engine(&off);
        engine.check(Level::PANIC).unwrap().write("boom", &[]);
        assert!(lines(&buf)[0].get("stacktrace").is_none());
    }

    #[test]
    fn test_from_options_rejects_unknown_format() {
        let opts = Options {
            format: "xml".into(),
            ..Options::default()
        };
        assert!(matches!(
            Engine::from_options(&opts),
            Err(LogError::UnknownFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_unparseable_level_falls_back_to_info() {
        let opts = Options {
            level: "loud".into(),
            ..Options::default()
        };
        let (engine, _) = json_engine(&opts);
        assert_eq!(engine.core().level().level(), Level::INFO);
    }
}
