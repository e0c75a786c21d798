//! Info-level emitters returned by `Logger::v`.

use std::fmt;
use std::panic::Location;
use std::sync::{Arc, LazyLock};

use crate::engine::{Engine, Level};
use crate::field::{Arg, Field};
use crate::logger::fields::handle_fields;

/// Emits messages at one fixed severity.
pub trait InfoLog: Send + Sync {
    fn info(&self, msg: &str, fields: &[Field]);
    fn infof(&self, args: fmt::Arguments<'_>);
    fn infow(&self, msg: &str, kvs: &[Arg]);
    /// Whether this emitter writes anything at all.
    fn enabled(&self) -> bool;
}

/// Emitter for verbosity levels the engine has disabled.
#[derive(Debug, Default)]
pub struct NoopInfoLogger;

impl InfoLog for NoopInfoLogger {
    fn info(&self, _msg: &str, _fields: &[Field]) {}
    fn infof(&self, _args: fmt::Arguments<'_>) {}
    fn infow(&self, _msg: &str, _kvs: &[Arg]) {}
    fn enabled(&self) -> bool {
        false
    }
}

static DISABLED: LazyLock<Arc<dyn InfoLog>> = LazyLock::new(|| Arc::new(NoopInfoLogger));

/// The shared disabled emitter. Every call returns the same instance.
pub fn disabled() -> Arc<dyn InfoLog> {
    Arc::clone(&DISABLED)
}

#[derive(Debug, Clone)]
pub struct InfoLogger {
    level: Level,
    engine: Engine,
}

impl InfoLogger {
    pub fn new(level: Level, engine: Engine) -> Self {
        Self { level, engine }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl InfoLog for InfoLogger {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]) {
        if let Some(checked) = self.engine.check(self.level) {
            checked.at(Location::caller()).write(msg, fields);
        }
    }

    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>) {
        if let Some(checked) = self.engine.check(self.level) {
            checked.at(Location::caller()).write(&args.to_string(), &[]);
        }
    }

    #[track_caller]
    fn infow(&self, msg: &str, kvs: &[Arg]) {
        let caller = Location::caller();
        if let Some(checked) = self.engine.check(self.level) {
            let fields = handle_fields(&self.engine, kvs, Vec::new(), caller);
            checked.at(caller).write(msg, &fields);
        }
    }

    fn enabled(&self) -> bool {
        true
    }
}
