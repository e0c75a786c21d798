//! Process-wide default logger and the free functions that delegate to it.
//!
//! # Design Decisions
//! - Readers load the current pointer without locking and see either the old
//!   or the new logger, never a mix
//! - `init` is serialized by a mutex; the last call wins
//! - Loggers obtained before an `init` keep writing through the old instance

use std::fmt;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::context::Context;
use crate::engine::Level;
use crate::error::LogError;
use crate::field::{Arg, Field};
use crate::logger::{InfoLog, LevelWriter, Logger};
use crate::options::Options;

pub use crate::context::from_context;

static STD: LazyLock<ArcSwap<Logger>> = LazyLock::new(|| ArcSwap::from_pointee(Logger::default()));
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Replaces the process-wide logger with one built from `opts`.
pub fn init(opts: &Options) -> Result<(), LogError> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let logger = Logger::new(Some(opts))?;
    STD.store(Arc::new(logger));
    Ok(())
}

/// The current process-wide logger.
pub fn std_logger() -> Arc<Logger> {
    STD.load_full()
}

macro_rules! delegate {
    ($($plain:ident, $f:ident, $w:ident;)*) => {
        $(
            #[track_caller]
            pub fn $plain(msg: &str, fields: &[Field]) {
                STD.load().$plain(msg, fields)
            }

            #[track_caller]
            pub fn $f(args: fmt::Arguments<'_>) {
                STD.load().$f(args)
            }

            #[track_caller]
            pub fn $w(msg: &str, kvs: &[Arg]) {
                STD.load().$w(msg, kvs)
            }
        )*
    };
}

delegate! {
    debug, debugf, debugw;
    info, infof, infow;
    warn, warnf, warnw;
    error, errorf, errorw;
}

#[track_caller]
pub fn panic(msg: &str, fields: &[Field]) -> ! {
    STD.load_full().panic(msg, fields)
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) -> ! {
    STD.load_full().panicf(args)
}

#[track_caller]
pub fn panicw(msg: &str, kvs: &[Arg]) -> ! {
    STD.load_full().panicw(msg, kvs)
}

#[track_caller]
pub fn fatal(msg: &str, fields: &[Field]) -> ! {
    STD.load_full().fatal(msg, fields)
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    STD.load_full().fatalf(args)
}

#[track_caller]
pub fn fatalw(msg: &str, kvs: &[Arg]) -> ! {
    STD.load_full().fatalw(msg, kvs)
}

pub fn v(level: i32) -> Arc<dyn InfoLog> {
    STD.load().v(level)
}

#[track_caller]
pub fn with_values(kvs: &[Arg]) -> Logger {
    STD.load().with_values(kvs)
}

pub fn with_name(name: &str) -> Logger {
    STD.load().with_name(name)
}

pub fn with_context(ctx: &Context) -> Context {
    STD.load().with_context(ctx)
}

pub fn l(ctx: &Context) -> Logger {
    STD.load().l(ctx)
}

pub fn flush() {
    STD.load().flush()
}

/// `io::Write` adapter logging at info level on the current logger.
pub fn std_info_writer() -> LevelWriter {
    STD.load().writer_at(Level::INFO)
}

/// `io::Write` adapter logging at error level on the current logger.
pub fn std_err_writer() -> LevelWriter {
    STD.load().writer_at(Level::ERROR)
}
