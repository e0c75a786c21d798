//! Engine core.
//!
//! # Responsibilities
//! - Level gate shared by every handle derived from one engine
//! - Sample, encode and fan an entry out to every output sink
//! - Report sink failures on the error sinks
//!
//! # Design Decisions
//! - Never emits `tracing` events itself; the engine layer feeds this core
//! - Write failures are swallowed after being reported

use std::io;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use crate::encoders::ChronoTimer;
use crate::engine::encoder::{Encoder, Entry};
use crate::engine::level::{AtomicLevel, Level};
use crate::engine::sampler::Sampler;
use crate::engine::sink::Sink;
use crate::field::Field;

pub struct Core {
    level: AtomicLevel,
    encoder: Box<dyn Encoder>,
    sinks: Vec<Sink>,
    error_sinks: Vec<Sink>,
    sampler: Option<Sampler>,
}

impl Core {
    pub fn new(
        level: AtomicLevel,
        encoder: Box<dyn Encoder>,
        sinks: Vec<Sink>,
        error_sinks: Vec<Sink>,
    ) -> Self {
        Self {
            level,
            encoder,
            sinks,
            error_sinks,
            sampler: None,
        }
    }

    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn level(&self) -> &AtomicLevel {
        &self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    /// Encodes and writes one entry. `context` fields precede call-site `fields`.
    pub fn write(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) {
        if let Some(sampler) = &self.sampler {
            if !sampler.sample(entry.level, entry.message) {
                return;
            }
        }

        let line = self
            .encoder
            .encode(entry, &mut context.iter().chain(fields.iter()));

        for sink in &self.sinks {
            if let Err(e) = sink.write_all(line.as_bytes()) {
                self.report(&format!("write error: {}", e));
            }
        }

        // entries above error may be followed by process termination
        if entry.level > Level::ERROR {
            if let Err(e) = self.sync() {
                self.report(&format!("sync error: {}", e));
            }
        }
    }

    /// Flushes every output sink, returning the first failure.
    pub fn sync(&self) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.sync() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn report(&self, msg: &str) {
        let mut line = String::new();
        // writing into a String can't fail
        let _ = ChronoTimer.format_time(&mut Writer::new(&mut line));
        line.push(' ');
        line.push_str(msg);
        line.push('\n');
        for sink in &self.error_sinks {
            // nowhere left to report to
            let _ = sink.write_all(line.as_bytes());
        }
    }
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("level", &self.level.level())
            .field("sinks", &self.sinks)
            .field("error_sinks", &self.error_sinks)
            .field("sampled", &self.sampler.is_some())
            .finish()
    }
}
