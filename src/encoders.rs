//! Value encoders shared by every engine instance.
//!
//! Durations render as milliseconds (a number), timestamps with a fixed
//! human-readable layout (a string). Both the `Logger::new` path and the
//! `Options::build` path wire these in, so output is identical regardless of
//! how the engine was constructed.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Timestamp layout: `2006-01-02 15:04:05.000`.
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Sink for a single primitive produced by an encoder function.
pub trait PrimitiveEncoder {
    fn append_bool(&mut self, v: bool);
    fn append_i64(&mut self, v: i64);
    fn append_u64(&mut self, v: u64);
    fn append_f64(&mut self, v: f64);
    fn append_str(&mut self, v: &str);
}

pub type DurationEncoder = fn(Duration, &mut dyn PrimitiveEncoder);
pub type TimeEncoder = fn(&DateTime<Local>, &mut dyn PrimitiveEncoder);

/// Renders a duration as its magnitude in milliseconds.
pub fn millis_duration_encoder(d: Duration, enc: &mut dyn PrimitiveEncoder) {
    enc.append_f64(d.as_nanos() as f64 / 1e6);
}

/// Renders a timestamp using [`TIME_LAYOUT`].
pub fn time_encoder(t: &DateTime<Local>, enc: &mut dyn PrimitiveEncoder) {
    enc.append_str(&t.format(TIME_LAYOUT).to_string());
}

/// `FormatTime` using the same layout, for hand-built `fmt` layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoTimer;

impl FormatTime for ChronoTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format(TIME_LAYOUT))
    }
}
