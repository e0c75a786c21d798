//! `tracing-subscriber` layer feeding events into an engine.
//!
//! Records from the `log` crate arrive here too once `LogTracer` is installed;
//! their `log.*` fields are mapped back onto the entry's caller.

use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field as TracingField, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::engine::encoder::Caller;
use crate::engine::level::Level;
use crate::engine::{global, Engine};
use crate::field::{Field, Value};

enum Source {
    Global,
    Fixed(Arc<Engine>),
}

/// Routes `tracing` events to the process-wide engine, or to a fixed one.
pub struct EngineLayer {
    source: Source,
}

impl EngineLayer {
    /// Follows whatever engine `replace_globals` last installed.
    pub fn global() -> Self {
        Self {
            source: Source::Global,
        }
    }

    pub fn new(engine: Engine) -> Self {
        Self {
            source: Source::Fixed(Arc::new(engine)),
        }
    }

    fn engine(&self) -> Arc<Engine> {
        match &self.source {
            Source::Global => global::global(),
            Source::Fixed(engine) => Arc::clone(engine),
        }
    }
}

impl<S: Subscriber> Layer<S> for EngineLayer {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        // the level is adjustable at runtime, so never cache a verdict
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.engine().enabled(Level::from(*metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let engine = self.engine();
        let meta = event.metadata();
        let Some(checked) = engine.check(Level::from(*meta.level())) else {
            return;
        };

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let caller = match (visitor.file.take(), visitor.line) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => meta
                .file()
                .zip(meta.line())
                .map(|(file, line)| Caller::new(Cow::Borrowed(file), line)),
        };
        let checked = match caller {
            Some(caller) => checked.at(caller),
            None => checked,
        };
        checked.write(&visitor.message, &visitor.fields);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<Field>,
    file: Option<String>,
    line: Option<u32>,
}

impl EventVisitor {
    fn push(&mut self, field: &TracingField, value: Value) {
        self.fields.push(Field::new(field.name(), value));
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "log.file" => self.file = Some(value.to_string()),
            "log.target" | "log.module_path" => {}
            _ => self.push(field, Value::Str(value.to_string())),
        }
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        match field.name() {
            "log.line" => self.line = u32::try_from(value).ok(),
            _ => self.push(field, Value::U64(value)),
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, Value::I64(value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, Value::F64(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::Error(value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                self.message.clear();
                let _ = write!(self.message, "{:?}", value);
            }
            "log.target" | "log.module_path" => {}
            _ => self.push(field, Value::Display(format!("{:?}", value))),
        }
    }
}
