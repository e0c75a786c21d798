//! Entry encoders.
//!
//! # Responsibilities
//! - Turn an entry plus its fields into one output line
//! - Console (tab separated, fields as a JSON object) and JSON layouts
//!
//! # Design Decisions
//! - Durations and timestamps always go through the configured encoder functions
//! - Key names are fixed per `EncoderConfig`; pairs are written in order, never merged,
//!   so a field named like an entry key sits next to it instead of replacing it

use std::borrow::Cow;
use std::str::FromStr;

use chrono::{DateTime, Local};
use colored::Colorize;
use serde_json::Value as Json;

use crate::encoders::{
    millis_duration_encoder, time_encoder, DurationEncoder, PrimitiveEncoder, TimeEncoder,
};
use crate::engine::level::Level;
use crate::error::ValidationError;
use crate::field::{Field, Value};

pub const CONSOLE_FORMAT: &str = "console";
pub const JSON_FORMAT: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Console,
    Json,
}

impl FromStr for Format {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            CONSOLE_FORMAT => Ok(Format::Console),
            JSON_FORMAT => Ok(Format::Json),
            _ => Err(ValidationError::InvalidFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoder {
    Capital,
    CapitalColor,
}

impl LevelEncoder {
    fn encode(self, level: Level) -> String {
        let name = level.capital_string();
        match self {
            LevelEncoder::Capital => name,
            LevelEncoder::CapitalColor => {
                let colored = match level {
                    l if l <= Level::DEBUG => name.magenta(),
                    Level::INFO => name.blue(),
                    Level::WARN => name.yellow(),
                    _ => name.red(),
                };
                colored.to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerEncoder {
    /// Last two path segments, e.g. `logger/mod.rs:42`.
    Short,
    /// Path as recorded by the compiler.
    Full,
}

/// Source location of a logging call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    fn encode(&self, enc: CallerEncoder) -> String {
        match enc {
            CallerEncoder::Full => format!("{}:{}", self.file, self.line),
            CallerEncoder::Short => format!("{}:{}", trimmed_path(&self.file), self.line),
        }
    }
}

impl From<&'static std::panic::Location<'static>> for Caller {
    fn from(loc: &'static std::panic::Location<'static>) -> Self {
        Caller::new(loc.file(), loc.line())
    }
}

fn trimmed_path(file: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    let Some(last) = file.rfind(is_sep) else {
        return file;
    };
    match file[..last].rfind(is_sep) {
        Some(prev) => &file[prev + 1..],
        None => file,
    }
}

#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub message_key: &'static str,
    pub level_key: &'static str,
    pub time_key: &'static str,
    pub name_key: &'static str,
    pub caller_key: &'static str,
    pub stacktrace_key: &'static str,
    pub line_ending: &'static str,
    pub level: LevelEncoder,
    pub time: TimeEncoder,
    pub duration: DurationEncoder,
    pub caller: CallerEncoder,
}

impl EncoderConfig {
    pub fn new(level: LevelEncoder, caller: CallerEncoder) -> Self {
        Self {
            message_key: "message",
            level_key: "level",
            time_key: "timestamp",
            name_key: "logger",
            caller_key: "caller",
            stacktrace_key: "stacktrace",
            line_ending: "\n",
            level,
            time: time_encoder,
            duration: millis_duration_encoder,
            caller,
        }
    }

    fn time_json(&self, t: &DateTime<Local>) -> Json {
        let mut slot = JsonSlot::default();
        (self.time)(t, &mut slot);
        slot.into_json()
    }

    fn value_json(&self, value: &Value) -> Json {
        match value {
            Value::Str(s) | Value::Display(s) | Value::Error(s) => Json::String(s.clone()),
            Value::I64(v) => Json::from(*v),
            Value::U64(v) => Json::from(*v),
            Value::F64(v) => float_json(*v),
            Value::Bool(v) => Json::Bool(*v),
            Value::Duration(d) => {
                let mut slot = JsonSlot::default();
                (self.duration)(*d, &mut slot);
                slot.into_json()
            }
            Value::Time(t) => self.time_json(t),
            Value::Json(v) => v.clone(),
        }
    }

    fn write_fields<'a>(&self, obj: &mut JsonObject, fields: &mut dyn Iterator<Item = &'a Field>) {
        for field in fields {
            obj.pair(&field.key, &self.value_json(&field.value));
        }
    }
}

/// A JSON object written pair by pair. Repeated keys are all kept.
#[derive(Default)]
struct JsonObject {
    buf: String,
}

impl JsonObject {
    fn pair(&mut self, key: &str, value: &Json) {
        self.buf.push(if self.buf.is_empty() { '{' } else { ',' });
        self.buf.push_str(&Json::from(key).to_string());
        self.buf.push(':');
        self.buf.push_str(&value.to_string());
    }

    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn finish(mut self) -> String {
        if self.buf.is_empty() {
            self.buf.push('{');
        }
        self.buf.push('}');
        self.buf
    }
}

fn float_json(v: f64) -> Json {
    if v.is_nan() {
        Json::String("NaN".into())
    } else if v.is_infinite() {
        Json::String(if v > 0.0 { "+Inf" } else { "-Inf" }.into())
    } else {
        Json::from(v)
    }
}

/// Captures the single primitive an encoder function appends.
#[derive(Default)]
struct JsonSlot(Option<Json>);

impl JsonSlot {
    fn into_json(self) -> Json {
        self.0.unwrap_or(Json::Null)
    }
}

impl PrimitiveEncoder for JsonSlot {
    fn append_bool(&mut self, v: bool) {
        self.0 = Some(Json::Bool(v));
    }
    fn append_i64(&mut self, v: i64) {
        self.0 = Some(Json::from(v));
    }
    fn append_u64(&mut self, v: u64) {
        self.0 = Some(Json::from(v));
    }
    fn append_f64(&mut self, v: f64) {
        self.0 = Some(float_json(v));
    }
    fn append_str(&mut self, v: &str) {
        self.0 = Some(Json::String(v.to_string()));
    }
}

/// One log entry, minus its fields.
#[derive(Debug)]
pub struct Entry<'a> {
    pub level: Level,
    pub time: DateTime<Local>,
    pub logger_name: &'a str,
    pub message: &'a str,
    pub caller: Option<Caller>,
    pub stack: Option<String>,
}

pub trait Encoder: Send + Sync {
    fn encode(&self, entry: &Entry<'_>, fields: &mut dyn Iterator<Item = &Field>) -> String;
}

pub fn new_encoder(format: Format, config: EncoderConfig) -> Box<dyn Encoder> {
    match format {
        Format::Console => Box::new(ConsoleEncoder { config }),
        Format::Json => Box::new(JsonEncoder { config }),
    }
}

pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry<'_>, fields: &mut dyn Iterator<Item = &Field>) -> String {
        let cfg = &self.config;
        let mut parts: Vec<String> = Vec::with_capacity(6);

        parts.push(match cfg.time_json(&entry.time) {
            Json::String(s) => s,
            other => other.to_string(),
        });
        parts.push(cfg.level.encode(entry.level));
        if !entry.logger_name.is_empty() {
            parts.push(entry.logger_name.to_string());
        }
        if let Some(caller) = &entry.caller {
            parts.push(caller.encode(cfg.caller));
        }
        parts.push(entry.message.to_string());

        let mut context = JsonObject::default();
        cfg.write_fields(&mut context, fields);
        if !context.is_empty() {
            parts.push(context.finish());
        }

        let mut line = parts.join("\t");
        line.push_str(cfg.line_ending);
        if let Some(stack) = &entry.stack {
            line.push_str(stack.trim_end());
            line.push_str(cfg.line_ending);
        }
        line
    }
}

pub struct JsonEncoder {
    config: EncoderConfig,
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &Entry<'_>, fields: &mut dyn Iterator<Item = &Field>) -> String {
        let cfg = &self.config;
        let mut obj = JsonObject::default();

        obj.pair(cfg.time_key, &cfg.time_json(&entry.time));
        obj.pair(cfg.level_key, &Json::String(cfg.level.encode(entry.level)));
        if !entry.logger_name.is_empty() {
            obj.pair(cfg.name_key, &Json::String(entry.logger_name.into()));
        }
        if let Some(caller) = &entry.caller {
            obj.pair(cfg.caller_key, &Json::String(caller.encode(cfg.caller)));
        }
        obj.pair(cfg.message_key, &Json::String(entry.message.into()));
        cfg.write_fields(&mut obj, fields);
        if let Some(stack) = &entry.stack {
            obj.pair(cfg.stacktrace_key, &Json::String(stack.clone()));
        }

        let mut line = obj.finish();
        line.push_str(cfg.line_ending);
        line
    }
}
