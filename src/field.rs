//! Structured field model.
//!
//! # Responsibilities
//! - Typed key-value pairs attached to log entries (`Field`, `Value`)
//! - The loose argument element used by the `*w` methods (`Arg`)
//!
//! # Design Decisions
//! - Closed set of value kinds; anything else goes through `display` or `any`
//! - Durations and timestamps stay typed until the encoder renders them

use std::error::Error as StdError;
use std::fmt;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// A field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Local>),
    /// Rendered through `Display` at construction time.
    Display(String),
    /// Rendered error message.
    Error(String),
    /// Arbitrary serializable data.
    Json(serde_json::Value),
}

impl Value {
    /// Captures `value` through its `Display` impl.
    pub fn display(value: impl fmt::Display) -> Self {
        Value::Display(value.to_string())
    }

    /// Captures `value` as JSON, falling back to the serializer error text.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Value::Json(v),
            Err(e) => Value::Error(e.to_string()),
        }
    }

    /// Returns the string slice if this is a plain string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A typed key-value pair attached to a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub fn string(key: impl Into<String>, value: impl Into<String>) -> Field {
    Field::new(key, Value::Str(value.into()))
}

pub fn int(key: impl Into<String>, value: i64) -> Field {
    Field::new(key, Value::I64(value))
}

pub fn uint(key: impl Into<String>, value: u64) -> Field {
    Field::new(key, Value::U64(value))
}

pub fn float(key: impl Into<String>, value: f64) -> Field {
    Field::new(key, Value::F64(value))
}

pub fn boolean(key: impl Into<String>, value: bool) -> Field {
    Field::new(key, Value::Bool(value))
}

pub fn duration(key: impl Into<String>, value: Duration) -> Field {
    Field::new(key, Value::Duration(value))
}

pub fn time(key: impl Into<String>, value: DateTime<Local>) -> Field {
    Field::new(key, Value::Time(value))
}

/// Error field stored under the conventional `error` key.
pub fn err(error: &(dyn StdError + 'static)) -> Field {
    named_err("error", error)
}

pub fn named_err(key: impl Into<String>, error: &(dyn StdError + 'static)) -> Field {
    Field::new(key, Value::Error(error.to_string()))
}

pub fn display(key: impl Into<String>, value: impl fmt::Display) -> Field {
    Field::new(key, Value::display(value))
}

/// Field holding any serializable value.
pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Field {
    Field::new(key, Value::json(value))
}

/// One element of a loose, alternating key/value argument list.
///
/// Keys are expected to be `Arg::Value(Value::Str(_))`. A typed `Field`
/// in a key position is a caller mistake and stops conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(Value),
    Field(Field),
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Field> for Arg {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_value_from! {
    &str => |v| Value::Str(v.to_owned()),
    String => |v| Value::Str(v),
    &String => |v| Value::Str(v.clone()),
    i8 => |v| Value::I64(v.into()),
    i16 => |v| Value::I64(v.into()),
    i32 => |v| Value::I64(v.into()),
    i64 => |v| Value::I64(v),
    isize => |v| Value::I64(v as i64),
    u8 => |v| Value::U64(v.into()),
    u16 => |v| Value::U64(v.into()),
    u32 => |v| Value::U64(v.into()),
    u64 => |v| Value::U64(v),
    usize => |v| Value::U64(v as u64),
    f32 => |v| Value::F64(v.into()),
    f64 => |v| Value::F64(v),
    bool => |v| Value::Bool(v),
    Duration => |v| Value::Duration(v),
    DateTime<Local> => |v| Value::Time(v),
    DateTime<Utc> => |v| Value::Time(v.with_timezone(&Local)),
    SystemTime => |v| Value::Time(DateTime::<Local>::from(v)),
    serde_json::Value => |v| Value::Json(v),
}

/// Builds a loose argument array: `kvs!["user", "ada", "attempt", 3]`.
#[macro_export]
macro_rules! kvs {
    ($($arg:expr),* $(,)?) => {
        [$($crate::field::Arg::from($arg)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(string("k", "v"), Field::new("k", Value::Str("v".into())));
        assert_eq!(int("n", -3).value, Value::I64(-3));
        assert_eq!(uint("n", 3).value, Value::U64(3));
        assert_eq!(boolean("b", true).value, Value::Bool(true));
        assert_eq!(display("d", 1.5).value, Value::Display("1.5".into()));
    }

    #[test]
    fn test_err_field_uses_error_key() {
        let e = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let f = err(&e);
        assert_eq!(f.key, "error");
        assert_eq!(f.value, Value::Error("disk on fire".into()));
    }

    #[test]
    fn test_any_serializes() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }
        let f = any("p", &Point { x: 1, y: 2 });
        assert_eq!(f.value, Value::Json(serde_json::json!({"x": 1, "y": 2})));
    }

    #[test]
    fn test_kvs_macro() {
        let args = kvs!["key", 42, "flag", true];
        assert_eq!(args.len(), 4);
        assert_eq!(args[0], Arg::Value(Value::Str("key".into())));
        assert_eq!(args[1], Arg::Value(Value::I64(42)));

        let typed = kvs![string("k", "v")];
        assert!(matches!(typed[0], Arg::Field(_)));
    }
}
