//! Loose key-value conversion for the `*w` methods.
//!
//! # Responsibilities
//! - Turn an alternating `key, value, key, value` list into typed fields
//! - Stop at the first malformed pair and report it at DPanic level
//!
//! # Design Decisions
//! - Malformed input never panics or errors; the remaining arguments are dropped
//! - Parsing is pure (`parse_fields`); reporting is separate (`handle_fields`)

use std::panic::Location;

use crate::engine::{Engine, Level};
use crate::field::{Arg, Field, Value};

/// Why a loose argument list stopped converting.
#[derive(Debug, Clone, PartialEq)]
pub enum Malformed {
    /// A typed `Field` sat where a key was expected.
    TypedField(Field),
    /// The list ended on a key with no value.
    OrphanKey(Arg),
    /// A key that is not a string.
    NonStringKey(Arg),
}

impl Malformed {
    fn diagnostic(&self) -> (&'static str, Field) {
        match self {
            Malformed::TypedField(f) => (
                "strongly-typed field passed as a loose key-value argument",
                Field::new("field", Value::display(format_args!("{}={:?}", f.key, f.value))),
            ),
            Malformed::OrphanKey(arg) => (
                "odd number of arguments passed as key-value pairs for logging",
                Field::new("ignored-key", debug_value(arg)),
            ),
            Malformed::NonStringKey(arg) => (
                "non-string key argument passed to logging, ignoring all later arguments",
                Field::new("invalid-key", debug_value(arg)),
            ),
        }
    }
}

fn debug_value(arg: &Arg) -> Value {
    match arg {
        Arg::Value(v) => v.clone(),
        Arg::Field(f) => Value::display(format_args!("{:?}", f)),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFields {
    pub fields: Vec<Field>,
    /// Arguments left unconverted after the walk stopped.
    pub dropped: usize,
    pub problem: Option<Malformed>,
}

/// Converts alternating key-value arguments, stopping at the first malformed pair.
pub fn parse_fields(args: &[Arg]) -> ParsedFields {
    let mut parsed = ParsedFields {
        fields: Vec::with_capacity(args.len() / 2),
        ..ParsedFields::default()
    };

    let mut i = 0;
    while i < args.len() {
        let key = &args[i];
        if let Arg::Field(f) = key {
            parsed.problem = Some(Malformed::TypedField(f.clone()));
            break;
        }
        if i == args.len() - 1 {
            parsed.problem = Some(Malformed::OrphanKey(key.clone()));
            break;
        }
        let Arg::Value(Value::Str(name)) = key else {
            parsed.problem = Some(Malformed::NonStringKey(key.clone()));
            break;
        };

        let value = match &args[i + 1] {
            Arg::Value(v) => v.clone(),
            Arg::Field(f) => Value::display(format_args!("{}={:?}", f.key, f.value)),
        };
        parsed.fields.push(Field::new(name.clone(), value));
        i += 2;
    }
    parsed.dropped = args.len() - i;
    parsed
}

/// Converts `args` and appends `additional`, reporting malformed input on `engine`.
pub(crate) fn handle_fields(
    engine: &Engine,
    args: &[Arg],
    additional: Vec<Field>,
    caller: &'static Location<'static>,
) -> Vec<Field> {
    if args.is_empty() {
        return additional;
    }

    let ParsedFields {
        mut fields,
        problem,
        ..
    } = parse_fields(args);

    if let Some(problem) = problem {
        if let Some(checked) = engine.check(Level::DPANIC) {
            let (message, detail) = problem.diagnostic();
            checked.at(caller).write(message, &[detail]);
        }
    }

    fields.extend(additional);
    fields
}
