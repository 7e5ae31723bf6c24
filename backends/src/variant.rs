//! Typed setting values and their canonical printed form
//!
//! JSON scalars and arrays convert to a [`Variant`]; the `Display` impl
//! prints the text syntax the key-file database consumes (`true`, `42`,
//! `1.5`, `'text'`, `[1, 2]`).

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Bool(bool),
    Int64(i64),
    Double(f64),
    String(String),
    Array(Vec<Variant>),
}

impl Variant {
    /// Convert a JSON value to its typed equivalent.
    ///
    /// Returns `None` for values with no typed representation: `null`,
    /// objects, and arrays containing either.
    pub fn from_json(value: &Value) -> Option<Variant> {
        match value {
            Value::Bool(b) => Some(Variant::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Variant::Int64(i))
                } else {
                    n.as_f64().map(Variant::Double)
                }
            }
            Value::String(s) => Some(Variant::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(Variant::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Variant::Array),
            Value::Null | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Bool(b) => write!(f, "{b}"),
            Variant::Int64(i) => write!(f, "{i}"),
            Variant::Double(d) => {
                // Doubles keep a decimal point so the value stays typed
                // when parsed back (1.0, not 1).
                if d.fract() == 0.0 && d.abs() < 1e16 {
                    write!(f, "{d:.1}")
                } else {
                    write!(f, "{d}")
                }
            }
            Variant::String(s) => write_quoted(f, s),
            Variant::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "'")?;
    for c in s.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '\'' => write!(f, "\\'")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "'")
}
