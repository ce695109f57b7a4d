//! Dynamic values returned from a running script.

use std::fmt;

/// Type tag of a [`ScriptValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Boolean,
    Integer,
    Number,
    String,
    Table,
    /// Functions, userdata, threads and anything else the engine can hold.
    Other,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Nil => "nil",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Table => "table",
            ValueKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A value read out of a script context.
///
/// Scalars are copied out of the engine. Tables stay engine-owned and are
/// represented by the context's table handle `T`, which can be passed back to
/// [`ScriptContext::field`](crate::ScriptContext::field) to descend further.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue<T> {
    Nil,
    Boolean(bool),
    /// Integer subtype only. A float such as `5.0` is a [`ScriptValue::Number`].
    Integer(i64),
    Number(f64),
    String(String),
    Table(T),
    Other,
}

impl<T> ScriptValue<T> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ScriptValue::Nil => ValueKind::Nil,
            ScriptValue::Boolean(_) => ValueKind::Boolean,
            ScriptValue::Integer(_) => ValueKind::Integer,
            ScriptValue::Number(_) => ValueKind::Number,
            ScriptValue::String(_) => ValueKind::String,
            ScriptValue::Table(_) => ValueKind::Table,
            ScriptValue::Other => ValueKind::Other,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, ScriptValue::Nil)
    }

    /// Consume the value, keeping only a table handle.
    pub fn into_table(self) -> Option<T> {
        match self {
            ScriptValue::Table(table) => Some(table),
            _ => None,
        }
    }
}
