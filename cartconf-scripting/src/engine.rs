//! Engine and context traits.

use thiserror::Error;

use crate::value::ScriptValue;

/// Errors raised while preparing or running a config script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The interpreter state could not be created or configured.
    #[error("failed to initialise script context: {0}")]
    Init(String),

    /// The source text did not compile.
    #[error("script compile error: {0}")]
    Compile(String),

    /// The script compiled but raised an error while running.
    #[error("script runtime error: {0}")]
    Runtime(String),
}

/// Read access to the global state left behind by a script run.
///
/// Lookups never fail: a missing name or a failing metamethod both read as
/// [`ScriptValue::Nil`].
pub trait ScriptContext {
    /// Engine-owned handle to a table value.
    type Table;

    /// Look up a global variable.
    fn global(&self, name: &str) -> ScriptValue<Self::Table>;

    /// Look up a named field of a table.
    fn field(&self, table: &Self::Table, name: &str) -> ScriptValue<Self::Table>;
}

/// A scripting engine able to create isolated contexts and run source in them.
///
/// A context is destroyed when it is dropped.
pub trait ScriptEngine {
    type Context: ScriptContext;

    /// Create a fresh context with no state shared with any other context.
    fn create_context(&self) -> Result<Self::Context, ScriptError>;

    /// Compile `source` and run it to completion inside `context`.
    fn compile_and_run(&self, context: &mut Self::Context, source: &str)
    -> Result<(), ScriptError>;
}
