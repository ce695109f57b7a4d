//! Sandboxed Lua 5.4 implementation of [`ScriptEngine`].
//!
//! Every context is a brand new Lua state opened with the `string`, `table`
//! and `math` libraries only. The base library's file loaders (`dofile`,
//! `loadfile`) are removed, so config scripts get no file, `io`, `os`,
//! `package` or `debug` access. Nothing survives from one context to the next.

use std::fmt;

use mlua::{Lua, LuaOptions, StdLib, Table, Value};

use crate::engine::{ScriptContext, ScriptEngine, ScriptError};
use crate::value::ScriptValue;

/// Base library globals that reach the filesystem.
const FILE_LOADERS: [&str; 2] = ["dofile", "loadfile"];

/// Chunk name used in Lua error messages unless overridden.
pub const DEFAULT_CHUNK_NAME: &str = "config";

/// Lua engine factory. Cheap to construct and holds no interpreter state itself.
#[derive(Debug, Clone)]
pub struct LuaEngine {
    chunk_name: String,
    memory_limit: Option<usize>,
}

impl Default for LuaEngine {
    fn default() -> Self {
        Self {
            chunk_name: DEFAULT_CHUNK_NAME.to_string(),
            memory_limit: None,
        }
    }
}

impl LuaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name reported for the chunk in compile and runtime errors.
    pub fn with_chunk_name(mut self, name: impl Into<String>) -> Self {
        self.chunk_name = name.into();
        self
    }

    /// Cap the memory a single context may allocate, in bytes.
    ///
    /// A script that exceeds the cap fails with a runtime error.
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    pub fn chunk_name(&self) -> &str {
        &self.chunk_name
    }
}

/// One isolated Lua state. Closed when dropped.
pub struct LuaContext {
    lua: Lua,
}

impl fmt::Debug for LuaContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LuaContext").finish_non_exhaustive()
    }
}

impl LuaContext {
    /// Access to the underlying Lua state.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

fn convert(value: Value) -> ScriptValue<Table> {
    match value {
        Value::Nil => ScriptValue::Nil,
        Value::Boolean(b) => ScriptValue::Boolean(b),
        Value::Integer(i) => ScriptValue::Integer(i),
        Value::Number(n) => ScriptValue::Number(n),
        Value::String(s) => ScriptValue::String(String::from(s.to_string_lossy())),
        Value::Table(t) => ScriptValue::Table(t),
        _ => ScriptValue::Other,
    }
}

impl ScriptContext for LuaContext {
    type Table = Table;

    fn global(&self, name: &str) -> ScriptValue<Table> {
        match self.lua.globals().get::<Value>(name) {
            Ok(value) => convert(value),
            Err(e) => {
                log::trace!("Lua global lookup of {name} failed: {e}");
                ScriptValue::Nil
            }
        }
    }

    fn field(&self, table: &Table, name: &str) -> ScriptValue<Table> {
        match table.get::<Value>(name) {
            Ok(value) => convert(value),
            Err(e) => {
                log::trace!("Lua field lookup of {name} failed: {e}");
                ScriptValue::Nil
            }
        }
    }
}

impl ScriptEngine for LuaEngine {
    type Context = LuaContext;

    fn create_context(&self) -> Result<LuaContext, ScriptError> {
        let lua = Lua::new_with(
            StdLib::STRING | StdLib::TABLE | StdLib::MATH,
            LuaOptions::default(),
        )
        .map_err(|e| ScriptError::Init(e.to_string()))?;

        let globals = lua.globals();
        for name in FILE_LOADERS {
            globals
                .raw_set(name, Value::Nil)
                .map_err(|e| ScriptError::Init(e.to_string()))?;
        }

        if let Some(limit) = self.memory_limit {
            lua.set_memory_limit(limit)
                .map_err(|e| ScriptError::Init(e.to_string()))?;
        }

        Ok(LuaContext { lua })
    }

    fn compile_and_run(&self, context: &mut LuaContext, source: &str) -> Result<(), ScriptError> {
        let function = context
            .lua
            .load(source)
            .set_name(self.chunk_name.as_str())
            .into_function()
            .map_err(|e| ScriptError::Compile(e.to_string()))?;

        function
            .call::<()>(())
            .map_err(|e| ScriptError::Runtime(e.to_string()))
    }
}
