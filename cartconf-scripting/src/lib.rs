//! Scripting engine capability for cartconf.
//!
//! Config cartridges carry a script instead of a static document. This crate
//! defines the narrow interface the config extractor relies on:
//!
//! - [`ScriptEngine`] creates isolated contexts and runs source text in them
//! - [`ScriptContext`] exposes typed get-by-name and get-by-field lookups
//! - [`ScriptValue`] is the dynamic value those lookups return
//!
//! [`LuaEngine`] is the bundled implementation, a sandboxed Lua 5.4 state
//! per context.

pub mod engine;
pub mod lua;
pub mod value;

pub use engine::{ScriptContext, ScriptEngine, ScriptError};
pub use lua::{LuaContext, LuaEngine};
pub use value::{ScriptValue, ValueKind};
