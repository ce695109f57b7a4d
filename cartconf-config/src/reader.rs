//! Best-effort typed reads out of a script context.
//!
//! A read resolves a global name or a dotted path (`THEME.CODE.SELECT`),
//! checks the resolved value's kind and, only on an exact match, writes it
//! into the destination. Missing names, non-table intermediates and kind
//! mismatches are all silent no-ops.

use cartconf_scripting::{ScriptContext, ScriptValue};

/// A Rust type that can be read from a [`ScriptValue`].
pub trait FieldType: Sized {
    /// Convert `value`, or return `None` if its kind does not match.
    fn from_script<T>(value: ScriptValue<T>) -> Option<Self>;
}

impl FieldType for bool {
    fn from_script<T>(value: ScriptValue<T>) -> Option<Self> {
        match value {
            ScriptValue::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl FieldType for i64 {
    fn from_script<T>(value: ScriptValue<T>) -> Option<Self> {
        match value {
            ScriptValue::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl FieldType for i32 {
    fn from_script<T>(value: ScriptValue<T>) -> Option<Self> {
        i64::from_script(value).map(|v| v as i32)
    }
}

// Byte fields go through a full-width integer read and truncate.
impl FieldType for u8 {
    fn from_script<T>(value: ScriptValue<T>) -> Option<Self> {
        i64::from_script(value).map(|v| v as u8)
    }
}

impl FieldType for String {
    fn from_script<T>(value: ScriptValue<T>) -> Option<Self> {
        match value {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Reader scoped either to the global namespace or to one table.
pub struct FieldReader<'c, C: ScriptContext> {
    ctx: &'c C,
    table: Option<C::Table>,
}

impl<'c, C: ScriptContext> FieldReader<'c, C> {
    /// Reader over the context's globals.
    pub fn globals(ctx: &'c C) -> Self {
        Self { ctx, table: None }
    }

    fn get(&self, name: &str) -> ScriptValue<C::Table> {
        match &self.table {
            None => self.ctx.global(name),
            Some(table) => self.ctx.field(table, name),
        }
    }

    /// Resolve a dotted path relative to this scope.
    ///
    /// Returns [`ScriptValue::Nil`] as soon as a segment is missing or an
    /// intermediate value is not a table.
    pub fn resolve(&self, path: &str) -> ScriptValue<C::Table> {
        let mut segments = path.split('.');
        let Some(first) = segments.next() else {
            return ScriptValue::Nil;
        };

        let mut current = self.get(first);
        for segment in segments {
            current = match current {
                ScriptValue::Table(table) => self.ctx.field(&table, segment),
                _ => return ScriptValue::Nil,
            };
        }
        current
    }

    /// Typed lookup: `Some` only when the path resolves to the expected kind.
    pub fn lookup<T: FieldType>(&self, path: &str) -> Option<T> {
        T::from_script(self.resolve(path))
    }

    /// Write the value at `path` into `dest` if present and well-typed.
    ///
    /// Returns whether `dest` was written.
    pub fn read<T: FieldType>(&self, path: &str, dest: &mut T) -> bool {
        match self.lookup(path) {
            Some(value) => {
                log::trace!("config field {path} read");
                *dest = value;
                true
            }
            None => false,
        }
    }

    /// Like [`read`](Self::read) for optional destinations; a hit replaces
    /// (and drops) any previous value.
    pub fn read_opt<T: FieldType>(&self, path: &str, dest: &mut Option<T>) -> bool {
        match self.lookup(path) {
            Some(value) => {
                log::trace!("config field {path} read");
                *dest = Some(value);
                true
            }
            None => false,
        }
    }

    /// Descend into a sub-table, or `None` if `path` is not a table.
    pub fn table(&self, path: &str) -> Option<FieldReader<'c, C>> {
        self.resolve(path).into_table().map(|table| FieldReader {
            ctx: self.ctx,
            table: Some(table),
        })
    }
}

/// Read a global or dotted field into `dest`. See [`FieldReader::read`].
pub fn read_field<C: ScriptContext, T: FieldType>(ctx: &C, path: &str, dest: &mut T) -> bool {
    FieldReader::globals(ctx).read(path, dest)
}

/// Typed lookup of a global or dotted field. See [`FieldReader::lookup`].
pub fn lookup<C: ScriptContext, T: FieldType>(ctx: &C, path: &str) -> Option<T> {
    FieldReader::globals(ctx).lookup(path)
}
