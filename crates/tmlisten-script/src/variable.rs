use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{Result, ScriptError};
use crate::expr::{Expression, Operand};
use crate::promote::Assignable;
use crate::value::{Arg, IntoArg, ScriptValue};

/// A named, writable script variable of type `T`.
///
/// Variables carry only their name. They can be declared once and then
/// referenced from any number of expressions and messages.
pub struct Variable<T> {
    name: Arc<str>,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for Variable<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            _type: PhantomData,
        }
    }
}

impl<T: ScriptValue> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("kind", &T::KIND)
            .finish()
    }
}

impl<T: ScriptValue> Variable<T> {
    /// Create a variable. The name must be a script identifier.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(ScriptError::InvalidName(name));
        }
        Ok(Self::named(name))
    }

    /// Attribute of a controller object, e.g. `Point["P1"].Value`.
    pub(crate) fn attribute(owner: &str, attribute: &str) -> Self {
        Self::named(format!("{owner}{attribute}"))
    }

    fn named(name: String) -> Self {
        Self {
            name: Arc::from(name),
            _type: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> Expression<T> {
        Expression::variable(Arc::clone(&self.name))
    }

    /// Declaration statement: `int int_var=0`, `float[] targetP1={...}`.
    pub fn declare<V>(&self, initial: V) -> Statement
    where
        V: Operand,
        T: Assignable<V::Value>,
    {
        Statement(format!(
            "{} {}={}",
            T::KIND.type_name(),
            self.name,
            initial.into_expr().render()
        ))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A read-only controller attribute. Usable as an operand, never as an
/// assignment target.
pub struct ReadOnly<T>(Variable<T>);

impl<T> Clone for ReadOnly<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ScriptValue> fmt::Debug for ReadOnly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnly").field(&self.0).finish()
    }
}

impl<T: ScriptValue> ReadOnly<T> {
    pub(crate) fn attribute(owner: &str, attribute: &str) -> Self {
        Self(Variable::attribute(owner, attribute))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn expr(&self) -> Expression<T> {
        self.0.expr()
    }
}

impl<T: ScriptValue> Operand for Variable<T> {
    type Value = T;

    fn into_expr(self) -> Expression<T> {
        self.expr()
    }
}

impl<T: ScriptValue> Operand for &Variable<T> {
    type Value = T;

    fn into_expr(self) -> Expression<T> {
        self.expr()
    }
}

impl<T: ScriptValue> Operand for ReadOnly<T> {
    type Value = T;

    fn into_expr(self) -> Expression<T> {
        self.expr()
    }
}

impl<T: ScriptValue> Operand for &ReadOnly<T> {
    type Value = T;

    fn into_expr(self) -> Expression<T> {
        self.expr()
    }
}

macro_rules! named_arg {
    ($($ty:ident),*) => {$(
        impl<T: ScriptValue> IntoArg for $ty<T> {
            fn into_arg(self) -> Arg {
                Arg::new(T::KIND, self.name())
            }
        }

        impl<T: ScriptValue> IntoArg for &$ty<T> {
            fn into_arg(self) -> Arg {
                Arg::new(T::KIND, self.name())
            }
        }
    )*};
}

named_arg!(Variable, ReadOnly);

/// One rendered script line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement(String);

impl Statement {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<T> From<Expression<T>> for Statement {
    fn from(expr: Expression<T>) -> Self {
        Statement(expr.render())
    }
}

impl<T> From<&Expression<T>> for Statement {
    fn from(expr: &Expression<T>) -> Self {
        Statement(expr.render())
    }
}
