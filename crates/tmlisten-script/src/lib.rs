//! Typed values and expressions for the listen-node scripting language.
//!
//! Everything in this crate renders to text and nothing else: values become
//! literals (`true`, `"JPP"`, `{0,90,0}`), expressions become fully
//! parenthesized infix strings (`(int_var+other_int)`), and declarations
//! become statements (`float[] targetP1={205,-35,125,0,90,0}`).
//!
//! Operand types are checked statically. Combining an `int` with a `float`
//! yields a `float` expression; combining a `bool` with an `int` does not
//! compile.
//!
//! ```
//! use tmlisten_script::{expr, Variable};
//!
//! let int_var = Variable::<i32>::new("int_var").unwrap();
//! let other_int = Variable::<i32>::new("other_int").unwrap();
//!
//! let sum = expr::add(&int_var, &other_int);
//! assert_eq!(sum.render(), "(int_var+other_int)");
//! ```

pub mod error;
pub mod expr;
pub mod object;
pub mod promote;
pub mod value;
pub mod variable;

pub use error::{Result, ScriptError};
pub use expr::{BinaryOp, Expression, Operand, UnaryOp};
pub use promote::{Assignable, Equatable, Integral, Numeric, Promote, Promoted};
pub use value::{Arg, Conversion, IntoArg, Scalar, ScriptScalar, ScriptValue, ValueKind};
pub use variable::{ReadOnly, Statement, Variable};

/// Build a `Vec<Arg>` from heterogeneous values, variables and expressions.
///
/// ```
/// use tmlisten_script::{args, ValueKind, Variable};
///
/// let target = Variable::<[f32; 6]>::new("targetP1").unwrap();
/// let args = args!["JPP", &target, 10, 200, 0, false];
/// assert_eq!(args[1].kind(), ValueKind::array(tmlisten_script::Scalar::Float, 6));
/// assert_eq!(args[1].text(), "targetP1");
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::IntoArg::into_arg($arg)),*]
    };
}
