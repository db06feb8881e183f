//! Typed expression tree.
//!
//! An [`Expression<T>`] is an immutable tree whose static type `T` is the
//! script type the expression evaluates to. Operators are free functions
//! (`expr::add`, `expr::eq`, ...) whose bounds encode the promotion table in
//! [`crate::promote`]; there is no operator overloading.
//!
//! Every node renders fully parenthesized with no whitespace:
//! `(a+b)`, `(++x)`, `(x++)`, `(c?a:b)`.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::promote::{Assignable, Equatable, Integral, Numeric, Promote, Promoted};
use crate::value::{Arg, IntoArg, ScriptScalar, ScriptValue, ValueKind};
use crate::variable::Variable;

/// Binary operators of the scripting language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
}

impl BinaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::RemAssign => "%=",
            BinaryOp::AndAssign => "&=",
            BinaryOp::OrAssign => "|=",
            BinaryOp::XorAssign => "^=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
        }
    }
}

/// Unary operators. Increment and decrement come in prefix and postfix form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    BitNot,
    Neg,
    Plus,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub const fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }
}

#[derive(Debug)]
enum Node {
    Literal(String),
    Variable(Arc<str>),
    Unary {
        op: UnaryOp,
        operand: Arc<Node>,
    },
    Binary {
        op: BinaryOp,
        lhs: Arc<Node>,
        rhs: Arc<Node>,
    },
    Ternary {
        cond: Arc<Node>,
        then: Arc<Node>,
        otherwise: Arc<Node>,
    },
}

impl Node {
    fn write(&self, out: &mut String) {
        match self {
            Node::Literal(text) => out.push_str(text),
            Node::Variable(name) => out.push_str(name),
            Node::Unary { op, operand } => {
                out.push('(');
                if op.is_postfix() {
                    operand.write(out);
                    out.push_str(op.symbol());
                } else {
                    out.push_str(op.symbol());
                    operand.write(out);
                }
                out.push(')');
            }
            Node::Binary { op, lhs, rhs } => {
                out.push('(');
                lhs.write(out);
                out.push_str(op.symbol());
                rhs.write(out);
                out.push(')');
            }
            Node::Ternary {
                cond,
                then,
                otherwise,
            } => {
                out.push('(');
                cond.write(out);
                out.push('?');
                then.write(out);
                out.push(':');
                otherwise.write(out);
                out.push(')');
            }
        }
    }
}

/// An expression evaluating to script type `T`.
///
/// Cloning is cheap; subtrees are shared.
pub struct Expression<T> {
    node: Arc<Node>,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for Expression<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            _type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expression").field(&self.render()).finish()
    }
}

impl<T> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<T> Expression<T> {
    fn from_node(node: Node) -> Self {
        Self {
            node: Arc::new(node),
            _type: PhantomData,
        }
    }

    pub(crate) fn variable(name: Arc<str>) -> Self {
        Self::from_node(Node::Variable(name))
    }

    fn unary<A: Operand>(op: UnaryOp, operand: A) -> Self {
        Self::from_node(Node::Unary {
            op,
            operand: operand.into_expr().node,
        })
    }

    fn binary<L: Operand, R: Operand>(op: BinaryOp, lhs: L, rhs: R) -> Self {
        Self::from_node(Node::Binary {
            op,
            lhs: lhs.into_expr().node,
            rhs: rhs.into_expr().node,
        })
    }

    /// Render the expression text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.node.write(&mut out);
        out
    }
}

impl<T: ScriptValue> Expression<T> {
    /// A literal value.
    pub fn literal(value: T) -> Self {
        Self::from_node(Node::Literal(value.render()))
    }

    pub fn kind(&self) -> ValueKind {
        T::KIND
    }

    /// `(cond?then:otherwise)` with an explicit result type.
    ///
    /// Both branches must be assignable to `T`.
    pub fn ternary<C, A, B>(cond: C, then: A, otherwise: B) -> Self
    where
        C: Operand<Value = bool>,
        A: Operand,
        B: Operand,
        T: Assignable<A::Value> + Assignable<B::Value>,
    {
        Self::from_node(Node::Ternary {
            cond: cond.into_expr().node,
            then: then.into_expr().node,
            otherwise: otherwise.into_expr().node,
        })
    }
}

/// Anything usable as an expression operand: literals, variables and
/// expressions.
pub trait Operand {
    type Value: ScriptValue;

    fn into_expr(self) -> Expression<Self::Value>;
}

impl<T: ScriptValue> Operand for Expression<T> {
    type Value = T;

    fn into_expr(self) -> Expression<T> {
        self
    }
}

impl<T: ScriptValue> Operand for &Expression<T> {
    type Value = T;

    fn into_expr(self) -> Expression<T> {
        self.clone()
    }
}

macro_rules! literal_operand {
    ($($ty:ty),* $(,)?) => {$(
        impl Operand for $ty {
            type Value = $ty;

            fn into_expr(self) -> Expression<$ty> {
                Expression::literal(self)
            }
        }
    )*};
}

literal_operand!(bool, u8, i32, f32, f64, String);

impl Operand for &str {
    type Value = String;

    fn into_expr(self) -> Expression<String> {
        Expression::from_node(Node::Literal(self.render()))
    }
}

impl<T: ScriptScalar, const N: usize> Operand for [T; N] {
    type Value = [T; N];

    fn into_expr(self) -> Expression<[T; N]> {
        Expression::literal(self)
    }
}

impl<T: ScriptValue> IntoArg for Expression<T> {
    fn into_arg(self) -> Arg {
        Arg::new(T::KIND, self.render())
    }
}

impl<T: ScriptValue> IntoArg for &Expression<T> {
    fn into_arg(self) -> Arg {
        Arg::new(T::KIND, self.render())
    }
}

macro_rules! arithmetic {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {$(
        $(#[$doc])*
        pub fn $name<L, R>(lhs: L, rhs: R) -> Expression<Promoted<L::Value, R::Value>>
        where
            L: Operand,
            R: Operand,
            L::Value: Promote<R::Value>,
        {
            Expression::binary(BinaryOp::$op, lhs, rhs)
        }
    )*};
}

arithmetic! {
    /// `(lhs+rhs)`
    add => Add;
    sub => Sub;
    mul => Mul;
    div => Div;
}

macro_rules! integral {
    ($($name:ident => $op:ident;)*) => {$(
        pub fn $name<L, R>(lhs: L, rhs: R) -> Expression<Promoted<L::Value, R::Value>>
        where
            L: Operand,
            R: Operand,
            L::Value: Integral + Promote<R::Value>,
            R::Value: Integral,
        {
            Expression::binary(BinaryOp::$op, lhs, rhs)
        }
    )*};
}

integral! {
    rem => Rem;
    bit_and => BitAnd;
    bit_or => BitOr;
    bit_xor => BitXor;
    shl => Shl;
    shr => Shr;
}

macro_rules! ordering {
    ($($name:ident => $op:ident;)*) => {$(
        pub fn $name<L, R>(lhs: L, rhs: R) -> Expression<bool>
        where
            L: Operand,
            R: Operand,
            L::Value: Numeric,
            R::Value: Numeric,
        {
            Expression::binary(BinaryOp::$op, lhs, rhs)
        }
    )*};
}

ordering! {
    lt => Lt;
    le => Le;
    gt => Gt;
    ge => Ge;
}

pub fn eq<L, R>(lhs: L, rhs: R) -> Expression<bool>
where
    L: Operand,
    R: Operand,
    L::Value: Equatable<R::Value>,
{
    Expression::binary(BinaryOp::Eq, lhs, rhs)
}

pub fn ne<L, R>(lhs: L, rhs: R) -> Expression<bool>
where
    L: Operand,
    R: Operand,
    L::Value: Equatable<R::Value>,
{
    Expression::binary(BinaryOp::Ne, lhs, rhs)
}

pub fn and<L, R>(lhs: L, rhs: R) -> Expression<bool>
where
    L: Operand<Value = bool>,
    R: Operand<Value = bool>,
{
    Expression::binary(BinaryOp::And, lhs, rhs)
}

pub fn or<L, R>(lhs: L, rhs: R) -> Expression<bool>
where
    L: Operand<Value = bool>,
    R: Operand<Value = bool>,
{
    Expression::binary(BinaryOp::Or, lhs, rhs)
}

/// `(target=value)`. The result has the target's type.
pub fn assign<T, R>(target: &Variable<T>, value: R) -> Expression<T>
where
    T: ScriptValue + Assignable<R::Value>,
    R: Operand,
{
    Expression::binary(BinaryOp::Assign, target, value)
}

macro_rules! numeric_assign {
    ($($name:ident => $op:ident;)*) => {$(
        pub fn $name<T, R>(target: &Variable<T>, value: R) -> Expression<T>
        where
            T: Numeric + Assignable<R::Value>,
            R: Operand,
            R::Value: Numeric,
        {
            Expression::binary(BinaryOp::$op, target, value)
        }
    )*};
}

numeric_assign! {
    add_assign => AddAssign;
    sub_assign => SubAssign;
    mul_assign => MulAssign;
    div_assign => DivAssign;
}

macro_rules! integral_assign {
    ($($name:ident => $op:ident;)*) => {$(
        pub fn $name<T, R>(target: &Variable<T>, value: R) -> Expression<T>
        where
            T: Integral + Assignable<R::Value>,
            R: Operand,
            R::Value: Integral,
        {
            Expression::binary(BinaryOp::$op, target, value)
        }
    )*};
}

integral_assign! {
    rem_assign => RemAssign;
    and_assign => AndAssign;
    or_assign => OrAssign;
    xor_assign => XorAssign;
    shl_assign => ShlAssign;
    shr_assign => ShrAssign;
}

/// `(!operand)`
pub fn not<A: Operand<Value = bool>>(operand: A) -> Expression<bool> {
    Expression::unary(UnaryOp::Not, operand)
}

/// `(~operand)`
pub fn bit_not<A>(operand: A) -> Expression<A::Value>
where
    A: Operand,
    A::Value: Integral,
{
    Expression::unary(UnaryOp::BitNot, operand)
}

pub fn neg<A>(operand: A) -> Expression<A::Value>
where
    A: Operand,
    A::Value: Numeric,
{
    Expression::unary(UnaryOp::Neg, operand)
}

pub fn plus<A>(operand: A) -> Expression<A::Value>
where
    A: Operand,
    A::Value: Numeric,
{
    Expression::unary(UnaryOp::Plus, operand)
}

macro_rules! step {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {$(
        $(#[$doc])*
        pub fn $name<T: Numeric>(target: &Variable<T>) -> Expression<T> {
            Expression::unary(UnaryOp::$op, target)
        }
    )*};
}

step! {
    /// `(++target)`
    pre_inc => PreInc;
    /// `(--target)`
    pre_dec => PreDec;
    /// `(target++)`
    post_inc => PostInc;
    /// `(target--)`
    post_dec => PostDec;
}
