//! Static type rules for expression operands.
//!
//! The legal operand combinations are a small fixed set, so they are spelled
//! out as trait impls over concrete types. An unsupported combination (for
//! example `bool + int`) has no impl and fails to compile.

use crate::value::{ScriptScalar, ScriptValue};

/// Numeric scalar types: `byte`, `int`, `float`, `double`.
pub trait Numeric: ScriptScalar {}

/// Integral scalar types: `byte` and `int`.
pub trait Integral: Numeric {}

impl Numeric for u8 {}
impl Numeric for i32 {}
impl Numeric for f32 {}
impl Numeric for f64 {}

impl Integral for u8 {}
impl Integral for i32 {}

/// Result type of an arithmetic operator applied to `Self` and `R`.
pub trait Promote<R: ScriptValue>: ScriptValue {
    type Output: ScriptValue;
}

/// Shorthand for `<L as Promote<R>>::Output`.
pub type Promoted<L, R> = <L as Promote<R>>::Output;

macro_rules! promote {
    ($($lhs:ty, $rhs:ty => $out:ty;)*) => {$(
        impl Promote<$rhs> for $lhs {
            type Output = $out;
        }
    )*};
}

promote! {
    u8, u8 => u8;
    u8, i32 => i32;
    u8, f32 => f32;
    u8, f64 => f64;
    i32, u8 => i32;
    i32, i32 => i32;
    i32, f32 => f32;
    i32, f64 => f64;
    f32, u8 => f32;
    f32, i32 => f32;
    f32, f32 => f32;
    f32, f64 => f64;
    f64, u8 => f64;
    f64, i32 => f64;
    f64, f32 => f64;
    f64, f64 => f64;
}

/// A value of type `R` may be stored into a variable of type `Self`.
pub trait Assignable<R>: ScriptValue {}

/// Values of `Self` and `R` may be compared with `==` and `!=`.
pub trait Equatable<R>: ScriptValue {}

macro_rules! numeric_pairs {
    ($($lhs:ty => [$($rhs:ty),*];)*) => {$($(
        impl Assignable<$rhs> for $lhs {}
        impl Equatable<$rhs> for $lhs {}
        impl<const N: usize> Assignable<[$rhs; N]> for [$lhs; N] {}
    )*)*};
}

numeric_pairs! {
    u8 => [u8, i32, f32, f64];
    i32 => [u8, i32, f32, f64];
    f32 => [u8, i32, f32, f64];
    f64 => [u8, i32, f32, f64];
}

impl Assignable<bool> for bool {}
impl Equatable<bool> for bool {}
impl<const N: usize> Assignable<[bool; N]> for [bool; N] {}

impl Assignable<String> for String {}
impl Equatable<String> for String {}
impl<const N: usize> Assignable<[String; N]> for [String; N] {}
impl<'a, const N: usize> Assignable<[&'a str; N]> for [String; N] {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn kind_of<L: Promote<R>, R: ScriptValue>() -> ValueKind {
        <Promoted<L, R>>::KIND
    }

    #[test]
    fn same_types_keep_their_type() {
        assert_eq!(kind_of::<u8, u8>(), ValueKind::BYTE);
        assert_eq!(kind_of::<i32, i32>(), ValueKind::INT);
        assert_eq!(kind_of::<f32, f32>(), ValueKind::FLOAT);
        assert_eq!(kind_of::<f64, f64>(), ValueKind::DOUBLE);
    }

    #[test]
    fn mixed_types_widen() {
        assert_eq!(kind_of::<u8, i32>(), ValueKind::INT);
        assert_eq!(kind_of::<i32, f32>(), ValueKind::FLOAT);
        assert_eq!(kind_of::<f32, i32>(), ValueKind::FLOAT);
        assert_eq!(kind_of::<i32, f64>(), ValueKind::DOUBLE);
        assert_eq!(kind_of::<f64, u8>(), ValueKind::DOUBLE);
        assert_eq!(kind_of::<f32, f64>(), ValueKind::DOUBLE);
    }

    fn assignable<L: Assignable<R>, R>() {}
    fn equatable<L: Equatable<R>, R>() {}

    #[test]
    fn assignment_and_equality_pairs_exist() {
        assignable::<i32, f32>();
        assignable::<[f32; 6], [i32; 6]>();
        assignable::<[String; 2], [&str; 2]>();
        assignable::<bool, bool>();
        equatable::<i32, f64>();
        equatable::<String, String>();
    }
}
