//! Literal rendering and value kinds.

use std::fmt;

/// Scalar types of the scripting language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Bool,
    Byte,
    Int,
    Float,
    Double,
    String,
}

impl Scalar {
    /// The type name used in declarations.
    pub const fn type_name(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::Byte => "byte",
            Scalar::Int => "int",
            Scalar::Float => "float",
            Scalar::Double => "double",
            Scalar::String => "string",
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Scalar::Byte | Scalar::Int | Scalar::Float | Scalar::Double
        )
    }
}

/// Shape of a value: a scalar or a fixed-size array of scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar(Scalar),
    Array { element: Scalar, len: usize },
}

/// How a given value kind fits an expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Conversion {
    Incompatible,
    /// Numeric conversion (scalar or element-wise).
    Numeric,
    Exact,
}

impl ValueKind {
    pub const BOOL: ValueKind = ValueKind::Scalar(Scalar::Bool);
    pub const BYTE: ValueKind = ValueKind::Scalar(Scalar::Byte);
    pub const INT: ValueKind = ValueKind::Scalar(Scalar::Int);
    pub const FLOAT: ValueKind = ValueKind::Scalar(Scalar::Float);
    pub const DOUBLE: ValueKind = ValueKind::Scalar(Scalar::Double);
    pub const STRING: ValueKind = ValueKind::Scalar(Scalar::String);

    pub const fn array(element: Scalar, len: usize) -> Self {
        ValueKind::Array { element, len }
    }

    /// The declaration type name: `int`, `float[]`, ...
    pub fn type_name(&self) -> String {
        match self {
            ValueKind::Scalar(scalar) => scalar.type_name().to_string(),
            ValueKind::Array { element, .. } => format!("{}[]", element.type_name()),
        }
    }

    /// Whether a value of kind `given` can be passed where `self` is expected.
    ///
    /// `bool` and `string` only match themselves. Numeric scalars convert to
    /// any numeric scalar; numeric arrays convert element-wise when the
    /// lengths agree.
    pub fn accepts(&self, given: ValueKind) -> Conversion {
        if *self == given {
            return Conversion::Exact;
        }
        match (*self, given) {
            (ValueKind::Scalar(expected), ValueKind::Scalar(actual))
                if expected.is_numeric() && actual.is_numeric() =>
            {
                Conversion::Numeric
            }
            (
                ValueKind::Array {
                    element: expected,
                    len: expected_len,
                },
                ValueKind::Array {
                    element: actual,
                    len: actual_len,
                },
            ) if expected_len == actual_len && expected.is_numeric() && actual.is_numeric() => {
                Conversion::Numeric
            }
            _ => Conversion::Incompatible,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar(scalar) => f.write_str(scalar.type_name()),
            ValueKind::Array { element, len } => write!(f, "{}[{len}]", element.type_name()),
        }
    }
}

/// A Rust value with a script-language literal form.
pub trait ScriptValue {
    const KIND: ValueKind;

    /// Render as a script literal. Pure and repeatable.
    fn render(&self) -> String;
}

/// Scalar values, usable as array elements.
pub trait ScriptScalar: ScriptValue {
    const SCALAR: Scalar;
}

macro_rules! numeric_value {
    ($($ty:ty => $scalar:ident),* $(,)?) => {$(
        impl ScriptValue for $ty {
            const KIND: ValueKind = ValueKind::Scalar(Scalar::$scalar);

            // `Display` for the float types is the shortest text that round-trips
            // and never uses exponent notation.
            fn render(&self) -> String {
                self.to_string()
            }
        }

        impl ScriptScalar for $ty {
            const SCALAR: Scalar = Scalar::$scalar;
        }
    )*};
}

// Only finite floats have a script literal. NaN and the infinities render as
// `NaN`, `inf` and `-inf`, which the controller rejects when it runs the line.
numeric_value! {
    u8 => Byte,
    i32 => Int,
    f32 => Float,
    f64 => Double,
}

impl ScriptValue for bool {
    const KIND: ValueKind = ValueKind::BOOL;

    fn render(&self) -> String {
        if *self { "true" } else { "false" }.to_string()
    }
}

impl ScriptScalar for bool {
    const SCALAR: Scalar = Scalar::Bool;
}

// Strings pass through verbatim; the protocol has no escape syntax.
impl ScriptValue for String {
    const KIND: ValueKind = ValueKind::STRING;

    fn render(&self) -> String {
        format!("\"{self}\"")
    }
}

impl ScriptScalar for String {
    const SCALAR: Scalar = Scalar::String;
}

impl ScriptValue for &str {
    const KIND: ValueKind = ValueKind::STRING;

    fn render(&self) -> String {
        format!("\"{self}\"")
    }
}

impl ScriptScalar for &str {
    const SCALAR: Scalar = Scalar::String;
}

impl<T: ScriptScalar, const N: usize> ScriptValue for [T; N] {
    const KIND: ValueKind = ValueKind::Array {
        element: T::SCALAR,
        len: N,
    };

    fn render(&self) -> String {
        let elements: Vec<String> = self.iter().map(ScriptValue::render).collect();
        format!("{{{}}}", elements.join(","))
    }
}

/// A rendered call argument together with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    kind: ValueKind,
    text: String,
}

impl Arg {
    pub fn new(kind: ValueKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Conversion into a call argument.
pub trait IntoArg {
    fn into_arg(self) -> Arg;
}

impl IntoArg for Arg {
    fn into_arg(self) -> Arg {
        self
    }
}

macro_rules! literal_arg {
    ($($ty:ty),* $(,)?) => {$(
        impl IntoArg for $ty {
            fn into_arg(self) -> Arg {
                Arg::new(<$ty as ScriptValue>::KIND, self.render())
            }
        }
    )*};
}

literal_arg!(bool, u8, i32, f32, f64, String, &str);

impl<T: ScriptScalar, const N: usize> IntoArg for [T; N] {
    fn into_arg(self) -> Arg {
        Arg::new(<[T; N]>::KIND, self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_render_as_words() {
        assert_eq!(true.render(), "true");
        assert_eq!(false.render(), "false");
        assert_eq!([true, false].render(), "{true,false}");
    }

    #[test]
    fn numbers_render_minimally() {
        assert_eq!(88i32.render(), "88");
        assert_eq!((-35i32).render(), "-35");
        assert_eq!(205.0f32.render(), "205");
        assert_eq!(10.1f32.render(), "10.1");
        assert_eq!(1.5f64.render(), "1.5");
        assert_eq!(0.1f64.render(), "0.1");
        assert_eq!(255u8.render(), "255");
    }

    #[test]
    fn finite_floats_never_use_exponents() {
        assert_eq!(1e20f64.render(), "100000000000000000000");
        assert_eq!(1e-7f64.render(), "0.0000001");
        assert_eq!((-2.5e3f32).render(), "-2500");
        assert!(!f64::NAN.render().chars().any(|c| c.is_ascii_digit()));
        assert_eq!(f32::INFINITY.render(), "inf");
    }

    #[test]
    fn strings_are_quoted_verbatim() {
        assert_eq!("RobotBase".render(), "\"RobotBase\"");
        assert_eq!(String::from("JPP").render(), "\"JPP\"");
        assert_eq!(["a", "b"].render(), "{\"a\",\"b\"}");
    }

    #[test]
    fn arrays_render_as_brace_lists() {
        let pose = [205.0f32, -35.0, 125.0, 0.0, 90.0, 0.0];
        assert_eq!(pose.render(), "{205,-35,125,0,90,0}");
        assert_eq!(pose.render(), pose.render());
        assert_eq!([1i32, 2, 3].render(), "{1,2,3}");
    }

    #[test]
    fn kinds_and_type_names() {
        assert_eq!(<[f32; 6]>::KIND, ValueKind::array(Scalar::Float, 6));
        assert_eq!(<[f32; 6]>::KIND.type_name(), "float[]");
        assert_eq!(<[u8; 16]>::KIND.type_name(), "byte[]");
        assert_eq!(i32::KIND.type_name(), "int");
        assert_eq!(<&str>::KIND, ValueKind::STRING);
        assert_eq!(<[f32; 6]>::KIND.to_string(), "float[6]");
    }

    #[test]
    fn conversions() {
        assert_eq!(ValueKind::FLOAT.accepts(ValueKind::FLOAT), Conversion::Exact);
        assert_eq!(ValueKind::FLOAT.accepts(ValueKind::INT), Conversion::Numeric);
        assert_eq!(ValueKind::INT.accepts(ValueKind::DOUBLE), Conversion::Numeric);
        assert_eq!(ValueKind::INT.accepts(ValueKind::BOOL), Conversion::Incompatible);
        assert_eq!(ValueKind::BOOL.accepts(ValueKind::INT), Conversion::Incompatible);
        assert_eq!(ValueKind::STRING.accepts(ValueKind::INT), Conversion::Incompatible);

        let float6 = ValueKind::array(Scalar::Float, 6);
        assert_eq!(float6.accepts(ValueKind::array(Scalar::Double, 6)), Conversion::Numeric);
        assert_eq!(
            float6.accepts(ValueKind::array(Scalar::Float, 3)),
            Conversion::Incompatible
        );
        assert_eq!(float6.accepts(ValueKind::FLOAT), Conversion::Incompatible);
    }

    #[test]
    fn literal_args_carry_kind_and_text() {
        let arg = "RobotBase".into_arg();
        assert_eq!(arg.kind(), ValueKind::STRING);
        assert_eq!(arg.text(), "\"RobotBase\"");

        let arg = [0.0f32; 6].into_arg();
        assert_eq!(arg.kind(), ValueKind::array(Scalar::Float, 6));
        assert_eq!(arg.to_string(), "{0,0,0,0,0,0}");
    }
}
