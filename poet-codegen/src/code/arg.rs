//! Template arguments.

use std::fmt;

use ktpoet_core::{format_f32, format_f64, format_integer};

use super::CodeBlock;
use crate::{
    names::{ClassName, MemberName, TypeName},
    spec::{AnnotationSpec, FunSpec, ParameterSpec, PropertySpec, TypeSpec},
};

/// One argument bound to a template placeholder.
///
/// Most callers never name this type: anything with a `From` impl can be
/// passed through [`args!`](crate::args) or [`code!`](crate::code). Numbers
/// keep both spellings until bound: `%L` writes `10000` as `10_000`, while
/// `%S` and `%P` quote the plain `10000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arg {
    /// Text emitted as-is by `%L`.
    Literal(String),
    /// A number, digit-grouped for `%L` and plain for `%S` and `%P`.
    Number { literal: String, plain: String },
    /// A string value for `%S`, `%P` or `%N`. `None` renders as `null`.
    Str(Option<String>),
    /// A nested fragment for `%L` or `%P`.
    Code(CodeBlock),
    /// An annotation emitted inline by `%L`.
    Annotation(Box<AnnotationSpec>),
    /// A type reference for `%T`.
    Type(TypeName),
    /// A member reference for `%M`, or its simple name for `%N`.
    Member(MemberName),
}

impl Arg {
    /// Short description used in error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Number { .. } => "number",
            Self::Str(Some(_)) => "string",
            Self::Str(None) => "null",
            Self::Code(_) => "code block",
            Self::Annotation(_) => "annotation",
            Self::Type(_) => "type",
            Self::Member(_) => "member",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.write_str(s),
            Self::Number { plain, .. } => f.write_str(plain),
            Self::Str(Some(s)) => write!(f, "{s:?}"),
            Self::Str(None) => f.write_str("null"),
            Self::Code(code) => write!(f, "{code:?}"),
            Self::Annotation(a) => write!(f, "@{:?}", a.type_name()),
            Self::Type(t) => write!(f, "{t:?}"),
            Self::Member(m) => write!(f, "{m}"),
        }
    }
}

macro_rules! integer_args {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Number {
                        literal: format_integer(value as i128),
                        plain: value.to_string(),
                    }
                }
            }
        )*
    };
}

integer_args!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Number {
            literal: format_f64(value),
            plain: plain_float(value.to_string(), value.is_finite()),
        }
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Self::Number {
            literal: format_f32(value),
            plain: plain_float(value.to_string(), value.is_finite()),
        }
    }
}

/// Float text the way Kotlin's `toString()` spells it.
fn plain_float(text: String, finite: bool) -> String {
    match text.as_str() {
        "inf" => "Infinity".to_string(),
        "-inf" => "-Infinity".to_string(),
        _ if finite && !text.contains('.') => format!("{text}.0"),
        _ => text,
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Str(Some(value.to_string()))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Str(Some(value))
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::Str(Some(value.clone()))
    }
}

impl From<Option<&str>> for Arg {
    fn from(value: Option<&str>) -> Self {
        Self::Str(value.map(str::to_string))
    }
}

impl From<Option<String>> for Arg {
    fn from(value: Option<String>) -> Self {
        Self::Str(value)
    }
}

impl From<CodeBlock> for Arg {
    fn from(value: CodeBlock) -> Self {
        Self::Code(value)
    }
}

impl From<&CodeBlock> for Arg {
    fn from(value: &CodeBlock) -> Self {
        Self::Code(value.clone())
    }
}

impl From<AnnotationSpec> for Arg {
    fn from(value: AnnotationSpec) -> Self {
        Self::Annotation(Box::new(value))
    }
}

impl From<ClassName> for Arg {
    fn from(value: ClassName) -> Self {
        Self::Type(TypeName::Class(value))
    }
}

impl From<&ClassName> for Arg {
    fn from(value: &ClassName) -> Self {
        Self::Type(TypeName::Class(value.clone()))
    }
}

impl From<TypeName> for Arg {
    fn from(value: TypeName) -> Self {
        Self::Type(value)
    }
}

impl From<&TypeName> for Arg {
    fn from(value: &TypeName) -> Self {
        Self::Type(value.clone())
    }
}

impl From<MemberName> for Arg {
    fn from(value: MemberName) -> Self {
        Self::Member(value)
    }
}

impl From<&MemberName> for Arg {
    fn from(value: &MemberName) -> Self {
        Self::Member(value.clone())
    }
}

// Declarations convert to their name, for `%N`.

impl From<&ParameterSpec> for Arg {
    fn from(value: &ParameterSpec) -> Self {
        Self::Str(Some(value.name().to_string()))
    }
}

impl From<&PropertySpec> for Arg {
    fn from(value: &PropertySpec) -> Self {
        Self::Str(Some(value.name().to_string()))
    }
}

impl From<&FunSpec> for Arg {
    fn from(value: &FunSpec) -> Self {
        Self::Str(Some(value.name().to_string()))
    }
}

impl From<&TypeSpec> for Arg {
    fn from(value: &TypeSpec) -> Self {
        Self::Str(value.name().map(str::to_string))
    }
}

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// use ktpoet_codegen::{args, names::kotlin};
///
/// let args = args![kotlin::string(), "taco", 3];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::code::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::code::Arg::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::kotlin;

    fn number(literal: &str, plain: &str) -> Arg {
        Arg::Number {
            literal: literal.into(),
            plain: plain.into(),
        }
    }

    #[test]
    fn test_numbers_keep_both_spellings() {
        assert_eq!(Arg::from(10_000), number("10_000", "10000"));
        assert_eq!(Arg::from(-1234), number("-1_234", "-1234"));
        assert_eq!(Arg::from(0.0001), number("0.0001", "0.0001"));
        assert_eq!(Arg::from(10_000.0), number("10_000.0", "10000.0"));
        assert_eq!(Arg::from(1.5f32), number("1.5", "1.5"));
        assert_eq!(
            Arg::from(u64::MAX),
            number("18_446_744_073_709_551_615", "18446744073709551615")
        );
        assert_eq!(Arg::from(f64::INFINITY), number("Double.POSITIVE_INFINITY", "Infinity"));
    }

    #[test]
    fn test_strings_and_null() {
        assert_eq!(Arg::from("taco"), Arg::Str(Some("taco".into())));
        assert_eq!(Arg::from(None::<&str>), Arg::Str(None));
    }

    #[test]
    fn test_args_macro() {
        let args = args![kotlin::int(), "x", true];
        assert!(matches!(args[0], Arg::Type(_)));
        assert!(matches!(args[1], Arg::Str(_)));
        assert_eq!(args[2], Arg::Literal("true".into()));
        assert!(args![].is_empty());
    }
}
