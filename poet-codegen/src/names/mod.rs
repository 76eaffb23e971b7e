//! Type and member names.
//!
//! - [`ClassName`] - a package-qualified, possibly nested class
//! - [`MemberName`] - an importable function or property
//! - [`TypeName`] - every type shape the renderer understands

mod class_name;
mod member_name;
mod type_name;

pub use class_name::ClassName;
pub use member_name::MemberName;
pub use type_name::{
    LambdaParameter, LambdaTypeName, ParameterizedTypeName, TypeName, TypeVariableName, Variance,
    WildcardTypeName,
};

impl ClassName {
    // Only for names known to be valid at compile time.
    pub(crate) fn known(package: &str, simple_name: &str) -> Self {
        match Self::new(package, [simple_name]) {
            Ok(name) => name,
            Err(e) => unreachable!("invalid built-in class name: {e}"),
        }
    }
}

/// Well-known classes from the Kotlin standard library.
pub mod kotlin {
    use super::ClassName;

    macro_rules! known_classes {
        ($($fn_name:ident => $package:literal . $simple:literal),* $(,)?) => {
            $(
                #[doc = concat!("`", $package, ".", $simple, "`")]
                pub fn $fn_name() -> ClassName {
                    ClassName::known($package, $simple)
                }
            )*
        };
    }

    known_classes! {
        any => "kotlin"."Any",
        array => "kotlin"."Array",
        unit => "kotlin"."Unit",
        boolean => "kotlin"."Boolean",
        byte => "kotlin"."Byte",
        short => "kotlin"."Short",
        int => "kotlin"."Int",
        long => "kotlin"."Long",
        char => "kotlin"."Char",
        float => "kotlin"."Float",
        double => "kotlin"."Double",
        string => "kotlin"."String",
        char_sequence => "kotlin"."CharSequence",
        number => "kotlin"."Number",
        nothing => "kotlin"."Nothing",
        throwable => "kotlin"."Throwable",
        annotation => "kotlin"."Annotation",
        enum_class => "kotlin"."Enum",
        comparable => "kotlin"."Comparable",
        iterable => "kotlin.collections"."Iterable",
        collection => "kotlin.collections"."Collection",
        list => "kotlin.collections"."List",
        set => "kotlin.collections"."Set",
        map => "kotlin.collections"."Map",
        mutable_list => "kotlin.collections"."MutableList",
        mutable_set => "kotlin.collections"."MutableSet",
        mutable_map => "kotlin.collections"."MutableMap",
    }

    /// Packages whose members Kotlin source sees without an import.
    pub const DEFAULT_IMPORTS: &[&str] = &[
        "kotlin",
        "kotlin.annotation",
        "kotlin.collections",
        "kotlin.comparisons",
        "kotlin.io",
        "kotlin.ranges",
        "kotlin.sequences",
        "kotlin.text",
    ];
}
