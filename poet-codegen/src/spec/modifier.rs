use std::{collections::BTreeSet, fmt};

/// Kotlin declaration modifiers.
///
/// Variant order is the conventional emission order, so a sorted set of
/// modifiers renders correctly by iterating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KModifier {
    Public,
    Protected,
    Private,
    Internal,
    Expect,
    Actual,
    Final,
    Open,
    Abstract,
    Sealed,
    Const,
    External,
    Override,
    Lateinit,
    Tailrec,
    Vararg,
    Suspend,
    Inner,
    Enum,
    Annotation,
    Value,
    Fun,
    Companion,
    Inline,
    Noinline,
    Crossinline,
    Reified,
    Infix,
    Operator,
    Data,
    In,
    Out,
}

impl KModifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Internal => "internal",
            Self::Expect => "expect",
            Self::Actual => "actual",
            Self::Final => "final",
            Self::Open => "open",
            Self::Abstract => "abstract",
            Self::Sealed => "sealed",
            Self::Const => "const",
            Self::External => "external",
            Self::Override => "override",
            Self::Lateinit => "lateinit",
            Self::Tailrec => "tailrec",
            Self::Vararg => "vararg",
            Self::Suspend => "suspend",
            Self::Inner => "inner",
            Self::Enum => "enum",
            Self::Annotation => "annotation",
            Self::Value => "value",
            Self::Fun => "fun",
            Self::Companion => "companion",
            Self::Inline => "inline",
            Self::Noinline => "noinline",
            Self::Crossinline => "crossinline",
            Self::Reified => "reified",
            Self::Infix => "infix",
            Self::Operator => "operator",
            Self::Data => "data",
            Self::In => "in",
            Self::Out => "out",
        }
    }

    /// Parse a modifier from its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        ALL.iter().copied().find(|m| m.keyword() == keyword)
    }

    pub fn is_visibility(&self) -> bool {
        matches!(
            self,
            Self::Public | Self::Protected | Self::Private | Self::Internal
        )
    }
}

impl fmt::Display for KModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

const ALL: [KModifier; 32] = [
    KModifier::Public,
    KModifier::Protected,
    KModifier::Private,
    KModifier::Internal,
    KModifier::Expect,
    KModifier::Actual,
    KModifier::Final,
    KModifier::Open,
    KModifier::Abstract,
    KModifier::Sealed,
    KModifier::Const,
    KModifier::External,
    KModifier::Override,
    KModifier::Lateinit,
    KModifier::Tailrec,
    KModifier::Vararg,
    KModifier::Suspend,
    KModifier::Inner,
    KModifier::Enum,
    KModifier::Annotation,
    KModifier::Value,
    KModifier::Fun,
    KModifier::Companion,
    KModifier::Inline,
    KModifier::Noinline,
    KModifier::Crossinline,
    KModifier::Reified,
    KModifier::Infix,
    KModifier::Operator,
    KModifier::Data,
    KModifier::In,
    KModifier::Out,
];

/// The modifiers a declaration should print, given what it declares and what
/// its context implies.
///
/// `public` is printed when it is explicit, or when it is implied and nothing
/// else (another visibility or `override`) already settles visibility. Other
/// implied modifiers are never printed.
pub(crate) fn modifiers_to_emit(
    modifiers: &BTreeSet<KModifier>,
    implicit: &BTreeSet<KModifier>,
) -> Vec<KModifier> {
    let mut out = Vec::new();
    let public_implied = implicit.contains(&KModifier::Public)
        && !modifiers.contains(&KModifier::Override)
        && !modifiers
            .iter()
            .any(|m| m.is_visibility() && *m != KModifier::Public);
    if modifiers.contains(&KModifier::Public) || public_implied {
        out.push(KModifier::Public);
    }
    out.extend(
        modifiers
            .iter()
            .copied()
            .filter(|m| *m != KModifier::Public && !implicit.contains(m)),
    );
    out
}
