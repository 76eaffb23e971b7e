//! The type name sum type and its variant payloads.

use ktpoet_core::{Error, Result};

use super::ClassName;
use crate::spec::AnnotationSpec;

/// Any type that can appear in Kotlin source.
///
/// Every variant except [`TypeName::Wildcard`] carries its own nullability and
/// type annotations; copying with a different value rebuilds just that field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeName {
    /// A plain class, e.g. `kotlin.String`.
    Class(ClassName),
    /// A generic class with arguments, e.g. `List<String>`.
    Parameterized(ParameterizedTypeName),
    /// A type variable, e.g. `T`.
    Variable(TypeVariableName),
    /// A use-site projection, e.g. `out Number` or `*`.
    Wildcard(WildcardTypeName),
    /// A function type, e.g. `suspend String.(Int) -> Unit`.
    Lambda(LambdaTypeName),
    /// Kotlin/JS `dynamic`.
    Dynamic,
}

impl TypeName {
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Class(c) => c.is_nullable(),
            Self::Parameterized(p) => p.nullable,
            Self::Variable(v) => v.nullable,
            Self::Lambda(l) => l.nullable,
            Self::Wildcard(_) | Self::Dynamic => false,
        }
    }

    /// Copy with a different nullability. Wildcards and `dynamic` are returned unchanged.
    pub fn with_nullable(self, nullable: bool) -> Self {
        match self {
            Self::Class(c) => Self::Class(c.with_nullable(nullable)),
            Self::Parameterized(mut p) => {
                p.nullable = nullable;
                Self::Parameterized(p)
            }
            Self::Variable(mut v) => {
                v.nullable = nullable;
                Self::Variable(v)
            }
            Self::Lambda(mut l) => {
                l.nullable = nullable;
                Self::Lambda(l)
            }
            other @ (Self::Wildcard(_) | Self::Dynamic) => other,
        }
    }

    /// Shorthand for `with_nullable(true)`.
    pub fn nullable(self) -> Self {
        self.with_nullable(true)
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        match self {
            Self::Class(c) => c.annotations(),
            Self::Parameterized(p) => &p.annotations,
            Self::Variable(v) => &v.annotations,
            Self::Lambda(l) => &l.annotations,
            Self::Wildcard(_) | Self::Dynamic => &[],
        }
    }

    /// Copy with type annotations appended.
    pub fn annotated(self, annotations: impl IntoIterator<Item = AnnotationSpec>) -> Self {
        match self {
            Self::Class(c) => Self::Class(c.annotated(annotations)),
            Self::Parameterized(mut p) => {
                p.annotations.extend(annotations);
                Self::Parameterized(p)
            }
            Self::Variable(mut v) => {
                v.annotations.extend(annotations);
                Self::Variable(v)
            }
            Self::Lambda(mut l) => {
                l.annotations.extend(annotations);
                Self::Lambda(l)
            }
            other @ (Self::Wildcard(_) | Self::Dynamic) => other,
        }
    }

    /// Copy with all type annotations removed.
    pub fn without_annotations(self) -> Self {
        match self {
            Self::Class(c) => Self::Class(c.without_annotations()),
            Self::Parameterized(mut p) => {
                p.annotations.clear();
                Self::Parameterized(p)
            }
            Self::Variable(mut v) => {
                v.annotations.clear();
                Self::Variable(v)
            }
            Self::Lambda(mut l) => {
                l.annotations.clear();
                Self::Lambda(l)
            }
            other => other,
        }
    }

    /// The class name for a plain class type.
    pub fn as_class(&self) -> Option<&ClassName> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }
}

impl From<ClassName> for TypeName {
    fn from(class: ClassName) -> Self {
        Self::Class(class)
    }
}

impl From<&ClassName> for TypeName {
    fn from(class: &ClassName) -> Self {
        Self::Class(class.clone())
    }
}

impl From<ParameterizedTypeName> for TypeName {
    fn from(p: ParameterizedTypeName) -> Self {
        Self::Parameterized(p)
    }
}

impl From<TypeVariableName> for TypeName {
    fn from(v: TypeVariableName) -> Self {
        Self::Variable(v)
    }
}

impl From<WildcardTypeName> for TypeName {
    fn from(w: WildcardTypeName) -> Self {
        Self::Wildcard(w)
    }
}

impl From<LambdaTypeName> for TypeName {
    fn from(l: LambdaTypeName) -> Self {
        Self::Lambda(l)
    }
}

/// A generic class applied to type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterizedTypeName {
    pub raw: ClassName,
    pub arguments: Vec<TypeName>,
    pub nullable: bool,
    pub annotations: Vec<AnnotationSpec>,
}

impl ClassName {
    /// Apply type arguments to this class.
    ///
    /// ```
    /// use ktpoet_codegen::names::{kotlin, TypeName};
    ///
    /// let list = kotlin::list().parameterized_by([TypeName::from(kotlin::string())]);
    /// assert!(matches!(list, TypeName::Parameterized(_)));
    /// ```
    pub fn parameterized_by(&self, arguments: impl IntoIterator<Item = TypeName>) -> TypeName {
        TypeName::Parameterized(ParameterizedTypeName {
            raw: self.bare(),
            arguments: arguments.into_iter().collect(),
            nullable: self.is_nullable(),
            annotations: self.annotations().to_vec(),
        })
    }
}

/// Declaration-site or use-site variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variance {
    In,
    Out,
}

impl Variance {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// A type variable such as `T`, `out T : Number` or `reified T`.
///
/// No bounds means the implicit `Any?` bound, which is never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVariableName {
    pub name: String,
    pub bounds: Vec<TypeName>,
    pub variance: Option<Variance>,
    pub reified: bool,
    pub nullable: bool,
    pub annotations: Vec<AnnotationSpec>,
}

impl TypeVariableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
            variance: None,
            reified: false,
            nullable: false,
            annotations: Vec::new(),
        }
    }

    /// Add an upper bound.
    pub fn bound(mut self, bound: impl Into<TypeName>) -> Self {
        let bound = bound.into();
        if bound != TypeName::Class(super::kotlin::any().with_nullable(true)) {
            self.bounds.push(bound);
        }
        self
    }

    pub fn variance(mut self, variance: Variance) -> Self {
        self.variance = Some(variance);
        self
    }

    pub fn reified(mut self) -> Self {
        self.reified = true;
        self
    }
}

/// A use-site projection. Holds at most one bound; no bound renders as `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WildcardTypeName {
    out_bound: Option<Box<TypeName>>,
    in_bound: Option<Box<TypeName>>,
}

impl WildcardTypeName {
    /// Create a projection from optional producer and consumer bounds.
    pub fn new(out_bound: Option<TypeName>, in_bound: Option<TypeName>) -> Result<Self> {
        if out_bound.is_some() && in_bound.is_some() {
            return Err(Error::invalid_spec(
                "a wildcard type cannot have both an out and an in bound",
            ));
        }
        Ok(Self {
            out_bound: out_bound.map(Box::new),
            in_bound: in_bound.map(Box::new),
        })
    }

    /// `*`
    pub fn star() -> Self {
        Self {
            out_bound: None,
            in_bound: None,
        }
    }

    /// `out bound`
    pub fn producer_of(bound: impl Into<TypeName>) -> Self {
        Self {
            out_bound: Some(Box::new(bound.into())),
            in_bound: None,
        }
    }

    /// `in bound`
    pub fn consumer_of(bound: impl Into<TypeName>) -> Self {
        Self {
            out_bound: None,
            in_bound: Some(Box::new(bound.into())),
        }
    }

    pub fn out_bound(&self) -> Option<&TypeName> {
        self.out_bound.as_deref()
    }

    pub fn in_bound(&self) -> Option<&TypeName> {
        self.in_bound.as_deref()
    }
}

/// One parameter of a function type, optionally named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LambdaParameter {
    pub name: Option<String>,
    pub type_name: TypeName,
}

/// A function type such as `suspend String.(Int) -> Unit`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LambdaTypeName {
    pub receiver: Option<Box<TypeName>>,
    pub context: Vec<TypeName>,
    pub parameters: Vec<LambdaParameter>,
    pub returns: Box<TypeName>,
    pub suspending: bool,
    pub nullable: bool,
    pub annotations: Vec<AnnotationSpec>,
}

impl LambdaTypeName {
    pub fn new(
        parameters: impl IntoIterator<Item = TypeName>,
        returns: impl Into<TypeName>,
    ) -> Self {
        Self {
            receiver: None,
            context: Vec::new(),
            parameters: parameters
                .into_iter()
                .map(|type_name| LambdaParameter {
                    name: None,
                    type_name,
                })
                .collect(),
            returns: Box::new(returns.into()),
            suspending: false,
            nullable: false,
            annotations: Vec::new(),
        }
    }

    pub fn receiver(mut self, receiver: impl Into<TypeName>) -> Self {
        self.receiver = Some(Box::new(receiver.into()));
        self
    }

    /// Add a named parameter.
    pub fn named_parameter(mut self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.parameters.push(LambdaParameter {
            name: Some(name.into()),
            type_name: type_name.into(),
        });
        self
    }

    /// Add a context parameter type.
    pub fn context(mut self, context: impl Into<TypeName>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn suspending(mut self) -> Self {
        self.suspending = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::kotlin;

    #[test]
    fn test_nullable_copy_is_distinct() {
        let string = TypeName::from(kotlin::string());
        let nullable = string.clone().nullable();
        assert!(nullable.is_nullable());
        assert_ne!(string, nullable);
        assert_eq!(string, nullable.with_nullable(false));
    }

    #[test]
    fn test_parameterized_keeps_raw_bare() {
        let list = kotlin::list()
            .with_nullable(true)
            .parameterized_by([TypeName::from(kotlin::int())]);
        let TypeName::Parameterized(p) = &list else {
            panic!("expected parameterized type");
        };
        assert!(!p.raw.is_nullable());
        assert!(list.is_nullable());
    }

    #[test]
    fn test_wildcard_rejects_two_bounds() {
        let number = TypeName::from(kotlin::number());
        let err = WildcardTypeName::new(Some(number.clone()), Some(number)).unwrap_err();
        assert!(matches!(*err, Error::InvalidSpec { .. }));
        assert!(WildcardTypeName::new(None, None).is_ok());
    }

    #[test]
    fn test_wildcard_ignores_nullability() {
        let star = TypeName::from(WildcardTypeName::star());
        assert_eq!(star.clone().nullable(), star);
    }

    #[test]
    fn test_type_variable_drops_nullable_any_bound() {
        let t = TypeVariableName::new("T")
            .bound(kotlin::any().with_nullable(true))
            .bound(kotlin::number());
        assert_eq!(t.bounds, vec![TypeName::from(kotlin::number())]);
    }

    #[test]
    fn test_lambda_builder() {
        let lambda = LambdaTypeName::new([TypeName::from(kotlin::int())], kotlin::unit())
            .receiver(kotlin::string())
            .suspending();
        assert!(lambda.suspending);
        assert_eq!(lambda.parameters.len(), 1);
        assert!(lambda.parameters[0].name.is_none());
    }
}
