//! Manifest schema: one Kotlin file per manifest.

use ktpoet_codegen::RenderConfig;
use serde::Deserialize;

use crate::error::SourceContext;

/// Root of a `ktpoet.toml` manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub file: FileSection,

    /// Render settings, deserialized straight into [`RenderConfig`].
    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub types: Vec<TypeDecl>,

    #[serde(default)]
    pub functions: Vec<FunctionDecl>,

    #[serde(default)]
    pub properties: Vec<PropertyDecl>,

    #[serde(default)]
    pub typealiases: Vec<TypeAliasDecl>,

    /// The text this manifest was parsed from, for diagnostics.
    #[serde(skip)]
    pub(crate) source: Option<SourceContext>,
}

/// The `[file]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSection {
    /// Empty for the default package.
    #[serde(default)]
    pub package: String,
    pub name: String,
    pub comment: Option<String>,
    /// Fully qualified names to import, e.g. `kotlinx.coroutines.launch`.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Packages whose imports are implied, e.g. `kotlin`.
    #[serde(default)]
    pub default_imports: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDeclKind {
    Class,
    Object,
    Interface,
    Enum,
    Annotation,
}

/// A class, object, interface, enum or annotation class.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Type variables, e.g. `T` or `T : kotlin.Comparable<T>`.
    #[serde(default)]
    pub type_variables: Vec<String>,
    pub kdoc: Option<String>,
    pub superclass: Option<String>,
    #[serde(default)]
    pub superclass_args: Vec<Statement>,
    #[serde(default)]
    pub superinterfaces: Vec<String>,
    #[serde(default)]
    pub enum_constants: Vec<String>,
    /// Primary-constructor parameters.
    #[serde(default)]
    pub constructor: Vec<ConstructorParam>,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    /// Nested types.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructorParam {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Promote the parameter to a `var` property.
    #[serde(default)]
    pub mutable: bool,
    /// Promote the parameter to a property at all.
    #[serde(default = "default_true")]
    pub property: bool,
    pub default: Option<Statement>,
    pub kdoc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub default: Option<Statement>,
    pub kdoc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub type_variables: Vec<String>,
    pub receiver: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    pub returns: Option<String>,
    pub kdoc: Option<String>,
    /// One entry per statement.
    #[serde(default)]
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub kdoc: Option<String>,
    pub initializer: Option<Statement>,
    /// Delegate expression, rendered after `by`.
    pub delegate: Option<Statement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeAliasDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub type_variables: Vec<String>,
    pub kdoc: Option<String>,
}

/// A template with its arguments, e.g.
/// `{ format = "println(%S)", args = [{ string = "yum" }] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Statement {
    pub format: String,
    #[serde(default)]
    pub args: Vec<ArgDecl>,
}

/// A template argument, written as a table with a single key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgDecl {
    /// A string value, for `%S`, `%P` or `%N`.
    String(String),
    /// A TOML scalar emitted as-is; numbers are formatted Kotlin style.
    Literal(toml::Value),
    /// A type expression, for `%T`.
    Type(String),
    /// A qualified member such as `kotlinx.coroutines.launch`, for `%M`.
    Member(String),
    /// An identifier, for `%N`.
    Name(String),
    /// `null`, for `%S` or `%P`.
    Null(bool),
}

fn default_true() -> bool {
    true
}
