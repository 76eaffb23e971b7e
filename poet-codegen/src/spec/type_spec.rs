//! Classes, objects, interfaces and enum constant bodies.

use std::{collections::BTreeSet, fmt};

use indexmap::IndexMap;
use ktpoet_core::{Error, Result};

use super::{
    AnnotationSpec, FunSpec, KModifier, PropertySpec, TypeAliasSpec,
    parameter::emit_parameters,
    property::EmitOptions,
};
use crate::{
    args,
    code::{Arg, CodeBlock, CodeBlockBuilder},
    names::{TypeName, TypeVariableName, kotlin},
    writer::{CodeWriter, TypeScope, render_standalone},
};

const COMPANION_NAME: &str = "Companion";

/// The declaration keyword of a [`TypeSpec`]. Enum, annotation, value and
/// data classes are classes with the matching modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Object,
    Interface,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Object => "object",
            Self::Interface => "interface",
        }
    }

    fn default_implicit(&self) -> BTreeSet<KModifier> {
        match self {
            Self::Class | Self::Object => [KModifier::Public].into(),
            Self::Interface => [KModifier::Public, KModifier::Abstract].into(),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A type declaration and its members.
///
/// ```
/// use ktpoet_codegen::{args, names::kotlin, spec::{FunSpec, ParameterSpec, PropertySpec, TypeSpec}};
///
/// let taco = TypeSpec::class_builder("Taco")
///     .primary_constructor(
///         FunSpec::constructor_builder()
///             .add_parameter(ParameterSpec::new("name", kotlin::string()).unwrap())
///             .build()
///             .unwrap(),
///     )
///     .add_property(
///         PropertySpec::builder("name", kotlin::string())
///             .initializer("name", args![])
///             .unwrap()
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
/// assert_eq!(
///     taco.to_string(),
///     "public class Taco(\n  public val name: kotlin.String,\n)\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    kind: TypeKind,
    /// `None` for anonymous classes.
    name: Option<String>,
    kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: BTreeSet<KModifier>,
    type_variables: Vec<TypeVariableName>,
    context_receivers: Vec<TypeName>,
    primary_constructor: Option<FunSpec>,
    superclass: TypeName,
    superclass_constructor_arguments: Vec<CodeBlock>,
    superinterfaces: IndexMap<TypeName, Option<CodeBlock>>,
    enum_constants: IndexMap<String, TypeSpec>,
    properties: Vec<PropertySpec>,
    initializer_block: CodeBlock,
    /// Number of properties declared before the initializer block.
    initializer_index: Option<usize>,
    /// Secondary constructors and functions.
    functions: Vec<FunSpec>,
    types: Vec<TypeSpec>,
    type_aliases: Vec<TypeAliasSpec>,
}

impl TypeSpec {
    pub fn class_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Class, Some(name.into()))
    }

    pub fn object_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Object, Some(name.into()))
    }

    /// A companion object, named `Companion` unless `name` is given.
    pub fn companion_object_builder(name: Option<&str>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(
            TypeKind::Object,
            Some(name.unwrap_or(COMPANION_NAME).to_string()),
        )
        .add_modifiers([KModifier::Companion])
    }

    pub fn interface_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Interface, Some(name.into()))
    }

    pub fn fun_interface_builder(name: impl Into<String>) -> TypeSpecBuilder {
        Self::interface_builder(name).add_modifiers([KModifier::Fun])
    }

    pub fn enum_builder(name: impl Into<String>) -> TypeSpecBuilder {
        Self::class_builder(name).add_modifiers([KModifier::Enum])
    }

    pub fn annotation_builder(name: impl Into<String>) -> TypeSpecBuilder {
        Self::class_builder(name).add_modifiers([KModifier::Annotation])
    }

    pub fn value_class_builder(name: impl Into<String>) -> TypeSpecBuilder {
        Self::class_builder(name).add_modifiers([KModifier::Value])
    }

    /// An anonymous class, used as the body of an enum constant.
    pub fn anonymous_class_builder() -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Class, None)
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn modifiers(&self) -> &BTreeSet<KModifier> {
        &self.modifiers
    }

    pub fn primary_constructor(&self) -> Option<&FunSpec> {
        self.primary_constructor.as_ref()
    }

    pub fn superclass(&self) -> &TypeName {
        &self.superclass
    }

    pub fn enum_constants(&self) -> &IndexMap<String, TypeSpec> {
        &self.enum_constants
    }

    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    pub fn functions(&self) -> &[FunSpec] {
        &self.functions
    }

    pub fn types(&self) -> &[TypeSpec] {
        &self.types
    }

    pub fn is_enum(&self) -> bool {
        self.modifiers.contains(&KModifier::Enum)
    }

    fn is_companion(&self) -> bool {
        self.kind == TypeKind::Object && self.modifiers.contains(&KModifier::Companion)
    }

    /// Modifiers implied for properties declared in this type.
    fn implicit_property_modifiers(&self, modifiers: &BTreeSet<KModifier>) -> BTreeSet<KModifier> {
        let mut implicit = self.kind.default_implicit();
        if !modifiers.contains(&KModifier::Annotation) {
            implicit.extend(inherited(modifiers));
        }
        implicit
    }

    fn implicit_function_modifiers(&self, modifiers: &BTreeSet<KModifier>) -> BTreeSet<KModifier> {
        let mut implicit = self.kind.default_implicit();
        if modifiers.contains(&KModifier::Annotation) {
            implicit.insert(KModifier::Abstract);
        }
        implicit.extend(inherited(modifiers));
        implicit
    }

    /// Properties declared by primary constructor parameters, by name.
    ///
    /// Properties after the initializer block stay in the body so the
    /// initialization order is kept.
    fn constructor_properties(&self) -> IndexMap<String, PropertySpec> {
        let Some(constructor) = &self.primary_constructor else {
            return IndexMap::new();
        };
        let candidates = match self.initializer_index {
            Some(index) => &self.properties[..index.min(self.properties.len())],
            None => &self.properties[..],
        };
        let mut result = IndexMap::new();
        for property in candidates {
            let Some(parameter) = constructor
                .parameters()
                .iter()
                .find(|p| p.name() == property.name())
            else {
                continue;
            };
            if property.matches_constructor_parameter(parameter) {
                result.insert(
                    property.name().to_string(),
                    property.from_constructor_parameter(parameter),
                );
            }
        }
        result
    }

    fn has_no_body(&self, constructor_properties: &IndexMap<String, PropertySpec>) -> bool {
        self.enum_constants.is_empty() && !self.has_non_enum_constant_members(constructor_properties)
    }

    fn has_non_enum_constant_members(
        &self,
        constructor_properties: &IndexMap<String, PropertySpec>,
    ) -> bool {
        self.properties
            .iter()
            .any(|p| !constructor_properties.contains_key(p.name()))
            || !self.initializer_block.is_empty()
            || self
                .primary_constructor
                .as_ref()
                .is_some_and(|c| !c.body().is_empty())
            || !self.functions.is_empty()
            || !self.types.is_empty()
            || !self.type_aliases.is_empty()
    }

    fn scope(&self) -> TypeScope {
        TypeScope {
            name: self.name.clone(),
            nested: self.types.iter().filter_map(|t| t.name.clone()).collect(),
            enum_constants: self.enum_constants.keys().cloned().collect(),
            functions: self
                .functions
                .iter()
                .filter(|f| !f.is_constructor())
                .map(|f| f.name().to_string())
                .collect(),
            inner: self.modifiers.contains(&KModifier::Inner),
        }
    }

    /// Emit the type. `enum_name` is set when this is the body of an enum
    /// constant.
    pub(crate) fn emit(
        &self,
        w: &mut CodeWriter<'_>,
        enum_name: Option<&str>,
        implicit: &BTreeSet<KModifier>,
        is_nested_external: bool,
    ) -> Result<()> {
        let constructor_properties = self.constructor_properties();
        let has_no_body = self.has_no_body(&constructor_properties);

        if let Some(enum_name) = enum_name {
            w.emit_kdoc(&self.kdoc_with_constructor_docs(&constructor_properties)?)?;
            w.emit_annotations(&self.annotations, false)?;
            w.emit_template("%N", args![enum_name])?;
            if !self.superclass_constructor_arguments.is_empty() {
                w.emit("(");
                w.emit_code(&self.superclass_arguments())?;
                w.emit(")");
            }
            if has_no_body {
                return Ok(());
            }
            w.emit(" {\n");
        } else if self.name.is_none() {
            w.emit("object");
            let mut supertypes = Vec::new();
            if !self.extends_any() {
                supertypes.push(CodeBlock::of(
                    " %T(%L)",
                    args![&self.superclass, self.superclass_arguments()],
                )?);
            }
            for interface in self.superinterfaces.keys() {
                supertypes.push(CodeBlock::of(" %T", args![interface])?);
            }
            if !supertypes.is_empty() {
                w.emit(" :");
                w.emit_code(&CodeBlock::join(supertypes, ",", "", ""))?;
            }
            if has_no_body {
                w.emit(" {\n}");
                return Ok(());
            }
            w.emit(" {\n");
        } else {
            w.emit_kdoc(&self.kdoc_with_constructor_docs(&constructor_properties)?)?;
            w.emit_context_receivers(&self.context_receivers, "\n")?;
            w.emit_annotations(&self.annotations, false)?;
            let type_implicit: BTreeSet<KModifier> = if is_nested_external {
                [KModifier::Public, KModifier::External].into()
            } else {
                [KModifier::Public].into()
            };
            w.emit_modifiers(&self.modifiers, &type_implicit);
            w.emit(self.kind.keyword());
            if let Some(name) = &self.name
                && !(self.is_companion() && name == COMPANION_NAME)
            {
                w.emit_template(" %N", args![name.as_str()])?;
            }
            w.emit_type_variables(&self.type_variables)?;

            let mut wrap_supertypes = false;
            if let Some(constructor) = &self.primary_constructor {
                w.push_type(self.scope());
                let emitted = self.emit_primary_constructor(w, constructor, &constructor_properties);
                w.pop_type();
                emitted?;
                wrap_supertypes = !constructor.parameters().is_empty();
            }
            self.emit_supertypes(w, wrap_supertypes)?;
            w.emit_where_block(&self.type_variables)?;
            if has_no_body {
                w.emit("\n");
                return Ok(());
            }
            w.emit(" {\n");
        }

        let modifiers: BTreeSet<KModifier> = self.modifiers.union(implicit).copied().collect();
        w.push_type(self.scope());
        let emitted = self.emit_body(w, &modifiers, &constructor_properties);
        w.pop_type();
        emitted?;

        w.emit("}");
        if enum_name.is_none() && self.name.is_some() {
            w.emit("\n");
        }
        Ok(())
    }

    fn emit_primary_constructor(
        &self,
        w: &mut CodeWriter<'_>,
        constructor: &FunSpec,
        constructor_properties: &IndexMap<String, PropertySpec>,
    ) -> Result<()> {
        let annotated = !constructor.annotations().is_empty();
        if annotated {
            w.emit(" ");
            w.emit_annotations(constructor.annotations(), true)?;
        }
        let modified = !constructor.modifiers().is_empty();
        if modified {
            w.emit(" ");
            w.emit_modifiers(constructor.modifiers(), &BTreeSet::new());
        }
        if annotated || modified {
            w.emit("constructor");
        }

        let public: BTreeSet<KModifier> = [KModifier::Public].into();
        emit_parameters(w, constructor.parameters().iter(), true, |w, parameter| {
            match constructor_properties.get(parameter.name()) {
                Some(property) => {
                    property.emit(w, &public, EmitOptions::constructor_property())?;
                    parameter.emit_default_value(w)
                }
                None => parameter.emit(w, true),
            }
        })
    }

    fn extends_any(&self) -> bool {
        self.superclass == TypeName::Class(kotlin::any())
    }

    fn superclass_arguments(&self) -> CodeBlock {
        CodeBlock::join(
            self.superclass_constructor_arguments.iter().cloned(),
            ", ",
            "",
            "",
        )
    }

    fn emit_supertypes(&self, w: &mut CodeWriter<'_>, wrap: bool) -> Result<()> {
        let mut supertypes = Vec::new();
        if !self.extends_any() {
            let has_secondary = self.functions.iter().any(FunSpec::is_constructor);
            let declared_elsewhere = self.modifiers.contains(&KModifier::Expect)
                || self.modifiers.contains(&KModifier::External);
            let call_constructor =
                (self.primary_constructor.is_some() || !has_secondary) && !declared_elsewhere;
            supertypes.push(if call_constructor {
                CodeBlock::of("%T(%L)", args![&self.superclass, self.superclass_arguments()])?
            } else {
                CodeBlock::of("%T", args![&self.superclass])?
            });
        }
        for (interface, delegate) in &self.superinterfaces {
            supertypes.push(match delegate {
                Some(delegate) => CodeBlock::of("%T by %L", args![interface, delegate])?,
                None => CodeBlock::of("%T", args![interface])?,
            });
        }
        if supertypes.is_empty() {
            return Ok(());
        }

        w.emit(" : ");
        if wrap {
            // One supertype per line, aligned past the closing parenthesis.
            w.indent(2);
            w.emit_code(&CodeBlock::join(supertypes, ",\n", "", ""))?;
            w.unindent(2)?;
        } else {
            w.emit_code(&CodeBlock::join(supertypes, ",♢", "", ""))?;
        }
        Ok(())
    }

    fn emit_body(
        &self,
        w: &mut CodeWriter<'_>,
        modifiers: &BTreeSet<KModifier>,
        constructor_properties: &IndexMap<String, PropertySpec>,
    ) -> Result<()> {
        w.indent(1);
        let mut first = true;

        for (name, constant) in &self.enum_constants {
            separate(w, &mut first);
            constant.emit(w, Some(name), &BTreeSet::new(), false)?;
            w.emit(",");
        }
        if self.is_enum() {
            if !first {
                w.emit("\n");
            }
            if self.has_non_enum_constant_members(constructor_properties) {
                w.emit(";\n");
            }
        }

        let property_implicit = self.implicit_property_modifiers(modifiers);
        for (index, property) in self.properties.iter().enumerate() {
            if self.initializer_index == Some(index) {
                separate(w, &mut first);
                emit_init_block(w, &self.initializer_block)?;
            }
            if constructor_properties.contains_key(property.name()) {
                continue;
            }
            separate(w, &mut first);
            property.emit(w, &property_implicit, EmitOptions::default())?;
        }
        if let Some(index) = self.initializer_index
            && index >= self.properties.len()
        {
            separate(w, &mut first);
            emit_init_block(w, &self.initializer_block)?;
        }

        if let Some(constructor) = &self.primary_constructor
            && !constructor.body().is_empty()
        {
            separate(w, &mut first);
            emit_init_block(w, constructor.body())?;
        }

        let function_implicit = self.implicit_function_modifiers(modifiers);
        for constructor in self.functions.iter().filter(|f| f.is_constructor()) {
            separate(w, &mut first);
            constructor.emit(w, &function_implicit, false)?;
        }
        for function in self.functions.iter().filter(|f| !f.is_constructor()) {
            separate(w, &mut first);
            function.emit(w, &function_implicit, true)?;
        }

        let type_implicit: BTreeSet<KModifier> = inherited(modifiers).collect();
        let nested_external = modifiers.contains(&KModifier::External);
        for nested in &self.types {
            separate(w, &mut first);
            nested.emit(w, None, &type_implicit, nested_external)?;
        }
        for alias in &self.type_aliases {
            separate(w, &mut first);
            alias.emit(w)?;
        }

        w.unindent(1)?;
        Ok(())
    }

    /// The class kdoc followed by `@constructor`, `@param` and `@property`
    /// tags from the primary constructor.
    fn kdoc_with_constructor_docs(
        &self,
        constructor_properties: &IndexMap<String, PropertySpec>,
    ) -> Result<CodeBlock> {
        let class_kdoc = self.kdoc.ensure_ends_with_newline();
        let mut tags = CodeBlock::builder();
        if let Some(constructor) = &self.primary_constructor {
            if !constructor.kdoc().is_empty() {
                tags = tags.add(
                    "@constructor %L",
                    args![constructor.kdoc().ensure_ends_with_newline()],
                )?;
            }
            for parameter in constructor.parameters() {
                let (tag, kdoc) = match constructor_properties.get(parameter.name()) {
                    Some(property) => ("@property", property.kdoc()),
                    None => ("@param", parameter.kdoc()),
                };
                if !kdoc.is_empty() {
                    tags = tags.add(
                        &format!("{tag} %L %L"),
                        args![parameter.name(), kdoc.ensure_ends_with_newline()],
                    )?;
                }
            }
        }
        let blocks = [class_kdoc, tags.build()?]
            .into_iter()
            .filter(|block| !block.is_empty());
        Ok(CodeBlock::join(blocks, "\n", "", ""))
    }
}

/// `expect` and `external` carry over to members.
fn inherited(modifiers: &BTreeSet<KModifier>) -> impl Iterator<Item = KModifier> + '_ {
    [KModifier::Expect, KModifier::External]
        .into_iter()
        .filter(|m| modifiers.contains(m))
}

fn separate(w: &mut CodeWriter<'_>, first: &mut bool) {
    if !*first {
        w.emit("\n");
    }
    *first = false;
}

fn emit_init_block(w: &mut CodeWriter<'_>, code: &CodeBlock) -> Result<()> {
    w.emit("init {\n").indent(1);
    w.emit_code_with(code, false, true)?;
    w.unindent(1)?.emit("}\n");
    Ok(())
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_standalone(f, |w| self.emit(w, None, &BTreeSet::new(), false))
    }
}

/// Builder for [`TypeSpec`].
#[derive(Debug, Clone)]
pub struct TypeSpecBuilder {
    kind: TypeKind,
    name: Option<String>,
    kdoc: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    modifiers: BTreeSet<KModifier>,
    type_variables: Vec<TypeVariableName>,
    context_receivers: Vec<TypeName>,
    primary_constructor: Option<FunSpec>,
    superclass: TypeName,
    superclass_constructor_arguments: Vec<CodeBlock>,
    superinterfaces: IndexMap<TypeName, Option<CodeBlock>>,
    enum_constants: IndexMap<String, TypeSpec>,
    properties: Vec<PropertySpec>,
    initializer_block: CodeBlockBuilder,
    initializer_index: Option<usize>,
    functions: Vec<FunSpec>,
    types: Vec<TypeSpec>,
    type_aliases: Vec<TypeAliasSpec>,
}

impl TypeSpecBuilder {
    fn new(kind: TypeKind, name: Option<String>) -> Self {
        Self {
            kind,
            name,
            kdoc: CodeBlock::builder(),
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            type_variables: Vec::new(),
            context_receivers: Vec::new(),
            primary_constructor: None,
            superclass: kotlin::any().into(),
            superclass_constructor_arguments: Vec::new(),
            superinterfaces: IndexMap::new(),
            enum_constants: IndexMap::new(),
            properties: Vec::new(),
            initializer_block: CodeBlock::builder(),
            initializer_index: None,
            functions: Vec::new(),
            types: Vec::new(),
            type_aliases: Vec::new(),
        }
    }

    pub fn add_kdoc(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.kdoc = self.kdoc.add(format, args)?;
        Ok(self)
    }

    pub fn add_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn add_modifiers(mut self, modifiers: impl IntoIterator<Item = KModifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn add_type_variable(mut self, variable: TypeVariableName) -> Self {
        self.type_variables.push(variable);
        self
    }

    pub fn add_context_receiver(mut self, receiver: impl Into<TypeName>) -> Self {
        self.context_receivers.push(receiver.into());
        self
    }

    pub fn primary_constructor(mut self, constructor: FunSpec) -> Self {
        self.primary_constructor = Some(constructor);
        self
    }

    pub fn superclass(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = superclass.into();
        self
    }

    pub fn add_superclass_constructor_argument(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.superclass_constructor_arguments
            .push(CodeBlock::of(format, args)?);
        Ok(self)
    }

    pub fn add_superinterface(mut self, interface: impl Into<TypeName>) -> Self {
        self.superinterfaces.insert(interface.into(), None);
        self
    }

    /// Implement `interface` by delegation: `Interface by delegate`.
    pub fn add_superinterface_delegate(
        mut self,
        interface: impl Into<TypeName>,
        format: &str,
        args: Vec<Arg>,
    ) -> Result<Self> {
        self.superinterfaces
            .insert(interface.into(), Some(CodeBlock::of(format, args)?));
        Ok(self)
    }

    pub fn add_enum_constant(self, name: impl Into<String>) -> Result<Self> {
        let body = TypeSpec::anonymous_class_builder().build()?;
        Ok(self.add_enum_constant_with(name, body))
    }

    /// Add an enum constant whose anonymous class carries arguments or members.
    pub fn add_enum_constant_with(mut self, name: impl Into<String>, body: TypeSpec) -> Self {
        self.enum_constants.insert(name.into(), body);
        self
    }

    pub fn add_property(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }

    pub fn add_properties(mut self, properties: impl IntoIterator<Item = PropertySpec>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Append to the `init` block, which is placed after the properties
    /// added so far.
    pub fn add_initializer_block(mut self, code: CodeBlock) -> Self {
        if self.initializer_index.is_none() {
            self.initializer_index = Some(self.properties.len());
        }
        self.initializer_block = self.initializer_block.add_code(code);
        self
    }

    pub fn add_function(mut self, function: FunSpec) -> Self {
        self.functions.push(function);
        self
    }

    pub fn add_functions(mut self, functions: impl IntoIterator<Item = FunSpec>) -> Self {
        self.functions.extend(functions);
        self
    }

    pub fn add_type(mut self, nested: TypeSpec) -> Self {
        self.types.push(nested);
        self
    }

    pub fn add_type_alias(mut self, alias: TypeAliasSpec) -> Self {
        self.type_aliases.push(alias);
        self
    }

    pub fn build(self) -> Result<TypeSpec> {
        let display_name = self.name.as_deref().unwrap_or("anonymous class");
        let is_enum = self.modifiers.contains(&KModifier::Enum);
        let is_abstract = self.modifiers.contains(&KModifier::Abstract)
            || self.modifiers.contains(&KModifier::Sealed)
            || self.kind == TypeKind::Interface
            || is_enum;

        if self.name.as_deref() == Some("") {
            return Err(Error::invalid_spec("type name cannot be empty"));
        }
        if !self.enum_constants.is_empty() && !is_enum {
            return Err(Error::invalid_spec(format!(
                "{display_name} is not an enum and cannot have enum constants"
            )));
        }
        if let Some((name, _)) = self.enum_constants.iter().find(|(_, c)| c.name.is_some()) {
            return Err(Error::invalid_spec(format!(
                "enum constant {name} must be an anonymous class"
            )));
        }
        if self.name.is_none() && !self.type_variables.is_empty() {
            return Err(Error::invalid_spec(
                "anonymous classes cannot have type variables",
            ));
        }
        if self.superclass != TypeName::Class(kotlin::any()) && self.kind != TypeKind::Class {
            return Err(Error::invalid_spec(format!(
                "only classes have superclasses, not {}",
                self.kind
            )));
        }
        if self.modifiers.contains(&KModifier::Companion) && self.kind != TypeKind::Object {
            return Err(Error::invalid_spec(format!(
                "{display_name} is not an object and cannot be a companion"
            )));
        }
        if let Some(constructor) = &self.primary_constructor {
            if !constructor.is_constructor() {
                return Err(Error::invalid_spec(format!(
                    "primary constructor of {display_name} must be a constructor"
                )));
            }
            if self.kind != TypeKind::Class {
                return Err(Error::invalid_spec(format!(
                    "{} {display_name} cannot have a primary constructor",
                    self.kind
                )));
            }
        }
        for property in &self.properties {
            if property.modifiers().contains(&KModifier::Abstract) && !is_abstract {
                return Err(Error::invalid_spec(format!(
                    "non-abstract type {display_name} cannot declare abstract property {}",
                    property.name()
                )));
            }
        }
        for function in &self.functions {
            if function.is_accessor() {
                return Err(Error::invalid_spec(format!(
                    "{display_name} cannot declare accessor {} as a function",
                    function.name()
                )));
            }
            if function.modifiers().contains(&KModifier::Abstract) && !is_abstract {
                return Err(Error::invalid_spec(format!(
                    "non-abstract type {display_name} cannot declare abstract function {}",
                    function.name()
                )));
            }
            if self.modifiers.contains(&KModifier::Annotation) {
                return Err(Error::invalid_spec(format!(
                    "annotation class {display_name} cannot declare member function {}",
                    function.name()
                )));
            }
            if self.modifiers.contains(&KModifier::Expect) && !function.body().is_empty() {
                return Err(Error::invalid_spec(format!(
                    "functions in expect class {display_name} cannot have bodies: {}",
                    function.name()
                )));
            }
        }
        if self.kind == TypeKind::Interface && self.modifiers.contains(&KModifier::Fun) {
            let abstract_functions = self
                .functions
                .iter()
                .filter(|f| f.modifiers().contains(&KModifier::Abstract) || f.body().is_empty())
                .count();
            if abstract_functions != 1 {
                return Err(Error::invalid_spec(format!(
                    "fun interface {display_name} must have exactly one abstract function, found {abstract_functions}"
                )));
            }
        }

        Ok(TypeSpec {
            kind: self.kind,
            name: self.name,
            kdoc: self.kdoc.build()?,
            annotations: self.annotations,
            modifiers: self.modifiers,
            type_variables: self.type_variables,
            context_receivers: self.context_receivers,
            primary_constructor: self.primary_constructor,
            superclass: self.superclass,
            superclass_constructor_arguments: self.superclass_constructor_arguments,
            superinterfaces: self.superinterfaces,
            enum_constants: self.enum_constants,
            properties: self.properties,
            initializer_block: self.initializer_block.build()?,
            initializer_index: self.initializer_index,
            functions: self.functions,
            types: self.types,
            type_aliases: self.type_aliases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{names::ClassName, spec::ParameterSpec};

    fn class(name: &str) -> ClassName {
        ClassName::new("com.example", [name]).unwrap()
    }

    fn property(name: &str, type_name: ClassName, initializer: &str) -> PropertySpec {
        PropertySpec::builder(name, type_name)
            .initializer(initializer, args![])
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_constructor_properties_fold_into_constructor() {
        let constructor = FunSpec::constructor_builder()
            .add_parameter(ParameterSpec::new("name", kotlin::string()).unwrap())
            .add_parameter(
                ParameterSpec::builder("size", kotlin::int())
                    .default_value("%L", args![1])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let size = PropertySpec::builder("size", kotlin::int())
            .mutable(true)
            .initializer("size", args![])
            .unwrap()
            .build()
            .unwrap();
        let taco = TypeSpec::class_builder("Taco")
            .add_modifiers([KModifier::Data])
            .primary_constructor(constructor)
            .add_property(property("name", kotlin::string(), "name"))
            .add_property(size)
            .build()
            .unwrap();
        assert_eq!(
            taco.to_string(),
            "public data class Taco(\n  public val name: kotlin.String,\n  public var size: kotlin.Int = 1,\n)\n"
        );
    }

    #[test]
    fn test_enum_with_members() {
        let roshambo = TypeSpec::enum_builder("Roshambo")
            .add_enum_constant("ROCK")
            .unwrap()
            .add_enum_constant("SCISSORS")
            .unwrap()
            .add_function(
                FunSpec::builder("describe")
                    .returns(kotlin::string())
                    .add_statement("return %S", args!["hand"])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert_eq!(
            roshambo.to_string(),
            "public enum class Roshambo {\n  ROCK,\n  SCISSORS,\n  ;\n\n  public fun describe(): kotlin.String = \"hand\"\n}\n"
        );
    }

    #[test]
    fn test_enum_constant_with_arguments_and_body() {
        let paper = TypeSpec::anonymous_class_builder()
            .add_superclass_constructor_argument("%S", args!["flat"])
            .unwrap()
            .add_function(
                FunSpec::builder("toString")
                    .add_modifiers([KModifier::Override])
                    .returns(kotlin::string())
                    .add_statement("return %S", args!["paper"])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let constructor = FunSpec::constructor_builder()
            .add_parameter(ParameterSpec::new("shape", kotlin::string()).unwrap())
            .build()
            .unwrap();
        let roshambo = TypeSpec::enum_builder("Roshambo")
            .primary_constructor(constructor)
            .add_enum_constant_with("PAPER", paper)
            .build()
            .unwrap();
        assert_eq!(
            roshambo.to_string(),
            "public enum class Roshambo(\n  shape: kotlin.String,\n) {\n  PAPER(\"flat\") {\n    override fun toString(): kotlin.String = \"paper\"\n  },\n}\n"
        );
    }

    #[test]
    fn test_interface_members_are_abstract() {
        let food = TypeSpec::interface_builder("Food")
            .add_property(
                PropertySpec::builder("calories", kotlin::int())
                    .build()
                    .unwrap(),
            )
            .add_function(FunSpec::builder("eat").build().unwrap())
            .build()
            .unwrap();
        assert_eq!(
            food.to_string(),
            "public interface Food {\n  public val calories: kotlin.Int\n\n  public fun eat()\n}\n"
        );
    }

    #[test]
    fn test_supertypes_without_body() {
        let burrito = TypeSpec::class_builder("Burrito")
            .superclass(class("Food"))
            .add_superinterface_delegate(class("Wrap"), "%N", args!["wrapper"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            burrito.to_string(),
            "public class Burrito : com.example.Food(), com.example.Wrap by wrapper\n"
        );
    }

    #[test]
    fn test_supertypes_wrap_after_constructor() {
        let constructor = FunSpec::constructor_builder()
            .add_parameter(ParameterSpec::new("size", kotlin::int()).unwrap())
            .build()
            .unwrap();
        let taco = TypeSpec::class_builder("Taco")
            .primary_constructor(constructor)
            .superclass(class("Food"))
            .add_superclass_constructor_argument("size", args![])
            .unwrap()
            .add_superinterface(class("Crunchy"))
            .build()
            .unwrap();
        assert_eq!(
            taco.to_string(),
            "public class Taco(\n  size: kotlin.Int,\n) : com.example.Food(size),\n    com.example.Crunchy\n"
        );
    }

    #[test]
    fn test_companion_object_name_elided() {
        let companion = TypeSpec::companion_object_builder(None)
            .add_property(
                PropertySpec::builder("SIZE", kotlin::int())
                    .add_modifiers([KModifier::Const])
                    .initializer("%L", args![10_000])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let taco = TypeSpec::class_builder("Taco")
            .add_type(companion)
            .build()
            .unwrap();
        assert_eq!(
            taco.to_string(),
            "public class Taco {\n  public companion object {\n    public const val SIZE: kotlin.Int = 10_000\n  }\n}\n"
        );
    }

    #[test]
    fn test_initializer_block_keeps_position() {
        let counter = TypeSpec::class_builder("Counter")
            .add_property(property("a", kotlin::int(), "1"))
            .add_initializer_block(CodeBlock::builder().add_statement("println(a)", args![]).unwrap().build().unwrap())
            .add_property(property("b", kotlin::int(), "2"))
            .build()
            .unwrap();
        assert_eq!(
            counter.to_string(),
            "public class Counter {\n  public val a: kotlin.Int = 1\n\n  init {\n    println(a)\n  }\n\n  public val b: kotlin.Int = 2\n}\n"
        );
    }

    #[test]
    fn test_constructor_kdoc_tags() {
        let constructor = FunSpec::constructor_builder()
            .add_parameter(
                ParameterSpec::builder("name", kotlin::string())
                    .add_kdoc("the taco's name", args![])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let taco = TypeSpec::class_builder("Taco")
            .add_kdoc("A taco.", args![])
            .unwrap()
            .primary_constructor(constructor)
            .add_property(property("name", kotlin::string(), "name"))
            .build()
            .unwrap();
        assert_eq!(
            taco.to_string(),
            "/**\n * A taco.\n *\n * @property name the taco's name\n */\npublic class Taco(\n  public val name: kotlin.String,\n)\n"
        );
    }

    #[test]
    fn test_enum_constants_only_on_enums() {
        let err = TypeSpec::class_builder("Taco")
            .add_enum_constant("BEEF")
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Taco is not an enum and cannot have enum constants"
        );
    }

    #[test]
    fn test_abstract_members_need_abstract_type() {
        let eat = FunSpec::builder("eat")
            .add_modifiers([KModifier::Abstract])
            .build()
            .unwrap();
        let err = TypeSpec::class_builder("Taco")
            .add_function(eat.clone())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "non-abstract type Taco cannot declare abstract function eat"
        );

        let taco = TypeSpec::class_builder("Taco")
            .add_modifiers([KModifier::Abstract])
            .add_function(eat)
            .build()
            .unwrap();
        assert_eq!(
            taco.to_string(),
            "public abstract class Taco {\n  public abstract fun eat()\n}\n"
        );
    }

    #[test]
    fn test_fun_interface_needs_one_abstract_function() {
        let err = TypeSpec::fun_interface_builder("Runner").build().unwrap_err();
        assert!(matches!(*err, Error::InvalidSpec { .. }));
    }
}
