//! Functions, constructors and property accessors.

use std::{collections::BTreeSet, fmt};

use ktpoet_core::{Error, Result};

use super::{
    AnnotationSpec, KModifier, ParameterSpec,
    parameter::emit_parameters,
};
use crate::{
    args,
    code::{Arg, CodeBlock, CodeBlockBuilder},
    names::{TypeName, TypeVariableName, kotlin},
    writer::{CodeWriter, render_standalone},
};

const CONSTRUCTOR: &str = "constructor";
const GETTER: &str = "get";
const SETTER: &str = "set";

/// What a [`FunSpec`] declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunKind {
    Function,
    Constructor,
    Getter,
    Setter,
}

/// The `this(...)` or `super(...)` call of a secondary constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Delegation {
    This(Vec<CodeBlock>),
    Super(Vec<CodeBlock>),
}

/// A function, constructor or accessor declaration.
///
/// ```
/// use ktpoet_codegen::{args, names::kotlin, spec::{FunSpec, ParameterSpec}};
///
/// let square = FunSpec::builder("square")
///     .add_parameter(ParameterSpec::new("x", kotlin::int()).unwrap())
///     .returns(kotlin::int())
///     .add_statement("return x * x", args![])
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(square.to_string(), "fun square(x: kotlin.Int): kotlin.Int = x * x\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunSpec {
    kind: FunKind,
    name: String,
    kdoc: CodeBlock,
    receiver_kdoc: CodeBlock,
    return_kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: BTreeSet<KModifier>,
    type_variables: Vec<TypeVariableName>,
    context_receivers: Vec<TypeName>,
    receiver: Option<TypeName>,
    returns: TypeName,
    parameters: Vec<ParameterSpec>,
    delegation: Option<Delegation>,
    body: CodeBlock,
}

impl FunSpec {
    pub fn builder(name: impl Into<String>) -> FunSpecBuilder {
        FunSpecBuilder::new(FunKind::Function, name.into())
    }

    pub fn constructor_builder() -> FunSpecBuilder {
        FunSpecBuilder::new(FunKind::Constructor, CONSTRUCTOR.to_string())
    }

    pub fn getter_builder() -> FunSpecBuilder {
        FunSpecBuilder::new(FunKind::Getter, GETTER.to_string())
    }

    pub fn setter_builder() -> FunSpecBuilder {
        FunSpecBuilder::new(FunKind::Setter, SETTER.to_string())
    }

    pub fn kind(&self) -> FunKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == FunKind::Constructor
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, FunKind::Getter | FunKind::Setter)
    }

    pub fn kdoc(&self) -> &CodeBlock {
        &self.kdoc
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        &self.annotations
    }

    pub fn modifiers(&self) -> &BTreeSet<KModifier> {
        &self.modifiers
    }

    pub fn type_variables(&self) -> &[TypeVariableName] {
        &self.type_variables
    }

    pub fn receiver(&self) -> Option<&TypeName> {
        self.receiver.as_ref()
    }

    pub fn returns(&self) -> &TypeName {
        &self.returns
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn body(&self) -> &CodeBlock {
        &self.body
    }

    fn is_empty_setter(&self) -> bool {
        self.kind == FunKind::Setter && self.parameters.is_empty()
    }

    fn is_external_getter(&self) -> bool {
        self.kind == FunKind::Getter && self.modifiers.contains(&KModifier::External)
    }

    pub(crate) fn emit(
        &self,
        w: &mut CodeWriter<'_>,
        implicit: &BTreeSet<KModifier>,
        include_kdoc_tags: bool,
    ) -> Result<()> {
        if include_kdoc_tags {
            w.emit_kdoc(&self.kdoc_with_tags()?)?;
        } else {
            w.emit_kdoc(&self.kdoc.ensure_ends_with_newline())?;
        }
        w.emit_context_receivers(&self.context_receivers, "\n")?;
        w.emit_annotations(&self.annotations, false)?;
        w.emit_modifiers(&self.modifiers, implicit);

        if self.kind == FunKind::Function {
            w.emit("fun ");
        }
        if !self.type_variables.is_empty() {
            w.emit_type_variables(&self.type_variables)?;
            w.emit(" ");
        }
        self.emit_signature(w)?;
        w.emit_where_block(&self.type_variables)?;

        let all_modifiers: BTreeSet<KModifier> =
            self.modifiers.union(implicit).copied().collect();
        let cannot_have_body = self.modifiers.contains(&KModifier::Abstract)
            || all_modifiers.contains(&KModifier::Expect);
        if cannot_have_body {
            if !self.body.is_empty() {
                return Err(Error::invalid_spec(format!(
                    "function {} cannot have code",
                    self.name
                )));
            }
            w.emit("\n");
            return Ok(());
        }
        let can_omit_body = self.kind == FunKind::Constructor
            || all_modifiers.contains(&KModifier::External)
            || implicit.contains(&KModifier::Abstract);
        if can_omit_body && self.body.is_empty() {
            w.emit("\n");
            return Ok(());
        }

        if let Some(expression) = self.expression_body() {
            w.emit_code_with(&CodeBlock::of(" = %L", args![expression])?, false, true)?;
        } else if !self.is_empty_setter() {
            w.emit(" {\n").indent(1);
            let body = self.body.replace_text_prefixes("return ", "return·");
            w.emit_code_with(&body, false, true)?;
            w.unindent(1)?.emit("}\n");
        } else {
            w.emit("\n");
        }
        Ok(())
    }

    fn emit_signature(&self, w: &mut CodeWriter<'_>) -> Result<()> {
        match self.kind {
            FunKind::Constructor | FunKind::Getter | FunKind::Setter => {
                w.emit(&self.name);
            }
            FunKind::Function => {
                if let Some(receiver) = &self.receiver {
                    if matches!(receiver, TypeName::Lambda(_)) {
                        w.emit("(");
                        w.emit_type(receiver)?;
                        w.emit(").");
                    } else {
                        w.emit_type(receiver)?;
                        w.emit(".");
                    }
                }
                w.emit_template("%N", args![self.name.as_str()])?;
            }
        }

        if !self.is_empty_setter() && !self.is_external_getter() {
            let include_type = self.kind != FunKind::Setter;
            emit_parameters(w, self.parameters.iter(), false, |w, p| {
                p.emit(w, include_type)
            })?;
        }

        let unit = TypeName::Class(kotlin::unit());
        let expression_body = self.kind == FunKind::Function && self.expression_body().is_some();
        if self.returns != unit || expression_body {
            w.emit(": ");
            w.emit_type(&self.returns)?;
        }

        if let Some(delegation) = &self.delegation {
            let (keyword, arguments) = match delegation {
                Delegation::This(arguments) => ("this", arguments),
                Delegation::Super(arguments) => ("super", arguments),
            };
            let arguments = CodeBlock::join(arguments.iter().cloned(), ", ", "", "");
            w.emit(" : ");
            w.emit(keyword);
            w.emit_template("(%L)", args![arguments])?;
        }
        Ok(())
    }

    /// The body as a single expression, when it is one `return` or `throw`.
    fn expression_body(&self) -> Option<CodeBlock> {
        let body = self.body.trim();
        if body.has_unmatched_closing_statement() {
            return None;
        }
        if let Some(expression) = body
            .without_text_prefix("return ")
            .or_else(|| body.without_text_prefix("return·"))
        {
            return Some(expression);
        }
        if body.without_text_prefix("throw ").is_some()
            || body.without_text_prefix("throw·").is_some()
        {
            return Some(body);
        }
        None
    }

    fn kdoc_with_tags(&self) -> Result<CodeBlock> {
        let mut builder = self.kdoc.ensure_ends_with_newline().to_builder();
        let mut first_tag = true;
        let mut separate = |builder: CodeBlockBuilder| {
            if first_tag && !builder.is_empty() {
                first_tag = false;
                builder.add_text("\n")
            } else {
                first_tag = false;
                builder
            }
        };

        if !self.receiver_kdoc.is_empty() {
            builder = separate(builder).add(
                "@receiver %L",
                args![self.receiver_kdoc.ensure_ends_with_newline()],
            )?;
        }
        for parameter in self.parameters.iter().filter(|p| !p.kdoc().is_empty()) {
            builder = separate(builder).add(
                "@param %L %L",
                args![parameter.name(), parameter.kdoc().ensure_ends_with_newline()],
            )?;
        }
        if !self.return_kdoc.is_empty() {
            builder = separate(builder).add(
                "@return %L",
                args![self.return_kdoc.ensure_ends_with_newline()],
            )?;
        }
        builder.build()
    }
}

impl fmt::Display for FunSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_standalone(f, |w| self.emit(w, &BTreeSet::new(), true))
    }
}

/// Builder for [`FunSpec`].
#[derive(Debug, Clone)]
pub struct FunSpecBuilder {
    kind: FunKind,
    name: String,
    kdoc: CodeBlockBuilder,
    receiver_kdoc: CodeBlock,
    return_kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: BTreeSet<KModifier>,
    type_variables: Vec<TypeVariableName>,
    context_receivers: Vec<TypeName>,
    receiver: Option<TypeName>,
    returns: TypeName,
    parameters: Vec<ParameterSpec>,
    delegation: Option<Delegation>,
    body: CodeBlockBuilder,
}

impl FunSpecBuilder {
    fn new(kind: FunKind, name: String) -> Self {
        Self {
            kind,
            name,
            kdoc: CodeBlock::builder(),
            receiver_kdoc: CodeBlock::empty(),
            return_kdoc: CodeBlock::empty(),
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            type_variables: Vec::new(),
            context_receivers: Vec::new(),
            receiver: None,
            returns: kotlin::unit().into(),
            parameters: Vec::new(),
            delegation: None,
            body: CodeBlock::builder(),
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

    /// Make this an extension function on `receiver`.
    pub fn receiver(mut self, receiver: impl Into<TypeName>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn receiver_kdoc(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.receiver_kdoc = CodeBlock::of(format, args)?;
        Ok(self)
    }

    pub fn returns(mut self, returns: impl Into<TypeName>) -> Self {
        self.returns = returns.into();
        self
    }

    pub fn returns_kdoc(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.return_kdoc = CodeBlock::of(format, args)?;
        Ok(self)
    }

    pub fn add_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn add_parameters(mut self, parameters: impl IntoIterator<Item = ParameterSpec>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Delegate to another constructor of the same class: `: this(args)`.
    pub fn call_this_constructor(mut self, arguments: impl IntoIterator<Item = CodeBlock>) -> Self {
        self.delegation = Some(Delegation::This(arguments.into_iter().collect()));
        self
    }

    /// Delegate to a superclass constructor: `: super(args)`.
    pub fn call_super_constructor(mut self, arguments: impl IntoIterator<Item = CodeBlock>) -> Self {
        self.delegation = Some(Delegation::Super(arguments.into_iter().collect()));
        self
    }

    pub fn add_code(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.body = self.body.add(format, args)?;
        Ok(self)
    }

    pub fn add_named_code(
        mut self,
        format: &str,
        args: impl IntoIterator<Item = (impl Into<String>, Arg)>,
    ) -> Result<Self> {
        self.body = self.body.add_named(format, args)?;
        Ok(self)
    }

    pub fn add_code_block(mut self, code: CodeBlock) -> Self {
        self.body = self.body.add_code(code);
        self
    }

    /// Append a `//` comment line to the body.
    pub fn add_comment(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.body = self.body.add(&format!("//·{}\n", format.replace(' ', "·")), args)?;
        Ok(self)
    }

    pub fn add_statement(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.body = self.body.add_statement(format, args)?;
        Ok(self)
    }

    pub fn begin_control_flow(mut self, control_flow: &str, args: Vec<Arg>) -> Result<Self> {
        self.body = self.body.begin_control_flow(control_flow, args)?;
        Ok(self)
    }

    pub fn next_control_flow(mut self, control_flow: &str, args: Vec<Arg>) -> Result<Self> {
        self.body = self.body.next_control_flow(control_flow, args)?;
        Ok(self)
    }

    pub fn end_control_flow(mut self) -> Self {
        self.body = self.body.end_control_flow();
        self
    }

    pub fn build(self) -> Result<FunSpec> {
        let body = self.body.build()?;
        let name = &self.name;

        if name.is_empty() {
            return Err(Error::invalid_spec("function name cannot be empty"));
        }
        if (self.modifiers.contains(&KModifier::Abstract)
            || self.modifiers.contains(&KModifier::Expect))
            && !body.is_empty()
        {
            return Err(Error::invalid_spec(format!(
                "abstract or expect function {name} cannot have code"
            )));
        }
        if self.type_variables.iter().any(|v| v.reified)
            && !self.modifiers.contains(&KModifier::Inline)
        {
            return Err(Error::invalid_spec(format!(
                "only type variables of inline functions can be reified: {name}"
            )));
        }
        if self.delegation.is_some() && self.kind != FunKind::Constructor {
            return Err(Error::invalid_spec(format!(
                "only constructors can delegate to another constructor: {name}"
            )));
        }
        match self.kind {
            FunKind::Getter | FunKind::Setter if !self.type_variables.is_empty() => {
                return Err(Error::invalid_spec(format!(
                    "{name} cannot have type variables"
                )));
            }
            FunKind::Getter if !self.parameters.is_empty() => {
                return Err(Error::invalid_spec("getter cannot have parameters"));
            }
            FunKind::Getter if self.modifiers.contains(&KModifier::External) && !body.is_empty() => {
                return Err(Error::invalid_spec("external getter cannot have code"));
            }
            FunKind::Setter if self.parameters.len() > 1 => {
                return Err(Error::invalid_spec("setter can have at most one parameter"));
            }
            FunKind::Setter if self.parameters.is_empty() && !body.is_empty() => {
                return Err(Error::invalid_spec("parameterless setter cannot have code"));
            }
            _ => {}
        }

        Ok(FunSpec {
            kind: self.kind,
            name: self.name,
            kdoc: self.kdoc.build()?,
            receiver_kdoc: self.receiver_kdoc,
            return_kdoc: self.return_kdoc,
            annotations: self.annotations,
            modifiers: self.modifiers,
            type_variables: self.type_variables,
            context_receivers: self.context_receivers,
            receiver: self.receiver,
            returns: self.returns,
            parameters: self.parameters,
            delegation: self.delegation,
            body,
        })
    }
}
