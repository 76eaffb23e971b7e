//! Properties, including constructor properties and accessors.

use std::{collections::BTreeSet, fmt};

use ktpoet_core::{Error, Result};

use super::{AnnotationSpec, FunSpec, KModifier, ParameterSpec};
use crate::{
    args,
    code::{Arg, CodeBlock, CodeBlockBuilder},
    names::{TypeName, TypeVariableName},
    writer::{CodeWriter, render_standalone},
};

/// A `val` or `var` declaration.
///
/// ```
/// use ktpoet_codegen::{args, names::kotlin, spec::{KModifier, PropertySpec}};
///
/// let limit = PropertySpec::builder("LIMIT", kotlin::int())
///     .add_modifiers([KModifier::Const])
///     .initializer("%L", args![10_000])
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(limit.to_string(), "const val LIMIT: kotlin.Int = 10_000\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertySpec {
    name: String,
    type_name: TypeName,
    mutable: bool,
    kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: BTreeSet<KModifier>,
    type_variables: Vec<TypeVariableName>,
    context_receivers: Vec<TypeName>,
    receiver: Option<TypeName>,
    initializer: Option<CodeBlock>,
    delegated: bool,
    getter: Option<FunSpec>,
    setter: Option<FunSpec>,
}

impl PropertySpec {
    pub fn builder(name: impl Into<String>, type_name: impl Into<TypeName>) -> PropertySpecBuilder {
        PropertySpecBuilder {
            name: name.into(),
            type_name: type_name.into(),
            mutable: false,
            kdoc: CodeBlock::builder(),
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            type_variables: Vec::new(),
            context_receivers: Vec::new(),
            receiver: None,
            initializer: None,
            delegated: false,
            getter: None,
            setter: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
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

    pub fn initializer(&self) -> Option<&CodeBlock> {
        self.initializer.as_ref()
    }

    pub fn is_delegated(&self) -> bool {
        self.delegated
    }

    pub fn getter(&self) -> Option<&FunSpec> {
        self.getter.as_ref()
    }

    pub fn setter(&self) -> Option<&FunSpec> {
        self.setter.as_ref()
    }

    pub(crate) fn has_accessors(&self) -> bool {
        self.getter.is_some() || self.setter.is_some()
    }

    /// Whether this property can be declared by the primary constructor
    /// `parameter`: same name and type, initialized with the parameter.
    pub(crate) fn matches_constructor_parameter(&self, parameter: &ParameterSpec) -> bool {
        if self.has_accessors() || self.delegated || self.receiver.is_some() {
            return false;
        }
        if self.name != parameter.name() || self.type_name != *parameter.type_name() {
            return false;
        }
        let Some(initializer) = &self.initializer else {
            return false;
        };
        let escaped = ktpoet_core::escape_if_necessary(&self.name).unwrap_or_default();
        initializer.to_string() == escaped
    }

    /// Merge the annotations, modifiers and kdoc of the constructor parameter
    /// that declares this property.
    pub(crate) fn from_constructor_parameter(&self, parameter: &ParameterSpec) -> Self {
        let mut property = self.clone();
        property.annotations.extend(parameter.annotations().iter().cloned());
        property.modifiers.extend(parameter.modifiers().iter().copied());
        if property.kdoc.is_empty() {
            property.kdoc = parameter.kdoc().clone();
        }
        property
    }

    fn is_inline(&self) -> bool {
        let inline_getter = self
            .getter
            .as_ref()
            .is_some_and(|g| g.modifiers().contains(&KModifier::Inline));
        let inline_setter = self
            .setter
            .as_ref()
            .is_none_or(|s| s.modifiers().contains(&KModifier::Inline));
        inline_getter && (!self.mutable || inline_setter)
    }

    /// Emit the declaration. `inline` renders a constructor property on one
    /// line without its accessors' newline.
    pub(crate) fn emit(
        &self,
        w: &mut CodeWriter<'_>,
        implicit: &BTreeSet<KModifier>,
        options: EmitOptions,
    ) -> Result<()> {
        let is_inline = self.is_inline();
        let mut modifiers = self.modifiers.clone();
        if is_inline {
            modifiers.insert(KModifier::Inline);
        }

        if options.kdoc {
            w.emit_kdoc(&self.kdoc.ensure_ends_with_newline())?;
        }
        w.emit_context_receivers(&self.context_receivers, "\n")?;
        w.emit_annotations(&self.annotations, options.inline_annotations)?;
        w.emit_modifiers(&modifiers, implicit);
        w.emit(if self.mutable { "var " } else { "val " });
        if !self.type_variables.is_empty() {
            w.emit_type_variables(&self.type_variables)?;
            w.emit(" ");
        }
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
        w.emit_template("%N:♢", args![self.name.as_str()])?;
        w.emit_type(&self.type_name)?;

        if options.initializer
            && let Some(initializer) = &self.initializer
        {
            w.emit(if self.delegated { "♢by♢" } else { "♢=♢" });
            let format = if initializer.has_statements() { "%L" } else { "«%L»" };
            let code = CodeBlock::of(format, args![initializer.trim_trailing_newline()])?;
            w.emit_code_with(&code, modifiers.contains(&KModifier::Const), false)?;
        }
        w.emit_where_block(&self.type_variables)?;
        if !options.inline {
            w.emit("\n");
        }

        let mut accessor_implicit: BTreeSet<KModifier> =
            implicit.iter().copied().filter(|m| !m.is_visibility()).collect();
        if is_inline {
            accessor_implicit.insert(KModifier::Inline);
        }
        for accessor in [&self.getter, &self.setter].into_iter().flatten() {
            w.indent(1);
            accessor.emit(w, &accessor_implicit, false)?;
            w.unindent(1)?;
        }
        Ok(())
    }
}

impl fmt::Display for PropertySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_standalone(f, |w| self.emit(w, &BTreeSet::new(), EmitOptions::default()))
    }
}

/// Which parts of a property [`PropertySpec::emit`] writes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EmitOptions {
    pub initializer: bool,
    pub kdoc: bool,
    pub inline: bool,
    pub inline_annotations: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            initializer: true,
            kdoc: true,
            inline: false,
            inline_annotations: false,
        }
    }
}

impl EmitOptions {
    /// A property declared by a primary constructor parameter.
    pub fn constructor_property() -> Self {
        Self {
            initializer: false,
            kdoc: false,
            inline: true,
            inline_annotations: false,
        }
    }
}

/// Builder for [`PropertySpec`].
#[derive(Debug, Clone)]
pub struct PropertySpecBuilder {
    name: String,
    type_name: TypeName,
    mutable: bool,
    kdoc: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    modifiers: BTreeSet<KModifier>,
    type_variables: Vec<TypeVariableName>,
    context_receivers: Vec<TypeName>,
    receiver: Option<TypeName>,
    initializer: Option<CodeBlock>,
    delegated: bool,
    getter: Option<FunSpec>,
    setter: Option<FunSpec>,
}

impl PropertySpecBuilder {
    pub fn mutable(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
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

    pub fn receiver(mut self, receiver: impl Into<TypeName>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn initializer(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.initializer = Some(CodeBlock::of(format, args)?);
        self.delegated = false;
        Ok(self)
    }

    pub fn initializer_code(mut self, code: CodeBlock) -> Self {
        self.initializer = Some(code);
        self.delegated = false;
        self
    }

    /// Delegate the property: `val x: T by lazy { ... }`.
    pub fn delegate(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.initializer = Some(CodeBlock::of(format, args)?);
        self.delegated = true;
        Ok(self)
    }

    pub fn getter(mut self, getter: FunSpec) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn setter(mut self, setter: FunSpec) -> Self {
        self.setter = Some(setter);
        self
    }

    pub fn build(self) -> Result<PropertySpec> {
        let name = &self.name;
        if name.is_empty() {
            return Err(Error::invalid_spec("property name cannot be empty"));
        }
        if self.modifiers.contains(&KModifier::Inline) {
            return Err(Error::invalid_spec(format!(
                "property {name} cannot be inline; mark the getter and setter inline instead"
            )));
        }
        if self.setter.is_some() && !self.mutable {
            return Err(Error::invalid_spec(format!(
                "only a mutable property can have a setter: {name}"
            )));
        }
        if let Some(getter) = &self.getter
            && !getter.is_accessor()
        {
            return Err(Error::invalid_spec(format!(
                "{} is not a getter",
                getter.name()
            )));
        }
        if let Some(setter) = &self.setter
            && !setter.is_accessor()
        {
            return Err(Error::invalid_spec(format!(
                "{} is not a setter",
                setter.name()
            )));
        }
        if self.type_variables.iter().any(|v| v.reified) {
            let inline = |accessor: &Option<FunSpec>| {
                accessor
                    .as_ref()
                    .is_some_and(|a| a.modifiers().contains(&KModifier::Inline))
            };
            let inline_accessors = inline(&self.getter) && (!self.mutable || inline(&self.setter));
            if !inline_accessors {
                return Err(Error::invalid_spec(format!(
                    "only type variables of properties with inline accessors can be reified: {name}"
                )));
            }
        }

        Ok(PropertySpec {
            name: self.name,
            type_name: self.type_name,
            mutable: self.mutable,
            kdoc: self.kdoc.build()?,
            annotations: self.annotations,
            modifiers: self.modifiers,
            type_variables: self.type_variables,
            context_receivers: self.context_receivers,
            receiver: self.receiver,
            initializer: self.initializer,
            delegated: self.delegated,
            getter: self.getter,
            setter: self.setter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::{ClassName, kotlin};

    #[test]
    fn test_val_with_initializer() {
        let property = PropertySpec::builder("name", kotlin::string())
            .initializer("%S", args!["taco"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(property.to_string(), "val name: kotlin.String = \"taco\"\n");
    }

    #[test]
    fn test_var_with_accessors() {
        let property = PropertySpec::builder("size", kotlin::int())
            .mutable(true)
            .getter(
                FunSpec::getter_builder()
                    .add_statement("return field", args![])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .setter(
                FunSpec::setter_builder()
                    .add_parameter(ParameterSpec::new("value", kotlin::int()).unwrap())
                    .add_statement("field = value", args![])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert_eq!(
            property.to_string(),
            "var size: kotlin.Int\n  get() = field\n  set(`value`) {\n    field = value\n  }\n"
        );
    }

    #[test]
    fn test_delegated() {
        let lazy = crate::names::MemberName::new("kotlin", "lazy").unwrap();
        let property = PropertySpec::builder("cheese", kotlin::string())
            .delegate("%M { %S }", args![lazy, "cheddar"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            property.to_string(),
            "val cheese: kotlin.String by kotlin.lazy { \"cheddar\" }\n"
        );
    }

    #[test]
    fn test_const_keeps_multi_line_string_quoted() {
        let property = PropertySpec::builder("GREETING", kotlin::string())
            .add_modifiers([KModifier::Const])
            .initializer("%S", args!["a\nb"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            property.to_string(),
            "const val GREETING: kotlin.String = \"a\\nb\"\n"
        );
    }

    #[test]
    fn test_extension_property() {
        let property = PropertySpec::builder("size", kotlin::int())
            .receiver(ClassName::new("com.example", ["Taco"]).unwrap())
            .getter(
                FunSpec::getter_builder()
                    .add_statement("return 1", args![])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert_eq!(
            property.to_string(),
            "val com.example.Taco.size: kotlin.Int\n  get() = 1\n"
        );
    }

    #[test]
    fn test_validation() {
        let err = PropertySpec::builder("x", kotlin::int())
            .add_modifiers([KModifier::Inline])
            .build()
            .unwrap_err();
        assert!(matches!(*err, Error::InvalidSpec { .. }));

        let setter = FunSpec::setter_builder().build().unwrap();
        let err = PropertySpec::builder("x", kotlin::int())
            .setter(setter)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "only a mutable property can have a setter: x");
    }

    #[test]
    fn test_matches_constructor_parameter() {
        let parameter = ParameterSpec::new("in", kotlin::int()).unwrap();
        let property = PropertySpec::builder("in", kotlin::int())
            .initializer("%N", args!["in"])
            .unwrap()
            .build()
            .unwrap();
        assert!(property.matches_constructor_parameter(&parameter));

        let other = PropertySpec::builder("in", kotlin::int())
            .initializer("0", args![])
            .unwrap()
            .build()
            .unwrap();
        assert!(!other.matches_constructor_parameter(&parameter));
    }
}
