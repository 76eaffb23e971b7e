//! Function and constructor parameters.

use std::{collections::BTreeSet, fmt};

use ktpoet_core::{Error, Result};

use super::{AnnotationSpec, KModifier};
use crate::{
    args,
    code::{Arg, CodeBlock},
    names::TypeName,
    writer::{CodeWriter, render_standalone},
};

const ALLOWED_MODIFIERS: [KModifier; 3] =
    [KModifier::Vararg, KModifier::Noinline, KModifier::Crossinline];

/// A parameter: `vararg names: String = "x"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterSpec {
    name: String,
    type_name: TypeName,
    modifiers: BTreeSet<KModifier>,
    annotations: Vec<AnnotationSpec>,
    kdoc: CodeBlock,
    default_value: Option<CodeBlock>,
}

impl ParameterSpec {
    pub fn builder(name: impl Into<String>, type_name: impl Into<TypeName>) -> ParameterSpecBuilder {
        ParameterSpecBuilder {
            name: name.into(),
            type_name: type_name.into(),
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
            kdoc: CodeBlock::builder(),
            default_value: None,
        }
    }

    /// A plain parameter without modifiers or default.
    pub fn new(name: impl Into<String>, type_name: impl Into<TypeName>) -> Result<Self> {
        Self::builder(name, type_name).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn modifiers(&self) -> &BTreeSet<KModifier> {
        &self.modifiers
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        &self.annotations
    }

    pub fn kdoc(&self) -> &CodeBlock {
        &self.kdoc
    }

    pub fn default_value(&self) -> Option<&CodeBlock> {
        self.default_value.as_ref()
    }

    pub(crate) fn emit(&self, w: &mut CodeWriter<'_>, include_type: bool) -> Result<()> {
        w.emit_annotations(&self.annotations, true)?;
        w.emit_modifiers(&self.modifiers, &BTreeSet::new());
        w.emit_template("%N", args![self.name.as_str()])?;
        if include_type {
            w.emit(": ");
            w.emit_type(&self.type_name)?;
        }
        self.emit_default_value(w)
    }

    pub(crate) fn emit_default_value(&self, w: &mut CodeWriter<'_>) -> Result<()> {
        if let Some(default) = &self.default_value {
            let format = if default.has_statements() { " = %L" } else { " = «%L»" };
            w.emit_template(format, args![default])?;
        }
        Ok(())
    }
}

impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_standalone(f, |w| self.emit(w, true))
    }
}

/// Emit a parameter list in parentheses. More than two parameters (or
/// `force_new_lines`) go one per line with trailing commas.
pub(crate) fn emit_parameters<'p>(
    w: &mut CodeWriter<'_>,
    parameters: impl ExactSizeIterator<Item = &'p ParameterSpec>,
    force_new_lines: bool,
    mut emit_one: impl FnMut(&mut CodeWriter<'_>, &'p ParameterSpec) -> Result<()>,
) -> Result<()> {
    w.emit("(");
    let count = parameters.len();
    if count > 0 {
        let new_lines = count > 2 || force_new_lines;
        if new_lines {
            w.emit("\n").indent(1);
        }
        for (i, parameter) in parameters.enumerate() {
            if i > 0 {
                w.emit(if new_lines { "\n" } else { ", " });
            }
            emit_one(w, parameter)?;
            if new_lines {
                w.emit(",");
            }
        }
        if new_lines {
            w.unindent(1)?.emit("\n");
        }
    }
    w.emit(")");
    Ok(())
}

/// Builder for [`ParameterSpec`].
#[derive(Debug, Clone)]
pub struct ParameterSpecBuilder {
    name: String,
    type_name: TypeName,
    modifiers: BTreeSet<KModifier>,
    annotations: Vec<AnnotationSpec>,
    kdoc: crate::code::CodeBlockBuilder,
    default_value: Option<CodeBlock>,
}

impl ParameterSpecBuilder {
    pub fn add_modifiers(mut self, modifiers: impl IntoIterator<Item = KModifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn add_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn add_kdoc(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.kdoc = self.kdoc.add(format, args)?;
        Ok(self)
    }

    pub fn default_value(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.default_value = Some(CodeBlock::of(format, args)?);
        Ok(self)
    }

    pub fn default_value_code(mut self, code: CodeBlock) -> Self {
        self.default_value = Some(code);
        self
    }

    pub fn build(self) -> Result<ParameterSpec> {
        if let Some(modifier) = self
            .modifiers
            .iter()
            .find(|m| !ALLOWED_MODIFIERS.contains(m))
        {
            return Err(Error::invalid_spec(format!(
                "modifier '{modifier}' is not allowed on parameter '{}'",
                self.name
            )));
        }
        if self.name.is_empty() {
            return Err(Error::invalid_spec("parameter name cannot be empty"));
        }
        Ok(ParameterSpec {
            name: self.name,
            type_name: self.type_name,
            modifiers: self.modifiers,
            annotations: self.annotations,
            kdoc: self.kdoc.build()?,
            default_value: self.default_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::kotlin;

    #[test]
    fn test_plain_parameter() {
        let parameter = ParameterSpec::new("count", kotlin::int()).unwrap();
        assert_eq!(parameter.to_string(), "count: kotlin.Int");
    }

    #[test]
    fn test_modifiers_and_default() {
        let parameter = ParameterSpec::builder("names", kotlin::string())
            .add_modifiers([KModifier::Vararg])
            .default_value("%S", args!["taco"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            parameter.to_string(),
            "vararg names: kotlin.String = \"taco\""
        );
    }

    #[test]
    fn test_keyword_name_is_escaped() {
        let parameter = ParameterSpec::new("in", kotlin::int()).unwrap();
        assert_eq!(parameter.to_string(), "`in`: kotlin.Int");
    }

    #[test]
    fn test_disallowed_modifier() {
        let err = ParameterSpec::builder("x", kotlin::int())
            .add_modifiers([KModifier::Private])
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "modifier 'private' is not allowed on parameter 'x'"
        );
    }
}
