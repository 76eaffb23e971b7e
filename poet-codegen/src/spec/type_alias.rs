//! Type aliases.

use std::{collections::BTreeSet, fmt};

use ktpoet_core::{Error, Result, is_identifier};

use super::{AnnotationSpec, KModifier};
use crate::{
    args,
    code::{Arg, CodeBlock, CodeBlockBuilder},
    names::{TypeName, TypeVariableName},
    writer::{CodeWriter, render_standalone},
};

const ALLOWED_MODIFIERS: [KModifier; 5] = [
    KModifier::Public,
    KModifier::Internal,
    KModifier::Private,
    KModifier::Actual,
    KModifier::Expect,
];

/// `typealias Name<T> = Type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeAliasSpec {
    name: String,
    type_name: TypeName,
    modifiers: BTreeSet<KModifier>,
    type_variables: Vec<TypeVariableName>,
    kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
}

impl TypeAliasSpec {
    pub fn builder(name: impl Into<String>, type_name: impl Into<TypeName>) -> TypeAliasSpecBuilder {
        TypeAliasSpecBuilder {
            name: name.into(),
            type_name: type_name.into(),
            modifiers: BTreeSet::new(),
            type_variables: Vec::new(),
            kdoc: CodeBlock::builder(),
            annotations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub(crate) fn emit(&self, w: &mut CodeWriter<'_>) -> Result<()> {
        w.emit_kdoc(&self.kdoc.ensure_ends_with_newline())?;
        w.emit_annotations(&self.annotations, false)?;
        w.emit_modifiers(&self.modifiers, &[KModifier::Public].into());
        w.emit_template("typealias %N", args![self.name.as_str()])?;
        w.emit_type_variables(&self.type_variables)?;
        w.emit(" = ");
        w.emit_type(&self.type_name)?;
        w.emit("\n");
        Ok(())
    }
}

impl fmt::Display for TypeAliasSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_standalone(f, |w| self.emit(w))
    }
}

/// Builder for [`TypeAliasSpec`].
#[derive(Debug, Clone)]
pub struct TypeAliasSpecBuilder {
    name: String,
    type_name: TypeName,
    modifiers: BTreeSet<KModifier>,
    type_variables: Vec<TypeVariableName>,
    kdoc: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
}

impl TypeAliasSpecBuilder {
    pub fn add_modifiers(mut self, modifiers: impl IntoIterator<Item = KModifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn add_type_variable(mut self, variable: TypeVariableName) -> Self {
        self.type_variables.push(variable);
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

    pub fn build(self) -> Result<TypeAliasSpec> {
        if !is_identifier(&self.name) {
            return Err(Error::invalid_spec(format!(
                "not a valid type alias name: {}",
                self.name
            )));
        }
        if let Some(modifier) = self
            .modifiers
            .iter()
            .find(|m| !ALLOWED_MODIFIERS.contains(m))
        {
            return Err(Error::invalid_spec(format!(
                "modifier '{modifier}' is not allowed on type alias '{}'",
                self.name
            )));
        }
        Ok(TypeAliasSpec {
            name: self.name,
            type_name: self.type_name,
            modifiers: self.modifiers,
            type_variables: self.type_variables,
            kdoc: self.kdoc.build()?,
            annotations: self.annotations,
        })
    }
}
