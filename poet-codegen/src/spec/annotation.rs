//! Annotations on declarations, types and files.

use std::fmt;

use ktpoet_core::Result;

use crate::{
    code::{Arg, CodeBlock},
    names::TypeName,
    writer::{CodeWriter, render_standalone},
};

/// Where an annotation on a property or file applies, e.g. `@get:JvmName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseSiteTarget {
    File,
    Property,
    Field,
    Get,
    Set,
    Receiver,
    Param,
    SetParam,
    Delegate,
}

impl UseSiteTarget {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Property => "property",
            Self::Field => "field",
            Self::Get => "get",
            Self::Set => "set",
            Self::Receiver => "receiver",
            Self::Param => "param",
            Self::SetParam => "setparam",
            Self::Delegate => "delegate",
        }
    }
}

/// An annotation: a type plus member expressions such as `name = "x"`.
///
/// ```
/// use ktpoet_codegen::{args, names::ClassName, spec::AnnotationSpec};
///
/// let suppress = ClassName::new("kotlin", ["Suppress"]).unwrap();
/// let annotation = AnnotationSpec::builder(suppress)
///     .add_member("%S", args!["UNUSED"])
///     .unwrap()
///     .build();
/// assert_eq!(annotation.to_string(), "@kotlin.Suppress(\"UNUSED\")");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationSpec {
    type_name: Box<TypeName>,
    members: Vec<CodeBlock>,
    use_site_target: Option<UseSiteTarget>,
}

impl AnnotationSpec {
    pub fn builder(type_name: impl Into<TypeName>) -> AnnotationSpecBuilder {
        AnnotationSpecBuilder {
            type_name: type_name.into(),
            members: Vec::new(),
            use_site_target: None,
        }
    }

    /// An annotation without members.
    pub fn of(type_name: impl Into<TypeName>) -> Self {
        Self::builder(type_name).build()
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn members(&self) -> &[CodeBlock] {
        &self.members
    }

    pub fn use_site_target(&self) -> Option<UseSiteTarget> {
        self.use_site_target
    }

    /// Copy with a different use-site target.
    pub fn with_use_site_target(mut self, target: Option<UseSiteTarget>) -> Self {
        self.use_site_target = target;
        self
    }

    /// Inline annotations keep all members on one line. As a parameter of
    /// another annotation the `@` is dropped and parentheses are always written.
    pub(crate) fn emit(&self, w: &mut CodeWriter<'_>, inline: bool, as_parameter: bool) -> Result<()> {
        if !as_parameter {
            w.emit("@");
        }
        if let Some(target) = self.use_site_target {
            w.emit(target.keyword());
            w.emit(":");
        }
        w.emit_type(&self.type_name)?;

        if self.members.is_empty() && !as_parameter {
            return Ok(());
        }

        let multiple = self.members.len() > 1;
        let (whitespace, separator) = if inline { ("", ", ") } else { ("\n", ",\n") };
        let suffix = if !inline && multiple { "," } else { "" };

        w.emit("(");
        if multiple {
            w.emit(whitespace).indent(1);
        }
        let members = self
            .members
            .iter()
            .map(|m| if inline { m.without_indents() } else { m.clone() });
        w.emit_code_with(&CodeBlock::join(members, separator, "", suffix), true, false)?;
        if multiple {
            w.unindent(1)?.emit(whitespace);
        }
        w.emit(")");
        Ok(())
    }
}

impl fmt::Display for AnnotationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_standalone(f, |w| self.emit(w, true, false))
    }
}

/// Builder for [`AnnotationSpec`].
#[derive(Debug, Clone)]
pub struct AnnotationSpecBuilder {
    type_name: TypeName,
    members: Vec<CodeBlock>,
    use_site_target: Option<UseSiteTarget>,
}

impl AnnotationSpecBuilder {
    /// Add a member such as `%N = %S`.
    pub fn add_member(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.members.push(CodeBlock::of(format, args)?);
        Ok(self)
    }

    pub fn add_member_code(mut self, member: CodeBlock) -> Self {
        self.members.push(member);
        self
    }

    pub fn use_site_target(mut self, target: UseSiteTarget) -> Self {
        self.use_site_target = Some(target);
        self
    }

    pub fn build(self) -> AnnotationSpec {
        AnnotationSpec {
            type_name: Box::new(self.type_name),
            members: self.members,
            use_site_target: self.use_site_target,
        }
    }
}
