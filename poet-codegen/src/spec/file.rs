//! Whole Kotlin source files.

use std::{collections::BTreeSet, path::PathBuf};

use ktpoet_core::{Error, GeneratedFile, Result, escape_segments_if_necessary};

use super::{
    AnnotationSpec, FunSpec, KModifier, PropertySpec, TypeAliasSpec, TypeSpec, UseSiteTarget,
    property::EmitOptions,
};
use crate::{
    code::{Arg, CodeBlock, CodeBlockBuilder},
    config::RenderConfig,
    generation::Import,
    names::{ClassName, MemberName},
    writer::CodeWriter,
};

/// A top-level declaration of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMember {
    Type(TypeSpec),
    Function(FunSpec),
    Property(PropertySpec),
    TypeAlias(TypeAliasSpec),
}

/// One `.kt` file: package, imports and top-level declarations.
///
/// Render it with [`render`](crate::render), or write it below a directory
/// through [`GeneratedFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    package: String,
    name: String,
    comment: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    members: Vec<FileMember>,
    imports: Vec<Import>,
    default_imports: BTreeSet<String>,
}

impl FileSpec {
    pub fn builder(package: impl Into<String>, name: impl Into<String>) -> FileSpecBuilder {
        FileSpecBuilder {
            package: package.into(),
            name: name.into(),
            comment: CodeBlock::builder(),
            annotations: Vec::new(),
            members: Vec::new(),
            imports: Vec::new(),
            default_imports: BTreeSet::new(),
        }
    }

    /// A file holding just `type_spec`, named after it.
    pub fn get(package: impl Into<String>, type_spec: TypeSpec) -> Result<Self> {
        let Some(name) = type_spec.name().map(str::to_string) else {
            return Err(Error::invalid_spec("an anonymous class cannot be a file"));
        };
        Self::builder(package, name).add_type(type_spec).build()
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[FileMember] {
        &self.members
    }

    /// Imports requested by the caller, in insertion order.
    pub fn explicit_imports(&self) -> &[Import] {
        &self.imports
    }

    /// Plain imports from a default-imported package are not written.
    fn is_implied(&self, import: &Import) -> bool {
        import.alias().is_none() && self.default_imports.contains(import.parent())
    }

    pub(crate) fn emit(&self, w: &mut CodeWriter<'_>) -> Result<()> {
        if !self.comment.is_empty() {
            w.emit_comment(&self.comment)?;
        }
        if !self.annotations.is_empty() {
            w.emit_annotations(&self.annotations, false)?;
            w.emit("\n");
        }
        if !self.package.is_empty() {
            let package = escape_segments_if_necessary(&self.package, '.')?;
            w.emit(&format!("package {package}\n\n"));
        }

        let imports = w
            .imports()
            .imports()
            .into_iter()
            .filter(|i| !self.is_implied(i))
            .map(Import::render)
            .collect::<Result<Vec<_>>>()?;
        if !imports.is_empty() {
            for import in &imports {
                w.emit(&format!("import {import}\n"));
            }
            w.emit("\n");
        }

        let public: BTreeSet<KModifier> = [KModifier::Public].into();
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                w.emit("\n");
            }
            match member {
                FileMember::Type(type_spec) => type_spec.emit(w, None, &BTreeSet::new(), false)?,
                FileMember::Function(function) => function.emit(w, &public, true)?,
                FileMember::Property(property) => {
                    property.emit(w, &public, EmitOptions::default())?;
                }
                FileMember::TypeAlias(alias) => alias.emit(w)?,
            }
        }
        Ok(())
    }
}

impl GeneratedFile for FileSpec {
    fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self
            .package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        path.push(format!("{}.kt", self.name));
        path
    }

    fn render(&self) -> eyre::Result<String> {
        Ok(crate::render(self, &RenderConfig::default())?)
    }
}

/// Builder for [`FileSpec`].
#[derive(Debug, Clone)]
pub struct FileSpecBuilder {
    package: String,
    name: String,
    comment: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    members: Vec<FileMember>,
    imports: Vec<Import>,
    default_imports: BTreeSet<String>,
}

impl FileSpecBuilder {
    /// Append to the `//` comment at the top of the file.
    pub fn add_file_comment(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        self.comment = self.comment.add(format, args)?;
        Ok(self)
    }

    /// Add a file annotation. Its use-site target becomes `file`.
    pub fn add_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations
            .push(annotation.with_use_site_target(Some(UseSiteTarget::File)));
        self
    }

    pub fn add_type(mut self, type_spec: TypeSpec) -> Self {
        self.members.push(FileMember::Type(type_spec));
        self
    }

    pub fn add_function(mut self, function: FunSpec) -> Self {
        self.members.push(FileMember::Function(function));
        self
    }

    pub fn add_property(mut self, property: PropertySpec) -> Self {
        self.members.push(FileMember::Property(property));
        self
    }

    pub fn add_type_alias(mut self, alias: TypeAliasSpec) -> Self {
        self.members.push(FileMember::TypeAlias(alias));
        self
    }

    /// Import `names` from `package`, e.g. `add_import("kotlin.math", ["PI"])`.
    ///
    /// A `*` name is accepted here and rejected when the file is rendered.
    pub fn add_import<S: AsRef<str>>(
        mut self,
        package: &str,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        for name in names {
            let name = name.as_ref();
            let path = if package.is_empty() {
                name.to_string()
            } else {
                format!("{package}.{name}")
            };
            self.imports.push(Import::new(path));
        }
        self
    }

    pub fn add_class_import(mut self, class: &ClassName) -> Self {
        self.imports.push(Import::new(class.canonical_name()));
        self
    }

    pub fn add_member_import(mut self, member: &MemberName) -> Self {
        self.imports.push(Import::new(member.canonical_name()));
        self
    }

    /// Import `class` under `alias`.
    pub fn add_aliased_import(mut self, class: &ClassName, alias: impl Into<String>) -> Self {
        self.imports
            .push(Import::aliased(class.canonical_name(), alias));
        self
    }

    pub fn add_aliased_member_import(mut self, member: &MemberName, alias: impl Into<String>) -> Self {
        self.imports
            .push(Import::aliased(member.canonical_name(), alias));
        self
    }

    /// Treat `packages` as imported by default, so their imports are not written.
    pub fn add_default_imports<S: Into<String>>(mut self, packages: impl IntoIterator<Item = S>) -> Self {
        self.default_imports.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<FileSpec> {
        if self.name.is_empty() {
            return Err(Error::invalid_spec("file name cannot be empty"));
        }
        Ok(FileSpec {
            package: self.package,
            name: self.name,
            comment: self.comment.build()?,
            annotations: self.annotations,
            members: self.members,
            imports: self.imports,
            default_imports: self.default_imports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::kotlin;

    fn taco_type() -> TypeSpec {
        TypeSpec::class_builder("Taco").build().unwrap()
    }

    #[test]
    fn test_relative_path() {
        let file = FileSpec::get("com.squareup.tacos", taco_type()).unwrap();
        assert_eq!(
            file.relative_path(),
            PathBuf::from("com").join("squareup").join("tacos").join("Taco.kt")
        );

        let file = FileSpec::get("", taco_type()).unwrap();
        assert_eq!(file.relative_path(), PathBuf::from("Taco.kt"));
    }

    #[test]
    fn test_default_package_has_no_package_line() {
        let file = FileSpec::get("", taco_type()).unwrap();
        assert_eq!(crate::render(&file, &RenderConfig::default()).unwrap(), "public class Taco\n");
    }

    #[test]
    fn test_default_imports_are_not_written() {
        let property = PropertySpec::builder("name", kotlin::string())
            .initializer("%S", crate::args!["taco"])
            .unwrap()
            .build()
            .unwrap();
        let file = FileSpec::builder("com.example", "Names")
            .add_property(property.clone())
            .add_default_imports(kotlin::DEFAULT_IMPORTS.iter().copied())
            .build()
            .unwrap();
        assert_eq!(
            crate::render(&file, &RenderConfig::default()).unwrap(),
            "package com.example\n\npublic val name: String = \"taco\"\n"
        );

        let file = FileSpec::builder("com.example", "Names")
            .add_property(property)
            .build()
            .unwrap();
        assert_eq!(
            crate::render(&file, &RenderConfig::default()).unwrap(),
            "package com.example\n\nimport kotlin.String\n\npublic val name: String = \"taco\"\n"
        );
    }

    #[test]
    fn test_file_annotation_gets_file_target() {
        let jvm_name = ClassName::new("kotlin.jvm", ["JvmName"]).unwrap();
        let file = FileSpec::builder("com.example", "Tacos")
            .add_annotation(
                AnnotationSpec::builder(jvm_name)
                    .add_member("%S", crate::args!["TacoUtils"])
                    .unwrap()
                    .build(),
            )
            .build()
            .unwrap();
        assert_eq!(
            crate::render(&file, &RenderConfig::default()).unwrap(),
            "@file:JvmName(\"TacoUtils\")\n\npackage com.example\n\nimport kotlin.jvm.JvmName\n\n"
        );
    }

    #[test]
    fn test_anonymous_class_cannot_be_a_file() {
        let anonymous = TypeSpec::anonymous_class_builder().build().unwrap();
        assert!(FileSpec::get("com.example", anonymous).is_err());
    }
}
