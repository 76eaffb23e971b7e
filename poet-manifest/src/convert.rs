//! Conversion from manifest declarations to the codegen declaration tree.

use std::collections::BTreeSet;

use ktpoet_codegen::{
    RenderConfig, args,
    code::{Arg, CodeBlock},
    names::{MemberName, TypeName, TypeVariableName},
    spec::{
        FileSpec, FunSpec, KModifier, ParameterSpec, PropertySpec, TypeAliasSpec, TypeSpec,
        TypeSpecBuilder,
    },
};

use crate::{
    Result,
    error::SourceContext,
    schema::{
        ArgDecl, ConstructorParam, FunctionDecl, Manifest, ParameterDecl, PropertyDecl, Statement,
        TypeAliasDecl, TypeDecl, TypeDeclKind,
    },
    types,
};

impl Manifest {
    /// Build the file this manifest describes.
    pub fn to_file_spec(&self) -> Result<FileSpec> {
        let fallback;
        let ctx = match &self.source {
            Some(ctx) => ctx,
            None => {
                fallback = SourceContext::new("", "ktpoet.toml");
                &fallback
            }
        };
        Converter { ctx }.file(self)
    }

    /// Render settings from the `[render]` table.
    pub fn render_config(&self) -> RenderConfig {
        self.render.clone()
    }
}

/// Type variables visible at a point of the manifest.
type Scope = BTreeSet<String>;

struct Converter<'a> {
    ctx: &'a SourceContext,
}

impl Converter<'_> {
    fn file(&self, manifest: &Manifest) -> Result<FileSpec> {
        let section = &manifest.file;
        tracing::debug!(
            package = %section.package,
            name = %section.name,
            types = manifest.types.len(),
            functions = manifest.functions.len(),
            properties = manifest.properties.len(),
            typealiases = manifest.typealiases.len(),
            "converting manifest"
        );
        let cg = |e| self.ctx.codegen_error(e, &section.name);

        let mut file = FileSpec::builder(&section.package, &section.name);
        if let Some(comment) = &section.comment {
            file = file
                .add_file_comment("%L", args![comment.as_str()])
                .map_err(cg)?;
        }
        for import in &section.imports {
            file = match import.rsplit_once('.') {
                Some((parent, name)) => file.add_import(parent, [name]),
                None => file.add_import("", [import.as_str()]),
            };
        }
        file = file.add_default_imports(section.default_imports.iter().cloned());

        let scope = Scope::new();
        for decl in &manifest.types {
            file = file.add_type(self.type_spec(decl, &scope)?);
        }
        for decl in &manifest.functions {
            file = file.add_function(self.function(decl, &scope)?);
        }
        for decl in &manifest.properties {
            file = file.add_property(self.property(decl, &scope)?);
        }
        for decl in &manifest.typealiases {
            file = file.add_type_alias(self.type_alias(decl)?);
        }
        file.build().map_err(cg)
    }

    fn type_spec(&self, decl: &TypeDecl, outer: &Scope) -> Result<TypeSpec> {
        tracing::trace!(name = %decl.name, kind = ?decl.kind, "converting type");
        let cg = |e| self.ctx.codegen_error(e, &decl.name);

        let mut builder = match decl.kind {
            TypeDeclKind::Class => TypeSpec::class_builder(&decl.name),
            TypeDeclKind::Object => TypeSpec::object_builder(&decl.name),
            TypeDeclKind::Interface => TypeSpec::interface_builder(&decl.name),
            TypeDeclKind::Enum => TypeSpec::enum_builder(&decl.name),
            TypeDeclKind::Annotation => TypeSpec::annotation_builder(&decl.name),
        };
        builder = builder.add_modifiers(self.modifiers(&decl.modifiers, &decl.name)?);

        let (variables, scope) = self.type_variables(&decl.type_variables, outer)?;
        for variable in variables {
            builder = builder.add_type_variable(variable);
        }
        if let Some(kdoc) = &decl.kdoc {
            builder = builder.add_kdoc("%L", args![kdoc.as_str()]).map_err(cg)?;
        }

        if let Some(superclass) = &decl.superclass {
            builder = builder.superclass(self.type_name(superclass, &scope)?);
        }
        for argument in &decl.superclass_args {
            let args = self.args(&argument.args, &scope)?;
            builder = builder
                .add_superclass_constructor_argument(&argument.format, args)
                .map_err(cg)?;
        }
        for interface in &decl.superinterfaces {
            builder = builder.add_superinterface(self.type_name(interface, &scope)?);
        }
        for constant in &decl.enum_constants {
            builder = builder.add_enum_constant(constant).map_err(cg)?;
        }

        builder = self.primary_constructor(builder, &decl.constructor, &scope)?;
        for property in &decl.properties {
            builder = builder.add_property(self.property(property, &scope)?);
        }
        for function in &decl.functions {
            builder = builder.add_function(self.function(function, &scope)?);
        }
        for nested in &decl.types {
            builder = builder.add_type(self.type_spec(nested, &scope)?);
        }
        builder.build().map_err(cg)
    }

    /// Add the primary constructor and the properties its parameters declare.
    fn primary_constructor(
        &self,
        mut builder: TypeSpecBuilder,
        params: &[ConstructorParam],
        scope: &Scope,
    ) -> Result<TypeSpecBuilder> {
        if params.is_empty() {
            return Ok(builder);
        }
        let mut constructor = FunSpec::constructor_builder();
        for param in params {
            let cg = |e| self.ctx.codegen_error(e, &param.name);
            let type_name = self.type_name(&param.type_name, scope)?;

            let mut parameter = ParameterSpec::builder(&param.name, type_name.clone());
            if let Some(default) = &param.default {
                parameter = parameter.default_value_code(self.code(default, scope, &param.name)?);
            }
            if let Some(kdoc) = &param.kdoc {
                parameter = parameter.add_kdoc("%L", args![kdoc.as_str()]).map_err(cg)?;
            }
            constructor = constructor.add_parameter(parameter.build().map_err(cg)?);

            if param.property {
                let property = PropertySpec::builder(&param.name, type_name)
                    .mutable(param.mutable)
                    .initializer("%N", args![param.name.as_str()])
                    .and_then(|p| p.build())
                    .map_err(cg)?;
                builder = builder.add_property(property);
            }
        }
        let constructor = constructor
            .build()
            .map_err(|e| self.ctx.codegen_error(e, "constructor"))?;
        Ok(builder.primary_constructor(constructor))
    }

    fn function(&self, decl: &FunctionDecl, outer: &Scope) -> Result<FunSpec> {
        tracing::trace!(name = %decl.name, "converting function");
        let cg = |e| self.ctx.codegen_error(e, &decl.name);

        let mut builder =
            FunSpec::builder(&decl.name).add_modifiers(self.modifiers(&decl.modifiers, &decl.name)?);
        let (variables, scope) = self.type_variables(&decl.type_variables, outer)?;
        for variable in variables {
            builder = builder.add_type_variable(variable);
        }
        if let Some(kdoc) = &decl.kdoc {
            builder = builder.add_kdoc("%L", args![kdoc.as_str()]).map_err(cg)?;
        }
        if let Some(receiver) = &decl.receiver {
            builder = builder.receiver(self.type_name(receiver, &scope)?);
        }
        for parameter in &decl.parameters {
            builder = builder.add_parameter(self.parameter(parameter, &scope)?);
        }
        if let Some(returns) = &decl.returns {
            builder = builder.returns(self.type_name(returns, &scope)?);
        }
        for statement in &decl.body {
            let args = self.args(&statement.args, &scope)?;
            builder = builder.add_statement(&statement.format, args).map_err(cg)?;
        }
        builder.build().map_err(cg)
    }

    fn parameter(&self, decl: &ParameterDecl, scope: &Scope) -> Result<ParameterSpec> {
        let cg = |e| self.ctx.codegen_error(e, &decl.name);
        let mut builder = ParameterSpec::builder(&decl.name, self.type_name(&decl.type_name, scope)?)
            .add_modifiers(self.modifiers(&decl.modifiers, &decl.name)?);
        if let Some(default) = &decl.default {
            builder = builder.default_value_code(self.code(default, scope, &decl.name)?);
        }
        if let Some(kdoc) = &decl.kdoc {
            builder = builder.add_kdoc("%L", args![kdoc.as_str()]).map_err(cg)?;
        }
        builder.build().map_err(cg)
    }

    fn property(&self, decl: &PropertyDecl, scope: &Scope) -> Result<PropertySpec> {
        tracing::trace!(name = %decl.name, "converting property");
        let cg = |e| self.ctx.codegen_error(e, &decl.name);

        let mut builder = PropertySpec::builder(&decl.name, self.type_name(&decl.type_name, scope)?)
            .mutable(decl.mutable)
            .add_modifiers(self.modifiers(&decl.modifiers, &decl.name)?);
        if let Some(kdoc) = &decl.kdoc {
            builder = builder.add_kdoc("%L", args![kdoc.as_str()]).map_err(cg)?;
        }
        if let Some(initializer) = &decl.initializer {
            let args = self.args(&initializer.args, scope)?;
            builder = builder.initializer(&initializer.format, args).map_err(cg)?;
        }
        if let Some(delegate) = &decl.delegate {
            let args = self.args(&delegate.args, scope)?;
            builder = builder.delegate(&delegate.format, args).map_err(cg)?;
        }
        builder.build().map_err(cg)
    }

    fn type_alias(&self, decl: &TypeAliasDecl) -> Result<TypeAliasSpec> {
        let cg = |e| self.ctx.codegen_error(e, &decl.name);
        let (variables, scope) = self.type_variables(&decl.type_variables, &Scope::new())?;
        let mut builder = TypeAliasSpec::builder(&decl.name, self.type_name(&decl.type_name, &scope)?)
            .add_modifiers(self.modifiers(&decl.modifiers, &decl.name)?);
        for variable in variables {
            builder = builder.add_type_variable(variable);
        }
        if let Some(kdoc) = &decl.kdoc {
            builder = builder.add_kdoc("%L", args![kdoc.as_str()]).map_err(cg)?;
        }
        builder.build().map_err(cg)
    }

    fn modifiers(&self, keywords: &[String], declaration: &str) -> Result<Vec<KModifier>> {
        keywords
            .iter()
            .map(|keyword| {
                KModifier::from_keyword(keyword)
                    .ok_or_else(|| self.ctx.unknown_modifier_error(keyword, declaration))
            })
            .collect()
    }

    /// Parse type variable declarations. Their names are in scope for each
    /// other's bounds and for the declaration's members.
    fn type_variables(
        &self,
        declarations: &[String],
        outer: &Scope,
    ) -> Result<(Vec<TypeVariableName>, Scope)> {
        let mut scope = outer.clone();
        scope.extend(
            declarations
                .iter()
                .filter_map(|d| types::declared_name(d))
                .map(str::to_string),
        );
        let variables = declarations
            .iter()
            .map(|d| {
                types::parse_type_variable(d, &scope)
                    .map_err(|reason| self.ctx.invalid_type_error(d, reason))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((variables, scope))
    }

    fn type_name(&self, expression: &str, scope: &Scope) -> Result<TypeName> {
        types::parse_type(expression, scope)
            .map_err(|reason| self.ctx.invalid_type_error(expression, reason))
    }

    fn code(&self, statement: &Statement, scope: &Scope, near: &str) -> Result<CodeBlock> {
        let args = self.args(&statement.args, scope)?;
        CodeBlock::of(&statement.format, args).map_err(|e| self.ctx.codegen_error(e, near))
    }

    fn args(&self, decls: &[ArgDecl], scope: &Scope) -> Result<Vec<Arg>> {
        decls.iter().map(|decl| self.arg(decl, scope)).collect()
    }

    fn arg(&self, decl: &ArgDecl, scope: &Scope) -> Result<Arg> {
        Ok(match decl {
            ArgDecl::String(value) | ArgDecl::Name(value) => Arg::from(value.as_str()),
            ArgDecl::Literal(value) => match value {
                toml::Value::Integer(i) => Arg::from(*i),
                toml::Value::Float(f) => Arg::from(*f),
                toml::Value::Boolean(b) => Arg::from(*b),
                toml::Value::String(s) => Arg::Literal(s.clone()),
                other => {
                    return Err(self.ctx.invalid_argument_error(
                        format!("a literal must be a number, boolean or string, not {}", other.type_str()),
                        "literal",
                    ));
                }
            },
            ArgDecl::Type(expression) => Arg::from(self.type_name(expression, scope)?),
            ArgDecl::Member(name) => Arg::from(
                MemberName::best_guess(name).map_err(|e| self.ctx.codegen_error(e, name))?,
            ),
            ArgDecl::Null(true) => Arg::from(None::<&str>),
            ArgDecl::Null(false) => {
                return Err(self
                    .ctx
                    .invalid_argument_error("'null' can only be true", "null"));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use ktpoet_codegen::render;

    use super::*;
    use crate::{Error, parse_str};

    fn rendered(content: &str) -> String {
        let manifest = parse_str(content).unwrap();
        let file = manifest.to_file_spec().unwrap();
        render(&file, &manifest.render_config()).unwrap()
    }

    #[test]
    fn test_data_class_with_constructor_properties() {
        let text = rendered(
            r#"
            [file]
            package = "com.squareup.tacos"
            name = "Taco"
            default_imports = ["kotlin"]

            [[types]]
            kind = "class"
            name = "Taco"
            modifiers = ["data"]

            [[types.constructor]]
            name = "cheese"
            type = "kotlin.String?"

            [[types.constructor]]
            name = "size"
            type = "kotlin.Int"
            mutable = true
            "#,
        );
        assert_eq!(
            text,
            "package com.squareup.tacos\n\npublic data class Taco(\n  public val cheese: String?,\n  public var size: Int,\n)\n"
        );
    }

    #[test]
    fn test_function_body_arguments() {
        let text = rendered(
            r#"
            [file]
            package = "com.example"
            name = "Eat"

            [[functions]]
            name = "eat"
            body = [
                { format = "println(%S)", args = [{ string = "yum" }] },
                { format = "val size = %L", args = [{ literal = 10000 }] },
                { format = "%M()", args = [{ member = "kotlinx.coroutines.launch" }] },
            ]
            "#,
        );
        assert_eq!(
            text,
            "package com.example\n\nimport kotlinx.coroutines.launch\n\npublic fun eat() {\n  println(\"yum\")\n  val size = 10_000\n  launch()\n}\n"
        );
    }

    #[test]
    fn test_render_aliases_from_manifest() {
        let text = rendered(
            r#"
            [file]
            package = "com.example"
            name = "Dates"

            [render]
            aliases = { "java.sql.Date" = "SqlDate" }

            [[properties]]
            name = "stored"
            type = "java.sql.Date?"
            initializer = { format = "null" }
            "#,
        );
        assert_eq!(
            text,
            "package com.example\n\nimport java.sql.Date as SqlDate\n\npublic val stored: SqlDate? = null\n"
        );
    }

    #[test]
    fn test_generic_type_alias() {
        let text = rendered(
            r#"
            [file]
            name = "Aliases"

            [[typealiases]]
            name = "Registry"
            type = "kotlin.collections.Map<K, kotlin.String>"
            type_variables = ["K"]
            "#,
        );
        assert_eq!(
            text,
            "import kotlin.String\nimport kotlin.collections.Map\n\npublic typealias Registry<K> = Map<K, String>\n"
        );
    }

    #[test]
    fn test_unknown_modifier() {
        let manifest = parse_str(
            r#"
            [file]
            name = "Taco"

            [[types]]
            kind = "class"
            name = "Taco"
            modifiers = ["crunchy"]
            "#,
        )
        .unwrap();
        let err = manifest.to_file_spec().unwrap_err();
        assert!(matches!(*err, Error::UnknownModifier { ref modifier, .. } if modifier == "crunchy"));
    }

    #[test]
    fn test_bad_type_expression_points_at_source() {
        let manifest = parse_str(
            r#"
            [file]
            name = "Taco"

            [[properties]]
            name = "name"
            type = "kotlin.String<"
            "#,
        )
        .unwrap();
        let err = manifest.to_file_spec().unwrap_err();
        match *err {
            Error::InvalidType { span, ref expression, .. } => {
                assert_eq!(expression, "kotlin.String<");
                assert!(span.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_codegen_errors_are_wrapped() {
        let manifest = parse_str(
            r#"
            [file]
            name = "Taco"

            [[types]]
            kind = "class"
            name = "Taco"
            enum_constants = ["BEEF"]
            "#,
        )
        .unwrap();
        let err = manifest.to_file_spec().unwrap_err();
        assert!(matches!(*err, Error::Codegen { ref declaration, .. } if declaration == "Taco"));
    }
}
