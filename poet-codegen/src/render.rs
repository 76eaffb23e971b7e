//! The render entry point.
//!
//! Rendering walks the file twice. The first pass emits into a scratch
//! buffer with only the caller's explicit imports installed and records every
//! name that could be imported. [`resolve_imports`] turns that record into the
//! final [`ImportTable`], and the second pass emits against it.

use ktpoet_core::Result;

use crate::{
    config::RenderConfig,
    generation::{Import, ImportTable, resolve},
    spec::FileSpec,
    writer::CodeWriter,
};

/// Render `file` to Kotlin source.
///
/// The same file and config always produce byte-identical output. On error
/// nothing is returned.
///
/// ```
/// use ktpoet_codegen::{RenderConfig, render, spec::{FileSpec, TypeSpec}};
///
/// let taco = TypeSpec::class_builder("Taco").build().unwrap();
/// let file = FileSpec::get("com.squareup.tacos", taco).unwrap();
/// assert_eq!(
///     render(&file, &RenderConfig::default()).unwrap(),
///     "package com.squareup.tacos\n\npublic class Taco\n"
/// );
/// ```
pub fn render(file: &FileSpec, config: &RenderConfig) -> Result<String> {
    render_with_imports(file, config).map(|(text, _)| text)
}

/// Render `file` and return the import table the output was written against.
pub fn render_with_imports(
    file: &FileSpec,
    config: &RenderConfig,
) -> Result<(String, ImportTable)> {
    let imports = resolve_imports(file, config)?;
    tracing::debug!(
        file = %file.name(),
        imports = imports.imports().len(),
        "emitting"
    );
    let mut writer = CodeWriter::new(config, Some(file.package()), imports);
    file.emit(&mut writer)?;
    let imports = writer.imports().clone();
    let (text, _) = writer.finish()?;
    Ok((text, imports))
}

/// Run the collection pass and resolve the file's imports, aliases included.
pub fn resolve_imports(file: &FileSpec, config: &RenderConfig) -> Result<ImportTable> {
    let explicit = ImportTable::explicit(explicit_imports(file, config))?;

    tracing::debug!(file = %file.name(), "collecting importable names");
    let mut collector = CodeWriter::new(config, Some(file.package()), explicit.clone());
    file.emit(&mut collector)?;
    let (_, collected) = collector.finish()?;
    tracing::trace!(
        types = collected.types.len(),
        members = collected.members.len(),
        "collected"
    );

    resolve(&explicit, &collected, &config.alias_policy)
}

/// Imports requested on the file, then aliases from the config.
fn explicit_imports(file: &FileSpec, config: &RenderConfig) -> Vec<Import> {
    file.explicit_imports()
        .iter()
        .cloned()
        .chain(
            config
                .aliases
                .iter()
                .map(|(path, alias)| Import::aliased(path.clone(), alias.clone())),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        args,
        names::{ClassName, MemberName},
        spec::{FileSpecBuilder, FunSpec},
    };

    fn uses(classes: &[&str]) -> FileSpec {
        let mut body = FunSpec::builder("tacos");
        for class in classes {
            let class = ClassName::best_guess(class).unwrap();
            body = body.add_statement("%T()", args![class]).unwrap();
        }
        FileSpec::builder("com.example", "Tacos")
            .add_function(body.build().unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_wildcard_import_fails_without_output() {
        let file = FileSpec::builder("com.example", "Tacos")
            .add_import("kotlin.math", ["*"])
            .build()
            .unwrap();
        let err = render(&file, &RenderConfig::default()).unwrap_err();
        assert!(matches!(*err, ktpoet_core::Error::UnsupportedImport { .. }));
    }

    #[test]
    fn test_config_aliases_are_explicit_imports() {
        let file = uses(&["java.sql.Date"]);
        let config = RenderConfig::default().alias("java.sql.Date", "SqlDate");
        let table = resolve_imports(&file, &config).unwrap();
        assert_eq!(table.alias_of("java.sql.Date"), Some("SqlDate"));
        assert!(render(&file, &config).unwrap().contains("  SqlDate()\n"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let file = uses(&["com.squareup.tacos.Taco", "com.twitter.tacos.Taco", "java.util.Date"]);
        let config = RenderConfig::default();
        assert_eq!(render(&file, &config).unwrap(), render(&file, &config).unwrap());
    }

    #[test]
    fn test_alias_table_ignores_reference_order() {
        let forward = uses(&["com.squareup.tacos.Taco", "com.twitter.tacos.Taco"]);
        let backward = uses(&["com.twitter.tacos.Taco", "com.squareup.tacos.Taco"]);
        let config = RenderConfig::default();
        assert_eq!(
            resolve_imports(&forward, &config).unwrap(),
            resolve_imports(&backward, &config).unwrap()
        );
    }

    fn tacos(statements: Vec<(&str, crate::code::Arg)>) -> FileSpecBuilder {
        let mut body = FunSpec::builder("tacos");
        for (format, arg) in statements {
            body = body.add_statement(format, vec![arg]).unwrap();
        }
        FileSpec::builder("com.example", "Tacos").add_function(body.build().unwrap())
    }

    #[test]
    fn test_type_and_member_sharing_a_name_ignore_order() {
        let class = ClassName::best_guess("com.a.Taco").unwrap();
        let member = MemberName::new("com.b", "Taco").unwrap();
        let forward = tacos(vec![("%T()", class.clone().into()), ("%M()", member.clone().into())])
            .build()
            .unwrap();
        let backward = tacos(vec![("%M()", member.into()), ("%T()", class.into())])
            .build()
            .unwrap();
        let config = RenderConfig::default();

        let (text, table) = render_with_imports(&forward, &config).unwrap();
        assert_eq!(table, resolve_imports(&backward, &config).unwrap());
        assert_eq!(
            text,
            "package com.example\n\n\
             import com.a.Taco as ATaco\n\
             import com.b.Taco as bTaco\n\n\
             public fun tacos() {\n  ATaco()\n  bTaco()\n}\n"
        );
    }

    #[test]
    fn test_colliding_explicit_imports_render_one_plain_name() {
        let square = ClassName::best_guess("com.squareup.tacos.Taco").unwrap();
        let twitter = ClassName::best_guess("com.twitter.tacos.Taco").unwrap();
        let file = tacos(vec![("%T()", square.clone().into()), ("%T()", twitter.clone().into())])
            .add_class_import(&square)
            .add_class_import(&twitter)
            .build()
            .unwrap();
        assert_eq!(
            render(&file, &RenderConfig::default()).unwrap(),
            "package com.example\n\n\
             import com.squareup.tacos.Taco\n\
             import com.twitter.tacos.Taco as TacosTaco\n\n\
             public fun tacos() {\n  Taco()\n  TacosTaco()\n}\n"
        );
    }

    #[test]
    fn test_unused_colliding_imports_fail() {
        let file = FileSpec::builder("com.example", "Tacos")
            .add_class_import(&ClassName::best_guess("com.squareup.tacos.Taco").unwrap())
            .add_class_import(&ClassName::best_guess("com.twitter.tacos.Taco").unwrap())
            .build()
            .unwrap();
        let err = render(&file, &RenderConfig::default()).unwrap_err();
        assert!(matches!(*err, ktpoet_core::Error::ConflictingImports { .. }));
    }
}
