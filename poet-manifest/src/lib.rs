//! TOML manifests describing one Kotlin file.
//!
//! ```
//! let manifest = ktpoet_manifest::parse_str(
//!     r#"
//!     [file]
//!     package = "com.example"
//!     name = "Taco"
//!
//!     [[types]]
//!     kind = "class"
//!     name = "Taco"
//!     "#,
//! )
//! .unwrap();
//! let file = manifest.to_file_spec().unwrap();
//! let text = ktpoet_codegen::render(&file, &manifest.render_config()).unwrap();
//! assert_eq!(text, "package com.example\n\npublic class Taco\n");
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod convert;
mod error;
mod schema;
mod types;

use std::path::Path;

pub use error::{Error, Result, SourceContext};
pub use schema::*;

/// Parse a ktpoet.toml file from the given path
pub fn parse_file(path: impl AsRef<Path>) -> Result<Manifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let filename = path.display().to_string();
    parse_str_with_filename(&content, &filename)
}

/// Parse a manifest from a string (uses "ktpoet.toml" as default filename)
pub fn parse_str(content: &str) -> Result<Manifest> {
    parse_str_with_filename(content, "ktpoet.toml")
}

/// Parse a manifest from a string with a custom filename for error reporting
pub fn parse_str_with_filename(content: &str, filename: &str) -> Result<Manifest> {
    let ctx = SourceContext::new(content, filename);
    let mut manifest: Manifest = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
    tracing::debug!(filename, "parsed manifest");
    manifest.source = Some(ctx);
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use ktpoet_codegen::writer::Indent;

    use super::*;

    #[test]
    fn test_minimal_manifest() {
        let manifest = parse_str("[file]\nname = \"Taco\"\n").unwrap();
        assert_eq!(manifest.file.name, "Taco");
        assert_eq!(manifest.file.package, "");
        assert!(manifest.types.is_empty());
        assert_eq!(manifest.render_config(), ktpoet_codegen::RenderConfig::default());
    }

    #[test]
    fn test_render_table() {
        let manifest = parse_str(
            r#"
            [file]
            name = "Taco"

            [render]
            column_limit = 80
            indent = "tab"
            aliases = { "java.sql.Date" = "SqlDate" }
            "#,
        )
        .unwrap();
        let config = manifest.render_config();
        assert_eq!(config.column_limit, 80);
        assert_eq!(config.indent, Indent::Tab);
        assert_eq!(config.aliases.get("java.sql.Date").map(String::as_str), Some("SqlDate"));
    }

    #[test]
    fn test_arguments_are_tagged_tables() {
        let manifest = parse_str(
            r#"
            [file]
            name = "Taco"

            [[functions]]
            name = "eat"
            body = [{ format = "%S %L %T %N", args = [
                { string = "yum" },
                { literal = 1.5 },
                { type = "kotlin.Int" },
                { name = "size" },
            ] }]
            "#,
        )
        .unwrap();
        let args = &manifest.functions[0].body[0].args;
        assert_eq!(args[0], ArgDecl::String("yum".into()));
        assert_eq!(args[1], ArgDecl::Literal(toml::Value::Float(1.5)));
        assert_eq!(args[2], ArgDecl::Type("kotlin.Int".into()));
        assert_eq!(args[3], ArgDecl::Name("size".into()));
    }

    #[test]
    fn test_parse_error_has_span() {
        let err = parse_str("[file\nname = \"Taco\"").unwrap_err();
        assert!(matches!(*err, Error::Parse { span: Some(_), .. }));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = parse_str("[file]\nname = \"Taco\"\nflavor = \"spicy\"\n").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = parse_file("/nonexistent/ktpoet.toml").unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
