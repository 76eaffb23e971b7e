use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for ktpoet operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("invalid name '{name}': {reason}")]
    #[diagnostic(code(ktpoet::invalid_name))]
    InvalidName { name: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(ktpoet::template_syntax))]
    TemplateSyntax {
        #[source_code]
        template: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("wildcard import '{path}' is not supported")]
    #[diagnostic(
        code(ktpoet::unsupported_import),
        help("import each name explicitly, optionally with an alias")
    )]
    UnsupportedImport { path: String },

    #[error("could not generate a unique alias for '{simple_name}' among {owners}")]
    #[diagnostic(code(ktpoet::import_collision_exhausted))]
    ImportCollisionExhausted { simple_name: String, owners: String },

    #[error("imports {paths} all bring '{name}' into scope")]
    #[diagnostic(
        code(ktpoet::conflicting_imports),
        help("give all but one of them an alias")
    )]
    ConflictingImports { name: String, paths: String },

    #[error("can't close a statement that hasn't been opened")]
    #[diagnostic(
        code(ktpoet::unbalanced_statement),
        help("closing » is not preceded by an opening «\n- format parts: {parts}\n- arguments: {args}")
    )]
    UnbalancedStatement { parts: String, args: String },

    #[error("{depth} statement(s) still open at the end of the render")]
    #[diagnostic(
        code(ktpoet::unclosed_statement),
        help("every opening « needs a matching »")
    )]
    UnclosedStatement { depth: usize },

    #[error("cannot unindent {requested} from {level}")]
    #[diagnostic(code(ktpoet::unbalanced_indent))]
    UnbalancedIndent { level: usize, requested: usize },

    #[error("can't escape identifier '{name}' because it contains illegal characters: {chars}")]
    #[diagnostic(code(ktpoet::illegal_identifier))]
    IllegalIdentifier { name: String, chars: String },

    #[error("{message}")]
    #[diagnostic(code(ktpoet::invalid_spec))]
    InvalidSpec { message: String },

    #[error("failed to write '{path}'")]
    #[diagnostic(code(ktpoet::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Box<Self> {
        Box::new(Error::InvalidName {
            name: name.into(),
            reason: reason.into(),
        })
    }

    /// Create a template syntax error pointing at `span` inside `template`
    pub fn template(
        message: impl Into<String>,
        template: &str,
        span: Option<(usize, usize)>,
    ) -> Box<Self> {
        Box::new(Error::TemplateSyntax {
            template: NamedSource::new("template", template.to_string()),
            span: span.map(SourceSpan::from),
            message: message.into(),
        })
    }

    /// Create an unsupported import error
    pub fn unsupported_import(path: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnsupportedImport { path: path.into() })
    }

    /// Create an alias exhaustion error
    pub fn collision_exhausted(
        simple_name: impl Into<String>,
        owners: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Box<Self> {
        let owners: Vec<String> = owners.into_iter().map(|o| o.as_ref().to_string()).collect();
        Box::new(Error::ImportCollisionExhausted {
            simple_name: simple_name.into(),
            owners: owners.join(", "),
        })
    }

    /// Create an error for imports that share an in-scope name
    pub fn conflicting_imports(
        name: impl Into<String>,
        paths: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Box<Self> {
        let paths: Vec<String> = paths.into_iter().map(|p| p.as_ref().to_string()).collect();
        Box::new(Error::ConflictingImports {
            name: name.into(),
            paths: paths.join(", "),
        })
    }

    /// Create an unbalanced statement error from a fragment's parts and arguments
    pub fn unbalanced_statement(parts: impl Into<String>, args: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnbalancedStatement {
            parts: parts.into(),
            args: args.into(),
        })
    }

    /// Create an unclosed statement error
    pub fn unclosed_statement(depth: usize) -> Box<Self> {
        Box::new(Error::UnclosedStatement { depth })
    }

    /// Create an unbalanced indent error
    pub fn unbalanced_indent(level: usize, requested: usize) -> Box<Self> {
        Box::new(Error::UnbalancedIndent { level, requested })
    }

    /// Create an illegal identifier error
    pub fn illegal_identifier(name: impl Into<String>, chars: impl Into<String>) -> Box<Self> {
        Box::new(Error::IllegalIdentifier {
            name: name.into(),
            chars: chars.into(),
        })
    }

    /// Create a spec validation error
    pub fn invalid_spec(message: impl Into<String>) -> Box<Self> {
        Box::new(Error::InvalidSpec {
            message: message.into(),
        })
    }

    /// Create an I/O error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_carries_span() {
        let err = Error::template("dangling % at end", "foo %", Some((4, 1)));
        match *err {
            Error::TemplateSyntax { span, message, .. } => {
                assert_eq!(message, "dangling % at end");
                assert_eq!(span, Some(SourceSpan::from((4, 1))));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collision_exhausted_lists_owners() {
        let err = Error::collision_exhausted("Taco", ["a.Taco", "b.Taco"]);
        assert_eq!(
            err.to_string(),
            "could not generate a unique alias for 'Taco' among a.Taco, b.Taco"
        );
    }

    #[test]
    fn test_conflicting_imports_lists_paths() {
        let err = Error::conflicting_imports("Taco", ["a.Taco", "b.Taco"]);
        assert_eq!(
            err.to_string(),
            "imports a.Taco, b.Taco all bring 'Taco' into scope"
        );
    }

    #[test]
    fn test_illegal_identifier_message() {
        let err = Error::illegal_identifier("a.b", ".");
        assert_eq!(
            err.to_string(),
            "can't escape identifier 'a.b' because it contains illegal characters: ."
        );
    }
}
