use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Carries the manifest text and filename so every diagnostic can point into
/// the file it came from.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Find the first quoted occurrence of `text`, falling back to a bare one.
    pub fn find_span(&self, text: &str) -> Option<SourceSpan> {
        if text.is_empty() {
            return None;
        }
        let quoted = format!("\"{text}\"");
        if let Some(pos) = self.src.find(&quoted) {
            return Some(SourceSpan::from((pos + 1, text.len())));
        }
        self.src
            .find(text)
            .map(|pos| SourceSpan::from((pos, text.len())))
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    pub fn invalid_type_error(
        &self,
        expression: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Error> {
        let expression = expression.into();
        Box::new(Error::InvalidType {
            src: self.named_source(),
            span: self.find_span(&expression),
            expression,
            reason: reason.into(),
        })
    }

    pub fn unknown_modifier_error(
        &self,
        modifier: impl Into<String>,
        declaration: impl Into<String>,
    ) -> Box<Error> {
        let modifier = modifier.into();
        Box::new(Error::UnknownModifier {
            src: self.named_source(),
            span: self.find_span(&modifier),
            modifier,
            declaration: declaration.into(),
        })
    }

    pub fn invalid_argument_error(
        &self,
        message: impl Into<String>,
        near: &str,
    ) -> Box<Error> {
        Box::new(Error::InvalidArgument {
            src: self.named_source(),
            span: self.find_span(near),
            message: message.into(),
        })
    }

    /// Wrap an error raised while building the declaration tree. `near` is the
    /// name of the declaration being built.
    pub fn codegen_error(&self, source: Box<ktpoet_core::Error>, near: &str) -> Box<Error> {
        Box::new(Error::Codegen {
            src: self.named_source(),
            span: self.find_span(near),
            declaration: near.to_string(),
            source,
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(ktpoet::io),
        help("pass the manifest path with -m, e.g. 'ktpoet render -m ktpoet.toml'")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest")]
    #[diagnostic(code(ktpoet::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid type '{expression}': {reason}")]
    #[diagnostic(
        code(ktpoet::invalid_type),
        help(
            "write a qualified name such as 'kotlin.collections.List<kotlin.String>?', or a type variable declared on the enclosing declaration"
        )
    )]
    InvalidType {
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: Option<SourceSpan>,
        expression: String,
        reason: String,
    },

    #[error("unknown modifier '{modifier}' on {declaration}")]
    #[diagnostic(
        code(ktpoet::unknown_modifier),
        help("modifiers are Kotlin keywords such as 'public', 'data', 'override' or 'suspend'")
    )]
    UnknownModifier {
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown modifier")]
        span: Option<SourceSpan>,
        modifier: String,
        declaration: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(ktpoet::invalid_argument),
        help(
            "arguments are tables with one key: string, literal, type, member, name or null"
        )
    )]
    InvalidArgument {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("cannot build '{declaration}'")]
    #[diagnostic(code(ktpoet::codegen))]
    Codegen {
        #[source_code]
        src: NamedSource<String>,
        #[label("declared here")]
        span: Option<SourceSpan>,
        declaration: String,
        #[source]
        source: Box<ktpoet_core::Error>,
    },
}
