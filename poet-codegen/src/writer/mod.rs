//! Rendering primitives: indentation, soft wrapping and the code writer.

mod code_writer;
mod indent;
mod line_wrapper;

use std::fmt;

pub use indent::Indent;
pub(crate) use code_writer::{CodeWriter, TypeScope};

use crate::{code::CodeBlock, config::RenderConfig, names::TypeName};

/// Render outside any file: default indent, no column limit, every name
/// fully qualified.
pub(crate) fn render_standalone(
    f: &mut fmt::Formatter<'_>,
    emit: impl FnOnce(&mut CodeWriter<'_>) -> ktpoet_core::Result<()>,
) -> fmt::Result {
    let config = RenderConfig::default().column_limit(usize::MAX);
    let mut writer = CodeWriter::standalone(&config);
    let rendered = emit(&mut writer).and_then(|()| writer.finish());
    match rendered {
        Ok((text, _)) => f.write_str(&text),
        Err(e) => write!(f, "<{e}>"),
    }
}

impl fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_standalone(f, |writer| writer.emit_code(self).map(|_| ()))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_standalone(f, |writer| writer.emit_type(self))
    }
}
