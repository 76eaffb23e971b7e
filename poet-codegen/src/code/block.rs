//! Parsed code fragments and their builder.

use ktpoet_core::Result;

use super::{Arg, parse};

/// Placeholder designators that consume an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Placeholder {
    /// `%L`
    Literal,
    /// `%N`
    Name,
    /// `%S`
    Str,
    /// `%P`
    Template,
    /// `%T`
    Type,
    /// `%M`
    Member,
}

impl Placeholder {
    pub fn from_designator(c: char) -> Option<Self> {
        match c {
            'L' => Some(Self::Literal),
            'N' => Some(Self::Name),
            'S' => Some(Self::Str),
            'P' => Some(Self::Template),
            'T' => Some(Self::Type),
            'M' => Some(Self::Member),
            _ => None,
        }
    }

    pub fn designator(&self) -> char {
        match self {
            Self::Literal => 'L',
            Self::Name => 'N',
            Self::Str => 'S',
            Self::Template => 'P',
            Self::Type => 'T',
            Self::Member => 'M',
        }
    }
}

/// One token of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum CodePart {
    /// Literal text. May contain `♢` wrap points and `·` non-breaking spaces.
    Text(String),
    /// Consumes the next argument in order.
    Placeholder(Placeholder),
    /// `%%`
    Percent,
    /// `⇥`
    Indent,
    /// `⇤`
    Unindent,
    /// `«`
    StatementOpen,
    /// `»`
    StatementClose,
}

impl CodePart {
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '⇥' => Some(Self::Indent),
            '⇤' => Some(Self::Unindent),
            '«' => Some(Self::StatementOpen),
            '»' => Some(Self::StatementClose),
            _ => None,
        }
    }

    fn is_marker(&self) -> bool {
        matches!(
            self,
            Self::Indent | Self::Unindent | Self::StatementOpen | Self::StatementClose
        )
    }

    /// The template text this part was parsed from.
    pub fn source(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Placeholder(p) => format!("%{}", p.designator()),
            Self::Percent => "%%".to_string(),
            Self::Indent => "⇥".to_string(),
            Self::Unindent => "⇤".to_string(),
            Self::StatementOpen => "«".to_string(),
            Self::StatementClose => "»".to_string(),
        }
    }
}

/// A parsed template plus the arguments its placeholders consume, in order.
///
/// Arguments are stored once per placeholder, so `%1T.out.println(%1S)`
/// holds the class twice. Statement balance is not checked here; the writer
/// does it once the whole tree is flattened.
///
/// # Example
///
/// ```
/// use ktpoet_codegen::{args, code::CodeBlock};
///
/// let block = CodeBlock::of("val size = %L", args![10_000]).unwrap();
/// assert_eq!(block.to_string(), "val size = 10_000");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeBlock {
    parts: Vec<CodePart>,
    args: Vec<Arg>,
}

impl CodeBlock {
    /// Parse `format` with positional or indexed arguments.
    pub fn of(format: &str, args: Vec<Arg>) -> Result<Self> {
        Self::builder().add(format, args)?.build()
    }

    pub fn builder() -> CodeBlockBuilder {
        CodeBlockBuilder::default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Whether any statement marker is present.
    pub fn has_statements(&self) -> bool {
        self.parts.contains(&CodePart::StatementOpen)
    }

    pub(crate) fn parts(&self) -> &[CodePart] {
        &self.parts
    }

    pub(crate) fn args(&self) -> &[Arg] {
        &self.args
    }

    pub(crate) fn has_unmatched_closing_statement(&self) -> bool {
        let mut open = 0usize;
        for part in &self.parts {
            match part {
                CodePart::StatementOpen => open += 1,
                CodePart::StatementClose if open == 0 => return true,
                CodePart::StatementClose => open -= 1,
                _ => {}
            }
        }
        false
    }

    /// Copy without leading and trailing indent and statement markers.
    pub fn trim(&self) -> Self {
        let start = self
            .parts
            .iter()
            .position(|p| !p.is_marker())
            .unwrap_or(self.parts.len());
        let end = self
            .parts
            .iter()
            .rposition(|p| !p.is_marker())
            .map_or(start, |i| i + 1);
        Self {
            parts: self.parts[start..end].to_vec(),
            args: self.args.clone(),
        }
    }

    /// Copy without `⇥` and `⇤` markers, for single-line rendering.
    pub(crate) fn without_indents(&self) -> Self {
        Self {
            parts: self
                .parts
                .iter()
                .filter(|p| !matches!(p, CodePart::Indent | CodePart::Unindent))
                .cloned()
                .collect(),
            args: self.args.clone(),
        }
    }

    /// Strip `prefix` from the first text part, if this block starts with it.
    pub(crate) fn without_text_prefix(&self, prefix: &str) -> Option<Self> {
        let Some(CodePart::Text(first)) = self.parts.first() else {
            return None;
        };
        let rest = first.strip_prefix(prefix)?;
        let mut parts = Vec::with_capacity(self.parts.len());
        if !rest.is_empty() {
            parts.push(CodePart::Text(rest.to_string()));
        }
        parts.extend(self.parts[1..].iter().cloned());
        Some(Self {
            parts,
            args: self.args.clone(),
        })
    }

    /// Replace `from` with `to` at the start of every text part.
    pub(crate) fn replace_text_prefixes(&self, from: &str, to: &str) -> Self {
        let parts = self
            .parts
            .iter()
            .map(|part| match part {
                CodePart::Text(text) => match text.strip_prefix(from) {
                    Some(rest) => CodePart::Text(format!("{to}{rest}")),
                    None => part.clone(),
                },
                _ => part.clone(),
            })
            .collect();
        Self {
            parts,
            args: self.args.clone(),
        }
    }

    /// Join blocks with `separator`, wrapped in `prefix` and `suffix`.
    ///
    /// The separator and affixes are literal text; they are not parsed as templates.
    pub fn join(
        blocks: impl IntoIterator<Item = CodeBlock>,
        separator: &str,
        prefix: &str,
        suffix: &str,
    ) -> Self {
        let mut builder = Self::builder().add_text(prefix);
        for (i, block) in blocks.into_iter().enumerate() {
            if i > 0 {
                builder = builder.add_text(separator);
            }
            builder = builder.add_code(block);
        }
        builder.add_text(suffix).build_unchecked()
    }

    /// Copy whose last content ends with exactly one newline.
    pub fn ensure_ends_with_newline(&self) -> Self {
        self.replace_trailing_newlines(Some('\n'))
    }

    /// Copy with trailing newlines removed from the last content.
    pub fn trim_trailing_newline(&self) -> Self {
        self.replace_trailing_newlines(None)
    }

    fn replace_trailing_newlines(&self, replace_with: Option<char>) -> Self {
        let mut out = self.clone();
        let Some(last) = out.parts.iter().rposition(|p| !p.is_marker()) else {
            return out;
        };
        let replaced_in_arg = match &mut out.parts[last] {
            CodePart::Text(text) => {
                let len = text.trim_end_matches('\n').len();
                text.truncate(len);
                false
            }
            CodePart::Placeholder(_) => match out.args.last_mut() {
                Some(Arg::Literal(s) | Arg::Str(Some(s))) => {
                    let len = s.trim_end_matches('\n').len();
                    s.truncate(len);
                    if let Some(c) = replace_with {
                        s.push(c);
                    }
                    true
                }
                _ => false,
            },
            _ => false,
        };
        if matches!(&out.parts[last], CodePart::Text(t) if t.is_empty()) {
            out.parts.remove(last);
        }
        if !replaced_in_arg && let Some(c) = replace_with {
            out.parts.push(CodePart::Text(c.to_string()));
        }
        out
    }

    pub fn to_builder(&self) -> CodeBlockBuilder {
        CodeBlockBuilder {
            parts: self.parts.clone(),
            args: self.args.clone(),
        }
    }
}

/// Builder for [`CodeBlock`].
///
/// Every method that parses a template returns `Result`; markers and nested
/// blocks cannot fail.
#[derive(Debug, Clone, Default)]
pub struct CodeBlockBuilder {
    parts: Vec<CodePart>,
    args: Vec<Arg>,
}

impl CodeBlockBuilder {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Append `format` with positional (`%L`) or indexed (`%1L`) arguments.
    pub fn add(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        let (parts, args) = parse::positional(format, args)?;
        self.parts.extend(parts);
        self.args.extend(args);
        Ok(self)
    }

    /// Append `format` with named arguments (`%food:S`).
    pub fn add_named(
        mut self,
        format: &str,
        args: impl IntoIterator<Item = (impl Into<String>, Arg)>,
    ) -> Result<Self> {
        let args = args.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let (parts, args) = parse::named(format, &args)?;
        self.parts.extend(parts);
        self.args.extend(args);
        Ok(self)
    }

    /// Append a statement: `«format\n»`.
    pub fn add_statement(mut self, format: &str, args: Vec<Arg>) -> Result<Self> {
        let (parts, args) = parse::positional(format, args)?;
        self.parts.push(CodePart::StatementOpen);
        self.parts.extend(parts);
        self.parts.push(CodePart::Text("\n".to_string()));
        self.parts.push(CodePart::StatementClose);
        self.args.extend(args);
        Ok(self)
    }

    /// Open a braced block such as `if (x)`. Adds ` {` unless the control flow
    /// already ends with an opening brace.
    pub fn begin_control_flow(self, control_flow: &str, args: Vec<Arg>) -> Result<Self> {
        Ok(self.add(&with_opening_brace(control_flow), args)?.indent())
    }

    /// Close the current block and open the next: `} else {`.
    pub fn next_control_flow(self, control_flow: &str, args: Vec<Arg>) -> Result<Self> {
        Ok(self
            .unindent()
            .add(&format!("}} {control_flow} {{\n"), args)?
            .indent())
    }

    pub fn end_control_flow(self) -> Self {
        self.unindent().add_text("}\n")
    }

    /// Append another block's parts and arguments.
    pub fn add_code(mut self, code: CodeBlock) -> Self {
        self.parts.extend(code.parts);
        self.args.extend(code.args);
        self
    }

    pub fn indent(mut self) -> Self {
        self.parts.push(CodePart::Indent);
        self
    }

    pub fn unindent(mut self) -> Self {
        self.parts.push(CodePart::Unindent);
        self
    }

    /// Append text without parsing it for placeholders.
    pub(crate) fn add_text(mut self, text: &str) -> Self {
        if !text.is_empty() {
            self.parts.push(CodePart::Text(text.to_string()));
        }
        self
    }

    pub fn build(self) -> Result<CodeBlock> {
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> CodeBlock {
        CodeBlock {
            parts: self.parts,
            args: self.args,
        }
    }
}

fn with_opening_brace(control_flow: &str) -> String {
    for c in control_flow.chars().rev() {
        match c {
            '{' => return format!("{control_flow}\n"),
            '}' => break,
            _ => {}
        }
    }
    format!("{control_flow} {{\n")
}

/// Parse a template into a [`CodeBlock`], converting each argument with `Arg::from`.
///
/// ```
/// use ktpoet_codegen::code;
///
/// let block = code!("println(%S)", "taco").unwrap();
/// assert_eq!(block.to_string(), "println(\"taco\")");
/// ```
#[macro_export]
macro_rules! code {
    ($format:expr $(,)?) => {
        $crate::code::CodeBlock::of($format, ::std::vec::Vec::new())
    };
    ($format:expr, $($arg:expr),+ $(,)?) => {
        $crate::code::CodeBlock::of($format, $crate::args![$($arg),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn test_statement_wraps_parsed_parts() {
        let block = CodeBlock::builder()
            .add_statement("val x = %L", args![1])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            block.parts(),
            [
                CodePart::StatementOpen,
                CodePart::Text("val x = ".into()),
                CodePart::Placeholder(Placeholder::Literal),
                CodePart::Text("\n".into()),
                CodePart::StatementClose,
            ]
        );
        assert!(block.has_statements());
    }

    #[test]
    fn test_control_flow() {
        let block = CodeBlock::builder()
            .begin_control_flow("if (ready)", args![])
            .unwrap()
            .add_statement("eat()", args![])
            .unwrap()
            .next_control_flow("else", args![])
            .unwrap()
            .add_statement("wait()", args![])
            .unwrap()
            .end_control_flow()
            .build()
            .unwrap();
        assert_eq!(
            block.to_string(),
            "if (ready) {\n  eat()\n} else {\n  wait()\n}\n"
        );
    }

    #[test]
    fn test_control_flow_keeps_existing_brace() {
        assert_eq!(with_opening_brace("list.forEach { item ->"), "list.forEach { item ->\n");
        assert_eq!(with_opening_brace("if (x)"), "if (x) {\n");
        assert_eq!(with_opening_brace("run { } + x"), "run { } + x {\n");
    }

    #[test]
    fn test_trim_strips_markers_only() {
        let block = CodeBlock::builder()
            .indent()
            .add_statement("x()", args![])
            .unwrap()
            .unindent()
            .build()
            .unwrap();
        let trimmed = block.trim();
        assert_eq!(trimmed.parts().first(), Some(&CodePart::Text("x()".into())));
        assert_eq!(trimmed.parts().last(), Some(&CodePart::Text("\n".into())));
    }

    #[test]
    fn test_join() {
        let blocks = vec![
            CodeBlock::of("a", args![]).unwrap(),
            CodeBlock::of("%S", args!["b"]).unwrap(),
        ];
        let joined = CodeBlock::join(blocks, ", ", "listOf(", ")");
        assert_eq!(joined.to_string(), "listOf(a, \"b\")");
        assert_eq!(CodeBlock::join(Vec::new(), ", ", "", "").to_string(), "");
    }

    #[test]
    fn test_trailing_newline_helpers() {
        let text = CodeBlock::of("x\n\n", args![]).unwrap();
        assert_eq!(text.trim_trailing_newline().to_string(), "x");
        assert_eq!(text.ensure_ends_with_newline().to_string(), "x\n");

        let literal = CodeBlock::of("%L", args!["y\n"]).unwrap();
        assert_eq!(literal.trim_trailing_newline().to_string(), "y");

        let no_newline = CodeBlock::of("z", args![]).unwrap();
        assert_eq!(no_newline.ensure_ends_with_newline().to_string(), "z\n");
        assert!(CodeBlock::empty().ensure_ends_with_newline().is_empty());
    }

    #[test]
    fn test_without_text_prefix() {
        let body = CodeBlock::of("return %L", args![1]).unwrap();
        let stripped = body.without_text_prefix("return ").unwrap();
        assert_eq!(stripped.to_string(), "1");
        assert!(body.without_text_prefix("throw ").is_none());
    }

    #[test]
    fn test_unmatched_closing_statement() {
        let balanced = CodeBlock::of("«x»", args![]).unwrap();
        assert!(!balanced.has_unmatched_closing_statement());
        let unbalanced = CodeBlock::of("»«", args![]).unwrap();
        assert!(unbalanced.has_unmatched_closing_statement());
    }

    #[test]
    fn test_code_macro() {
        let block = crate::code!("%T.out.println(%S)", crate::names::kotlin::string(), "x").unwrap();
        assert_eq!(block.args().len(), 2);
        assert!(crate::code!("plain").is_ok());
    }
}
