//! The stateful writer every declaration renders through.

use std::collections::BTreeSet;

use ktpoet_core::{Error, Result, StringStyle, escape_segments_if_necessary, string_literal};

use super::line_wrapper::LineWrapper;
use crate::{
    code::{Arg, CodeBlock, CodePart, Placeholder},
    config::RenderConfig,
    generation::{Collected, ImportTable},
    names::{ClassName, MemberName, TypeName, TypeVariableName, kotlin},
    spec::{AnnotationSpec, KModifier, modifiers_to_emit},
};

/// What the writer needs to know about a type whose body is being emitted.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypeScope {
    /// `None` for anonymous classes.
    pub name: Option<String>,
    pub nested: BTreeSet<String>,
    pub enum_constants: BTreeSet<String>,
    pub functions: BTreeSet<String>,
    pub inner: bool,
}

/// Emits code fragments, tracking indentation, open statements, the
/// enclosing-type stack and which names can be imported.
///
/// The same writer runs twice per file: once to collect importable names and
/// once, with the resolved [`ImportTable`], to produce the output.
pub(crate) struct CodeWriter<'a> {
    out: LineWrapper,
    config: &'a RenderConfig,
    indent: String,
    indent_level: usize,
    kdoc: bool,
    comment: bool,
    trailing_newline: bool,
    /// `None` outside a file, where every class renders fully qualified.
    package: Option<String>,
    type_stack: Vec<TypeScope>,
    imports: ImportTable,
    collected: Collected,
    statement_depth: usize,
    /// Lines emitted in the outermost open statement.
    statement_line: Option<usize>,
}

impl<'a> CodeWriter<'a> {
    pub fn new(config: &'a RenderConfig, package: Option<&str>, imports: ImportTable) -> Self {
        let indent = config.indent.unit();
        Self {
            out: LineWrapper::new(indent.clone(), config.column_limit),
            config,
            indent,
            indent_level: 0,
            kdoc: false,
            comment: false,
            trailing_newline: false,
            package: package.map(str::to_string),
            type_stack: Vec::new(),
            imports,
            collected: Collected::default(),
            statement_depth: 0,
            statement_line: None,
        }
    }

    /// A writer for fragments rendered outside any file.
    pub fn standalone(config: &'a RenderConfig) -> Self {
        Self::new(config, None, ImportTable::default())
    }

    /// Flush and return the output with the names collected on the way.
    pub fn finish(self) -> Result<(String, Collected)> {
        if self.statement_depth > 0 {
            return Err(Error::unclosed_statement(self.statement_depth));
        }
        Ok((self.out.finish(), self.collected))
    }

    /// The import decisions this writer resolves names against.
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    pub fn indent(&mut self, levels: usize) -> &mut Self {
        self.indent_level += levels;
        self
    }

    pub fn unindent(&mut self, levels: usize) -> Result<&mut Self> {
        if levels > self.indent_level {
            return Err(Error::unbalanced_indent(self.indent_level, levels));
        }
        self.indent_level -= levels;
        Ok(self)
    }

    pub fn push_type(&mut self, scope: TypeScope) {
        self.type_stack.push(scope);
    }

    pub fn pop_type(&mut self) {
        self.type_stack.pop();
    }

    pub fn emit_comment(&mut self, comment: &CodeBlock) -> Result<()> {
        // Force the `//` prefix on the first line.
        self.trailing_newline = true;
        self.comment = true;
        let result = self.emit_code_with(comment, false, false);
        if result.is_ok() {
            self.emit("\n");
        }
        self.comment = false;
        result
    }

    pub fn emit_kdoc(&mut self, kdoc: &CodeBlock) -> Result<()> {
        if kdoc.is_empty() {
            return Ok(());
        }
        self.emit("/**\n");
        self.kdoc = true;
        let result = self.emit_code_with(kdoc, false, true);
        self.kdoc = false;
        result?;
        self.emit(" */\n");
        Ok(())
    }

    pub fn emit_annotations(&mut self, annotations: &[AnnotationSpec], inline: bool) -> Result<()> {
        for annotation in annotations {
            annotation.emit(self, inline, false)?;
            self.emit(if inline { " " } else { "\n" });
        }
        Ok(())
    }

    /// Emit `modifiers` in conventional order, skipping implicit ones.
    pub fn emit_modifiers(
        &mut self,
        modifiers: &BTreeSet<KModifier>,
        implicit: &BTreeSet<KModifier>,
    ) -> &mut Self {
        for modifier in modifiers_to_emit(modifiers, implicit) {
            self.emit(modifier.keyword());
            self.emit(" ");
        }
        self
    }

    pub fn emit_context_receivers(&mut self, receivers: &[TypeName], suffix: &str) -> Result<()> {
        if receivers.is_empty() {
            return Ok(());
        }
        self.emit("context(");
        for (i, receiver) in receivers.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.emit_type(receiver)?;
        }
        self.emit(")");
        self.emit(suffix);
        Ok(())
    }

    /// Emit a declaration's type variables. A single bound is written inline;
    /// more bounds go in [`CodeWriter::emit_where_block`].
    pub fn emit_type_variables(&mut self, variables: &[TypeVariableName]) -> Result<()> {
        if variables.is_empty() {
            return Ok(());
        }
        self.emit("<");
        for (i, variable) in variables.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            if let Some(variance) = variable.variance {
                self.emit(variance.keyword());
                self.emit(" ");
            }
            if variable.reified {
                self.emit("reified ");
            }
            self.emit(&variable.name);
            if let [bound] = variable.bounds.as_slice()
                && *bound != TypeName::Class(kotlin::any().with_nullable(true))
            {
                self.emit(" : ");
                self.emit_type(bound)?;
            }
        }
        self.emit(">");
        Ok(())
    }

    pub fn emit_where_block(&mut self, variables: &[TypeVariableName]) -> Result<()> {
        let mut first = true;
        for variable in variables.iter().filter(|v| v.bounds.len() > 1) {
            for bound in &variable.bounds {
                self.emit(if first { " where " } else { ", " });
                self.emit(&variable.name);
                self.emit(" : ");
                self.emit_type(bound)?;
                first = false;
            }
        }
        Ok(())
    }

    /// Parse `format` and emit it.
    pub fn emit_template(&mut self, format: &str, args: Vec<Arg>) -> Result<&mut Self> {
        let code = CodeBlock::of(format, args)?;
        self.emit_code(&code)
    }

    pub fn emit_code(&mut self, code: &CodeBlock) -> Result<&mut Self> {
        self.emit_code_with(code, false, false)?;
        Ok(self)
    }

    /// Emit a code block. In constant context multi-line strings stay quoted
    /// and nested annotations drop their `@`.
    pub fn emit_code_with(
        &mut self,
        code: &CodeBlock,
        constant: bool,
        ensure_trailing_newline: bool,
    ) -> Result<()> {
        let mut args = code.args().iter();
        let mut next_arg = |placeholder: Placeholder| {
            args.next().ok_or_else(|| {
                Error::invalid_spec(format!(
                    "missing argument for %{}",
                    placeholder.designator()
                ))
            })
        };

        for part in code.parts() {
            match part {
                CodePart::Text(text) => {
                    self.emit(text);
                }
                CodePart::Placeholder(p) => match (p, next_arg(*p)?) {
                    (Placeholder::Literal, Arg::Annotation(annotation)) => {
                        annotation.emit(self, true, constant)?;
                    }
                    (Placeholder::Literal, Arg::Code(block)) => {
                        self.emit_code_with(block, constant, false)?;
                    }
                    (Placeholder::Literal | Placeholder::Name, Arg::Literal(text)) => {
                        self.emit(text);
                    }
                    (Placeholder::Str, Arg::Str(value)) => {
                        let literal = self.string_literal(value.as_deref(), false, constant);
                        self.emit_non_wrapping(&literal);
                    }
                    (Placeholder::Template, Arg::Str(value)) => {
                        let literal = self.string_literal(value.as_deref(), true, constant);
                        self.emit_non_wrapping(&literal);
                    }
                    (Placeholder::Template, Arg::Code(block)) => {
                        let text = self.render_detached(block)?;
                        let literal = self.string_literal(Some(&text), true, constant);
                        self.emit_non_wrapping(&literal);
                    }
                    (Placeholder::Type, Arg::Type(type_name)) => self.emit_type(type_name)?,
                    (Placeholder::Member, Arg::Member(member)) => self.emit_member(member)?,
                    (p, arg) => {
                        return Err(Error::invalid_spec(format!(
                            "%{} cannot emit {}",
                            p.designator(),
                            arg.kind()
                        )));
                    }
                },
                CodePart::Percent => {
                    self.emit("%");
                }
                CodePart::Indent => {
                    self.indent(1);
                }
                CodePart::Unindent => {
                    self.unindent(1)?;
                }
                CodePart::StatementOpen => {
                    if self.statement_depth == 0 {
                        self.statement_line = Some(0);
                    }
                    self.statement_depth += 1;
                }
                CodePart::StatementClose => self.close_statement(code)?,
            }
        }

        if ensure_trailing_newline && self.out.has_pending_segments() {
            self.emit("\n");
        }
        Ok(())
    }

    fn close_statement(&mut self, code: &CodeBlock) -> Result<()> {
        if self.statement_depth == 0 {
            let parts: Vec<String> = code.parts().iter().map(CodePart::source).collect();
            let args: Vec<String> = code.args().iter().map(ToString::to_string).collect();
            return Err(Error::unbalanced_statement(
                format!("{parts:?}"),
                format!("{args:?}"),
            ));
        }
        self.statement_depth -= 1;
        if self.statement_depth == 0 {
            if self.statement_line.is_some_and(|lines| lines > 0) {
                self.unindent(self.config.continuation_indent)?;
            }
            self.statement_line = None;
        }
        Ok(())
    }

    fn string_literal(&self, value: Option<&str>, raw: bool, constant: bool) -> String {
        match value {
            Some(value) => string_literal(
                value,
                StringStyle {
                    raw,
                    constant,
                    margin: self.config.margin,
                },
            ),
            None => "null".to_string(),
        }
    }

    /// Render `code` at column zero into a separate buffer, sharing import state.
    fn render_detached(&mut self, code: &CodeBlock) -> Result<String> {
        let detached = LineWrapper::new(self.indent.clone(), usize::MAX);
        let saved_out = std::mem::replace(&mut self.out, detached);
        let saved_level = std::mem::take(&mut self.indent_level);
        let saved_trailing = std::mem::take(&mut self.trailing_newline);
        let result = self.emit_code_with(code, false, false);
        let detached = std::mem::replace(&mut self.out, saved_out);
        self.indent_level = saved_level;
        self.trailing_newline = saved_trailing;
        result.map(|()| detached.finish())
    }

    /// Emit a type the way `%T` does: annotations, the type, then `?`.
    pub fn emit_type(&mut self, type_name: &TypeName) -> Result<()> {
        for annotation in type_name.annotations() {
            annotation.emit(self, true, false)?;
            self.emit(" ");
        }
        self.emit_bare_type(type_name)?;
        if type_name.is_nullable() {
            self.emit("?");
        }
        Ok(())
    }

    fn emit_bare_type(&mut self, type_name: &TypeName) -> Result<()> {
        match type_name {
            TypeName::Class(class) => {
                let name = self.lookup_class(class);
                self.emit(&escape_segments_if_necessary(&name, '.')?);
            }
            TypeName::Parameterized(parameterized) => {
                self.emit_type(&TypeName::Class(parameterized.raw.clone()))?;
                if !parameterized.arguments.is_empty() {
                    self.emit("<");
                    for (i, argument) in parameterized.arguments.iter().enumerate() {
                        if i > 0 {
                            self.emit(",·");
                        }
                        self.emit_type(argument)?;
                    }
                    self.emit(">");
                }
            }
            TypeName::Variable(variable) => {
                self.emit(&variable.name);
            }
            TypeName::Wildcard(wildcard) => match (wildcard.in_bound(), wildcard.out_bound()) {
                (Some(bound), _) => {
                    self.emit("in ");
                    self.emit_type(bound)?;
                }
                (None, Some(bound)) => {
                    self.emit("out ");
                    self.emit_type(bound)?;
                }
                (None, None) => {
                    self.emit("*");
                }
            },
            TypeName::Lambda(lambda) => {
                if lambda.nullable {
                    self.emit("(");
                }
                if lambda.suspending {
                    self.emit("suspend ");
                }
                self.emit_context_receivers(&lambda.context, " ")?;
                if let Some(receiver) = &lambda.receiver {
                    let annotated = !receiver.annotations().is_empty();
                    if annotated {
                        self.emit("(");
                    }
                    self.emit_type(receiver)?;
                    self.emit(if annotated { ")." } else { "." });
                }
                self.emit("(");
                for (i, parameter) in lambda.parameters.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if let Some(name) = &parameter.name {
                        self.emit(&ktpoet_core::escape_if_necessary(name)?);
                        self.emit(": ");
                    }
                    self.emit_type(&parameter.type_name)?;
                }
                self.emit(")");
                if matches!(*lambda.returns, TypeName::Lambda(_)) {
                    self.emit(" -> (");
                    self.emit_type(&lambda.returns)?;
                    self.emit(")");
                } else {
                    self.emit(" -> ");
                    self.emit_type(&lambda.returns)?;
                }
                if lambda.nullable {
                    self.emit(")");
                }
            }
            TypeName::Dynamic => {
                self.emit("dynamic");
            }
        }
        Ok(())
    }

    fn emit_member(&mut self, member: &MemberName) -> Result<()> {
        let name = self.lookup_member(member);
        self.emit(&escape_segments_if_necessary(&name, '.')?);
        Ok(())
    }

    /// The shortest name that refers to `class` at this point of the file.
    ///
    /// Tries the class and each enclosing class in turn against nested types
    /// in scope and imports. Falls back to the canonical name, recording the
    /// class as importable for the next pass.
    fn lookup_class(&mut self, class: &ClassName) -> String {
        let mut resolved_any = false;
        let mut candidate = Some(class.bare());
        while let Some(c) = candidate {
            let alias = self.imports.alias_of(&c.canonical_name()).map(str::to_string);
            let simple_name = alias.clone().unwrap_or_else(|| c.simple_name().to_string());
            let resolved = self.resolve(&simple_name);
            resolved_any = resolved.is_some();

            if resolved.as_ref() == Some(&c) {
                if alias.is_none() {
                    self.collected
                        .referenced
                        .insert(class.top_level().simple_name().to_string());
                }
                let nested = &class.simple_names()[c.simple_names().len()..];
                return std::iter::once(simple_name.as_str())
                    .chain(nested.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(".");
            }
            candidate = c.enclosing();
        }

        // Resolved to something else: only the full name is unambiguous.
        if resolved_any {
            return class.canonical_name();
        }

        if self.package.as_deref() == Some(class.package())
            && self.imports.alias_of(&class.canonical_name()).is_none()
        {
            self.collected
                .referenced
                .insert(class.top_level().simple_name().to_string());
            return class.simple_names().join(".");
        }

        if !self.kdoc {
            self.importable_type(class);
        }
        class.canonical_name()
    }

    fn importable_type(&mut self, class: &ClassName) {
        let top_level = class.top_level();
        match self.imports.alias_of(&class.canonical_name()) {
            // An alias refers to the nested class itself.
            Some(alias) => self.collected.add_type(alias.to_string(), class.bare()),
            None => self
                .collected
                .add_type(top_level.simple_name().to_string(), top_level),
        }
    }

    /// Find the class `simple_name` refers to at this point, if any.
    fn resolve(&self, simple_name: &str) -> Option<ClassName> {
        // Nested types of the enclosing types, innermost first.
        for depth in (0..self.type_stack.len()).rev() {
            if self.type_stack[depth].nested.contains(simple_name) {
                return self.stack_class_name(depth, simple_name);
            }
        }

        if let Some(top) = self.type_stack.first() {
            if top.name.as_deref() == Some(simple_name) {
                return ClassName::new(self.package.as_deref().unwrap_or_default(), [simple_name])
                    .ok();
            }
            // Enum constants of the top-level type.
            if let Some(name) = &top.name
                && top.enum_constants.contains(simple_name)
            {
                return ClassName::new(
                    self.package.as_deref().unwrap_or_default(),
                    [name.as_str(), simple_name],
                )
                .ok();
            }
        }

        self.imports.imported_type(simple_name).cloned()
    }

    fn stack_class_name(&self, depth: usize, simple_name: &str) -> Option<ClassName> {
        let mut names = Vec::with_capacity(depth + 2);
        for scope in &self.type_stack[..=depth] {
            names.push(scope.name.clone()?);
        }
        names.push(simple_name.to_string());
        ClassName::new(self.package.as_deref().unwrap_or_default(), names).ok()
    }

    /// The shortest name that refers to `member` at this point of the file.
    fn lookup_member(&mut self, member: &MemberName) -> String {
        let canonical = member.canonical_name();
        let simple_name = self
            .imports
            .alias_of(&canonical)
            .map_or_else(|| member.simple_name().to_string(), str::to_string);

        let imported = self.imports.imported_member(&simple_name).cloned();
        let found = imported.as_ref() == Some(member);
        if found && !self.function_in_scope(&simple_name) {
            return simple_name;
        }
        if imported.is_some()
            && let Some(enclosing) = member.enclosing()
        {
            let enclosing = self.lookup_class(enclosing);
            return format!("{enclosing}.{simple_name}");
        }
        if found {
            return simple_name;
        }

        if self.package.as_deref() == Some(member.package()) && member.enclosing().is_none() {
            self.collected
                .referenced
                .insert(member.simple_name().to_string());
            return member.simple_name().to_string();
        }

        if !self.kdoc
            && (member.is_extension() || !self.function_in_scope(member.simple_name()))
            && !member.package().is_empty()
        {
            self.collected.add_member(simple_name, member.clone());
        }
        canonical
    }

    /// Whether a function of the current type (or an outer type, through
    /// `inner` classes) is named `name` and would shadow an import.
    fn function_in_scope(&self, name: &str) -> bool {
        for scope in self.type_stack.iter().rev() {
            if scope.functions.contains(name) {
                return true;
            }
            if !scope.inner {
                break;
            }
        }
        false
    }

    /// Emit `text`, honoring newlines, wrap points and the comment prefix.
    pub fn emit(&mut self, text: &str) -> &mut Self {
        self.emit_lines(text, false);
        self
    }

    fn emit_non_wrapping(&mut self, text: &str) {
        self.emit_lines(text, true);
    }

    fn emit_lines(&mut self, text: &str, non_wrapping: bool) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                // Blank lines in comments keep their prefix.
                if (self.kdoc || self.comment) && self.trailing_newline {
                    self.emit_indentation();
                    self.out
                        .append_non_wrapping(if self.kdoc { " *" } else { "//" });
                }
                self.out.newline();
                self.trailing_newline = true;
                if let Some(lines) = self.statement_line {
                    if lines == 0 {
                        // Continuation lines of a statement.
                        self.indent(self.config.continuation_indent);
                    }
                    self.statement_line = Some(lines + 1);
                }
            }

            if line.is_empty() {
                continue;
            }

            if self.trailing_newline {
                self.emit_indentation();
                if self.kdoc {
                    self.out.append_non_wrapping(" * ");
                } else if self.comment {
                    self.out.append_non_wrapping("// ");
                }
            }

            if non_wrapping {
                self.out.append_non_wrapping(line);
            } else if self.kdoc {
                self.out.append(line, self.indent_level, " * ");
            } else {
                self.out
                    .append(line, self.indent_level + self.config.continuation_indent, "");
            }
            self.trailing_newline = false;
        }
    }

    fn emit_indentation(&mut self) {
        for _ in 0..self.indent_level {
            self.out.append_non_wrapping(&self.indent);
        }
    }
}
