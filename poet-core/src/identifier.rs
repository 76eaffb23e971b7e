//! Kotlin identifier legality and escaping.

use crate::error::{Error, Result};

/// Kotlin hard, soft and modifier keywords, plus a few names that still break
/// code when left unescaped.
pub const KEYWORDS: &[&str] = &[
    // Hard keywords
    "as",
    "break",
    "class",
    "continue",
    "do",
    "else",
    "false",
    "for",
    "fun",
    "if",
    "in",
    "interface",
    "is",
    "null",
    "object",
    "package",
    "return",
    "super",
    "this",
    "throw",
    "true",
    "try",
    "typealias",
    "typeof",
    "val",
    "var",
    "when",
    "while",
    // Soft keywords
    "by",
    "catch",
    "constructor",
    "delegate",
    "dynamic",
    "field",
    "file",
    "finally",
    "get",
    "import",
    "init",
    "param",
    "property",
    "receiver",
    "set",
    "setparam",
    "value",
    "where",
    // Modifier keywords
    "abstract",
    "actual",
    "annotation",
    "companion",
    "const",
    "crossinline",
    "data",
    "enum",
    "expect",
    "external",
    "final",
    "infix",
    "inline",
    "inner",
    "internal",
    "lateinit",
    "noinline",
    "open",
    "operator",
    "out",
    "override",
    "private",
    "protected",
    "public",
    "reified",
    "sealed",
    "suspend",
    "tailrec",
    "vararg",
    // No longer keywords, still rejected by some compilers
    "header",
    "impl",
    // Reserved
    "yield",
];

/// Characters that cannot appear in a single identifier, even backtick-quoted.
const ILLEGAL_CHARACTERS: &[char] = &['.', ';', '[', ']', '/', '<', '>', ':', '\\'];

/// Check if a name is a reserved keyword.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Whether `c` may start a JVM identifier.
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Whether `c` may continue a JVM identifier.
pub fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether `name` can be emitted as-is: non-empty, no leading digit, only
/// letters, digits and underscores, not all underscores and not a keyword.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first != '$'
        && is_identifier_start(first)
        && chars.all(|c| c != '$' && is_identifier_part(c))
        && !all_underscores(name)
        && !is_keyword(name)
}

fn all_underscores(name: &str) -> bool {
    name.chars().all(|c| c == '_')
}

fn already_escaped(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('`') && name.ends_with('`')
}

/// Wrap `name` in backticks when it cannot be emitted bare.
///
/// Fails when the name contains characters that backticks cannot make legal.
pub fn escape_if_necessary(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(Error::illegal_identifier(name, "<empty>"));
    }
    if already_escaped(name) {
        return Ok(name.to_string());
    }
    let illegal: String = ILLEGAL_CHARACTERS
        .iter()
        .filter(|c| name.contains(**c))
        .collect();
    if !illegal.is_empty() {
        return Err(Error::illegal_identifier(name, illegal));
    }
    if is_identifier(name) {
        Ok(name.to_string())
    } else {
        Ok(format!("`{name}`"))
    }
}

/// Escape each segment of a delimited name, dropping empty segments.
pub fn escape_segments_if_necessary(name: &str, delimiter: char) -> Result<String> {
    let segments = name
        .split(delimiter)
        .filter(|s| !s.is_empty())
        .map(escape_if_necessary)
        .collect::<Result<Vec<_>>>()?;
    Ok(segments.join(&delimiter.to_string()))
}

/// Turn an arbitrary string into an identifier usable as an import alias.
///
/// Backtick-quoted aliases are not resolved by every compiler, so instead:
/// - all underscores gets a trailing `0`
/// - a keyword gets a `__` prefix
/// - a bad first character gets a `_` prefix
/// - `$` becomes `__`
/// - any other illegal character becomes `_U` plus its four-digit hex code
pub fn escape_as_alias(name: &str) -> String {
    if all_underscores(name) {
        return format!("{name}0");
    }
    if is_keyword(name) {
        return format!("__{name}");
    }

    let mut alias = String::with_capacity(name.len() + 2);
    if name.chars().next().is_some_and(|c| !is_identifier_start(c)) {
        alias.push('_');
    }
    for c in name.chars() {
        if c == '$' {
            alias.push_str("__");
        } else if !is_identifier_part(c) {
            alias.push_str(&format!("_U{:04x}", c as u32));
        } else {
            alias.push(c);
        }
    }
    alias
}
