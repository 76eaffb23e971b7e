//! Template parsing and argument binding.

use indexmap::IndexMap;
use ktpoet_core::{Error, Result, escape_if_necessary};

use super::{
    Arg,
    block::{CodePart, Placeholder},
};

const PERCENT: char = '%';

fn is_special(c: char) -> bool {
    c == PERCENT || CodePart::from_marker(c).is_some()
}

/// Byte offset of the next `%` or marker at or after `from`.
fn next_special(format: &str, from: usize) -> usize {
    format[from..]
        .find(is_special)
        .map_or(format.len(), |i| from + i)
}

/// How one placeholder picks its argument.
enum Binding {
    Relative,
    Indexed(usize),
}

/// Parse `format` against positional arguments.
///
/// Returns the parts and one argument per consuming placeholder, in placeholder order.
pub(crate) fn positional(format: &str, args: Vec<Arg>) -> Result<(Vec<CodePart>, Vec<Arg>)> {
    let mut parts = Vec::new();
    let mut bound = Vec::new();
    let mut relative_count = 0usize;
    let mut index_used = vec![false; args.len()];
    let mut has_relative = false;
    let mut has_indexed = false;

    let mut p = 0;
    while let Some(c) = format[p..].chars().next() {
        if let Some(marker) = CodePart::from_marker(c) {
            parts.push(marker);
            p += c.len_utf8();
            continue;
        }
        if c != PERCENT {
            let next = next_special(format, p + c.len_utf8());
            parts.push(CodePart::Text(format[p..next].to_string()));
            p = next;
            continue;
        }

        let start = p;
        p += 1;
        let digits_start = p;
        while format[p..].starts_with(|d: char| d.is_ascii_digit()) {
            p += 1;
        }
        let digits = &format[digits_start..p];
        let Some(designator) = format[p..].chars().next() else {
            return Err(Error::template(
                format!("dangling format characters in '{format}'"),
                format,
                Some((start, p - start)),
            ));
        };
        p += designator.len_utf8();
        let span = Some((start, p - start));

        if designator == PERCENT {
            if !digits.is_empty() {
                return Err(Error::template("%% may not have an index", format, span));
            }
            parts.push(CodePart::Percent);
            continue;
        }

        let Some(kind) = Placeholder::from_designator(designator) else {
            return Err(Error::template(
                format!("unknown format %{designator} at {digits_start} in '{format}'"),
                format,
                span,
            ));
        };

        let binding = if digits.is_empty() {
            has_relative = true;
            relative_count += 1;
            Binding::Relative
        } else {
            has_indexed = true;
            // Digits only; overflow reads as out of range.
            Binding::Indexed(digits.parse().unwrap_or(usize::MAX))
        };
        if has_relative && has_indexed {
            return Err(Error::template(
                "cannot mix indexed and positional parameters",
                format,
                span,
            ));
        }

        let index = match binding {
            Binding::Relative => relative_count - 1,
            Binding::Indexed(n) => n.wrapping_sub(1),
        };
        if index >= args.len() {
            let shown = match binding {
                Binding::Relative => relative_count.to_string(),
                Binding::Indexed(_) => digits.to_string(),
            };
            return Err(Error::template(
                format!(
                    "index {shown} for '{}' not in range (received {} arguments)",
                    &format[start..p],
                    args.len()
                ),
                format,
                span,
            ));
        }
        index_used[index] = true;
        bound.push(check_kind(kind, &args[index], index + 1, format, span)?);
        parts.push(CodePart::Placeholder(kind));
    }

    if has_indexed {
        let unused: Vec<String> = index_used
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(i, _)| format!("%{}", i + 1))
            .collect();
        if !unused.is_empty() {
            let s = if unused.len() == 1 { "" } else { "s" };
            return Err(Error::template(
                format!("unused argument{s}: {}", unused.join(", ")),
                format,
                None,
            ));
        }
    } else if relative_count < args.len() {
        return Err(Error::template(
            format!(
                "unused arguments: expected {relative_count}, received {}",
                args.len()
            ),
            format,
            None,
        ));
    }

    Ok((parts, bound))
}

/// Parse `format` against named arguments, written `%name:X`.
pub(crate) fn named(format: &str, args: &IndexMap<String, Arg>) -> Result<(Vec<CodePart>, Vec<Arg>)> {
    for key in args.keys() {
        if !is_argument_name(key) {
            return Err(Error::template(
                format!("argument '{key}' must start with a lowercase character"),
                format,
                None,
            ));
        }
    }

    let mut parts = Vec::new();
    let mut bound = Vec::new();
    let mut used = vec![false; args.len()];

    let mut p = 0;
    while let Some(c) = format[p..].chars().next() {
        if let Some(marker) = CodePart::from_marker(c) {
            parts.push(marker);
            p += c.len_utf8();
            continue;
        }
        if c != PERCENT {
            let next = next_special(format, p + c.len_utf8());
            parts.push(CodePart::Text(format[p..next].to_string()));
            p = next;
            continue;
        }

        let start = p;
        let rest = &format[p + 1..];
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let designator = rest[name_len..].strip_prefix(':').and_then(|r| r.chars().next());

        match designator {
            Some(designator) if name_len > 0 => {
                let name = &rest[..name_len];
                p += 1 + name_len + 1 + designator.len_utf8();
                let span = Some((start, p - start));
                let Some((index, _, arg)) = args.get_full(name) else {
                    return Err(Error::template(
                        format!("Missing named argument for %{name}"),
                        format,
                        span,
                    ));
                };
                let Some(kind) = Placeholder::from_designator(designator) else {
                    return Err(Error::template(
                        format!("unknown format %{name}:{designator} in '{format}'"),
                        format,
                        span,
                    ));
                };
                used[index] = true;
                bound.push(check_kind(kind, arg, index + 1, format, span)?);
                parts.push(CodePart::Placeholder(kind));
            }
            _ => match rest.chars().next() {
                Some(PERCENT) => {
                    parts.push(CodePart::Percent);
                    p += 2;
                }
                Some(other) => {
                    return Err(Error::template(
                        format!("unknown format %{other} at {} in '{format}'", p + 1),
                        format,
                        Some((start, 1 + other.len_utf8())),
                    ));
                }
                None => {
                    return Err(Error::template(
                        "dangling % at end",
                        format,
                        Some((start, 1)),
                    ));
                }
            },
        }
    }

    let unused: Vec<&str> = args
        .keys()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(k, _)| k.as_str())
        .collect();
    if !unused.is_empty() {
        let s = if unused.len() == 1 { "" } else { "s" };
        return Err(Error::template(
            format!("unused named argument{s}: {}", unused.join(", ")),
            format,
            None,
        ));
    }

    Ok((parts, bound))
}

/// `[a-z][A-Za-z0-9_]*`
fn is_argument_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check that `arg` fits `kind` and normalize it for the writer.
///
/// `%N` arguments become escaped literal names; `%L` strings become literal text.
/// Numbers are digit-grouped only for `%L`.
fn check_kind(
    kind: Placeholder,
    arg: &Arg,
    position: usize,
    format: &str,
    span: Option<(usize, usize)>,
) -> Result<Arg> {
    let mismatch = |expected: &str| {
        Error::template(
            format!(
                "%{} expects {expected} but argument {position} is a {}",
                kind.designator(),
                arg.kind()
            ),
            format,
            span,
        )
    };

    match (kind, arg) {
        (Placeholder::Literal, Arg::Type(_) | Arg::Member(_)) => {
            Err(mismatch("a literal, string, code block or annotation"))
        }
        (Placeholder::Literal, Arg::Str(Some(s))) => Ok(Arg::Literal(s.clone())),
        (Placeholder::Literal, Arg::Str(None)) => Ok(Arg::Literal("null".to_string())),
        (Placeholder::Literal, Arg::Number { literal, .. }) => Ok(Arg::Literal(literal.clone())),
        (Placeholder::Literal, _) => Ok(arg.clone()),

        (Placeholder::Name, Arg::Str(Some(s))) => Ok(Arg::Literal(escape_if_necessary(s)?)),
        (Placeholder::Name, Arg::Member(m)) => {
            Ok(Arg::Literal(escape_if_necessary(m.simple_name())?))
        }
        (Placeholder::Name, _) => Err(mismatch("a name")),

        (Placeholder::Str, Arg::Str(_)) => Ok(arg.clone()),
        (Placeholder::Str, Arg::Literal(s)) => Ok(Arg::Str(Some(s.clone()))),
        (Placeholder::Str | Placeholder::Template, Arg::Number { plain, .. }) => {
            Ok(Arg::Str(Some(plain.clone())))
        }
        (Placeholder::Str, Arg::Type(t)) => Ok(Arg::Str(Some(t.to_string()))),
        (Placeholder::Str, Arg::Member(m)) => Ok(Arg::Str(Some(m.canonical_name()))),
        (Placeholder::Str, _) => Err(mismatch("a string or null")),

        (Placeholder::Template, Arg::Str(_) | Arg::Code(_)) => Ok(arg.clone()),
        (Placeholder::Template, _) => Err(mismatch("a string, null or code block")),

        (Placeholder::Type, Arg::Type(_)) => Ok(arg.clone()),
        (Placeholder::Type, _) => Err(mismatch("a type")),

        (Placeholder::Member, Arg::Member(_)) => Ok(arg.clone()),
        (Placeholder::Member, _) => Err(mismatch("a member")),
    }
}
