//! Numeric and string literal formatting.

/// Group the digits of an integer with underscores every three places.
///
/// ```
/// assert_eq!(ktpoet_core::format_integer(10_000), "10_000");
/// assert_eq!(ktpoet_core::format_integer(-1234567), "-1_234_567");
/// ```
pub fn format_integer(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = group_digits(&digits);
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a double-precision value with the shortest digits that round-trip.
pub fn format_f64(value: f64) -> String {
    if value.is_nan() {
        return "Double.NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Double.POSITIVE_INFINITY".to_string()
        } else {
            "Double.NEGATIVE_INFINITY".to_string()
        };
    }
    format_decimal(&value.to_string())
}

/// Format a single-precision value with the shortest digits that round-trip.
pub fn format_f32(value: f32) -> String {
    if value.is_nan() {
        return "Float.NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Float.POSITIVE_INFINITY".to_string()
        } else {
            "Float.NEGATIVE_INFINITY".to_string()
        };
    }
    format_decimal(&value.to_string())
}

// `Display` for floats never uses exponent notation, so `text` is always
// `-?digits(.digits)?`.
fn format_decimal(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "0"));
    format!("{sign}{}.{fraction}", group_digits(integer))
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('_');
        }
        out.push(c);
    }
    out
}

/// How a string literal is being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringStyle {
    /// The literal sits inside a `%P` template, so `$` stays live.
    pub raw: bool,
    /// Compile-time constant context: never use a trimmed raw string.
    pub constant: bool,
    /// Margin character stripped by `trimMargin()`.
    pub margin: char,
}

impl Default for StringStyle {
    fn default() -> Self {
        Self {
            raw: false,
            constant: false,
            margin: '|',
        }
    }
}

/// Render `value` as a Kotlin string literal, including its quotes.
///
/// Multi-line strings outside constant context become a raw string with a
/// margin that `trimMargin()` strips again.
pub fn string_literal(value: &str, style: StringStyle) -> String {
    if !style.constant && value.contains('\n') {
        return raw_string_literal(value, style);
    }

    let mut out = String::with_capacity(value.len() + 2);
    let quote = if style.raw { "\"\"\"" } else { "\"" };
    out.push_str(quote);
    for c in value.chars() {
        match c {
            '\'' => out.push('\''),
            '"' if !style.raw => out.push_str("\\\""),
            '$' if !style.raw => out.push_str("${'$'}"),
            _ if style.raw => out.push(c),
            _ => out.push_str(&escape_char(c)),
        }
    }
    out.push_str(quote);
    out
}

fn raw_string_literal(value: &str, style: StringStyle) -> String {
    let mut out = String::with_capacity(value.len() + 32);
    out.push_str("\"\"\"\n");
    out.push(style.margin);
    let mut rest = value;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("\"\"\"") {
            // Don't end the raw string early.
            out.push_str("\"\"${'\"'}");
            rest = &rest[3..];
            continue;
        }
        match c {
            '\n' => {
                out.push('\n');
                out.push(style.margin);
            }
            '$' if !style.raw => out.push_str("${'$'}"),
            _ => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    if !value.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("\"\"\"");
    if style.margin == '|' {
        out.push_str(".trimMargin()");
    } else {
        out.push_str(&format!(".trimMargin(\"{}\")", style.margin));
    }
    out
}

/// Escape a character for use inside a quoted literal.
pub fn escape_char(c: char) -> String {
    match c {
        '\u{8}' => "\\b".to_string(),
        '\t' => "\\t".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '"' => "\"".to_string(),
        '\'' => "\\'".to_string(),
        '\\' => "\\\\".to_string(),
        c if is_iso_control(c) => format!("\\u{:04x}", c as u32),
        c => c.to_string(),
    }
}

fn is_iso_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}
