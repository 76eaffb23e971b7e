//! Soft line wrapping.

const WRAP_POINT: char = '♢';
const NON_BREAKING_SPACE: char = '·';

/// Buffers one logical line as segments separated by wrap points and decides
/// where to break when the line is flushed.
///
/// Text appended with [`LineWrapper::append`] interprets `♢` as a wrap point
/// and `·` as a space that never breaks. [`LineWrapper::append_non_wrapping`]
/// copies text as-is, which keeps string literals and type names intact.
#[derive(Debug)]
pub(crate) struct LineWrapper {
    out: String,
    indent: String,
    column_limit: usize,
    /// Never empty; a lone empty segment means nothing is pending.
    segments: Vec<String>,
    /// Indent levels for wrapped continuation lines, `None` if the line has no wrap points.
    indent_level: Option<usize>,
    line_prefix: String,
}

impl LineWrapper {
    pub fn new(indent: impl Into<String>, column_limit: usize) -> Self {
        Self {
            out: String::new(),
            indent: indent.into(),
            column_limit,
            segments: vec![String::new()],
            indent_level: None,
            line_prefix: String::new(),
        }
    }

    pub fn has_pending_segments(&self) -> bool {
        self.segments.len() != 1 || !self.segments[0].is_empty()
    }

    /// Append `s`, honoring wrap points, non-breaking spaces and newlines.
    ///
    /// `indent_level` and `line_prefix` apply to any continuation line started
    /// at a wrap point in `s`.
    pub fn append(&mut self, s: &str, indent_level: usize, line_prefix: &str) {
        let mut rest = s;
        while let Some(c) = rest.chars().next() {
            match c {
                WRAP_POINT => {
                    self.indent_level = Some(indent_level);
                    self.line_prefix = line_prefix.to_string();
                    self.segments.push(String::new());
                    rest = &rest[c.len_utf8()..];
                }
                '\n' => {
                    self.newline();
                    rest = &rest[1..];
                }
                ' ' | NON_BREAKING_SPACE => {
                    self.current().push(' ');
                    rest = &rest[c.len_utf8()..];
                }
                _ => {
                    let end = rest
                        .find([WRAP_POINT, '\n', ' ', NON_BREAKING_SPACE])
                        .unwrap_or(rest.len());
                    self.current().push_str(&rest[..end]);
                    rest = &rest[end..];
                }
            }
        }
    }

    /// Append `s` verbatim. `s` must not contain a newline.
    pub fn append_non_wrapping(&mut self, s: &str) {
        debug_assert!(!s.contains('\n'), "non-wrapping text cannot span lines");
        self.current().push_str(s);
    }

    pub fn newline(&mut self) {
        self.emit_current_line();
        self.out.push('\n');
        self.indent_level = None;
    }

    /// Flush pending text and return everything written.
    pub fn finish(mut self) -> String {
        self.emit_current_line();
        self.out
    }

    fn current(&mut self) -> &mut String {
        if self.segments.is_empty() {
            self.segments.push(String::new());
        }
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    fn emit_current_line(&mut self) {
        let continuation_width =
            self.indent.chars().count() * self.indent_level.unwrap_or_default();
        let mut start = 0;
        let mut column_count = self.segments[0].chars().count();

        for i in 1..self.segments.len() {
            let width = self.segments[i].chars().count();
            let new_column_count = column_count + 1 + width;

            // Doesn't fit: print the current run and start a new one here.
            if new_column_count > self.column_limit {
                self.emit_segment_range(start, i);
                start = i;
                column_count = width + continuation_width;
                continue;
            }
            column_count = new_column_count;
        }

        self.emit_segment_range(start, self.segments.len());
        self.segments.clear();
        self.segments.push(String::new());
    }

    fn emit_segment_range(&mut self, start: usize, end: usize) {
        if start > 0 {
            self.out.push('\n');
            for _ in 0..self.indent_level.unwrap_or_default() {
                self.out.push_str(&self.indent);
            }
            self.out.push_str(&self.line_prefix);
        }

        self.out.push_str(&self.segments[start]);
        for segment in &self.segments[start + 1..end] {
            self.out.push(' ');
            self.out.push_str(segment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(column_limit: usize, text: &str) -> String {
        let mut wrapper = LineWrapper::new("  ", column_limit);
        wrapper.append(text, 2, "");
        wrapper.finish()
    }

    #[test]
    fn test_fits_on_one_line() {
        assert_eq!(wrap(100, "a♢b♢c"), "a b c");
    }

    #[test]
    fn test_wraps_at_last_fitting_point() {
        assert_eq!(wrap(10, "abcde♢fghij♢klmno"), "abcde\n    fghij\n    klmno");
        assert_eq!(wrap(11, "abcde♢fghij♢klmno"), "abcde fghij\n    klmno");
    }

    #[test]
    fn test_plain_and_non_breaking_spaces_never_wrap() {
        assert_eq!(wrap(5, "abc def·ghi"), "abc def ghi");
    }

    #[test]
    fn test_newline_resets_wrapping() {
        assert_eq!(wrap(6, "abc♢def\nghi♢jkl"), "abc\n    def\nghi\n    jkl");
    }

    #[test]
    fn test_non_wrapping_text_is_verbatim() {
        let mut wrapper = LineWrapper::new("  ", 4);
        wrapper.append_non_wrapping("\"a♢b c\"");
        assert_eq!(wrapper.finish(), "\"a♢b c\"");
    }

    #[test]
    fn test_line_prefix_on_wrapped_lines() {
        let mut wrapper = LineWrapper::new("  ", 8);
        wrapper.append_non_wrapping(" * ");
        wrapper.append("first♢second", 0, " * ");
        assert_eq!(wrapper.finish(), " * first\n * second");
    }

    #[test]
    fn test_pending_segments() {
        let mut wrapper = LineWrapper::new("  ", 100);
        assert!(!wrapper.has_pending_segments());
        wrapper.append("x", 0, "");
        assert!(wrapper.has_pending_segments());
        wrapper.newline();
        assert!(!wrapper.has_pending_segments());
    }
}
