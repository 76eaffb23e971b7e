//! Where reports go.

use std::path::Path;

/// Target output for reports.
///
/// Reports say what happened to files and imports; implementations decide
/// how it looks.
pub trait Output {
    /// A one-line outcome, e.g. a successful check.
    fn summary(&mut self, text: &str);

    /// Start a new section with a heading.
    fn section(&mut self, name: &str);

    /// One `import` line of a rendered file.
    fn import(&mut self, path: &str, alias: Option<&str>);

    /// A file that was written.
    fn written(&mut self, path: &Path);

    /// A file left alone because it already exists.
    fn skipped(&mut self, path: &Path);

    fn newline(&mut self);
}

/// A report that can render itself to an output.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Prints to stdout.
pub struct TerminalOutput;

impl Output for TerminalOutput {
    fn summary(&mut self, text: &str) {
        println!("{text}");
    }

    fn section(&mut self, name: &str) {
        println!("{name}:");
    }

    fn import(&mut self, path: &str, alias: Option<&str>) {
        println!("{}", import_line(path, alias));
    }

    fn written(&mut self, path: &Path) {
        println!("  + {}", path.display());
    }

    fn skipped(&mut self, path: &Path) {
        println!("  = {} (exists, skipped)", path.display());
    }

    fn newline(&mut self) {
        println!();
    }
}

fn import_line(path: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("  - {path} as {alias}"),
        None => format!("  - {path}"),
    }
}

/// Collects output lines, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct BufferOutput {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl Output for BufferOutput {
    fn summary(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn section(&mut self, name: &str) {
        self.lines.push(format!("{name}:"));
    }

    fn import(&mut self, path: &str, alias: Option<&str>) {
        self.lines.push(import_line(path, alias));
    }

    fn written(&mut self, path: &Path) {
        self.lines.push(format!("  + {}", path.display()));
    }

    fn skipped(&mut self, path: &Path) {
        self.lines.push(format!("  = {} (exists, skipped)", path.display()));
    }

    fn newline(&mut self) {
        self.lines.push(String::new());
    }
}
