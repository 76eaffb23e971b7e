//! Check command report.

use std::path::PathBuf;

use ktpoet_codegen::generation::ImportTable;
use serde::Serialize;

use super::output::{Output, Report};

/// One resolved import line.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ImportEntry {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Report data from a dry render.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// Path to the manifest.
    pub manifest: PathBuf,
    /// Where the file would be written, relative to the output directory.
    pub file: PathBuf,
    /// Lines of rendered Kotlin.
    pub lines: usize,
    /// Every import the file needs, aliases included.
    pub imports: Vec<ImportEntry>,
}

impl CheckReport {
    pub fn new(manifest: PathBuf, file: PathBuf, text: &str, imports: &ImportTable) -> Self {
        Self {
            manifest,
            file,
            lines: text.lines().count(),
            imports: imports
                .imports()
                .into_iter()
                .map(|i| ImportEntry {
                    path: i.path().to_string(),
                    alias: i.alias().map(str::to_string),
                })
                .collect(),
        }
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.summary(&format!(
            "✓ {} renders {} ({} lines)",
            self.manifest.display(),
            self.file.display(),
            self.lines
        ));

        if self.imports.is_empty() {
            return;
        }
        out.newline();
        out.section("Imports");
        for import in &self.imports {
            out.import(&import.path, import.alias.as_deref());
        }
    }
}
