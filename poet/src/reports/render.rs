//! Render command report.

use std::path::PathBuf;

use ktpoet_core::WriteResult;

use super::output::{Output, Report};

/// Where a rendered file went.
#[derive(Debug)]
pub struct RenderReport {
    pub path: PathBuf,
    pub result: WriteResult,
}

impl Report for RenderReport {
    fn render(&self, out: &mut dyn Output) {
        match self.result {
            WriteResult::Written => out.written(&self.path),
            WriteResult::Skipped => out.skipped(&self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::BufferOutput;

    #[test]
    fn test_skipped_file_is_reported() {
        let report = RenderReport {
            path: PathBuf::from("out/Taco.kt"),
            result: WriteResult::Skipped,
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert_eq!(out.lines, ["  = out/Taco.kt (exists, skipped)"]);
    }
}
