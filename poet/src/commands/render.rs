use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use ktpoet_core::{GeneratedFile, OutputFile, Overwrite};

use super::UnwrapOrExit;
use crate::reports::{RenderReport, Report, TerminalOutput};

#[derive(Args)]
pub struct RenderCommand {
    /// Path to the manifest (defaults to ./ktpoet.toml)
    #[arg(short, long, default_value = "ktpoet.toml")]
    pub manifest: PathBuf,

    /// Write below this directory instead of printing to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave files that already exist untouched
    #[arg(long)]
    pub skip_existing: bool,
}

impl RenderCommand {
    pub fn run(&self) -> Result<()> {
        let manifest = ktpoet_manifest::parse_file(&self.manifest).unwrap_or_exit();
        let file = manifest.to_file_spec().unwrap_or_exit();
        let text = ktpoet_codegen::render(&file, &manifest.render_config()).unwrap_or_exit();

        let Some(dir) = &self.output else {
            print!("{text}");
            return Ok(());
        };

        let overwrite = if self.skip_existing {
            Overwrite::IfMissing
        } else {
            Overwrite::Always
        };
        let output = OutputFile::new(file.relative_path(), text).overwrite(overwrite);
        let result = output
            .write_to(dir)
            .wrap_err_with(|| format!("Failed to write below {}", dir.display()))?;
        tracing::debug!(path = %output.path().display(), ?result, "wrote file");

        RenderReport {
            path: dir.join(output.path()),
            result,
        }
        .render(&mut TerminalOutput);
        Ok(())
    }
}
