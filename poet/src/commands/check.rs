use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use ktpoet_core::GeneratedFile;

use super::UnwrapOrExit;
use crate::reports::{CheckReport, Report, TerminalOutput};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the manifest (defaults to ./ktpoet.toml)
    #[arg(short, long, default_value = "ktpoet.toml")]
    pub manifest: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let manifest = ktpoet_manifest::parse_file(&self.manifest).unwrap_or_exit();
        let file = manifest.to_file_spec().unwrap_or_exit();
        let config = manifest.render_config();

        let (text, imports) = ktpoet_codegen::render_with_imports(&file, &config).unwrap_or_exit();
        let report = CheckReport::new(self.manifest.clone(), file.relative_path(), &text, &imports);

        if self.json {
            let json = serde_json::to_string_pretty(&report).wrap_err("Failed to serialize report")?;
            println!("{json}");
        } else {
            report.render(&mut TerminalOutput);
        }
        Ok(())
    }
}
