//! `bw analyze` command implementation.

use std::path::PathBuf;

use bw_markdown::{Analysis, Document, analyze};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the analyze command.
#[derive(Args)]
pub(crate) struct AnalyzeArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Print the analysis as JSON to stdout.
    #[arg(long)]
    json: bool,
}

impl AnalyzeArgs {
    /// Execute the analyze command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let doc = Document::read(&self.file)?;
        let analysis = analyze(&doc);

        if self.json {
            output.data(&serde_json::to_string_pretty(&analysis)?);
        } else {
            print_analysis(&output, &analysis);
        }
        Ok(())
    }
}

fn print_analysis(output: &Output, analysis: &Analysis) {
    output.highlight(&format!("File: {}", analysis.file));
    output.info(&format!("Page name: {}", analysis.page_name));
    output.info(&format!(
        "Images: {} total, {} local, {} external or missing",
        analysis.total_images, analysis.local_images, analysis.external_images
    ));
    for image in &analysis.images {
        let marker = if image.exists { "+" } else { "-" };
        output.info(&format!("  {marker} [{}] {}", image.alt, image.path));
    }

    output.info(&format!("Mermaid diagrams: {}", analysis.mermaid_blocks));
    for (i, preview) in analysis.mermaid_previews.iter().enumerate() {
        output.info(&format!("  #{}:", i + 1));
        for line in preview.lines() {
            output.info(&format!("    {line}"));
        }
    }
}
