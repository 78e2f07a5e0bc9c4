//! `bw upload` command implementation.

use std::path::PathBuf;

use bw_backlog::BacklogClient;
use bw_backlog::uploader::{DryRunResult, UploadConfig, UploadError, UploadResult, WikiUploader};
use bw_config::{CliSettings, Config, MermaidConfig};
use bw_markdown::{DiscoverOptions, find_markdown_files};
use bw_mermaid::{ImageFormat, MermaidRenderer, RenderOptions};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;
use crate::progress::UploadProgress;

/// Arguments for the upload command.
#[derive(Args)]
pub(crate) struct UploadArgs {
    /// Markdown file, or a directory of Markdown files.
    path: PathBuf,

    /// Backlog project key or numeric ID.
    #[arg(short, long)]
    project: String,

    /// Page name (default: first H1 heading, else the filename).
    #[arg(short, long)]
    name: Option<String>,

    /// Backlog space ID (overrides BACKLOG_SPACE_ID).
    #[arg(long)]
    space_id: Option<String>,

    /// Backlog API key (overrides BACKLOG_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Backlog domain, e.g. backlog.com (overrides BACKLOG_DOMAIN).
    #[arg(long)]
    domain: Option<String>,

    /// Path to a .env file with credentials.
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover bw.toml).
    #[arg(short, long, env = "BW_CONFIG")]
    config: Option<PathBuf>,

    /// Show what would be uploaded without touching the wiki.
    #[arg(long)]
    dry_run: bool,

    /// Descend into subdirectories.
    #[arg(short, long)]
    recursive: bool,

    /// Maximum directory depth when recursive (1 = only PATH itself).
    #[arg(long, requires = "recursive")]
    max_depth: Option<usize>,

    /// Only upload files matching this glob (repeatable).
    #[arg(long)]
    include: Vec<String>,

    /// Skip files matching this glob (repeatable).
    #[arg(long)]
    exclude: Vec<String>,

    /// Keep going after a file fails.
    #[arg(long)]
    continue_on_error: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl UploadArgs {
    /// Execute the upload command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is incomplete or an upload fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if self.name.is_some() && self.path.is_dir() {
            return Err(CliError::Validation(
                "--name cannot be used when PATH is a directory".to_owned(),
            ));
        }

        let files = find_markdown_files(&self.path, &self.discover_options())?;
        if files.is_empty() {
            output.warning(&format!(
                "No Markdown files found in {}",
                self.path.display()
            ));
            return Ok(());
        }

        // Load config
        let cli_settings = CliSettings {
            space_id: self.space_id.clone(),
            api_key: self.api_key.clone(),
            domain: self.domain.clone(),
            env_file: self.env_file.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let backlog = config.require_backlog()?;
        tracing::debug!(space = %backlog.base_url(), "Loaded configuration");

        let client = BacklogClient::new(&backlog.base_url(), &backlog.api_key);
        let renderer = create_renderer(&config.mermaid, &output);

        let upload_config = UploadConfig {
            project: self.project.clone(),
            render_options: render_options(&config.mermaid),
        };
        let progress = UploadProgress::new(&output);
        let mut uploader = WikiUploader::new(&client, upload_config).listener(&progress);
        if let Some(renderer) = &renderer {
            uploader = uploader.renderer(renderer);
        }

        self.run_batch(&uploader, &files, &output)
    }

    /// Options for finding the files to upload.
    pub(crate) fn discover_options(&self) -> DiscoverOptions {
        DiscoverOptions {
            recursive: self.recursive,
            max_depth: self.max_depth,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
        }
    }

    fn run_batch(
        &self,
        uploader: &WikiUploader<'_>,
        files: &[PathBuf],
        output: &Output,
    ) -> Result<(), CliError> {
        let total = files.len();
        let mut errors: Vec<(PathBuf, UploadError)> = Vec::new();
        let mut succeeded = 0;

        for (i, file) in files.iter().enumerate() {
            output.step(i, total, file);

            let outcome = if self.dry_run {
                uploader
                    .dry_run(file, self.name.as_deref())
                    .map(|result| print_dry_run_result(output, &result))
            } else {
                uploader
                    .upload(file, self.name.as_deref())
                    .map(|result| print_upload_result(output, &result))
            };

            match outcome {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    if total > 1 {
                        output.error(&format!("Failed: {e}"));
                    }
                    errors.push((file.clone(), e));
                    if !self.dry_run && !self.continue_on_error {
                        break;
                    }
                }
            }
        }

        if total > 1 {
            print_batch_summary(output, succeeded, total, &errors);
        }

        if self.dry_run {
            if total == 1
                && let Some((_, e)) = errors.pop()
            {
                output.error(&format!("Failed: {e}"));
            }
            return Ok(());
        }
        match errors.len() {
            0 => Ok(()),
            1 if total == 1 => Err(errors.remove(0).1.into()),
            failed => Err(CliError::Batch { failed, total }),
        }
    }
}

fn create_renderer(mermaid: &MermaidConfig, output: &Output) -> Option<MermaidRenderer> {
    match MermaidRenderer::with_command(&mermaid.command) {
        Ok(renderer) => Some(renderer),
        Err(e) => {
            output.warning(&format!(
                "Warning: {e}\nMermaid diagrams will be left as code blocks."
            ));
            None
        }
    }
}

fn render_options(mermaid: &MermaidConfig) -> RenderOptions {
    RenderOptions {
        format: ImageFormat::parse(&mermaid.format).unwrap_or_default(),
        theme: mermaid.theme.clone(),
        background: mermaid.background.clone(),
    }
}

fn print_dry_run_result(output: &Output, result: &DryRunResult) {
    output.highlight("[DRY RUN] No changes made.");
    output.field("Page", &result.page_name);
    output.field("URL", &result.url);
    output.field(
        "Images",
        format!(
            "{} reference(s), {} local file(s)",
            result.image_references, result.image_files
        ),
    );
    output.field("Mermaid", diagram_summary(result));
}

/// Dry-run wording for Mermaid blocks.
///
/// Blocks are not rendered here, so the count is of blocks, not uploads.
fn diagram_summary(result: &DryRunResult) -> String {
    match (result.diagram_blocks, result.renders_diagrams) {
        (0, _) => "no blocks".to_owned(),
        (n, true) => format!("{n} block(s), rendered on upload"),
        (n, false) => format!("{n} block(s), left as code (renderer not available)"),
    }
}

fn print_upload_result(output: &Output, result: &UploadResult) {
    if result.created {
        output.success("Page created successfully!");
    } else {
        output.success("Page updated successfully!");
    }
    output.field("ID", result.page_id);
    output.field("Name", &result.page_name);
    output.field("URL", &result.url);

    if result.images_uploaded + result.diagrams_uploaded > 0 {
        output.info(&format!(
            "Attachments: {} image(s), {} diagram(s), {} reference(s) rewritten",
            result.images_uploaded, result.diagrams_uploaded, result.replacements
        ));
    }

    if !result.failures.is_empty() {
        output.warning(&format!(
            "\nWarning: {} item(s) were skipped:",
            result.failures.len()
        ));
        for failure in &result.failures {
            output.item(&format!(
                "{} {}: {}",
                failure.kind, failure.name, failure.message
            ));
        }
    }
    for warning in &result.warnings {
        output.warning(&format!("Warning: {warning}"));
    }
}

fn print_batch_summary(
    output: &Output,
    succeeded: usize,
    total: usize,
    errors: &[(PathBuf, UploadError)],
) {
    output.separator();
    if errors.is_empty() {
        output.success(&format!("All {total} file(s) processed."));
        return;
    }
    output.warning(&format!(
        "{succeeded} of {total} file(s) processed, {} failed:",
        errors.len()
    ));
    for (file, e) in errors {
        output.item(&format!("{}: {e}", file.display()));
    }
}
