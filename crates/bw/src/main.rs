//! bw CLI - publish Markdown to Backlog Wiki.
//!
//! Provides commands for:
//! - `upload`: Upload Markdown files with their images and Mermaid diagrams
//! - `analyze`: Show what an upload would touch, without credentials

mod commands;
mod error;
mod output;
mod progress;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AnalyzeArgs, UploadArgs};
use output::Output;

/// bw - publish Markdown to Backlog Wiki.
#[derive(Parser)]
#[command(name = "bw", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a Markdown file or directory to the wiki.
    Upload(UploadArgs),
    /// Analyze a Markdown file without uploading.
    Analyze(AnalyzeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Upload(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Upload(args) => args.execute(),
        Commands::Analyze(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_upload_requires_project() {
        assert!(Cli::try_parse_from(["bw", "upload", "doc.md"]).is_err());
        assert!(Cli::try_parse_from(["bw", "upload", "doc.md", "--project", "PROJ"]).is_ok());
    }

    #[test]
    fn test_upload_repeated_patterns() {
        let cli = Cli::try_parse_from([
            "bw",
            "upload",
            "docs",
            "-p",
            "PROJ",
            "--recursive",
            "--include",
            "*.md",
            "--include",
            "guide/**",
            "--exclude",
            "draft-*",
            "--verbose",
        ])
        .unwrap();

        let Commands::Upload(args) = cli.command else {
            panic!("expected upload command");
        };
        assert!(args.verbose);
        assert_eq!(args.discover_options().include, vec!["*.md", "guide/**"]);
        assert_eq!(args.discover_options().exclude, vec!["draft-*"]);
        assert!(args.discover_options().recursive);
    }
}
