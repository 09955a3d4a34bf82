//! Birthday roster CLI - decode a .docx and emit the rendered card grid.

use anyhow::{bail, Context, Result};
use birthday_backend::{DocumentBackend, DocxBackend};
use birthday_core::{
    page_title, parse_document, render_cards, ParseOptions, ParseResult, UploadResponse,
};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// The HTML card grid fragment
    Html,
    /// The upload-response JSON payload (success, html, title)
    Json,
    /// The derived page title only
    Title,
}

#[derive(Parser)]
#[command(
    name = "birthdays",
    version,
    about = "Extract date → name groups from a .docx roster and render them as HTML cards"
)]
struct Cli {
    /// Input .docx file
    input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    output: OutputFormat,

    /// Merge names when a date heading recurs instead of restarting its group
    #[arg(long)]
    merge_duplicates: bool,

    /// Print the per-line classification log to stderr
    #[arg(long)]
    diagnostics: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn print_diagnostics(result: &ParseResult) {
    for diag in result.diagnostics() {
        match (&diag.rule, &diag.label) {
            (Some(rule), Some(label)) => eprintln!("{rule:>16}  {:?} -> {label:?}", diag.text),
            _ => eprintln!("{:>16}  {:?}", "name", diag.text),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let extension = cli
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !extension.eq_ignore_ascii_case("docx") {
        bail!("expected a .docx file, got: {}", cli.input.display());
    }

    let doc = DocxBackend
        .decode_file(&cli.input)
        .with_context(|| format!("failed to decode {}", cli.input.display()))?;

    let options = ParseOptions {
        merge_duplicate_labels: cli.merge_duplicates,
        collect_diagnostics: cli.diagnostics,
    };
    let result = parse_document(&doc, &options);

    if cli.diagnostics {
        print_diagnostics(&result);
    }

    let rendered = match cli.output {
        OutputFormat::Html => render_cards(&result),
        OutputFormat::Json => serde_json::to_string_pretty(&UploadResponse::from_result(&result))?,
        OutputFormat::Title => page_title(&result),
    };

    match cli.out {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
