//! Wheatset: tooling for the wheat_head_counting dataset.
//!
//! The crate ships the two utilities the dataset is maintained with,
//! plus a checker for their output:
//!
//! - [`reorganize`]: rebuild the standard directory layout from the raw
//!   competition CSVs
//! - [`convert`]: aggregate per-image annotations into one COCO JSON
//!   file per split
//! - [`validation`]: structural validation of generated COCO documents
//!
//! # Modules
//!
//! - [`dataset`]: dataset model and file-format I/O
//! - [`splits`]: split membership lists
//! - [`error`]: error types for wheatset operations

pub mod convert;
pub mod dataset;
pub mod error;
pub mod reorganize;
pub mod splits;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::WheatsetError;

use convert::{AnnotationSource, ConvertOptions};
use reorganize::ReorganizeOptions;

/// The wheatset CLI application.
#[derive(Parser)]
#[command(name = "wheatset")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Aggregate per-image annotations into COCO JSON files, one per split.
    Convert(ConvertArgs),

    /// Rebuild the standard dataset layout from the raw competition CSVs.
    Reorganize(ReorganizeArgs),

    /// Validate a generated COCO annotation file.
    Validate(ValidateArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Dataset root containing the category subfolder.
    #[arg(long)]
    root: PathBuf,

    /// Output directory for the COCO JSON files.
    #[arg(long)]
    out: PathBuf,

    /// Category directory to convert.
    #[arg(long, default_value = "wheat_heads")]
    category: String,

    /// Dataset splits to generate.
    #[arg(long, num_args = 1.., default_values = ["train", "val", "test"])]
    splits: Vec<String>,

    /// Annotation source ('csv' or 'json').
    #[arg(long, default_value = "csv")]
    source: String,
}

/// Arguments for the reorganize subcommand.
#[derive(clap::Args)]
struct ReorganizeArgs {
    /// Raw root holding competition_*.csv and the images/ pool.
    #[arg(long)]
    root: PathBuf,

    /// Category directory name to build under the root.
    #[arg(long, default_value = "wheat_heads")]
    category: String,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// COCO JSON file to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the wheatset CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), WheatsetError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Reorganize(args)) => run_reorganize(args),
        Some(Commands::Validate(args)) => run_validate(args),
        None => {
            println!("wheatset {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Tooling for the wheat_head_counting dataset.");
            println!();
            println!("Run 'wheatset --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), WheatsetError> {
    let source: AnnotationSource = args.source.parse()?;

    let opts = ConvertOptions {
        root: args.root,
        out_dir: args.out,
        category: args.category,
        splits: args.splits,
        source,
    };

    let summaries = convert::convert(&opts)?;
    for summary in &summaries {
        println!(
            "Generated {} with {} images and {} annotations",
            summary.output.display(),
            summary.images,
            summary.annotations
        );
    }

    Ok(())
}

/// Execute the reorganize subcommand.
fn run_reorganize(args: ReorganizeArgs) -> Result<(), WheatsetError> {
    let opts = ReorganizeOptions {
        category_root: args.root.join(&args.category),
        raw_root: args.root,
    };

    let summary = reorganize::reorganize(&opts)?;
    println!(
        "Created set files: train={}, val={}, test={}",
        summary.train, summary.val, summary.test
    );
    println!(
        "Done: processed {} images, skipped {} images",
        summary.processed, summary.skipped
    );

    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), WheatsetError> {
    let dataset = dataset::io_coco_json::read_coco_json(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_dataset(&dataset, &opts);

    match args.output.as_str() {
        "json" => {
            let issues: Vec<serde_json::Value> = report
                .issues
                .iter()
                .map(|issue| {
                    serde_json::json!({
                        "severity": format!("{:?}", issue.severity),
                        "code": format!("{:?}", issue.code),
                        "message": issue.message,
                        "context": issue.context.to_string(),
                    })
                })
                .collect();
            let doc = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": issues,
            });
            let rendered =
                serde_json::to_string_pretty(&doc).map_err(|source| WheatsetError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            println!("{rendered}");
        }
        _ => {
            print!("{}", report);
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(WheatsetError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
        })
    } else {
        Ok(())
    }
}
