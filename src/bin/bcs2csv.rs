use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use bcs_report_to_csv::{
    BatchReport, ConvertMode, ConvertOptions, Dialect, FileOutcome, Metadata, MetadataPair,
    convert_batch,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "bcs2csv",
    version,
    about = "Extract tables from broker report exports into delimited files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write one file per table detected in spreadsheet or delimited dumps.
    Split(ConvertArgs),
    /// Reshape deals and cash transactions text exports into records.
    Normalize(ConvertArgs),
    /// Normalize .txt exports and split everything else.
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Input report files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Extra output column as KEY=VALUE. Repeatable; order is kept.
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    meta: Vec<MetadataPair>,

    /// JSON object of extra output columns. --meta entries override it.
    #[arg(long, value_name = "PATH")]
    meta_file: Option<PathBuf>,

    /// Output delimiter character.
    #[arg(long, default_value = "\t")]
    delimiter: char,

    /// Rows a block needs to count as a table.
    #[arg(long, default_value_t = 3)]
    min_table_rows: usize,

    /// Print the per-file summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Log state transitions and rejected blocks.
    #[arg(short, long)]
    verbose: bool,
}

fn load_metadata(args: &ConvertArgs) -> Result<Metadata> {
    let mut metadata = match &args.meta_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read --meta-file '{}'", path.display()))?;
            Metadata::from_json_str(&json)
                .with_context(|| format!("failed to parse --meta-file '{}'", path.display()))?
        }
        None => Metadata::new(),
    };
    metadata.extend(&args.meta.iter().cloned().collect::<Metadata>());
    Ok(metadata)
}

fn parse_options(args: &ConvertArgs) -> Result<ConvertOptions> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let options = ConvertOptions {
        dialect: Dialect {
            delimiter: args.delimiter as u8,
        },
        min_table_rows: args.min_table_rows,
        metadata: load_metadata(args)?,
        ..ConvertOptions::default()
    };
    options
        .validate()
        .map_err(|error| anyhow!("invalid options: {error}"))?;
    Ok(options)
}

fn log_report(report: &BatchReport, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("failed to render summary")?;
        println!("{text}");
        return Ok(());
    }

    for file in &report.files {
        match &file.outcome {
            FileOutcome::Split(split) => {
                for table in &split.tables {
                    println!("{}\t{}\t{}", file.input.display(), table.path.display(), table.rows);
                }
            }
            FileOutcome::Normalized(normalized) => {
                println!(
                    "{}\t{}\t{}",
                    file.input.display(),
                    normalized.output.display(),
                    normalized.records
                );
            }
            FileOutcome::Skipped => eprintln!("skipped: {}", file.input.display()),
            FileOutcome::Failed { error } => {
                eprintln!("error: {}: {error}", file.input.display());
            }
        }
    }
    Ok(())
}

fn run(args: &ConvertArgs, mode: ConvertMode) -> Result<BatchReport> {
    let options = parse_options(args)?;
    let report = convert_batch(&args.inputs, mode, &options);
    log_report(&report, args.json)?;
    Ok(report)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "bcs_report_to_csv=debug"
    } else {
        "bcs_report_to_csv=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (args, mode) = match &cli.command {
        Commands::Split(args) => (args, ConvertMode::Split),
        Commands::Normalize(args) => (args, ConvertMode::Normalize),
        Commands::Convert(args) => (args, ConvertMode::Auto),
    };
    init_tracing(args.verbose);

    match run(args, mode) {
        Ok(report) if report.failed_count() > 0 => ExitCode::from(1),
        Ok(report) if report.output_count() == 0 => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
