//! linfit trainer CLI
//!
//! Encodes a `.data` table and fits linear models to its last column.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use linfit_io::{find_data_files, write_matrix_csv};
use linfit_linear::BatchWindow;
use linfit_pipeline::{
    target_kind, ColumnSummary, EncodedDataset, Pipeline, RunSummary, TargetKind, TargetReport,
    TrainConfig,
};
use linfit_preprocessing::{ColumnKind, ShuffleMode};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const RULE: &str = "====================================================";
const PREVIEW_ROWS: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "linfit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Encode a comma separated table and fit linear models to its last column", long_about = None)]
struct Args {
    /// A data file, or a directory to choose a `.data` file from
    #[arg(default_value = "files")]
    input: PathBuf,

    /// Seed for shuffling and initialization (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Shuffle by swapping each row with any row instead of Fisher-Yates
    #[arg(long)]
    legacy_shuffle: bool,

    /// Let each mini-batch start where the previous one stopped
    #[arg(long)]
    advancing_window: bool,

    /// Number of (actual, predicted) pairs shown per model
    #[arg(long, default_value = "10")]
    samples: usize,

    /// Print the encoded first rows before training
    #[arg(long)]
    preview: bool,

    /// Write the encoded matrix to a CSV file
    #[arg(long, value_name = "PATH")]
    dump_matrix: Option<PathBuf>,

    /// Print the run summary as JSON instead of the console report
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> TrainConfig {
        let mut config = TrainConfig::new().with_sample_count(self.samples);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.legacy_shuffle {
            config = config.with_shuffle(ShuffleMode::Legacy);
        }
        if self.advancing_window {
            config = config.with_batch_window(BatchWindow::Advancing);
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let path = resolve_input(&args.input)?;
    let dataset = EncodedDataset::from_path(&path)
        .with_context(|| format!("There was a problem with the file {}", path.display()))?;

    let mut out = io::stdout();
    if !args.json {
        print_columns(&mut out, &ColumnSummary::describe(&dataset))?;
        print_target(&mut out, &target_kind(&dataset.mapper), &dataset)?;
    }

    if args.preview {
        writeln!(out, "\nFirst encoded rows:\n")?;
        write!(out, "{}", dataset.matrix.head(PREVIEW_ROWS))?;
    }

    if let Some(dump) = &args.dump_matrix {
        let labels = dataset.mapper.slot_labels();
        write_matrix_csv(dump, &dataset.matrix, Some(labels.as_slice()))
            .map_err(|e| anyhow!("Failed to write {}: {}", dump.display(), e))?;
        info!("Encoded matrix written to: {}", dump.display());
    }

    if !args.json {
        writeln!(out, "\nTraining... please wait.\n")?;
        out.flush()?;
    }

    let summary = Pipeline::new(args.config()).run(&dataset)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        writeln!(out, "{}", json)?;
    } else {
        print_report(&mut out, &summary)?;
    }

    Ok(())
}

/// A file is used as is; a directory lists its `.data` files and asks for
/// one on stdin.
fn resolve_input(input: &Path) -> Result<PathBuf> {
    if !input.is_dir() {
        return Ok(input.to_path_buf());
    }

    let files = find_data_files(input)
        .with_context(|| format!("Failed to list {}", input.display()))?;
    if files.is_empty() {
        bail!("No .data files found in {}", input.display());
    }

    let mut out = io::stdout();
    writeln!(out, "Choose one of these files:\n")?;
    for (i, file) in files.iter().enumerate() {
        let name = file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        writeln!(out, "{:4} - {}", i + 1, name)?;
    }
    write!(out, "\nFile number: ")?;
    out.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("Failed to read the file number")?;
    let choice: usize = line
        .trim()
        .parse()
        .with_context(|| format!("Invalid file number: {:?}", line.trim()))?;
    if choice == 0 || choice > files.len() {
        bail!("File number must be between 1 and {}", files.len());
    }
    Ok(files[choice - 1].clone())
}

fn heading(out: &mut impl Write, text: &str) -> io::Result<()> {
    execute!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(text),
        ResetColor,
        Print("\n")
    )
}

fn print_columns(out: &mut impl Write, columns: &[ColumnSummary]) -> io::Result<()> {
    let rule = "-".repeat(108);
    writeln!(out)?;
    heading(out, "Column details:")?;
    writeln!(out, "\n{}", rule)?;
    writeln!(
        out,
        "|  Index  |   Type   |   Count   |  Missing  |     Max     |     Min     |     Mean     |   Variance       |"
    )?;
    writeln!(out, "{}", rule)?;

    for column in columns {
        let p = &column.profile;
        write!(out, "| {:6}  | {:^8} | {:9} | {:9} |", column.index + 1, column.kind, p.count(), p.missing)?;
        let precision = if column.kind == ColumnKind::Integer { 0 } else { 2 };
        match column.kind {
            ColumnKind::Word | ColumnKind::Empty => {
                writeln!(out, "{:>12} |{:>12} |{:>13} |{:>17} |", "-", "-", "-", "-")?
            }
            _ => writeln!(
                out,
                "{:>12} |{:>12} |{:>13} |{:>17} |",
                fmt_stat(p.max, precision),
                fmt_stat(p.min, precision),
                fmt_stat(p.mean, 2),
                fmt_stat(p.variance, 2),
            )?,
        }
    }
    writeln!(out, "{}", rule)
}

fn fmt_stat(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

fn print_target(out: &mut impl Write, kind: &TargetKind, dataset: &EncodedDataset) -> io::Result<()> {
    writeln!(out)?;
    match kind {
        TargetKind::Categorical { classes } => {
            writeln!(out, "The type of the y column is: {}.", ColumnKind::Word)?;
            let names: Vec<String> = classes
                .iter()
                .map(|c| format!("'{}'", c.as_deref().unwrap_or("")))
                .collect();
            writeln!(out, "y values: {}.", names.join(", "))
        }
        TargetKind::Numeric => {
            let kind = dataset
                .target_profile()
                .map_or(ColumnKind::Empty, |p| p.kind());
            writeln!(out, "The type of the y column is: {}.", kind)
        }
    }
}

fn print_report(out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
    let categorical = matches!(summary.target, TargetKind::Categorical { .. });
    for target in &summary.report.targets {
        writeln!(out, "{}", RULE)?;
        if categorical {
            heading(out, &format!("y: {}", target.label))?;
            writeln!(out)?;
        }
        print_target_report(out, target)?;
        writeln!(out, "{}\n", RULE)?;
    }
    Ok(())
}

fn print_target_report(out: &mut impl Write, target: &TargetReport) -> io::Result<()> {
    writeln!(out, "Before j: {:12.8}", target.cost_before)?;
    writeln!(out, "After  j: {:12.8}", target.cost_after)?;
    writeln!(out, "Lambda:   {}", target.lambda)?;

    if !target.samples.is_empty() {
        writeln!(out, "\nSome examples\n")?;
        for sample in &target.samples {
            writeln!(out, "{:8.4}  ->  {:8.4}", sample.actual, sample.predicted)?;
        }
    }
    Ok(())
}
