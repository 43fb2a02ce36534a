use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kpiboard::{
    config::Config, load_path, Dataset, FileKind, MonthKey, Perspective, Scorecard, Selection,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kpiboard")]
#[command(about = "Business-unit KPI scorecards from a CSV or spreadsheet upload")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ./kpiboard.yaml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// How to parse the input file
    #[arg(long, global = true, default_value = "auto")]
    kind: KindArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the scorecard for one perspective / sub-unit / month
    Show {
        /// CSV or spreadsheet file
        file: PathBuf,

        /// Financial, "Customer n Service", Quality or Employee
        #[arg(long, short)]
        perspective: Perspective,

        /// Sub-division (or product, for Customer n Service)
        #[arg(long, short)]
        unit: String,

        /// Reporting month as MMM-YY, e.g. Feb-25 (default: latest in file)
        #[arg(long, short)]
        month: Option<MonthKey>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List perspectives, sub-units and months found in a file
    Summary {
        /// CSV or spreadsheet file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Auto,
    Csv,
    Spreadsheet,
}

impl From<KindArg> for FileKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Auto => FileKind::Auto,
            KindArg::Csv => FileKind::Csv,
            KindArg::Spreadsheet => FileKind::Spreadsheet,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── 1) config + logging ─────────────────────────────────────────
    let config = Config::load(cli.config.as_deref())?;
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) dispatch ─────────────────────────────────────────────────
    match cli.command {
        Commands::Show {
            file,
            perspective,
            unit,
            month,
            json,
        } => {
            let dataset = open(&file, cli.kind.into(), &config)?;
            let month = match month {
                Some(m) => m,
                None => *dataset
                    .months()
                    .last()
                    .context("dataset has no months")?,
            };
            let selection = Selection::new(perspective, unit, month);

            match Scorecard::build(&dataset, &selection)? {
                Some(card) if json => {
                    println!("{}", serde_json::to_string_pretty(&card)?);
                }
                Some(card) => print!("{}", card.render_text()),
                None => {
                    warn!(?selection, "no data for slice");
                    if json {
                        println!("null");
                    } else {
                        println!(
                            "no data for {} / {} / {}",
                            selection.perspective, selection.unit, selection.month
                        );
                    }
                }
            }
        }
        Commands::Summary { file } => {
            let dataset = open(&file, cli.kind.into(), &config)?;
            print_summary(&dataset);
        }
    }
    Ok(())
}

fn open(file: &Path, kind: FileKind, config: &Config) -> Result<Dataset> {
    let dataset = load_path(file, kind, &config.load_options())
        .with_context(|| format!("loading {}", file.display()))?;
    info!(records = dataset.len(), file = %file.display(), "loaded");
    Ok(dataset)
}

fn print_summary(dataset: &Dataset) {
    let months: Vec<String> = dataset.months().iter().map(|m| m.token()).collect();
    println!("{: <20} {}", "Records", dataset.len());
    println!("{: <20} {}", "Months", months.join(", "));
    println!("{:-<55}", "");
    for p in dataset.perspectives() {
        println!(
            "{: <20} {} [{}]",
            p.label(),
            dataset.units(p).join(", "),
            p.unit_column().header()
        );
    }
}
