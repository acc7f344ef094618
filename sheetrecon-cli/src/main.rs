use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sheetrecon::{
    CellAddress, DataSource, ReconcileConfig, ReconcileRequest, Reconciler, StartCoordinates,
    StatementCategory, check_cell_address, reader,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod formatter;

#[derive(Parser)]
#[command(name = "sheetrecon")]
#[command(about = "Match model line items with an issuer report by period values", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory with lookup tables (overrides the config)
    #[arg(long, value_name = "DIR", global = true)]
    lookup_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the pages of a workbook
    Sheets {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Suggest start cells for a model page and an issuer page
    Anchors {
        #[command(flatten)]
        pages: Pages,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Match rows and suggest label renames
    Match {
        #[command(flatten)]
        pages: Pages,

        /// Start cell in the model (e.g. C4); suggested when omitted
        #[arg(long, value_name = "CELL")]
        model_start: Option<String>,

        /// Start cell in the issuer report (e.g. B2); suggested when omitted
        #[arg(long, value_name = "CELL")]
        issuer_start: Option<String>,

        /// Statement category (Баланс, Финансовые результаты, Сегменты, ...)
        #[arg(long, value_parser = StatementCategory::from_str)]
        category: StatementCategory,

        /// Kind of issuer document (XBRL, XLSX, PDF)
        #[arg(long, value_parser = DataSource::from_str)]
        source: DataSource,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Also write the plain-text report to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct Pages {
    /// Workbook with the analyst's model
    #[arg(value_name = "MODEL")]
    model: PathBuf,

    /// Workbook with the parsed issuer report
    #[arg(value_name = "ISSUER")]
    issuer: PathBuf,

    /// Page of the model workbook
    #[arg(long)]
    model_sheet: String,

    /// Page of the issuer workbook
    #[arg(long)]
    issuer_sheet: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output
    Json,
    /// Plain-text rename report
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    match cli.command {
        Command::Sheets { ref file } => {
            let workbook = reader::read_workbook(file)?;
            formatter::print_sheets(file, &workbook.sheet_names());
            Ok(())
        }
        Command::Anchors { ref pages, format } => {
            let reconciler = load_reconciler(&cli)?;
            let (model, issuer) = pages.load()?;
            let model = model.sheet(&pages.model_sheet)?;
            let issuer = issuer.sheet(&pages.issuer_sheet)?;

            let start = reconciler.suggest_start(model, issuer)?;
            match format {
                OutputFormat::Json => formatter::print_anchors_json(&start)?,
                OutputFormat::Human | OutputFormat::Text => formatter::print_anchors_human(&start),
            }
            Ok(())
        }
        Command::Match {
            ref pages,
            ref model_start,
            ref issuer_start,
            category,
            source,
            format,
            ref output,
        } => {
            let model_start = model_start.as_deref().map(parse_address).transpose();
            let issuer_start = issuer_start.as_deref().map(parse_address).transpose();
            let (model_start, issuer_start) = match (model_start, issuer_start) {
                (Ok(model_start), Ok(issuer_start)) => (model_start, issuer_start),
                (Err(input), _) | (_, Err(input)) => {
                    formatter::print_invalid_address(&input);
                    std::process::exit(2);
                }
            };

            let reconciler = load_reconciler(&cli)?;
            let (model_book, issuer_book) = pages.load()?;
            let model = model_book.sheet(&pages.model_sheet)?;
            let issuer = issuer_book.sheet(&pages.issuer_sheet)?;

            let start = match (model_start, issuer_start) {
                (Some(model_start), Some(issuer_start)) => {
                    StartCoordinates::manual(model_start, issuer_start)
                }
                (model_start, issuer_start) => {
                    let suggested = reconciler.suggest_start(model, issuer)?;
                    StartCoordinates {
                        model: model_start.unwrap_or(suggested.model),
                        issuer: issuer_start.unwrap_or(suggested.issuer),
                        origin: suggested.origin,
                    }
                }
            };

            let result = reconciler.reconcile(&ReconcileRequest {
                model,
                issuer,
                start,
                category,
                source,
            })?;

            let enriched = match result.enriched {
                Ok(enriched) => enriched,
                Err(e) => {
                    formatter::print_unenriched(&result.equivalents, &e, format)?;
                    std::process::exit(1);
                }
            };

            match format {
                OutputFormat::Human => formatter::print_human(&start, &enriched),
                OutputFormat::Json => formatter::print_json(&start, &enriched)?,
                OutputFormat::Text => println!("{}", sheetrecon::report::render_text(&enriched)),
            }

            if let Some(path) = output {
                std::fs::write(path, sheetrecon::report::render_text(&enriched))
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
            }
            Ok(())
        }
    }
}

impl Pages {
    fn load(&self) -> Result<(reader::Workbook, reader::Workbook)> {
        let model = reader::read_workbook(&self.model)?;
        let issuer = if self.issuer == self.model {
            model.clone()
        } else {
            reader::read_workbook(&self.issuer)?
        };
        Ok((model, issuer))
    }
}

fn parse_address(input: &str) -> std::result::Result<CellAddress, String> {
    check_cell_address(input).ok_or_else(|| input.to_string())
}

fn load_reconciler(cli: &Cli) -> Result<Reconciler> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = &cli.lookup_dir {
        config.lookup_dir = dir.clone();
    }
    Reconciler::with_config(config).context("Invalid configuration")
}

fn load_config(path: Option<&Path>) -> Result<ReconcileConfig> {
    if let Some(config_path) = path {
        return ReconcileConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Fall back to sheetrecon.toml in the current directory
    let default_config_path = PathBuf::from("sheetrecon.toml");
    if default_config_path.exists() {
        ReconcileConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        })
    } else {
        Ok(ReconcileConfig::default())
    }
}
