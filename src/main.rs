use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stock_locator::model::DifferenceStatus;
use stock_locator::report::ReportConfig;
use stock_locator::service::{self, DEFAULT_OUTPUT_DIR, Session};
use stock_locator::{LocatorError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging() {
        eprintln!("warning: {error}");
    }
    match run(cli) {
        Ok(message) => println!("{message}"),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| LocatorError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<String> {
    let session = cli.session();
    match cli.command {
        Command::Article { code } => {
            let path = session.article_report(&code)?;
            Ok(service::success_message(&path))
        }
        Command::Aisle { number } => {
            let path = session.aisle_report(&number)?;
            Ok(service::success_message(&path))
        }
        Command::Locate { locator } => {
            let records = session.locate(&locator)?;
            Ok(serde_json::to_string_pretty(&records)?)
        }
        Command::Describe { code } => session.describe(&code),
        Command::Diff { locator, status } => {
            let summary = session.log_difference(&locator, status)?;
            if summary.rows_appended == 0 {
                Ok(format!("No records at {locator}; nothing logged"))
            } else {
                Ok(format!(
                    "Logged {} row(s) as {status}; difference log now holds {} row(s)",
                    summary.rows_appended, summary.total_rows
                ))
            }
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Locate warehouse stock in a workbook and print PDF reports."
)]
struct Cli {
    /// Workbook holding the inventory sheets.
    #[arg(long, short, global = true)]
    workbook: Option<PathBuf>,

    /// Directory generated PDFs are written to.
    #[arg(long, global = true, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Maximum description length in article reports.
    #[arg(long, global = true)]
    article_description_budget: Option<usize>,

    /// Maximum description length in aisle reports.
    #[arg(long, global = true)]
    aisle_description_budget: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report every location holding an article.
    Article { code: String },
    /// Report the contents of an aisle, ordered by height and position.
    Aisle { number: String },
    /// Print the records stored at an exact locator as JSON.
    Locate { locator: String },
    /// Print the description of an article.
    Describe { code: String },
    /// Log the records at a locator as missing or surplus stock.
    Diff {
        locator: String,
        /// FALTANTE (missing) or SOBRANTE (surplus), any case.
        #[arg(long, value_parser = parse_status)]
        status: DifferenceStatus,
    },
}

fn parse_status(raw: &str) -> std::result::Result<DifferenceStatus, String> {
    raw.parse::<DifferenceStatus>().map_err(|error| error.to_string())
}

impl Cli {
    fn session(&self) -> Session {
        let mut report = ReportConfig::default();
        if let Some(budget) = self.article_description_budget {
            report.article_description_budget = budget;
        }
        if let Some(budget) = self.aisle_description_budget {
            report.aisle_description_budget = budget;
        }
        Session::new(self.workbook.clone().unwrap_or_default())
            .with_output_dir(self.output_dir.clone())
            .with_report_config(report)
    }
}
