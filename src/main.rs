use bankcore::application::bank::Bank;
use bankcore::config::BankConfig;
use bankcore::domain::ports::Stores;
use bankcore::infrastructure::in_memory::in_memory_stores;
use bankcore::interfaces::batch;
use bankcore::interfaces::csv::command_reader::CommandReader;
use bankcore::interfaces::csv::report_writer::ReportWriter;
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Report {
    Accounts,
    Transactions,
    Loans,
    Cards,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Which end-of-run report to write to stdout
    #[arg(long, value_enum, default_value_t = Report::Accounts)]
    report: Report,

    /// Credit the approved amount to the loan's account on approval
    #[arg(long)]
    credit_on_approval: bool,
}

fn open_stores(db_path: Option<PathBuf>) -> Result<Stores> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(path) = db_path {
        let store = bankcore::infrastructure::rocksdb::RocksDBStore::open(path).into_diagnostic()?;
        return Ok(store.stores());
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    Ok(in_memory_stores())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BankConfig {
        credit_on_approval: cli.credit_on_approval,
    };
    let bank = Bank::new(open_stores(cli.db_path)?, config);

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = batch::apply(&bank, command).await {
                    warn!(error = %e, "Error processing command");
                }
            }
            Err(e) => {
                warn!(error = %e, "Error reading command");
            }
        }
    }

    // Counting scans every record; only pay for it when someone listens.
    if tracing::enabled!(Level::INFO) {
        let failed = bank.ledger().failed_count().await.into_diagnostic()?;
        info!(failed, "Batch finished");
    }

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    match cli.report {
        Report::Accounts => {
            let accounts = bank.accounts().list_accounts().await.into_diagnostic()?;
            writer.write_accounts(&accounts).into_diagnostic()?;
        }
        Report::Transactions => {
            let transactions = bank.ledger().list_transactions().await.into_diagnostic()?;
            writer.write_transactions(&transactions).into_diagnostic()?;
        }
        Report::Loans => {
            let loans = bank.loans().list_loans().await.into_diagnostic()?;
            writer.write_loans(&loans).into_diagnostic()?;
        }
        Report::Cards => {
            let cards = bank.cards().list_cards().await.into_diagnostic()?;
            writer.write_cards(&cards).into_diagnostic()?;
        }
    }

    Ok(())
}
