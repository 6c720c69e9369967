use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{EditInput, LedgerService};
use crate::domain::{format_cents, Kind, Transaction, TransactionId};
use crate::gateway::{RateGateway, BASE_CURRENCY, DEFAULT_CODES};
use crate::storage::LedgerStore;

/// Saldo - income/expense tracker
#[derive(Parser)]
#[command(name = "saldo")]
#[command(about = "A local-first income/expense tracker with an exchange-rate ticker")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "saldo.db")]
    pub database: String,

    /// Use a JSON snapshot file instead of the SQLite database
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ledger
    Init,

    /// Record a new transaction
    Add {
        /// Description of the transaction
        description: String,

        /// Amount (e.g., "12.50" or "12")
        amount: String,

        /// Transaction kind: income or expense
        kind: String,
    },

    /// Edit an existing transaction (only the supplied fields change)
    Edit {
        /// Transaction ID
        id: String,

        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// New amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New kind: income or expense
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Delete a transaction
    Remove {
        /// Transaction ID
        id: String,
    },

    /// List transactions, most recent first
    History {
        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the current balance
    Balance,

    /// Show the cumulative income/expense series
    Chart,

    /// Show exchange rates and the balance converted into each currency
    Rates {
        /// Currency codes to quote (defaults to USD EUR GBP BTC)
        #[arg(long)]
        codes: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Some(path) = &self.snapshot {
            if matches!(self.command, Commands::Init) {
                LedgerService::open_snapshot(path)?;
                println!("Initialized ledger snapshot at {}", path);
                return Ok(());
            }
            let service = LedgerService::open_snapshot(path)?;
            return run_command(&service, self.command).await;
        }

        if matches!(self.command, Commands::Init) {
            LedgerService::init(&self.database).await?;
            println!("Initialized ledger database at {}", self.database);
            return Ok(());
        }

        let service = LedgerService::connect(&self.database)
            .await
            .with_context(|| format!("Failed to open database {}", self.database))?;
        run_command(&service, self.command).await
    }
}

async fn run_command<S: LedgerStore>(
    service: &LedgerService<S>,
    command: Commands,
) -> Result<()> {
    match command {
        // Handled in Cli::run before the service is built
        Commands::Init => Ok(()),

        Commands::Add {
            description,
            amount,
            kind,
        } => {
            let tx = service.record(&description, &amount, &kind).await?;
            println!(
                "Recorded {} of {}: \"{}\" ({})",
                tx.kind,
                format_cents(tx.amount_cents),
                tx.description,
                tx.id
            );
            Ok(())
        }

        Commands::Edit {
            id,
            description,
            amount,
            kind,
        } => {
            let id = parse_id(&id)?;
            let tx = service
                .update(
                    id,
                    EditInput {
                        description: description.as_deref(),
                        amount_text: amount.as_deref(),
                        kind_text: kind.as_deref(),
                    },
                )
                .await?;
            println!(
                "Updated {}: \"{}\" {} {}",
                tx.id,
                tx.description,
                tx.kind,
                format_cents(tx.amount_cents)
            );
            Ok(())
        }

        Commands::Remove { id } => {
            let id = parse_id(&id)?;
            service.remove(id).await?;
            println!("Removed transaction {}", id);
            Ok(())
        }

        Commands::History { limit } => {
            let transactions = service.history().await?;
            if transactions.is_empty() {
                println!("No transactions recorded yet.");
                return Ok(());
            }

            let shown = limit.unwrap_or(transactions.len());
            for tx in transactions.iter().take(shown) {
                println!("{}", format_history_line(tx));
            }
            Ok(())
        }

        Commands::Balance => {
            let balance = service.balance().await?;
            println!("Balance: {}", format_cents(balance));
            Ok(())
        }

        Commands::Chart => {
            let series = service.series().await?;
            if series.labels.is_empty() {
                println!("Not enough data to build the series.");
                return Ok(());
            }

            println!("{:<6} {:>12} {:>12}", "", "income", "expense");
            for ((label, income), expense) in series
                .labels
                .iter()
                .zip(&series.income)
                .zip(&series.expense)
            {
                println!(
                    "{:<6} {:>12} {:>12}",
                    label,
                    format_cents(*income),
                    format_cents(*expense)
                );
            }
            Ok(())
        }

        Commands::Rates { codes } => {
            let balance = service.balance().await?;
            let codes: Vec<&str> = if codes.is_empty() {
                DEFAULT_CODES.to_vec()
            } else {
                codes.iter().map(String::as_str).collect()
            };

            let gateway = RateGateway::new();
            let table = gateway.fetch_rates(&codes).await?;

            println!("Rates against {}:", BASE_CURRENCY);
            for code in &codes {
                match table.get(code) {
                    Some(rate) => {
                        let converted = balance as f64 / 100.0 / rate;
                        println!(
                            "  {:<4} {:>12.2}   balance = {:.2} {}",
                            code, rate, converted, code
                        );
                    }
                    None => println!("  {:<4} {:>12}", code, "unavailable"),
                }
            }
            Ok(())
        }
    }
}

fn parse_id(id: &str) -> Result<TransactionId> {
    Uuid::parse_str(id).with_context(|| format!("Invalid transaction id: {}", id))
}

fn format_history_line(tx: &Transaction) -> String {
    let sign = match tx.kind {
        Kind::Income => '+',
        Kind::Expense => '-',
    };
    format!(
        "{}  {}{:>10}  {:<7}  {}  ({})",
        tx.timestamp.format("%Y-%m-%d"),
        sign,
        format_cents(tx.amount_cents),
        tx.kind,
        tx.description,
        tx.id
    )
}
