use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use vault_watch::config::VaultConfig;
use vault_watch::engine::{
    Amount, Clock, CsvLedger, Ledger, ProjectionRecord, Session, SystemClock, WriterSink,
    max_deposit, project, short_account, validate_deposit,
};

#[derive(Parser, Debug)]
#[command(name = "vault_watch", version, about = "Projects unlocked and withdrawable vault balances")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project every account of a ledger export and write CSV to stdout
    Project {
        ledger: PathBuf,
        /// Unix timestamp to project at (default: now)
        #[arg(long)]
        at: Option<i64>,
    },
    /// Follow one account, refreshing from the ledger export until Ctrl-C
    Watch { ledger: PathBuf, account: String },
    /// Show the max deposit for a wallet balance and check a requested amount
    DepositCheck {
        #[arg(long)]
        balance: String,
        #[arg(long)]
        amount: Option<String>,
    },
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).env().init()?;

    log::debug!("Application started");
    let cli = Cli::parse();
    let config = VaultConfig::from_env().context("invalid configuration")?;

    match cli.command {
        Command::Project { ledger, at } => project_ledger(&ledger, at, &config)?,
        Command::Watch { ledger, account } => watch_account(ledger, &account, config)?,
        Command::DepositCheck { balance, amount } => deposit_check(&balance, amount.as_deref())?,
    }

    log::debug!("Application finished");

    Ok(())
}

fn project_ledger(path: &Path, at: Option<i64>, config: &VaultConfig) -> Result<()> {
    let ledger = Ledger::from_path(path)?;
    let now = at.unwrap_or_else(|| SystemClock.now());
    log::debug!("Projecting {} accounts at {now}", ledger.len());

    let mut records: Vec<ProjectionRecord> = ledger
        .accounts()
        .map(|(account, snapshot)| {
            ProjectionRecord::new(account, &project(snapshot, now, &config.schedule))
        })
        .collect();
    records.sort();

    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for record in records {
        log::debug!("Serialising projection: {record:?}");
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    Ok(())
}

fn watch_account(path: PathBuf, account: &str, config: VaultConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("cannot start runtime")?;
    let source = Arc::new(CsvLedger::new(path, account));

    runtime.block_on(async {
        log::info!("Watching {}", short_account(source.account()));
        let mut session = Session::new(
            config.schedule,
            config.tick,
            Arc::new(SystemClock),
            Arc::new(WriterSink::new(std::io::stdout())),
        );
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("Cannot listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        };
        session
            .watch(Arc::clone(&source), config.refresh, shutdown)
            .await;
        log::info!("Stopped watching {}", short_account(source.account()));
    });

    Ok(())
}

fn deposit_check(balance: &str, amount: Option<&str>) -> Result<()> {
    let balance = Amount::from_str(balance).context("invalid balance")?;
    println!("max_deposit={}", max_deposit(&balance));

    if let Some(amount) = amount {
        let accepted = validate_deposit(amount, &balance)?;
        println!("deposit={accepted} ok");
    }

    Ok(())
}
