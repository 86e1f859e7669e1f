use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paysafecard::config::MerchantConfig;
use paysafecard::{Environment, TransactionClient};
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Merchant configuration file (TOML)
    #[arg(long, short)]
    config: PathBuf,

    /// Overrides the configured environment. Only `production` selects the
    /// live service.
    #[arg(long, env = "PAYSAFECARD_ENV")]
    environment: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a disposition and print the payment panel URL
    Authorize {
        #[arg(long)]
        mtid: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: Option<String>,
        /// Do not keep the returned mid
        #[arg(long)]
        no_set_mid: bool,
    },
    /// Debit a previously created disposition
    Capture {
        #[arg(long)]
        mtid: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: Option<String>,
        /// Leave the disposition open for further debits
        #[arg(long)]
        keep_open: bool,
    },
    /// Print the serial numbers of a transaction as JSON
    Status {
        #[arg(long)]
        mtid: String,
        #[arg(long)]
        currency: Option<String>,
    },
    /// Build the payment panel URL without contacting the service
    PanelUrl {
        #[arg(long)]
        mtid: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        mid: String,
        #[arg(long)]
        currency: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries results only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = MerchantConfig::from_path(&cli.config).into_diagnostic()?;
    if let Some(name) = cli.environment {
        config.environment = name.parse::<Environment>().unwrap_or_default();
    }

    let transport = config.transport().into_diagnostic()?;
    let mut tx = TransactionClient::from_config(&config, Box::new(transport));

    match cli.command {
        Command::Authorize {
            mtid,
            amount,
            currency,
            no_set_mid,
        } => {
            tx.transaction_id = Some(mtid);
            tx.amount = Some(amount);
            if currency.is_some() {
                tx.currency = currency;
            }
            tx.authorize(!no_set_mid).await.into_diagnostic()?;
            if let Some(mid) = &tx.mid {
                println!("mid: {mid}");
                println!("{}", tx.payment_panel_url().into_diagnostic()?);
            }
        }
        Command::Capture {
            mtid,
            amount,
            currency,
            keep_open,
        } => {
            tx.transaction_id = Some(mtid);
            tx.amount = Some(amount);
            if currency.is_some() {
                tx.currency = currency;
            }
            tx.capture(!keep_open).await.into_diagnostic()?;
            println!("captured");
        }
        Command::Status { mtid, currency } => {
            tx.transaction_id = Some(mtid);
            if currency.is_some() {
                tx.currency = currency;
            }
            let status = tx.status().await.into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&status).into_diagnostic()?
            );
        }
        Command::PanelUrl {
            mtid,
            amount,
            mid,
            currency,
        } => {
            tx.transaction_id = Some(mtid);
            tx.amount = Some(amount);
            tx.mid = Some(mid);
            if currency.is_some() {
                tx.currency = currency;
            }
            println!("{}", tx.payment_panel_url().into_diagnostic()?);
        }
    }

    Ok(())
}
