use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tbank_checkout::services::processor_client::http_client;
use tbank_checkout::services::TelegramNotifier;
use tbank_checkout::{Config, Customer, FileSettingsStore, Notifier, TBankClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tbank", about = "T-Bank payments for the subscription bot")]
struct Cli {
    /// TOML config file; environment variables are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a hosted payment page
    Create {
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        description: String,
        #[arg(long)]
        user_id: Option<i64>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        tariff: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Ask the processor whether a payment is confirmed
    Check {
        #[arg(long)]
        payment_id: String,
        /// Notify the admin chat through the Telegram bot on confirmation
        #[arg(long)]
        notify: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::from_env(),
    };
    info!("Using settings from {}", config.settings_path.display());

    let settings = Arc::new(FileSettingsStore::new(config.settings_path.clone()));
    let client = TBankClient::from_config(&config, settings)?;

    match cli.command {
        Command::Create {
            amount,
            description,
            user_id,
            username,
            tariff,
            email,
        } => {
            let customer = Customer {
                email,
                user_id,
                tariff_name: tariff,
                username,
            };
            let session = client
                .create_payment(amount, &description, &customer)
                .await
                .context("payment was not created")?;
            println!("{}\t{}", session.payment_id, session.payment_url);
        }
        Command::Check { payment_id, notify } => {
            let telegram = match (&config.bot_token, notify) {
                (Some(token), true) => Some(TelegramNotifier::new(
                    http_client(config.request_timeout_ms)?,
                    config.telegram_api_url.clone(),
                    token.clone(),
                )),
                _ => None,
            };
            let notifier = telegram.as_ref().map(|t| t as &dyn Notifier);

            let confirmed = client.check_payment(&payment_id, notifier).await;
            println!("{}", if confirmed { "CONFIRMED" } else { "NOT CONFIRMED" });
            if !confirmed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
