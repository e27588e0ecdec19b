//! Wallet CLI
//!
//! Command-line interface for the PLN Wallet API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use wallet_client::WalletClient;
use wallet_types::{Currency, RegisterRequest};

#[derive(Parser)]
#[command(name = "wallet")]
#[command(author, version, about = "PLN Wallet API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Wallet API
    #[arg(long, env = "WALLET_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Bearer token issued by `wallet login`
    #[arg(long, env = "WALLET_API_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and print a bearer token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Show the authenticated user's profile
    Me,
    /// Show the current NBP exchange rates
    Rates,
    /// List the supported currencies
    Currencies,
    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Show the per-currency balance report
    Report,
    /// Add funds in a foreign currency
    Add {
        /// Currency code (e.g. EUR)
        currency: String,
        /// Positive decimal amount
        amount: Decimal,
    },
    /// Subtract funds in a foreign currency
    Sub {
        /// Currency code (e.g. EUR)
        currency: String,
        /// Positive decimal amount
        amount: Decimal,
    },
}

fn parse_currency(s: &str) -> Result<Currency> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Unknown currency: {}. Supported: USD, AUD, CAD, EUR, HUF, CHF, GBP, JPY, CZK, DKK, NOK, SEK, XDR", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = WalletClient::new(&cli.api_url);
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Register {
            first_name,
            last_name,
            email,
            username,
            password,
        } => {
            let response = client
                .register(&RegisterRequest {
                    first_name,
                    last_name,
                    email,
                    username,
                    password,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Login { username, password } => {
            let token = client.login(&username, &password).await?;
            println!("{}", token.access_token);
        }

        Commands::Me => {
            let me = client.me().await?;
            println!("{}", serde_json::to_string_pretty(&me)?);
        }

        Commands::Rates => {
            let rates = client.exchange_rates().await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
        }

        Commands::Currencies => {
            let currencies = client.currencies().await?;
            println!("{}", serde_json::to_string_pretty(&currencies)?);
        }

        Commands::Wallet { action } => match action {
            WalletCommands::Report => match client.wallet_report().await? {
                Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                None => println!("No funds held in any foreign currency."),
            },
            WalletCommands::Add { currency, amount } => {
                let currency = parse_currency(&currency)?;
                let response = client.add(currency, amount).await?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            WalletCommands::Sub { currency, amount } => {
                let currency = parse_currency(&currency)?;
                let response = client.sub(currency, amount).await?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
        },
    }

    Ok(())
}
