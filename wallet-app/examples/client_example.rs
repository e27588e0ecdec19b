//! Client example demonstrating a full wallet flow against a running server.
//!
//! Run with: cargo run -p wallet-app --example client_example --no-default-features --features sqlite
//!
//! Uses an in-memory rate store and the live NBP feed, so it needs network
//! access to api.nbp.pl.

use std::net::SocketAddr;

use tempfile::tempdir;
use tokio::net::TcpListener;

use wallet_client::WalletClient;
use wallet_hex::{WalletService, inbound::HttpServer};
use wallet_rates::{InMemoryRateStore, NbpRateSource, RateCacheManager};
use wallet_repo::build_repo;
use wallet_types::{Currency, RegisterRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("wallet.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on port {port}...");
    println!("   Database: {db_url}");

    // Build repository (handles connection and migration)
    let repo = build_repo(&db_url).await?;

    // Rate provider: live NBP feed behind an in-memory day cache
    let rates = RateCacheManager::new(
        InMemoryRateStore::new(),
        NbpRateSource::default(),
        "support@plnwallet.example",
    );

    // Start server in background
    let service = WalletService::new(repo, rates);
    let server = HttpServer::new(service);
    let router = server.router();

    let server_addr = format!("127.0.0.1:{port}");
    tokio::spawn(async move {
        axum::serve(
            TcpListener::bind(&server_addr).await.unwrap(),
            router.into_make_service(),
        )
        .await
        .unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // Create client
    let base_url = format!("http://127.0.0.1:{port}");
    let client = WalletClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: Full wallet flow
    // ─────────────────────────────────────────────────────────────────────────

    // Health check
    let health = client.health().await?;
    println!("✅ Server health: {health}");

    // Protected endpoints reject anonymous callers
    let response = client.me().await;
    assert!(response.is_err());
    println!("✅ Unauthorized without token: {}", response.unwrap_err());

    // Register and log in
    let registered = client
        .register(&RegisterRequest {
            first_name: "Jan".into(),
            last_name: "Kowalski".into(),
            email: "jan.kowalski@example.com".into(),
            username: "jank".into(),
            password: "correct-horse".into(),
        })
        .await?;
    println!("✅ Registered user: {}", registered.username);

    let token = client.login("jank", "correct-horse").await?;
    println!("✅ Logged in, token issued");

    let client = client.with_token(token.access_token);

    // Current NBP rates (first call fetches and caches the daily table)
    let rates = client.exchange_rates().await?;
    println!(
        "✅ Got {} exchange rates effective {}",
        rates.exchange_rates.len(),
        rates.effective_date
    );

    // Fund the wallet
    let update = client.add(Currency::EUR, "100".parse()?).await?;
    println!(
        "✅ Added 100 EUR (≈ {} PLN), total {} PLN",
        update.wallet_report[0]
            .value_pln
            .map(|v| v.to_string())
            .unwrap_or_else(|| "N/A".into()),
        update.total_in_pln
    );

    let update = client.add(Currency::USD, "25.50".parse()?).await?;
    println!("✅ Added 25.50 USD, total {} PLN", update.total_in_pln);

    // Spend some of it
    let update = client.sub(Currency::EUR, "40".parse()?).await?;
    println!(
        "✅ Subtracted 40 EUR, {} EUR left, total {} PLN",
        update.wallet_report[0].amount, update.total_in_pln
    );

    // Full report
    if let Some(report) = client.wallet_report().await? {
        println!("\n📋 Wallet report (rates of {}):", report.effective_date);
        for line in &report.wallet_report {
            println!("   - {}: {} PLN", line.currency, line.value_pln);
        }
        println!("   Total: {} PLN", report.total_pln);
    }

    // Profile with PLN total
    let me = client.me().await?;
    println!("\n👤 {} {} holds {} PLN", me.first_name, me.last_name, me.balance_in_pln);

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
