use std::process;
use std::sync::Arc;

use invoices_hex::application::invoice_service::InvoiceService;
use invoices_hex::config::Config;
use invoices_hex::inbound::http::{HttpServer, HttpServerConfig};
use invoices_repo::monitor::LoggingObserver;
use invoices_repo::{build_repo, Repo, StoreSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for MONGO_URL / PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    // No listener is bound until the store answers.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("MongoDB connection failed: {e:#}");
            process::exit(1);
        }
    };

    let mut settings = StoreSettings::new(config.mongo_url.clone());
    settings.database = config.mongo_database.clone();
    settings.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    if let Some(collection) = &config.invoices_collection {
        settings.collection = collection.clone();
    }
    let repo: Repo = match build_repo(&settings, Arc::new(LoggingObserver)).await {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!("Error in connecting to MongoDB: {e:#}");
            process::exit(1);
        }
    };
    let service = InvoiceService::new(repo);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
