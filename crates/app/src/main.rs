use std::sync::Arc;

use engine::AddressIssuer;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod custody;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "wallet_ledger={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server.as_ref() else {
        tracing::warn!("no server settings found, nothing to run");
        return Ok(());
    };
    tracing::info!("Found server settings...");

    let db = parse_database(&server.database).await?;

    let mut builder = engine::Engine::builder()
        .database(db)
        .production(settings.is_production());
    if let Some(custody) = settings.custody.as_ref() {
        let issuer: Arc<dyn AddressIssuer> = Arc::new(custody::HttpAddressIssuer::new(custody)?);
        builder = builder.address_issuer(issuer);
    } else {
        tracing::warn!("no custody settings, deposit addresses are placeholders");
    }
    let engine = builder.build().await?;

    let bind = server.bind.clone().unwrap_or_else(|| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind, server.port)).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
