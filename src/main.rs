use std::sync::Arc;

use tracing::{error, info};

use filebox::{Config, Database, LocalBlobStore, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = filebox::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        filebox::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> filebox::Result<()> {
    config.validate()?;

    info!("Filebox - file management API");

    let db = Database::open(&config.database.path).await?;
    info!("Database ready (schema version {})", db.schema_version().await?);

    let blob_store = LocalBlobStore::new(config.files.resolved_storage_path())?;

    let server = WebServer::new(&config.server, db, Arc::new(blob_store))?;
    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
    }

    Ok(())
}
