use std::sync::Arc;

use tracing::info;

use filedock::storage::{BlobStore, PublicUrlBlobStore};
use filedock::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("filedock.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load filedock.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = filedock::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        filedock::logging::init_console_only(&config.logging.level);
    }

    info!("Filedock - Multi-tenant file registry");
    info!(
        "Server configured on {}:{}",
        config.web.host, config.web.port
    );

    let db = match Database::open(&config.database.path).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let blob_store: Arc<dyn BlobStore> =
        Arc::new(PublicUrlBlobStore::new(&config.storage.public_base_url));

    let server = WebServer::new(&config.web, db, blob_store).with_sweep(config.sweep.clone());

    if let Err(e) = server.run().await {
        eprintln!("Web server error: {e}");
        std::process::exit(1);
    }
}
