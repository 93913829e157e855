//! # Mercado POS Server
//!
//! Loads configuration from the environment, opens (and migrates) the
//! SQLite database, then serves the HTTP API until Ctrl+C or SIGTERM.
//!
//! ```bash
//! MERCADO_DB_PATH=./loja.db MERCADO_BIND_ADDR=127.0.0.1:3000 mercado-server
//! ```

use std::process::ExitCode;

use mercado_db::Database;
use mercado_server::{init_tracing, serve, AppState, ServerConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    info!("Starting Mercado POS server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        addr = %config.bind_addr,
        db_path = %config.db_path,
        max_connections = config.db_max_connections,
        "Configuration loaded"
    );

    let db = match Database::new(config.db_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to open database");
            return ExitCode::FAILURE;
        }
    };
    info!("Database ready");

    if let Err(e) = serve(&config, AppState::new(db)).await {
        error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
