//! Shared application state.

use mercado_db::Database;

/// State handed to every handler. Cloning is cheap: the database handle
/// wraps a connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
