//! # mercado-server: HTTP API for Mercado POS
//!
//! The JSON boundary the store clients talk to. Handlers are thin: decode
//! the wire DTO, call a `mercado-db` repository, encode the result or an
//! [`ApiError`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercado Server                                   │
//! │                                                                         │
//! │  Cashier / back office ───► HTTP (3000) ───► Router                     │
//! │                                                │                        │
//! │                                   TraceLayer ─ CorsLayer                │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                           handlers::{product, inventory, sale, ...}     │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                     mercado-db (SQLite)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Routes
//!
//! | Method & path               | Handler                         |
//! |-----------------------------|---------------------------------|
//! | GET/POST `/produtos`        | list (optional `?codigos=`), create |
//! | GET/PUT/DELETE `/produtos/{codigo}` | get, update, delete     |
//! | POST `/conferir-inventario` | stock diff                      |
//! | POST `/ajustar-inventario`  | reconcile to physical counts    |
//! | POST `/ajustar-estoque`     | atomic decrement batch          |
//! | GET/POST `/vendas`          | sales in range, record sale     |
//! | GET `/vendas/{id}`          | one sale with lines             |
//! | GET/POST `/bloquear-vendas` | sales-lock flag                 |
//! | GET `/lucro-vendas`         | profit summary                  |
//! | GET `/total-estoque`        | inventory value                 |
//! | GET/POST `/usuarios`, DELETE `/usuarios/{id}` | users         |
//! | POST `/login`               | credential check                |
//! | GET `/health`               | liveness + database ping        |

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the application router with its middleware.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route(
            "/produtos",
            get(handlers::product::list).post(handlers::product::create),
        )
        .route(
            "/produtos/{codigo}",
            get(handlers::product::get)
                .put(handlers::product::update)
                .delete(handlers::product::delete),
        )
        .route("/conferir-inventario", post(handlers::inventory::diff))
        .route("/ajustar-inventario", post(handlers::inventory::reconcile))
        .route("/ajustar-estoque", post(handlers::inventory::decrement))
        .route(
            "/vendas",
            get(handlers::sale::list).post(handlers::sale::record),
        )
        .route("/vendas/{id}", get(handlers::sale::get))
        .route(
            "/bloquear-vendas",
            get(handlers::sales_lock::get).post(handlers::sales_lock::set),
        )
        .route("/lucro-vendas", get(handlers::report::profit_summary))
        .route("/total-estoque", get(handlers::report::inventory_value))
        .route(
            "/usuarios",
            get(handlers::user::list).post(handlers::user::create),
        )
        .route("/usuarios/{id}", axum::routing::delete(handlers::user::delete))
        .route("/login", post(handlers::user::login))
        .route("/health", get(handlers::health::health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(cors_origins))
}

/// CORS: any origin unless a list is configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mercado_db=trace` - Trace the database layer only
/// - Default: `info,mercado=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mercado=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Binds the listener and serves until a shutdown signal arrives.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let app = router(state.clone(), &config.cors_origins);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Mercado server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
