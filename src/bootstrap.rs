use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use http::Method;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::{catch_panic_layer, setup_panic_hook},
    migrations,
    routes::{api_routes, crud_routes},
    utils::{init_logger, load_config},
    AppConfig, AppState,
};

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "usercrud")]
#[command(author, version, about = "User records CRUD over HTML forms and a REST API.")]
pub struct CliArgs {
    /// Server bind address (overrides config file)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Server port (overrides config file)
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Environment (development, staging, production)
    #[arg(short = 'E', long, default_value = "development")]
    pub env: String,

    /// Configuration file path
    #[arg(short = 'C', long, default_value = "config.toml")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    pub log_level: String,

    /// Database URL (overrides config file)
    #[arg(short = 'D', long)]
    pub database_url: Option<String>,
}

/// Application bootstrap result containing all initialized components
pub struct BootstrapResult {
    pub app: Router,
    pub bind_addr: String,
}

/// Initialize application logger
pub fn init_logging(log_level: &str) {
    init_logger(log_level);
}

/// Setup panic hook for graceful panic handling
pub fn setup_panic_handler() {
    setup_panic_hook();
}

/// Load configuration and apply CLI overrides
pub fn load_app_config(cli_args: &CliArgs) -> Result<AppConfig> {
    let mut app_config = load_config(&cli_args.config, &cli_args.env)
        .context("Failed to load application configuration")?;

    if let Some(host) = &cli_args.host {
        app_config.server.host = host.clone();
    }
    if let Some(port) = cli_args.port {
        app_config.server.port = port;
    }
    if let Some(database_url) = &cli_args.database_url {
        app_config.database_url = database_url.clone();
    }

    Ok(app_config)
}

/// Pool options derived from configuration
pub fn connect_options(config: &AppConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(config.database.connect_timeout_seconds))
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_seconds))
        .sqlx_logging(config.database.sqlx_logging);
    options
}

/// Initialize database connection
pub async fn init_database(config: &AppConfig) -> Result<DatabaseConnection> {
    tracing::info!("Connecting to database...");
    let db = Database::connect(connect_options(config))
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection established ({:?})", db.get_database_backend());
    Ok(db)
}

/// Run database migrations
pub async fn run_database_migrations(db: &DatabaseConnection) -> Result<()> {
    migrations::run_migrations(db)
        .await
        .context("Failed to run migrations")
}

/// Create shared application state
pub fn create_app_state(db: DatabaseConnection) -> AppState {
    AppState { db }
}

/// Configure CORS layer
pub fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Build application router with all middleware
pub fn build_app_router(state: AppState) -> Router {
    Router::new()
        .merge(crud_routes())
        .merge(api_routes())
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors())
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Bootstrap the entire application
pub async fn bootstrap(cli_args: CliArgs) -> Result<BootstrapResult> {
    tracing::info!("Starting usercrud in {} mode", cli_args.env);

    let app_config = load_app_config(&cli_args)?;
    let bind_addr = format!("{}:{}", app_config.server.host, app_config.server.port);

    let db = init_database(&app_config).await?;
    run_database_migrations(&db).await?;

    let state = create_app_state(db);
    let app = build_app_router(state);

    Ok(BootstrapResult { app, bind_addr })
}

/// Start HTTP server with graceful shutdown
pub async fn start_server(bootstrap_result: BootstrapResult) -> Result<()> {
    let BootstrapResult { app, bind_addr } = bootstrap_result;

    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Server is ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    tracing::info!("Server shutdown completed");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C signal, initiating graceful shutdown"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("Received SIGTERM signal, initiating graceful shutdown");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["usercrud", "--config", "does-not-exist.toml"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_cli_defaults() {
        let cli = CliArgs::parse_from(["usercrud"]);
        assert_eq!(cli.env, "development");
        assert_eq!(cli.config, "config.toml");
        assert_eq!(cli.log_level, "info");
        assert!(cli.host.is_none());
        assert!(cli.database_url.is_none());
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = load_app_config(&args(&[
            "-H",
            "127.0.0.1",
            "-P",
            "5222",
            "-D",
            "sqlite::memory:",
        ]))
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5222);
        assert_eq!(config.database_url, "sqlite::memory:");
    }

    #[test]
    fn test_connect_options_follow_config() {
        let mut config = AppConfig::default();
        config.database.max_connections = 3;
        config.database.min_connections = 1;

        let options = connect_options(&config);
        assert_eq!(options.get_url(), "sqlite://users.db?mode=rwc");
        assert_eq!(options.get_max_connections(), Some(3));
        assert_eq!(options.get_min_connections(), Some(1));
    }
}
