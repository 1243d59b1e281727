use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use serial_auth::config::Config;
use serial_auth::db::{AppState, create_pool, init_db};
use serial_auth::handlers;

#[derive(Parser, Debug)]
#[command(name = "serial-auth")]
#[command(about = "Issue, list and redeem limited-use serial codes")]
struct Cli {
    /// Path to the JSON config file holding `admin_token`
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Append log output to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&Path>) {
    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .unwrap_or_else(|e| {
                    eprintln!("Cannot open log file {}: {}", path.display(), e);
                    std::process::exit(1);
                });
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "serial_auth=info,tower_http=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(log_file.is_none()),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref());

    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });
    tracing::info!("Configuration loaded successfully");

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }
    tracing::info!("Using database {}", config.database_path);

    let state = AppState {
        db: db_pool,
        admin_token: config.admin_token.clone(),
    };

    // The span gives handler diagnostics request context; the request line
    // itself comes from the logging middleware, so TraceLayer's own events are off.
    let app = handlers::router(state).layer(
        TraceLayer::new_for_http()
            .on_request(())
            .on_response(())
            .on_failure(()),
    );

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
