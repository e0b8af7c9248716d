use clap::Parser;
use tracing_subscriber::EnvFilter;

use employee_directory_api::config::{self, CredentialStoreKind, EmployeeStoreKind};
use employee_directory_api::{app, AppState};

#[derive(Parser)]
#[command(name = "employee-directory-api")]
#[command(about = "Employee directory REST API with HTTP Basic authentication")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Interface to bind (overrides SERVER_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, value_enum, help = "Employee store backend (overrides EMPLOYEE_STORE)")]
    employee_store: Option<EmployeeStoreKind>,

    #[arg(long, value_enum, help = "Credential store backend (overrides CREDENTIAL_STORE)")]
    credential_store: Option<CredentialStoreKind>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = config::config().clone();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(kind) = cli.employee_store {
        config.storage.employee_store = kind;
    }
    if let Some(kind) = cli.credential_store {
        config.security.credential_store = kind;
    }
    tracing::info!("Starting Employee Directory API in {:?} mode", config.environment);

    let state = AppState::from_config(&config).await?;
    let database = state.database.clone();

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
