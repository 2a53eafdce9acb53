use clap::Parser;
use gateway::config::Config;
use gateway::deploy::bootstrap;
use gateway::router::create_router;
use gateway::state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    tracing::info!(
        abi = contracts::CONTRACT_ABI_VERSION,
        types = types::LIB_VERSION,
        "Starting Gateway API service"
    );

    let deployment = bootstrap(&config.deploy()?)?;
    let state = AppState::new(deployment.exchange, config.rate_limit());

    let app = create_router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
