use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::EnvFilter;

// This main function is the entry point when running `cargo run -p web-server`.
// The full CLI (`salesboard serve`) adds file logging and an address flag.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configuration::load_config(Path::new("config.toml"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    web_server::run_server(config, addr).await
}
