use std::io;

use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    relayctl::launch().await
}

fn init() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relayctl=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    Ok(())
}
