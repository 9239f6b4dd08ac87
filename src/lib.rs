use eyre::Result;

pub mod cli;
pub mod controller;
pub mod device;
pub mod settings;

pub async fn launch() -> Result<()> {
    cli::run().await
}
