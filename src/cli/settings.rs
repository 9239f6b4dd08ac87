use std::path::Path;

use clap::{Args, Subcommand};
use eyre::Result;

use crate::settings::{DeviceVariant, Settings};

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the persisted settings
    Show,

    /// Update and persist settings; omitted fields keep their value
    Set(SetOpts),

    /// Reset all settings to their defaults
    Clear,
}

#[derive(Args)]
pub struct SetOpts {
    /// Device host name or IP address
    #[arg(short, long)]
    address: Option<String>,

    /// API key (ESPurna devices)
    #[arg(short, long)]
    key: Option<String>,

    /// Device firmware dialect
    #[arg(short, long)]
    variant: Option<DeviceVariant>,

    /// Relay index on the device (ESPurna devices)
    #[arg(short, long)]
    relay: Option<u8>,

    /// GPIO pin of the relay (ESPEasy devices)
    #[arg(short, long)]
    gpio: Option<u8>,

    /// Re-poll interval for watch mode, in seconds
    #[arg(short, long)]
    interval: Option<u64>,
}

pub async fn run(path: &Path, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => show(path).await,
        SettingsCommand::Set(opts) => set(path, opts).await,
        SettingsCommand::Clear => clear(path).await,
    }
}

async fn show(path: &Path) -> Result<()> {
    let settings = Settings::load(path).await?;

    println!("address   {}", settings.address().unwrap_or("(not set)"));
    println!("api key   {}", settings.api_key().unwrap_or("(not set)"));
    println!("variant   {}", settings.variant);
    println!("relay     {}", settings.relay_index);
    println!("gpio      {}", settings.status_gpio);
    println!("interval  {} s", settings.poll_interval_secs);

    Ok(())
}

async fn set(path: &Path, opts: SetOpts) -> Result<()> {
    let mut settings = Settings::load(path).await?;

    if let Some(address) = opts.address {
        settings.set_address(Some(address));
    }

    if let Some(key) = opts.key {
        settings.set_api_key(Some(key));
    }

    if let Some(variant) = opts.variant {
        settings.variant = variant;
    }

    if let Some(relay) = opts.relay {
        settings.relay_index = relay;
    }

    if let Some(gpio) = opts.gpio {
        settings.status_gpio = gpio;
    }

    if let Some(interval) = opts.interval {
        settings.poll_interval_secs = interval;
    }

    settings.save(path).await?;

    tracing::info!("Settings saved to {}", path.display());
    Ok(())
}

async fn clear(path: &Path) -> Result<()> {
    Settings::default().save(path).await?;

    tracing::info!("Settings cleared");
    Ok(())
}
