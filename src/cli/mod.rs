use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

mod power;
mod relay;
mod settings;
mod status;
mod watch;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Poll the relay and print its state
    Status,

    /// Switch the relay on
    On,

    /// Switch the relay off
    Off,

    /// Poll the relay, then command the opposite state
    Toggle,

    /// Print the apparent power draw
    Power,

    /// Interactive view with periodic re-polling
    Watch,

    /// Show or edit the persisted device settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let path = match cli.settings {
        Some(path) => path,
        None => crate::settings::default_path()?,
    };

    match cli.command {
        Command::Status => self::status::run(&path).await,
        Command::On => self::relay::switch(&path, true).await,
        Command::Off => self::relay::switch(&path, false).await,
        Command::Toggle => self::relay::toggle(&path).await,
        Command::Power => self::power::run(&path).await,
        Command::Watch => self::watch::run(&path).await,
        Command::Settings(command) => self::settings::run(&path, command).await,
    }
}
