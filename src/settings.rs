use std::path::{Path, PathBuf};

use clap::ValueEnum;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use tokio::fs;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_RELAY_INDEX: u8 = 0;
pub const DEFAULT_STATUS_GPIO: u8 = 12;

/// Persisted client settings. Loaded once per invocation and handed to
/// whichever component needs them, never read through a global.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Settings {
    pub address: Option<String>,
    pub api_key: Option<String>,

    #[serde(default)]
    pub variant: DeviceVariant,

    #[serde(default = "default_relay_index")]
    pub relay_index: u8,

    #[serde(default = "default_status_gpio")]
    pub status_gpio: u8,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize, ValueEnum, strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[clap(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceVariant {
    /// ESPEasy firmware: JSON status, `event,TurnOn`/`TurnOff` commands.
    #[default]
    EspEasy,
    /// ESPurna firmware: plain-text relay API with an `apikey` parameter.
    Espurna,
}

impl Settings {
    /// Reads settings from `path`. A missing file yields the defaults so
    /// that a first run can redirect the user to `settings set`.
    pub async fn load(path: &Path) -> Result<Settings> {
        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(e) => return Err(e).wrap_err_with(|| format!("Failed to read {}", path.display())),
        };

        serde_yaml::from_slice(&data)
            .wrap_err_with(|| format!("Failed to parse settings file {}", path.display()))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }

        let data = serde_yaml::to_string(self).wrap_err("Failed to serialise settings")?;

        fs::write(path, data)
            .await
            .wrap_err_with(|| format!("Failed to write {}", path.display()))
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn set_address(&mut self, address: Option<String>) {
        self.address = address;
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key;
    }
}

pub fn default_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").ok_or_else(|| eyre!("Cannot determine home directory"))?;

    Ok(PathBuf::from(home)
        .join(".config")
        .join("relayctl")
        .join("settings.yaml"))
}

const fn default_relay_index() -> u8 {
    DEFAULT_RELAY_INDEX
}

const fn default_status_gpio() -> u8 {
    DEFAULT_STATUS_GPIO
}

const fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.address(), None);
        assert_eq!(settings.api_key(), None);
        assert_eq!(settings.variant, DeviceVariant::EspEasy);
    }

    /// Older settings files carry only the two original string keys.
    #[test]
    fn test_parse_minimal_file() {
        let settings: Settings = serde_yaml::from_str("address: 192.168.1.40\n").unwrap();

        assert_eq!(settings.address(), Some("192.168.1.40"));
        assert_eq!(settings.api_key(), None);
        assert_eq!(settings.relay_index, DEFAULT_RELAY_INDEX);
        assert_eq!(settings.status_gpio, DEFAULT_STATUS_GPIO);
        assert_eq!(settings.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_yaml_round_trip() {
        let settings = Settings {
            address: Some("10.0.0.7".to_owned()),
            api_key: Some("C0FFEE".to_owned()),
            variant: DeviceVariant::Espurna,
            relay_index: 1,
            status_gpio: 14,
            poll_interval_secs: 5,
        };

        let yaml = serde_yaml::to_string(&settings).unwrap();
        let parsed: Settings = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed, settings);
    }

    #[tokio::test]
    async fn test_load_and_save_through_file() {
        let dir = std::env::temp_dir().join(format!("relayctl-settings-{}", std::process::id()));

        // The parent directories do not exist yet either; save must create them.
        let path = dir.join("config").join("settings.yaml");

        let loaded = Settings::load(&path).await.unwrap();
        assert_eq!(loaded, Settings::default());

        let settings = Settings {
            address: Some("192.168.1.40".to_owned()),
            api_key: Some("C0FFEE".to_owned()),
            ..Default::default()
        };

        settings.save(&path).await.unwrap();

        let reloaded = Settings::load(&path).await.unwrap();
        assert_eq!(reloaded, settings);

        let _ = fs::remove_dir_all(&dir).await;
    }
}
