use std::{fmt, time::Duration};

use async_trait::async_trait;
use eyre::{Result, eyre};
use thiserror::Error;

use crate::settings::{DeviceVariant, Settings};

pub mod esp_easy;
pub mod espurna;

pub use esp_easy::EspEasy;
pub use espurna::Espurna;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The settled relay position as reported by the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RelayStatus {
    On,
    Off,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("device returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("unexpected payload: {0:?}")]
    UnexpectedPayload(String),

    #[error("device variant does not report power")]
    PowerUnsupported,
}

/// One firmware dialect of the relay device. Both observed dialects expose
/// the same three capabilities behind different wire formats, so the
/// controller only ever talks to this trait.
#[async_trait]
pub trait DeviceDriver: Send + Sync + fmt::Debug {
    /// Fetches the current relay position.
    async fn poll_status(&self) -> Result<RelayStatus, DriverError>;

    /// Commands the relay on or off. The device must acknowledge with its
    /// exact success marker; anything else is an error.
    async fn set_relay(&self, on: bool) -> Result<(), DriverError>;

    /// Fetches the apparent power draw in watts.
    async fn poll_power(&self) -> Result<f64, DriverError>;

    fn supports_power(&self) -> bool;
}

/// Builds the configured driver, or fails with a pointer to `settings set`
/// when no device address has been persisted yet.
pub fn from_settings(settings: &Settings) -> Result<Box<dyn DeviceDriver>> {
    let address = settings
        .address()
        .ok_or_else(|| eyre!("No device address configured (run `relayctl settings set --address <host>`)"))?;

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    Ok(match settings.variant {
        DeviceVariant::EspEasy => Box::new(EspEasy::new(client, address, settings.status_gpio)),

        DeviceVariant::Espurna => Box::new(Espurna::new(
            client,
            address,
            settings.api_key().unwrap_or_default(),
            settings.relay_index,
        )),
    })
}

impl RelayStatus {
    pub fn is_on(self) -> bool {
        matches!(self, RelayStatus::On)
    }

    pub fn from_bool(on: bool) -> Self {
        match on {
            true => RelayStatus::On,
            false => RelayStatus::Off,
        }
    }
}

impl fmt::Display for RelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayStatus::On => write!(f, "on"),
            RelayStatus::Off => write!(f, "off"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_address_is_rejected() {
        let err = from_settings(&Settings::default()).unwrap_err();

        assert!(err.to_string().contains("settings set"));
    }

    #[test]
    fn test_variant_selection() {
        let esp_easy = Settings {
            address: Some("10.0.0.7".to_owned()),
            ..Default::default()
        };

        let espurna = Settings {
            variant: DeviceVariant::Espurna,
            ..esp_easy.clone()
        };

        assert!(!from_settings(&esp_easy).unwrap().supports_power());
        assert!(from_settings(&espurna).unwrap().supports_power());
    }
}
