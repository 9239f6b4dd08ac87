use async_trait::async_trait;
use reqwest::Client;

use super::{DeviceDriver, DriverError, RelayStatus};

pub mod protocol;

/// Driver for ESPEasy firmware: status is read from a GPIO pin as JSON,
/// switching goes through named rule events acknowledged with `OK`.
#[derive(Debug)]
pub struct EspEasy {
    client: Client,
    base: String,
    gpio: u8,
}

impl EspEasy {
    pub fn new(client: Client, address: &str, gpio: u8) -> Self {
        EspEasy {
            client,
            base: format!("http://{address}"),
            gpio,
        }
    }

    async fn fetch(&self, url: String) -> Result<String, DriverError> {
        tracing::debug!(%url, "Requesting");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(DriverError::Status(response.status()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl DeviceDriver for EspEasy {
    async fn poll_status(&self) -> Result<RelayStatus, DriverError> {
        let body = self.fetch(protocol::status_url(&self.base, self.gpio)).await?;
        protocol::parse_status(&body)
    }

    async fn set_relay(&self, on: bool) -> Result<(), DriverError> {
        let body = self.fetch(protocol::event_url(&self.base, on)).await?;
        protocol::parse_ack(&body)
    }

    async fn poll_power(&self) -> Result<f64, DriverError> {
        Err(DriverError::PowerUnsupported)
    }

    fn supports_power(&self) -> bool {
        false
    }
}
