use async_trait::async_trait;
use reqwest::Client;

use super::{DeviceDriver, DriverError, RelayStatus};

pub mod protocol;

/// Driver for ESPurna firmware: a plain-text relay API authenticated with a
/// static `apikey` query parameter, plus an apparent-power endpoint.
#[derive(Debug)]
pub struct Espurna {
    client: Client,
    base: String,
    api_key: String,
    relay: u8,
}

impl Espurna {
    pub fn new(client: Client, address: &str, api_key: &str, relay: u8) -> Self {
        Espurna {
            client,
            base: format!("http://{address}"),
            api_key: api_key.to_owned(),
            relay,
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
impl DeviceDriver for Espurna {
    async fn poll_status(&self) -> Result<RelayStatus, DriverError> {
        let url = protocol::relay_url(&self.base, self.relay, &self.api_key);
        protocol::parse_status(&self.fetch(url).await?)
    }

    async fn set_relay(&self, on: bool) -> Result<(), DriverError> {
        let url = protocol::relay_write_url(&self.base, self.relay, &self.api_key, on);
        protocol::parse_ack(&self.fetch(url).await?, on)
    }

    async fn poll_power(&self) -> Result<f64, DriverError> {
        let url = protocol::power_url(&self.base, &self.api_key);
        protocol::parse_power(&self.fetch(url).await?)
    }

    fn supports_power(&self) -> bool {
        true
    }
}
