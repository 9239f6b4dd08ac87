use std::path::Path;

use eyre::{Context, Result};

use crate::{
    controller::power::PowerReading,
    device::{self, DriverError},
    settings::Settings,
};

pub async fn run(path: &Path) -> Result<()> {
    let settings = Settings::load(path).await?;
    let driver = device::from_settings(&settings)?;

    let reading = match driver.poll_power().await {
        Ok(watts) => PowerReading::from_watts(watts),

        // Unparseable readings fall back to the default display.
        Err(DriverError::UnexpectedPayload(body)) => {
            tracing::warn!("Unparseable power reading: {body:?}");
            PowerReading::default()
        }

        Err(e) => return Err(e).wrap_err("Power poll failed"),
    };

    println!("{reading}");
    Ok(())
}
