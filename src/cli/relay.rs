use std::path::Path;

use eyre::{Context, Result};

use crate::{
    device::{self, RelayStatus},
    settings::Settings,
};

pub async fn switch(path: &Path, on: bool) -> Result<()> {
    let settings = Settings::load(path).await?;
    let driver = device::from_settings(&settings)?;

    driver
        .set_relay(on)
        .await
        .wrap_err("Relay command failed")?;

    println!("{}", RelayStatus::from_bool(on));
    Ok(())
}

/// A one-shot invocation has no prior state to toggle from, so learn the
/// current relay position first and command the opposite.
pub async fn toggle(path: &Path) -> Result<()> {
    let settings = Settings::load(path).await?;
    let driver = device::from_settings(&settings)?;

    let status = driver
        .poll_status()
        .await
        .wrap_err("Status poll failed")?;

    let target = !status.is_on();

    driver
        .set_relay(target)
        .await
        .wrap_err("Relay command failed")?;

    println!("{}", RelayStatus::from_bool(target));
    Ok(())
}
