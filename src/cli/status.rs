use std::path::Path;

use eyre::{Context, Result};

use crate::{device, settings::Settings};

pub async fn run(path: &Path) -> Result<()> {
    let settings = Settings::load(path).await?;
    let driver = device::from_settings(&settings)?;

    let status = driver
        .poll_status()
        .await
        .wrap_err("Status poll failed")?;

    println!("{status}");
    Ok(())
}
