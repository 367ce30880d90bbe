//! `ferry config`

use anyhow::{Context, Result};
use mail::{GraphCredentials, TransferSettings};

use crate::cli::ConfigArgs;

pub fn execute(args: ConfigArgs) -> Result<()> {
    let settings = TransferSettings::load()?;

    match TransferSettings::settings_path() {
        Some(path) if path.exists() => println!("Settings file: {}", path.display()),
        Some(path) => println!("Settings file: {} (not found, using defaults)", path.display()),
        None => println!("Settings file: unavailable (no config directory)"),
    }
    if let Some(path) = GraphCredentials::default_credentials_path() {
        let state = if GraphCredentials::is_available() {
            "configured"
        } else {
            "missing"
        };
        println!("Credentials:   {} ({})", path.display(), state);
    }
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&settings).context("Failed to serialize settings")?
    );

    if args.save {
        let path = settings.save()?;
        println!("\nSaved to {}", path.display());
    }
    Ok(())
}
