use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the budget home directory, its data subdirectory and an initial `config.json` file
/// with default settings.
///
/// # Arguments
/// - `budget_home` - The directory that will be the root of data directory, e.g. `$HOME/budget`
///
/// # Errors
/// - Returns an error if the directory has already been initialized.
/// - Returns an error if any file operations fail.
pub async fn init(budget_home: &Path) -> Result<Out<()>> {
    let config = Config::create(budget_home)
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the budget directory at {}",
        config.root().display()
    )
    .into())
}
