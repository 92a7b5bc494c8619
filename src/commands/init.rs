use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its `.secrets` subdirectory and an initial `config.json` that
/// points at the budget server.
///
/// # Arguments
/// - `budget_home` - The directory that will be the root of data directory, e.g. `$HOME/budget`
/// - `api_url` - The base URL of the budget server, e.g. `http://localhost:3000/api`
///
/// # Errors
/// - Returns an error if the URL is invalid or if any file operations fail.
pub async fn init(budget_home: &Path, api_url: &str) -> Result<Out<()>> {
    let config = Config::create(budget_home, api_url)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the budget directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("budget");
        let out = init(&home, "http://localhost:3000/api").await.unwrap();
        assert!(out.message().starts_with("Successfully created"));
        assert!(Config::load(&home).await.is_ok());
    }
}
