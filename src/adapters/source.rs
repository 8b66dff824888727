use crate::core::{DatasetSource, Result};
use crate::utils::validation::is_remote_location;
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reads datasets over HTTP(S) or from the local filesystem.
#[derive(Debug, Clone)]
pub struct SourceReader {
    client: Client,
    base_dir: Option<PathBuf>,
}

impl SourceReader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_dir: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_dir: None,
        })
    }

    /// 相對路徑以此目錄為基準
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    fn local_path(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for SourceReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetSource for SourceReader {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if is_remote_location(location) {
            tracing::debug!("Making HTTP request to: {}", location);
            let response = self.client.get(location).send().await?;
            tracing::debug!("HTTP response status: {}", response.status());

            let response = response.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        } else {
            let path = self.local_path(location);
            tracing::debug!("Reading local file: {}", path.display());
            Ok(tokio::fs::read(path).await?)
        }
    }
}
