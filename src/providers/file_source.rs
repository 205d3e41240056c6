use super::util::decode_fee_configs;
use crate::core::fee::FeeConfig;
use crate::core::source::FeeConfigSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads fee configurations from a JSON file in the management API format.
pub struct FileFeeSource {
    path: PathBuf,
}

impl FileFeeSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeeConfigSource for FileFeeSource {
    async fn fetch_all(&self) -> Result<Vec<FeeConfig>> {
        debug!("Reading fee configurations from {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read fee file: {}", self.path.display()))?;
        decode_fee_configs(&body)
            .with_context(|| format!("Failed to parse fee file: {}", self.path.display()))
    }
}
