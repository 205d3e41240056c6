use crate::core::fee::FeeConfig;
use crate::core::source::FeeConfigSource;
use anyhow::Result;
use async_trait::async_trait;

/// Serves a fixed list of configurations.
#[derive(Debug, Clone, Default)]
pub struct StaticFeeSource {
    configs: Vec<FeeConfig>,
}

impl StaticFeeSource {
    pub fn new(configs: Vec<FeeConfig>) -> Self {
        Self { configs }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeeConfigSource for StaticFeeSource {
    async fn fetch_all(&self) -> Result<Vec<FeeConfig>> {
        Ok(self.configs.clone())
    }
}
