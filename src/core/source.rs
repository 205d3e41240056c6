//! Abstraction over where fee configurations come from.

use super::fee::FeeConfig;
use anyhow::Result;
use async_trait::async_trait;

/// Fetches every currency's fee configuration for the current account.
///
/// An empty list means the account has nothing configured yet.
#[async_trait]
pub trait FeeConfigSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<FeeConfig>>;
}
