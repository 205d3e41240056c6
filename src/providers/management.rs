use super::util::decode_fee_configs;
use crate::core::fee::FeeConfig;
use crate::core::source::FeeConfigSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error};

const USER_AGENT: &str = concat!("settlefee/", env!("CARGO_PKG_VERSION"));

/// Fetches the account's fee configurations from the Management API.
///
/// One request per call. Retrying is left to the caller, which for the engine
/// means falling back to defaults.
pub struct ManagementApiSource {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ManagementApiSource {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
            client,
        })
    }
}

#[async_trait]
impl FeeConfigSource for ManagementApiSource {
    async fn fetch_all(&self) -> Result<Vec<FeeConfig>> {
        let url = format!("{}/fee-configurations", self.base_url);
        debug!("Requesting fee configurations from {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Fee configuration request failed")?
            .error_for_status()
            .context("Fee configuration request returned an error status")?;

        let response_text = response
            .text()
            .await
            .context("Failed to get response text")?;

        match decode_fee_configs(&response_text) {
            Ok(configs) => {
                debug!("Fetched {} fee configurations", configs.len());
                Ok(configs)
            }
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse fee configuration response"
                );
                Err(e)
            }
        }
    }
}
