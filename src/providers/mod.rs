pub mod file_source;
pub mod management;
pub mod static_source;
pub mod util;

use crate::core::config::AppConfig;
use crate::core::source::FeeConfigSource;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Picks the fee source described by the configuration.
///
/// A local fee file wins over the management API. With neither configured the
/// engine bootstraps from nothing and ends up on the built-in defaults.
pub fn source_from_config(config: &AppConfig) -> Result<Arc<dyn FeeConfigSource>> {
    if let Some(path) = &config.fee_file {
        debug!("Using fee file source: {}", path);
        return Ok(Arc::new(file_source::FileFeeSource::new(path)));
    }

    if let Some(management) = &config.management {
        debug!("Using management API source: {}", management.base_url);
        return Ok(Arc::new(management::ManagementApiSource::new(
            &management.base_url,
            management.token.as_deref(),
        )?));
    }

    debug!("No fee source configured");
    Ok(Arc::new(static_source::StaticFeeSource::empty()))
}
