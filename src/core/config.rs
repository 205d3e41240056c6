use super::defaults::DefaultSupplier;
use super::engine::DEFAULT_FETCH_TIMEOUT;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ManagementConfig {
    pub base_url: String,
    pub token: Option<String>,
    /// Upper bound on the bootstrap fetch, in seconds.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub management: Option<ManagementConfig>,
    /// JSON file of fee configurations; takes priority over `management`.
    #[serde(default)]
    pub fee_file: Option<String>,
    #[serde(default)]
    pub default_supplier: Option<DefaultSupplier>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "settlefee", "settlefee")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.management
            .as_ref()
            .and_then(|m| m.timeout_secs)
            .map_or(DEFAULT_FETCH_TIMEOUT, Duration::from_secs)
    }

    pub fn default_supplier_id(&self) -> Option<&str> {
        self.default_supplier.as_ref().map(|s| s.id.as_str())
    }

    pub fn default_supplier_name(&self) -> Option<&str> {
        self.default_supplier.as_ref().map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
management:
  base_url: "https://management.example.com/api"
  token: "abc123"
  timeout_secs: 3
default_supplier:
  id: "acq-1"
  name: "Acme Bank"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        let management = config.management.as_ref().unwrap();
        assert_eq!(management.base_url, "https://management.example.com/api");
        assert_eq!(management.token.as_deref(), Some("abc123"));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert!(config.fee_file.is_none());
        assert_eq!(config.default_supplier_id(), Some("acq-1"));
        assert_eq!(config.default_supplier_name(), Some("Acme Bank"));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let yaml_str = r#"
fee_file: "/tmp/fees.json"
management:
  base_url: "http://localhost:8080"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.fee_file.as_deref(), Some("/tmp/fees.json"));
        assert_eq!(config.fetch_timeout(), DEFAULT_FETCH_TIMEOUT);
        assert!(config.default_supplier_id().is_none());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load_from_path(dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
