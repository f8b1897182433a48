//! Configuration loading from disk.
//!
//! Serde handles syntax; `validate` checks the semantics a parse cannot:
//! at least one endpoint, well-formed URLs, a parseable contract address,
//! a nonzero chain id.

use std::fs;
use std::path::Path;

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::VaultConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_from_file(path: &Path) -> Result<VaultConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: VaultConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Semantic validation, pure over the parsed config.
pub fn validate(config: &VaultConfig) -> Result<(), ConfigError> {
    if config.ledger.endpoints.is_empty() {
        return Err(ConfigError::Invalid(
            "ledger.endpoints must list at least one read endpoint".to_string(),
        ));
    }
    for endpoint in &config.ledger.endpoints {
        endpoint
            .parse::<url::Url>()
            .map_err(|e| ConfigError::Invalid(format!("endpoint '{endpoint}': {e}")))?;
    }
    config
        .ledger
        .contract_address
        .parse::<Address>()
        .map_err(|e| {
            ConfigError::Invalid(format!(
                "contract_address '{}': {e}",
                config.ledger.contract_address
            ))
        })?;
    if config.ledger.chain_id == 0 {
        return Err(ConfigError::Invalid("chain_id must be nonzero".to_string()));
    }
    if config.ledger.call_timeout_secs == 0 || config.ledger.provider_deadline_secs == 0 {
        return Err(ConfigError::Invalid(
            "timeouts must be nonzero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LedgerConfig;

    fn valid_config() -> VaultConfig {
        VaultConfig {
            ledger: LedgerConfig {
                endpoints: vec!["https://rpc.example.org".to_string()],
                contract_address: "0x1111111111111111111111111111111111111111".to_string(),
                chain_id: 1,
                ..LedgerConfig::default()
            },
            ..VaultConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_endpoints_rejected() {
        let mut config = valid_config();
        config.ledger.endpoints.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_contract_address_rejected() {
        let mut config = valid_config();
        config.ledger.contract_address = "not-an-address".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_endpoint_url_rejected() {
        let mut config = valid_config();
        config.ledger.endpoints.push("::nope::".to_string());
        assert!(validate(&config).is_err());
    }
}
