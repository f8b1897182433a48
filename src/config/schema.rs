//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML config
//! files; every field has a default so a minimal file stays minimal.

use serde::{Deserialize, Serialize};

/// Root configuration for the health-vault core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VaultConfig {
    /// Ledger endpoints, contract, and write-path parameters.
    pub ledger: LedgerConfig,

    /// Key-hierarchy behavior.
    pub keys: KeyConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Ledger access configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Ordered read endpoints. Fallback tries them strictly in this order.
    pub endpoints: Vec<String>,

    /// Health-record contract address.
    pub contract_address: String,

    /// Expected chain id; a provider on any other chain is refused before
    /// submission.
    pub chain_id: u64,

    /// Per-endpoint read timeout.
    pub call_timeout_secs: u64,

    /// Fixed gas limit for writes. No estimation.
    pub gas_limit: u64,

    /// Fixed gas price for writes, in wei.
    pub gas_price_wei: u128,

    /// Wall-clock bound on the signing-provider exchange.
    pub provider_deadline_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            contract_address: String::new(),
            chain_id: 11155111, // Sepolia
            call_timeout_secs: 10,
            gas_limit: 300_000,
            gas_price_wei: 20_000_000_000, // 20 gwei
            provider_deadline_secs: 120,
        }
    }
}

/// Key-hierarchy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Cache the master key in the secure store. Always re-derivable, so
    /// disabling this only costs a recomputation per session.
    pub persist_master_key: bool,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            persist_master_key: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is unset.
    pub log_level: String,

    /// "pretty" for development, "json" for production.
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
