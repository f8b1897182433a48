//! Health-record vault core.
//!
//! Gives a client exclusive, cryptographically isolated access to personal
//! health records whose content lives in off-chain content-addressed
//! storage while only hashes and metadata live on a ledger-resident
//! contract. Two subsystems do the heavy lifting: a contract communication
//! layer (hand-written ABI codec, multi-endpoint read fallback, a
//! deadline-bounded signing exchange for writes) and a deterministic key
//! hierarchy (per-category keys derived from the wallet identity, re-wrapped
//! via ECDH for sharing).

pub mod abi;
pub mod config;
pub mod error;
pub mod keys;
pub mod observability;
pub mod records;
pub mod rpc;
pub mod storage;
pub mod tx;

pub use config::schema::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use keys::cache::KeyCache;
pub use records::contract::HealthVault;
pub use records::types::Category;
pub use tx::dispatcher::SubmitOutcome;
pub use tx::provider::{ProviderResponse, SigningProvider};
