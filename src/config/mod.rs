//! Configuration schema and loading.

pub mod loader;
pub mod schema;

pub use loader::load_from_file;
pub use schema::{KeyConfig, LedgerConfig, ObservabilityConfig, VaultConfig};
