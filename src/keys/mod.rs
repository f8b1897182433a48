//! Cryptographic key hierarchy.
//!
//! # Responsibilities
//! - Deterministic master-key and per-category key derivation
//! - Versioned in-memory cache keyed to the current wallet identity
//! - ECDH re-wrap of category keys for third-party sharing
//! - Payload sealing with a category key before content upload
//!
//! A category key is never persisted in plaintext outside process memory:
//! it is always either re-derived from the master key or unwrapped on
//! demand from a shared envelope.

pub mod cache;
pub mod derivation;
pub mod exchange;
pub mod payload;

pub use cache::{KeyCache, VersionedKey};
pub use derivation::{derive_category_key, derive_master_key, CategoryKey, MasterKey};
pub use exchange::{unwrap_category_key, wrap_category_key};
pub use payload::{open, seal};
