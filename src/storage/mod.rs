//! External storage seams.
//!
//! The core consumes two opaque collaborators: a secure local key/value
//! store (caches the master key and last-seen wallet; loss is never
//! data-loss, only a recomputation) and a content-addressed blob store
//! (hashes in on-chain records point into it). Both are traits here;
//! in-memory implementations back tests and defaults.

use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::error::{VaultError, VaultResult};

/// Secure local key/value store (platform keystore behind a narrow seam).
pub trait SecureStore: Send + Sync {
    fn get(&self, key: &str) -> VaultResult<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: &[u8]) -> VaultResult<()>;
}

/// Off-chain content-addressed blob store. Content hashes are opaque
/// strings; the core never reasons about them beyond equality.
pub trait ContentStore: Send + Sync {
    fn upload(&self, bytes: &[u8]) -> VaultResult<String>;
    fn download(&self, content_hash: &str) -> VaultResult<Vec<u8>>;
}

/// Mutex-backed in-memory secure store.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureStore for MemoryStore {
    fn get(&self, key: &str) -> VaultResult<Option<Vec<u8>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| VaultError::Storage("store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> VaultResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| VaultError::Storage("store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// In-memory content store addressing blobs by SHA-256 hex.
#[derive(Default)]
pub struct MemoryContentStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryContentStore {
    fn upload(&self, bytes: &[u8]) -> VaultResult<String> {
        let hash = alloy::hex::encode(Sha256::digest(bytes));
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| VaultError::Storage("store lock poisoned".to_string()))?;
        blobs.insert(hash.clone(), bytes.to_vec());
        Ok(hash)
    }

    fn download(&self, content_hash: &str) -> VaultResult<Vec<u8>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| VaultError::Storage("store lock poisoned".to_string()))?;
        blobs
            .get(content_hash)
            .cloned()
            .ok_or_else(|| VaultError::Storage(format!("unknown content hash {content_hash}")))
    }
}
