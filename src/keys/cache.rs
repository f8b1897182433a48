//! Versioned process-wide key cache.
//!
//! One cache object is shared by handle across the client. A version
//! counter increments on every wallet change; derivation results carry the
//! version they were computed under so callers can detect staleness instead
//! of relying on implicit global mutation. Invalidation always wins: an
//! in-flight derivation may return a key from the previous generation and
//! the caller recomputes.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::schema::KeyConfig;
use crate::error::{VaultError, VaultResult};
use crate::keys::derivation::{
    derive_category_key, derive_master_key, normalize_address, CategoryKey, MasterKey,
};
use crate::records::types::Category;
use crate::storage::SecureStore;

const STORE_KEY_WALLET: &str = "healthvault.last_wallet";
const STORE_KEY_MASTER: &str = "healthvault.master_key";

/// A derived key together with the cache generation it belongs to.
#[derive(Debug, Clone)]
pub struct VersionedKey {
    pub key: CategoryKey,
    pub version: u64,
}

#[derive(Default)]
struct CacheState {
    wallet: Option<String>,
    master: Option<MasterKey>,
    categories: HashMap<Category, CategoryKey>,
    version: u64,
}

/// In-memory key cache with optional secure-store persistence for the
/// master key. Everything here is re-derivable; losing the store or the
/// process costs a recomputation, never data.
pub struct KeyCache {
    state: RwLock<CacheState>,
    store: Option<Arc<dyn SecureStore>>,
}

impl KeyCache {
    pub fn new(store: Option<Arc<dyn SecureStore>>) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            store,
        }
    }

    /// Build from config. The secure store is only consulted when
    /// `persist_master_key` is enabled; with it disabled the master key
    /// lives in memory for the session and is re-derived next time.
    pub fn from_config(config: &KeyConfig, store: Option<Arc<dyn SecureStore>>) -> Self {
        Self::new(if config.persist_master_key { store } else { None })
    }

    // Everything behind the lock is re-derivable, so a writer that panicked
    // mid-update cannot leave anything worse than a stale entry; recover the
    // guard instead of propagating the poison.
    fn read_state(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current cache generation.
    pub fn version(&self) -> u64 {
        self.read_state().version
    }

    /// Observe the current wallet identity. A change invalidates the master
    /// key and every cached category key and bumps the version; observing
    /// the same wallet again is a no-op. Returns the generation in effect
    /// after the call.
    pub fn set_wallet(&self, wallet: &str) -> VaultResult<u64> {
        let addr = normalize_address(wallet)?;
        let mut state = self.write_state();
        if state.wallet.as_deref() == Some(addr.as_str()) {
            return Ok(state.version);
        }

        let master = self.restore_master(&addr)?;
        state.wallet = Some(addr);
        state.master = Some(master);
        state.categories.clear();
        state.version += 1;
        tracing::info!(version = state.version, "wallet changed, key cache invalidated");
        Ok(state.version)
    }

    /// Drop all cached key material without a replacement identity.
    pub fn invalidate(&self) {
        let mut state = self.write_state();
        state.wallet = None;
        state.master = None;
        state.categories.clear();
        state.version += 1;
        tracing::info!(version = state.version, "key cache cleared");
    }

    /// Master key for the current wallet. `NoIdentity` when no wallet has
    /// been observed.
    pub fn master_key(&self) -> VaultResult<MasterKey> {
        self.read_state().master.clone().ok_or(VaultError::NoIdentity)
    }

    /// Category key for the current wallet, derived on first use and
    /// memoized for the lifetime of the generation.
    pub fn category_key(&self, category: Category) -> VaultResult<VersionedKey> {
        {
            let state = self.read_state();
            if let Some(key) = state.categories.get(&category) {
                return Ok(VersionedKey {
                    key: key.clone(),
                    version: state.version,
                });
            }
        }

        let mut state = self.write_state();
        let master = state.master.clone().ok_or(VaultError::NoIdentity)?;
        let key = derive_category_key(&master, category)?;
        state.categories.insert(category, key.clone());
        Ok(VersionedKey {
            key,
            version: state.version,
        })
    }

    /// Restore the master key from the secure store when it was cached for
    /// this same wallet, otherwise derive and re-cache it. Store faults are
    /// logged and absorbed: the key is always re-derivable.
    fn restore_master(&self, addr: &str) -> VaultResult<MasterKey> {
        if let Some(store) = &self.store {
            match (store.get(STORE_KEY_WALLET), store.get(STORE_KEY_MASTER)) {
                (Ok(Some(stored_wallet)), Ok(Some(master_bytes)))
                    if stored_wallet == addr.as_bytes() && master_bytes.len() == 32 =>
                {
                    let mut bytes = [0u8; 32];
                    bytes.copy_from_slice(&master_bytes);
                    tracing::debug!("master key restored from secure store");
                    return Ok(MasterKey::from_bytes(bytes));
                }
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!(error = %e, "secure store read failed, re-deriving master key");
                }
                _ => {}
            }
        }

        let master = derive_master_key(addr)?;
        if let Some(store) = &self.store {
            if let Err(e) = store
                .put(STORE_KEY_WALLET, addr.as_bytes())
                .and_then(|_| store.put(STORE_KEY_MASTER, master.as_bytes()))
            {
                tracing::warn!(error = %e, "secure store write failed, continuing uncached");
            }
        }
        Ok(master)
    }
}
