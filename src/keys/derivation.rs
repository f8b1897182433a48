//! Deterministic key derivation: wallet address to master key to
//! per-category keys.
//!
//! Master key: `SHA-256(salt || lowercase(address))`. Category keys:
//! HKDF-Expand (RFC 5869) over the master key with the category's versioned
//! domain string as info. Derivation is idempotent, which is what lets the
//! client never persist category keys.

use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};
use crate::records::types::Category;

/// Domain-separation salt for master-key derivation. Versioned: changing it
/// re-keys every wallet.
pub const MASTER_KEY_SALT: &[u8] = b"healthvault-master-v1";

/// Root symmetric key for one wallet identity. Redacted in Debug output and
/// zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; 32]);

impl MasterKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// Symmetric key for one (wallet, category) pair.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CategoryKey([u8; 32]);

impl CategoryKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CategoryKey(..)")
    }
}

/// Lowercase and validate a wallet address: `0x` plus 40 hex characters.
pub fn normalize_address(wallet: &str) -> VaultResult<String> {
    let addr = wallet.trim().to_ascii_lowercase();
    let hex_part = addr
        .strip_prefix("0x")
        .ok_or_else(|| VaultError::InvalidAddress(format!("missing 0x prefix: {wallet}")))?;
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(VaultError::InvalidAddress(format!(
            "expected 40 hex characters: {wallet}"
        )));
    }
    Ok(addr)
}

/// Derive the master key for a wallet. Pure; fails only on malformed input.
pub fn derive_master_key(wallet: &str) -> VaultResult<MasterKey> {
    let addr = normalize_address(wallet)?;
    let mut hasher = Sha256::new();
    hasher.update(MASTER_KEY_SALT);
    hasher.update(addr.as_bytes());
    Ok(MasterKey(hasher.finalize().into()))
}

/// Derive a category key via HKDF-Expand. Expand-only: the master key
/// already has full entropy, so it is used directly as the PRK.
pub fn derive_category_key(master: &MasterKey, category: Category) -> VaultResult<CategoryKey> {
    let hk = Hkdf::<Sha256>::from_prk(master.as_bytes())
        .map_err(|_| VaultError::InvalidKey("master key is not a valid PRK".to_string()))?;
    let mut okm = [0u8; 32];
    hk.expand(category.domain_string().as_bytes(), &mut okm)
        .map_err(|_| VaultError::InvalidKey("HKDF expand failed".to_string()))?;
    Ok(CategoryKey(okm))
}
