//! Authenticated key exchange for sharing.
//!
//! Re-wraps a category key for a named recipient: secp256k1 ECDH between
//! the owner's private key and the recipient's public key, symmetric key
//! derived by hashing the shared secret (never used raw), then the same
//! AEAD envelope as payload sealing. ECDH commutes, so the recipient
//! unwraps with their private key and the owner's public key.
//!
//! No replay protection here; freshness and expiry are enforced by the
//! ledger-side share record, not the envelope.

use k256::ecdh::diffie_hellman;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use sha2::{Digest, Sha256};

use crate::error::{VaultError, VaultResult};
use crate::keys::derivation::CategoryKey;
use crate::keys::payload::{open_with, seal_with};

/// Hex form of a public key as published in the recipient directory
/// (uncompressed SEC1 point).
pub fn public_key_hex(public: &PublicKey) -> String {
    alloy::hex::encode(public.to_encoded_point(false).as_bytes())
}

fn shared_symmetric_key(secret: &SecretKey, public_hex: &str) -> VaultResult<[u8; 32]> {
    let raw = alloy::hex::decode(public_hex.trim())
        .map_err(|e| VaultError::InvalidKey(format!("public key is not valid hex: {e}")))?;
    let public = PublicKey::from_sec1_bytes(&raw)
        .map_err(|_| VaultError::InvalidKey("not a valid SEC1 curve point".to_string()))?;
    let shared = diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
    let mut hasher = Sha256::new();
    hasher.update(shared.raw_secret_bytes());
    Ok(hasher.finalize().into())
}

/// Wrap a category key for a recipient. Returns the Base64(IV || ct)
/// envelope stored in the on-chain share record.
pub fn wrap_category_key(
    key: &CategoryKey,
    owner_secret: &SecretKey,
    recipient_public_hex: &str,
) -> VaultResult<String> {
    let symmetric = shared_symmetric_key(owner_secret, recipient_public_hex)?;
    seal_with(&symmetric, key.as_bytes())
}

/// Unwrap a shared category key on the recipient side.
pub fn unwrap_category_key(
    envelope_b64: &str,
    owner_public_hex: &str,
    recipient_secret: &SecretKey,
) -> VaultResult<CategoryKey> {
    let symmetric = shared_symmetric_key(recipient_secret, owner_public_hex)?;
    let plaintext = open_with(&symmetric, envelope_b64)?;
    let bytes: [u8; 32] = plaintext.as_slice().try_into().map_err(|_| {
        VaultError::CorruptEnvelope(format!(
            "unwrapped key is {} bytes, expected 32",
            plaintext.len()
        ))
    })?;
    Ok(CategoryKey::from_bytes(bytes))
}
