//! Payload sealing: AEAD encryption of record content under a category key.
//!
//! Content is sealed before it ever reaches the content store; the ledger
//! only sees the resulting content hash. Envelope form is
//! Base64(IV || ciphertext) with a 12-byte random IV, shared with the
//! key-wrapping envelope in [`crate::keys::exchange`].

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;

use crate::error::{VaultError, VaultResult};
use crate::keys::derivation::CategoryKey;

pub(crate) const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

pub(crate) fn seal_with(key: &[u8; 32], plaintext: &[u8]) -> VaultResult<String> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut iv = [0u8; IV_LEN];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|_| VaultError::Codec("AEAD encryption failed".to_string()))?;
    let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(blob))
}

pub(crate) fn open_with(key: &[u8; 32], blob_b64: &str) -> VaultResult<Vec<u8>> {
    let blob = BASE64
        .decode(blob_b64.trim())
        .map_err(|e| VaultError::CorruptEnvelope(format!("bad base64: {e}")))?;
    if blob.len() < IV_LEN + TAG_LEN {
        return Err(VaultError::CorruptEnvelope(format!(
            "envelope too short: {} bytes",
            blob.len()
        )));
    }
    let (iv, ciphertext) = blob.split_at(IV_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}

/// Encrypt record content under a category key. Returns the Base64
/// envelope handed to the content store.
pub fn seal(key: &CategoryKey, plaintext: &[u8]) -> VaultResult<String> {
    seal_with(key.as_bytes(), plaintext)
}

/// Decrypt a sealed blob with a (possibly freshly re-derived) category key.
pub fn open(key: &CategoryKey, blob_b64: &str) -> VaultResult<Vec<u8>> {
    open_with(key.as_bytes(), blob_b64)
}
