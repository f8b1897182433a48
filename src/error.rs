//! Error taxonomy shared by every subsystem.
//!
//! # Design Decisions
//! - One crate-level enum so callers can distinguish "ledger unreachable"
//!   (retryable) from "ledger returned garbage" (not retryable) from
//!   cryptographic failure (never swallowed).
//! - Codec and crypto failures are never retried automatically; network
//!   failures are retried only through the multiplexer's endpoint fallback.

use thiserror::Error;

/// Errors surfaced by the health-vault core.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No wallet session is available. Not retryable.
    #[error("no wallet identity available; connect a wallet first")]
    NoIdentity,

    /// A wallet address string failed validation.
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    /// A single endpoint attempt failed (transport, HTTP, or RPC-level).
    /// Internal to the multiplexer loop; callers see `AllEndpointsUnavailable`.
    #[error("network error: {0}")]
    NetworkUnavailable(String),

    /// Every configured read endpoint failed, in order.
    #[error("all ledger endpoints unavailable; last error: {last}")]
    AllEndpointsUnavailable { last: String },

    /// The ledger returned no data where data was required.
    #[error("empty response from ledger")]
    EmptyResponse,

    /// A decoded offset or length points past the end of the response.
    #[error("decode out of bounds: offset {offset} in {len}-byte response")]
    OutOfBounds { offset: usize, len: usize },

    /// A wrapped-key envelope is structurally broken (bad Base64, short IV).
    #[error("corrupt key envelope: {0}")]
    CorruptEnvelope(String),

    /// A public or private key could not be parsed.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// AEAD authentication failed. Wrong key, or tampered ciphertext.
    #[error("decryption failed: key mismatch or tampered data")]
    DecryptionFailed,

    /// The user declined the signing request in their wallet.
    #[error("transaction rejected by user")]
    UserRejected,

    /// The signing provider did not answer within the deadline.
    #[error("signing provider did not respond within {0} seconds")]
    Timeout(u64),

    /// The signing provider reported a fault distinct from user rejection.
    #[error("signing provider error: {0}")]
    ProviderError(String),

    /// The provider's chain does not match the configured chain. Detected
    /// before submission; nothing is sent.
    #[error("wrong network: expected chain {expected}, wallet is on {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// Encoder-side misuse (arity mismatch, oversized integer, bad UTF-8).
    #[error("codec error: {0}")]
    Codec(String),

    /// Secure-store I/O fault. The store is only a cache; keys re-derive.
    #[error("secure store error: {0}")]
    Storage(String),
}

/// Result alias used throughout the crate.
pub type VaultResult<T> = Result<T, VaultError>;
