//! Signing-provider seam and transaction envelope.
//!
//! The provider is an opaque async RPC bridge to an external wallet: the
//! core hands it a method name and a JSON parameter object and gets exactly
//! one response back through a single-shot channel. Session and connection
//! management live on the other side of this trait.

use alloy::primitives::{Address, U256};
use serde_json::json;
use tokio::sync::oneshot;

/// Terminal provider responses. Exactly one is delivered per request; the
/// single-shot channel enforces that at the type level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    /// The provider accepted the signing request. The transaction is now
    /// pending user approval and, eventually, mining; neither is awaited.
    Approved { tx_hash: String },
    /// The user declined in their wallet.
    Rejected,
    /// Provider-side fault distinct from rejection.
    Failed(String),
}

/// External wallet bridge.
pub trait SigningProvider: Send + Sync {
    /// Currently connected account, if any.
    fn current_identity(&self) -> Option<Address>;

    /// Chain the wallet is connected to, if known.
    fn chain_id(&self) -> Option<u64>;

    /// Issue an asynchronous signing request. The implementation must send
    /// at most one response on `reply`; a send after the dispatcher has
    /// timed out simply fails against the dropped receiver.
    fn request(
        &self,
        method: &str,
        params: serde_json::Value,
        reply: oneshot::Sender<ProviderResponse>,
    );
}

/// Transaction envelope handed to the signing provider.
#[derive(Debug, Clone)]
pub struct TxEnvelope {
    pub from: Address,
    pub to: Address,
    /// `0x`-prefixed ABI call data.
    pub data: String,
    pub value: U256,
    pub gas: u64,
    pub gas_price: u128,
    pub chain_id: u64,
    pub nonce: Option<u64>,
}

impl TxEnvelope {
    /// Render the single-element `eth_sendTransaction` parameter array.
    /// Integer fields are string-hex-encoded; the nonce key is omitted
    /// entirely when no explicit nonce was supplied.
    pub fn to_rpc_params(&self) -> serde_json::Value {
        let mut object = json!({
            "from": self.from.to_string(),
            "to": self.to.to_string(),
            "data": self.data,
            "value": format!("0x{:x}", self.value),
            "gas": format!("0x{:x}", self.gas),
            "gasPrice": format!("0x{:x}", self.gas_price),
            "chainId": format!("0x{:x}", self.chain_id),
        });
        if let Some(nonce) = self.nonce {
            object["nonce"] = json!(format!("0x{nonce:x}"));
        }
        json!([object])
    }
}
