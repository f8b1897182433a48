//! Transaction dispatch: build the envelope, exchange it with the signing
//! provider, honor exactly one terminal transition.
//!
//! The write path ends at "submitted for signature". Mining and receipts
//! are out of scope; writes go through exactly one signing exchange and
//! are never fanned out across endpoints.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use tokio::sync::oneshot;
use tokio::time::timeout;

use crate::config::schema::LedgerConfig;
use crate::error::{VaultError, VaultResult};
use crate::tx::provider::{ProviderResponse, SigningProvider, TxEnvelope};

/// Successful submit outcome: the provider acknowledged the signing
/// request. Nothing is known yet about approval or mining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    PendingApproval { tx_hash: String },
}

/// Drives the asynchronous, cancellable, deadline-bounded exchange with the
/// signing provider.
pub struct TxDispatcher {
    provider: Arc<dyn SigningProvider>,
    chain_id: u64,
    gas_limit: u64,
    gas_price_wei: u128,
    deadline_secs: u64,
}

impl TxDispatcher {
    pub fn new(provider: Arc<dyn SigningProvider>, config: &LedgerConfig) -> Self {
        Self {
            provider,
            chain_id: config.chain_id,
            gas_limit: config.gas_limit,
            gas_price_wei: config.gas_price_wei,
            deadline_secs: config.provider_deadline_secs,
        }
    }

    /// Submit a write for signing.
    ///
    /// `from` falls back to the provider's current identity; with neither,
    /// fails `NoIdentity`. A provider on the wrong chain fails `WrongNetwork`
    /// before anything is sent. The wait is bounded by the configured
    /// deadline; on expiry the receiver is dropped, which cancels the
    /// outstanding request: a late provider response lands on a dead channel
    /// and is discarded, so no `Accepted`/`Rejected` transition can be
    /// observed after `Timeout`.
    pub async fn submit(
        &self,
        from: Option<Address>,
        contract: Address,
        call_data_hex: String,
        value: U256,
        nonce: Option<u64>,
    ) -> VaultResult<SubmitOutcome> {
        let from = from
            .or_else(|| self.provider.current_identity())
            .ok_or(VaultError::NoIdentity)?;

        if let Some(actual) = self.provider.chain_id() {
            if actual != self.chain_id {
                return Err(VaultError::WrongNetwork {
                    expected: self.chain_id,
                    actual,
                });
            }
        }

        let envelope = TxEnvelope {
            from,
            to: contract,
            data: call_data_hex,
            value,
            gas: self.gas_limit,
            gas_price: self.gas_price_wei,
            chain_id: self.chain_id,
            nonce,
        };

        let (reply, receiver) = oneshot::channel();
        tracing::debug!(from = %from, to = %contract, "requesting transaction signature");
        self.provider
            .request("eth_sendTransaction", envelope.to_rpc_params(), reply);

        match timeout(Duration::from_secs(self.deadline_secs), receiver).await {
            Err(_) => {
                tracing::warn!(
                    deadline_secs = self.deadline_secs,
                    "signing provider deadline exceeded, cancelling request"
                );
                Err(VaultError::Timeout(self.deadline_secs))
            }
            Ok(Err(_)) => Err(VaultError::ProviderError(
                "signing provider dropped the request".to_string(),
            )),
            Ok(Ok(ProviderResponse::Approved { tx_hash })) => {
                tracing::info!(tx_hash = %tx_hash, "transaction submitted for signature");
                Ok(SubmitOutcome::PendingApproval { tx_hash })
            }
            Ok(Ok(ProviderResponse::Rejected)) => Err(VaultError::UserRejected),
            Ok(Ok(ProviderResponse::Failed(message))) => Err(VaultError::ProviderError(message)),
        }
    }
}
