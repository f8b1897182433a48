//! Write path: transaction envelope construction and the signing-provider
//! exchange.

pub mod dispatcher;
pub mod provider;

pub use dispatcher::{SubmitOutcome, TxDispatcher};
pub use provider::{ProviderResponse, SigningProvider, TxEnvelope};
