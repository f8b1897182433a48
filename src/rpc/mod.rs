//! Ledger read access.

pub mod multiplexer;

pub use multiplexer::RpcMultiplexer;
