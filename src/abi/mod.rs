//! Binary ABI codec for the health-record contract.
//!
//! # Responsibilities
//! - Encode typed call parameters into `eth_call`/`eth_sendTransaction` data
//! - Decode flat ABI-encoded results against a declared output shape
//! - Decode dynamic-struct responses that generic decoders cannot represent
//!   (tuples mixing fixed scalars with multiple dynamic strings)
//!
//! # Design Decisions
//! - Hand-written head/tail codec; `alloy` is used for primitives
//!   (`Address`, `U256`, keccak) only
//! - All offset arithmetic goes through a bounds-checked cursor so the
//!   relative-vs-absolute offset bug class cannot compile into a panic

pub mod cursor;
pub mod decode;
pub mod encode;
pub mod token;

pub use cursor::SlotCursor;
pub use decode::{decode_outputs, strip_response, TupleDecoder};
pub use encode::{encode_call, encode_hex};
pub use token::{Function, ParamType, Token};
