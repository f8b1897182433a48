//! Response decoding: flat output lists and manual dynamic-struct parsing.
//!
//! Two paths, per the contract's return shapes:
//! 1. Standard decode against a declared `ParamType` list, for flat results
//!    (counts, flags).
//! 2. Manual tuple decode for struct returns mixing fixed scalars with
//!    several dynamic strings. The response opens with a 32-byte offset to
//!    the tuple body; string offsets inside the body are relative to the
//!    body start, not the response start.

use crate::abi::cursor::SlotCursor;
use crate::abi::token::{ParamType, Token};
use crate::error::{VaultError, VaultResult};
use alloy::primitives::{Address, U256};

/// Hex response to bytes. The empty string and the literal `0x` are the
/// ledger's "no data" sentinel and fail with `EmptyResponse`.
pub fn strip_response(raw: &str) -> VaultResult<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "0x" {
        return Err(VaultError::EmptyResponse);
    }
    alloy::hex::decode(trimmed)
        .map_err(|e| VaultError::Codec(format!("response is not valid hex: {e}")))
}

/// Decode a flat ABI-encoded result against a declared output shape.
/// Dynamic-string head slots hold offsets from the start of the output
/// block.
pub fn decode_outputs(shape: &[ParamType], raw: &str) -> VaultResult<Vec<Token>> {
    let data = strip_response(raw)?;
    let mut head = SlotCursor::new(&data);
    let tail = SlotCursor::new(&data);
    let mut out = Vec::with_capacity(shape.len());
    for ty in shape {
        let token = match ty {
            ParamType::Address => Token::Address(head.take_address()?),
            ParamType::Uint(width) => Token::Uint(head.take_uint()?, *width),
            ParamType::Bool => Token::Bool(head.take_bool()?),
            ParamType::FixedBytes => Token::FixedBytes(head.take_b256()?),
            ParamType::Str => {
                let offset = head.take_usize()?;
                Token::Str(tail.str_at(offset)?)
            }
        };
        out.push(token);
    }
    Ok(out)
}

/// Decoder for a struct return: a leading offset to the tuple body, then a
/// sequence of fixed 32-byte fields interleaved with offsets to dynamic
/// strings, those offsets measured from the body start.
pub struct TupleDecoder {
    data: Vec<u8>,
    body: usize,
}

impl TupleDecoder {
    pub fn new(raw: &str) -> VaultResult<Self> {
        let data = strip_response(raw)?;
        let mut cur = SlotCursor::new(&data);
        let body = cur.take_usize()?;
        if body >= data.len() {
            return Err(VaultError::OutOfBounds {
                offset: body,
                len: data.len(),
            });
        }
        Ok(Self { data, body })
    }

    fn cursor(&self) -> SlotCursor<'_> {
        SlotCursor::new(&self.data)
    }

    /// Absolute offset of body slot `index`.
    fn slot(&self, index: usize) -> usize {
        self.body + index * 32
    }

    pub fn field_uint(&self, index: usize) -> VaultResult<U256> {
        self.cursor().uint_at(self.slot(index))
    }

    pub fn field_u64(&self, index: usize) -> VaultResult<u64> {
        u64::try_from(self.field_uint(index)?)
            .map_err(|_| VaultError::Codec(format!("field {index} does not fit u64")))
    }

    /// Low byte of a slot; used for enum ordinals, which decode permissively
    /// at the type layer rather than failing here.
    pub fn field_ordinal(&self, index: usize) -> VaultResult<u8> {
        Ok(self.field_uint(index)?.byte(0))
    }

    pub fn field_address(&self, index: usize) -> VaultResult<Address> {
        self.cursor().address_at(self.slot(index))
    }

    pub fn field_bool(&self, index: usize) -> VaultResult<bool> {
        self.cursor().bool_at(self.slot(index))
    }

    /// Resolve body slot `index` as a string offset relative to the body
    /// start, then read the length-prefixed UTF-8 content there.
    pub fn field_str(&self, index: usize) -> VaultResult<String> {
        let relative = self.cursor().usize_at(self.slot(index))?;
        let absolute = self
            .body
            .checked_add(relative)
            .ok_or(VaultError::OutOfBounds {
                offset: relative,
                len: self.data.len(),
            })?;
        self.cursor().str_at(absolute)
    }
}
