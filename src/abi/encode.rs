//! Call-data encoding: selector plus standard head/tail parameter block.

use alloy::primitives::U256;

use crate::abi::token::{Function, Token};
use crate::error::{VaultError, VaultResult};

/// Encode a function call: 4-byte selector, then one 32-byte head slot per
/// parameter in declaration order. Fixed-width values occupy their slot
/// directly; each dynamic string's slot holds the byte offset (from the
/// start of the parameter block, not the selector) of its tail region, which
/// is a 32-byte length followed by UTF-8 bytes zero-padded to a slot
/// boundary.
pub fn encode_call(function: &Function, tokens: &[Token]) -> VaultResult<Vec<u8>> {
    if tokens.len() != function.inputs.len() {
        return Err(VaultError::Codec(format!(
            "{} expects {} parameters, got {}",
            function.name,
            function.inputs.len(),
            tokens.len()
        )));
    }
    for (i, (token, shape)) in tokens.iter().zip(function.inputs).enumerate() {
        if !token.matches(shape) {
            return Err(VaultError::Codec(format!(
                "{} parameter {} expects {}, got {}",
                function.name,
                i,
                shape.abi_name(),
                token.param_type().abi_name()
            )));
        }
    }

    let head_len = tokens.len() * 32;
    let mut head = Vec::with_capacity(head_len);
    let mut tail: Vec<u8> = Vec::new();

    for token in tokens {
        match token {
            Token::Address(addr) => {
                head.extend_from_slice(&[0u8; 12]);
                head.extend_from_slice(addr.as_slice());
            }
            Token::Uint(value, width) => {
                if *width < 256 && value.bit_len() > *width {
                    return Err(VaultError::Codec(format!(
                        "{}: value does not fit uint{}",
                        function.name, width
                    )));
                }
                head.extend_from_slice(&value.to_be_bytes::<32>());
            }
            Token::Bool(b) => {
                let mut slot = [0u8; 32];
                slot[31] = *b as u8;
                head.extend_from_slice(&slot);
            }
            Token::FixedBytes(bytes) => {
                head.extend_from_slice(bytes.as_slice());
            }
            Token::Str(s) => {
                let offset = head_len + tail.len();
                head.extend_from_slice(&U256::from(offset).to_be_bytes::<32>());
                tail.extend_from_slice(&U256::from(s.len()).to_be_bytes::<32>());
                tail.extend_from_slice(s.as_bytes());
                let pad = (32 - s.len() % 32) % 32;
                tail.extend(std::iter::repeat(0u8).take(pad));
            }
        }
    }

    let mut out = Vec::with_capacity(4 + head_len + tail.len());
    out.extend_from_slice(&function.selector());
    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    Ok(out)
}

/// Encode as the `0x`-prefixed hex string `eth_call` and
/// `eth_sendTransaction` take.
pub fn encode_hex(function: &Function, tokens: &[Token]) -> VaultResult<String> {
    Ok(format!(
        "0x{}",
        alloy::hex::encode(encode_call(function, tokens)?)
    ))
}
