//! Typed parameters and contract function descriptors.

use alloy::primitives::{keccak256, Address, B256, U256};

/// Shape of a single ABI parameter, used to declare function signatures
/// and output layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// 20-byte account address.
    Address,
    /// Unsigned integer of the given bit width (8, 64, 256, ...).
    Uint(usize),
    /// Boolean.
    Bool,
    /// 32-byte fixed array.
    FixedBytes,
    /// Dynamically-sized UTF-8 string.
    Str,
}

impl ParamType {
    /// Canonical type name used in function signatures.
    pub fn abi_name(&self) -> String {
        match self {
            ParamType::Address => "address".to_string(),
            ParamType::Uint(width) => format!("uint{width}"),
            ParamType::Bool => "bool".to_string(),
            ParamType::FixedBytes => "bytes32".to_string(),
            ParamType::Str => "string".to_string(),
        }
    }

    /// Dynamic parameters live in the tail; their head slot is an offset.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::Str)
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    /// Value plus its declared bit width. The width bounds the value at
    /// encode time; on-wire every integer still occupies one 32-byte slot.
    Uint(U256, usize),
    Bool(bool),
    FixedBytes(B256),
    Str(String),
}

impl Token {
    /// Whether this value fits the declared shape.
    pub fn matches(&self, ty: &ParamType) -> bool {
        matches!(
            (self, ty),
            (Token::Address(_), ParamType::Address)
                | (Token::Bool(_), ParamType::Bool)
                | (Token::FixedBytes(_), ParamType::FixedBytes)
                | (Token::Str(_), ParamType::Str)
        ) || matches!((self, ty), (Token::Uint(_, w), ParamType::Uint(d)) if w == d)
    }

    /// The shape of this value.
    pub fn param_type(&self) -> ParamType {
        match self {
            Token::Address(_) => ParamType::Address,
            Token::Uint(_, width) => ParamType::Uint(*width),
            Token::Bool(_) => ParamType::Bool,
            Token::FixedBytes(_) => ParamType::FixedBytes,
            Token::Str(_) => ParamType::Str,
        }
    }
}

/// Descriptor for one contract function: name plus ordered input and output
/// shapes. Immutable per call site and used symmetrically by the encoder
/// (inputs) and the standard decoder (outputs).
#[derive(Debug, Clone, Copy)]
pub struct Function {
    pub name: &'static str,
    pub inputs: &'static [ParamType],
    pub outputs: &'static [ParamType],
}

impl Function {
    /// Canonical signature string, e.g. `grantShare(address,uint8,...)`.
    pub fn signature(&self) -> String {
        let args: Vec<String> = self.inputs.iter().map(ParamType::abi_name).collect();
        format!("{}({})", self.name, args.join(","))
    }

    /// First four bytes of keccak256 of the canonical signature.
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }
}
