//! Bounds-checked slot cursor over decoded response bytes.
//!
//! Every read validates position against remaining length, so a bad offset
//! surfaces as `OutOfBounds` instead of a slice panic. The cursor works in
//! byte offsets only; hex-character offsets (twice the byte offset) never
//! survive past the hex decode at the entry point.

use alloy::primitives::{Address, B256, U256};

use crate::error::{VaultError, VaultResult};

/// Reader over an ABI-encoded byte buffer, in 32-byte slot units.
///
/// Sequential `take_*` calls advance an internal position (used when walking
/// a head block); `*_at` calls are random-access (used when chasing offsets
/// into the tail).
pub struct SlotCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SlotCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn check(&self, offset: usize, len: usize) -> VaultResult<()> {
        let end = offset
            .checked_add(len)
            .ok_or(VaultError::OutOfBounds {
                offset,
                len: self.data.len(),
            })?;
        if end > self.data.len() {
            return Err(VaultError::OutOfBounds {
                offset,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    /// Raw bytes `[offset, offset+len)`.
    pub fn bytes_at(&self, offset: usize, len: usize) -> VaultResult<&'a [u8]> {
        self.check(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    /// The 32-byte slot starting at `offset`.
    pub fn word_at(&self, offset: usize) -> VaultResult<&'a [u8]> {
        self.bytes_at(offset, 32)
    }

    pub fn uint_at(&self, offset: usize) -> VaultResult<U256> {
        Ok(U256::from_be_slice(self.word_at(offset)?))
    }

    /// A slot interpreted as a buffer offset or length. Anything that does
    /// not fit `usize` cannot address this buffer either.
    pub fn usize_at(&self, offset: usize) -> VaultResult<usize> {
        let value = self.uint_at(offset)?;
        u64::try_from(value)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or(VaultError::OutOfBounds {
                offset,
                len: self.data.len(),
            })
    }

    /// An address slot: 12 zero bytes then the 20 address bytes.
    pub fn address_at(&self, offset: usize) -> VaultResult<Address> {
        let word = self.word_at(offset)?;
        Ok(Address::from_slice(&word[12..32]))
    }

    pub fn bool_at(&self, offset: usize) -> VaultResult<bool> {
        Ok(self.word_at(offset)?[31] != 0)
    }

    pub fn b256_at(&self, offset: usize) -> VaultResult<B256> {
        Ok(B256::from_slice(self.word_at(offset)?))
    }

    /// A length-prefixed UTF-8 string: 32-byte big-endian byte length at
    /// `offset`, then that many content bytes. The declared length is in
    /// bytes, not hex characters.
    pub fn str_at(&self, offset: usize) -> VaultResult<String> {
        let len = self.usize_at(offset)?;
        let bytes = self.bytes_at(offset + 32, len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| VaultError::Codec("string field is not valid UTF-8".to_string()))
    }

    /// Take the next 32-byte slot and advance.
    pub fn take_word(&mut self) -> VaultResult<&'a [u8]> {
        let word = self.word_at(self.pos)?;
        self.pos += 32;
        Ok(word)
    }

    pub fn take_uint(&mut self) -> VaultResult<U256> {
        Ok(U256::from_be_slice(self.take_word()?))
    }

    pub fn take_usize(&mut self) -> VaultResult<usize> {
        let value = self.usize_at(self.pos)?;
        self.pos += 32;
        Ok(value)
    }

    pub fn take_address(&mut self) -> VaultResult<Address> {
        let word = self.take_word()?;
        Ok(Address::from_slice(&word[12..32]))
    }

    pub fn take_bool(&mut self) -> VaultResult<bool> {
        Ok(self.take_word()?[31] != 0)
    }

    pub fn take_b256(&mut self) -> VaultResult<B256> {
        Ok(B256::from_slice(self.take_word()?))
    }
}
