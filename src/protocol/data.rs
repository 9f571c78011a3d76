//! Data blocks.
//!
//! ```text
//! [Opcode(2)] [Block(2)] [payload: rest of datagram]
//! ```
//!
//! There is no length prefix: everything after the block number is payload,
//! including nothing at all.

use crate::core::wire::{decode_u16, encode_u16, U16_LEN};
use crate::error::constants::FIELD_BLOCK;
use crate::error::{CodecError, Result};
use crate::protocol::message::{decode_opcode, encode_opcode, WireMessage};
use crate::protocol::opcode::Opcode;
use bytes::Bytes;

/// Block size used when no `blksize` option was negotiated (RFC 1350)
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Opcode plus block number
pub const DATA_HEADER_LEN: usize = 2 * U16_LEN;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Data {
    block: u16,
    payload: Bytes,
}

impl Data {
    pub fn new(block: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            block,
            payload: payload.into(),
        }
    }

    pub fn block(&self) -> u16 {
        self.block
    }

    pub fn set_block(&mut self, block: u16) {
        self.block = block;
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Cheap clone of the payload buffer
    pub fn payload_bytes(&self) -> Bytes {
        self.payload.clone()
    }

    /// Replace the payload; the previous buffer is released.
    pub fn set_payload(&mut self, payload: impl Into<Bytes>) {
        self.payload = payload.into();
    }

    /// A block shorter than the negotiated size ends the transfer.
    pub fn is_final(&self, block_size: usize) -> bool {
        self.payload.len() < block_size
    }
}

impl WireMessage for Data {
    fn opcode(&self) -> Opcode {
        Opcode::Data
    }

    fn encoded_len(&self) -> usize {
        DATA_HEADER_LEN + self.payload.len()
    }

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let needed = self.encoded_len();
        if buf.len() < needed {
            return Err(CodecError::too_small(needed, buf.len()));
        }

        let mut off = encode_opcode(Opcode::Data, buf)?;
        off += encode_u16(self.block, &mut buf[off..])?;
        buf[off..off + self.payload.len()].copy_from_slice(&self.payload);
        off += self.payload.len();
        Ok(off)
    }

    fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let (_, off) = decode_opcode(buf, &[Opcode::Data])?;
        let (block, used) =
            decode_u16(&buf[off..]).map_err(|_| CodecError::Truncated(FIELD_BLOCK))?;
        let payload = Bytes::copy_from_slice(&buf[off + used..]);
        Ok((Self { block, payload }, buf.len()))
    }
}
