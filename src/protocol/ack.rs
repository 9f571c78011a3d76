//! Block acknowledgements.
//!
//! ```text
//! [Opcode(2)] [Block(2)]
//! ```

use crate::core::wire::{decode_u16, encode_u16, U16_LEN};
use crate::error::constants::FIELD_BLOCK;
use crate::error::{CodecError, Result};
use crate::protocol::message::{decode_opcode, encode_opcode, WireMessage};
use crate::protocol::opcode::Opcode;

pub const ACK_LEN: usize = 2 * U16_LEN;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ack {
    block: u16,
}

impl Ack {
    pub fn new(block: u16) -> Self {
        Self { block }
    }

    pub fn block(&self) -> u16 {
        self.block
    }
}

impl WireMessage for Ack {
    fn opcode(&self) -> Opcode {
        Opcode::Ack
    }

    fn encoded_len(&self) -> usize {
        ACK_LEN
    }

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < ACK_LEN {
            return Err(CodecError::too_small(ACK_LEN, buf.len()));
        }
        let off = encode_opcode(Opcode::Ack, buf)?;
        Ok(off + encode_u16(self.block, &mut buf[off..])?)
    }

    fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let (_, off) = decode_opcode(buf, &[Opcode::Ack])?;
        let (block, used) =
            decode_u16(&buf[off..]).map_err(|_| CodecError::Truncated(FIELD_BLOCK))?;
        Ok((Self { block }, off + used))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_ack_boundaries() {
        for block in [0u16, 1, u16::MAX] {
            let bytes = Ack::new(block).to_bytes().unwrap();
            assert_eq!(bytes.len(), ACK_LEN);
            assert_eq!(Ack::decode(&bytes).unwrap(), (Ack::new(block), ACK_LEN));
        }
    }

    #[test]
    fn test_ack_reports_consumed_only() {
        let (ack, used) = Ack::decode(&[0x00, 0x04, 0x00, 0x09, 0xEE]).unwrap();
        assert_eq!(ack.block(), 9);
        assert_eq!(used, 4);
    }

    #[test]
    fn test_ack_truncated() {
        assert!(matches!(
            Ack::decode(&[0x00, 0x04, 0x01]),
            Err(CodecError::Truncated(FIELD_BLOCK))
        ));
    }
}
