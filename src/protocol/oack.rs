//! Option acknowledgements (RFC 2347).
//!
//! ```text
//! [Opcode(2)] [option*]
//! ```

use crate::core::wire::U16_LEN;
use crate::error::{CodecError, Result};
use crate::protocol::message::{decode_opcode, encode_opcode, WireMessage};
use crate::protocol::opcode::Opcode;
use crate::protocol::option::{OptionSet, TftpOption};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionAck {
    options: OptionSet,
}

impl OptionAck {
    pub fn new(options: OptionSet) -> Self {
        Self { options }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(TftpOption::new(name, value));
        self
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionSet {
        &mut self.options
    }

    pub fn into_options(self) -> OptionSet {
        self.options
    }
}

impl WireMessage for OptionAck {
    fn opcode(&self) -> Opcode {
        Opcode::OptionAck
    }

    fn encoded_len(&self) -> usize {
        U16_LEN + self.options.encoded_len()
    }

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let needed = self.encoded_len();
        if buf.len() < needed {
            return Err(CodecError::too_small(needed, buf.len()));
        }
        let off = encode_opcode(Opcode::OptionAck, buf)?;
        Ok(off + self.options.encode(&mut buf[off..])?)
    }

    fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let (_, off) = decode_opcode(buf, &[Opcode::OptionAck])?;
        let (options, used) = OptionSet::decode(&buf[off..])?;
        Ok((Self { options }, off + used))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_empty_oack() {
        let bytes = OptionAck::default().to_bytes().unwrap();
        assert_eq!(bytes, [0x00, 0x06]);
        let (oack, used) = OptionAck::decode(&bytes).unwrap();
        assert!(oack.options().is_empty());
        assert_eq!(used, 2);
    }

    #[test]
    fn test_oack_propagates_option_failure() {
        assert!(matches!(
            OptionAck::decode(b"\x00\x06blksize\x001024"),
            Err(CodecError::Malformed(_))
        ));
    }
}
