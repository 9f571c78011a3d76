//! Error packets.
//!
//! ```text
//! [Opcode(2)] [ErrorCode(2)] [message...\0]
//! ```
//!
//! The code is kept as the raw wire value so codes outside the standard set
//! survive a decode/encode cycle untouched.

use crate::core::wire::{
    decode_field_str, decode_u16, encode_str, encode_u16, str_len, U16_LEN,
};
use crate::error::constants::{FIELD_ERROR_CODE, FIELD_ERROR_TEXT};
use crate::error::{CodecError, Result};
use crate::protocol::message::{decode_opcode, encode_opcode, WireMessage};
use crate::protocol::opcode::{ErrorCode, Opcode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessage {
    code: u16,
    message: String,
}

impl ErrorMessage {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error packet carrying the standard text for `code`
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code.as_u16(), code.default_message())
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Interpret the raw code; `Err` carries a code outside the standard set.
    pub fn error_code(&self) -> std::result::Result<ErrorCode, u16> {
        ErrorCode::try_from(self.code)
    }

    pub fn set_code(&mut self, code: u16) {
        self.code = code;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}

impl WireMessage for ErrorMessage {
    fn opcode(&self) -> Opcode {
        Opcode::Error
    }

    fn encoded_len(&self) -> usize {
        2 * U16_LEN + str_len(&self.message)
    }

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let needed = self.encoded_len();
        if buf.len() < needed {
            return Err(CodecError::too_small(needed, buf.len()));
        }

        let mut off = encode_opcode(Opcode::Error, buf)?;
        off += encode_u16(self.code, &mut buf[off..])?;
        off += encode_str(&self.message, &mut buf[off..])?;
        Ok(off)
    }

    fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let (_, mut off) = decode_opcode(buf, &[Opcode::Error])?;

        let (code, used) =
            decode_u16(&buf[off..]).map_err(|_| CodecError::Truncated(FIELD_ERROR_CODE))?;
        off += used;

        let (message, used) = decode_field_str(&buf[off..], FIELD_ERROR_TEXT)?;
        off += used;

        Ok((Self { code, message }, off))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_empty_message_roundtrip() {
        let err = ErrorMessage::new(0, "");
        let bytes = err.to_bytes().unwrap();
        assert_eq!(bytes, [0x00, 0x05, 0x00, 0x00, 0x00]);
        assert_eq!(ErrorMessage::decode(&bytes).unwrap(), (err, 5));
    }

    #[test]
    fn test_unknown_code_preserved() {
        let err = ErrorMessage::new(0xBEEF, "vendor specific");
        let bytes = err.to_bytes().unwrap();
        let (decoded, _) = ErrorMessage::decode(&bytes).unwrap();
        assert_eq!(decoded.code(), 0xBEEF);
        assert_eq!(decoded.error_code(), Err(0xBEEF));
    }

    #[test]
    fn test_from_code_uses_default_text() {
        let err = ErrorMessage::from_code(ErrorCode::DiskFull);
        assert_eq!(err.code(), 3);
        assert_eq!(err.error_code(), Ok(ErrorCode::DiskFull));
        assert_eq!(err.message(), "Disk full or allocation exceeded");
    }

    #[test]
    fn test_truncated_fields() {
        assert!(matches!(
            ErrorMessage::decode(&[0x00, 0x05, 0x00]),
            Err(CodecError::Truncated(FIELD_ERROR_CODE))
        ));
        assert!(matches!(
            ErrorMessage::decode(b"\x00\x05\x00\x01oops"),
            Err(CodecError::Truncated(FIELD_ERROR_TEXT))
        ));
    }

    #[test]
    fn test_buffer_boundaries() {
        let err = ErrorMessage::new(2, "denied");
        let needed = err.encoded_len();
        for cap in 0..needed {
            let mut buf = vec![0u8; cap];
            assert!(matches!(
                err.encode(&mut buf),
                Err(CodecError::BufferTooSmall { .. })
            ));
        }
    }
}
