//! Read and write requests (RRQ / WRQ).
//!
//! ```text
//! [Opcode(2)] [filename...\0] [mode...\0] [option*]
//! ```

use crate::config::NegotiationConfig;
use crate::core::wire::{decode_field_str, encode_str, str_len, U16_LEN};
use crate::error::constants::{ERR_EMPTY_FILENAME, FIELD_FILENAME, FIELD_MODE};
use crate::error::{CodecError, Result};
use crate::protocol::message::{decode_opcode, encode_opcode, WireMessage};
use crate::protocol::opcode::{Opcode, TransferMode};
use crate::protocol::option::{OptionSet, TftpOption};
use tracing::debug;

/// Direction of a request; fixes the opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Read,
    Write,
}

impl RequestKind {
    pub fn opcode(self) -> Opcode {
        match self {
            RequestKind::Read => Opcode::ReadRequest,
            RequestKind::Write => Opcode::WriteRequest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    kind: RequestKind,
    filename: String,
    mode: TransferMode,
    options: OptionSet,
}

impl Request {
    pub fn new(kind: RequestKind, filename: impl Into<String>, mode: TransferMode) -> Self {
        Self {
            kind,
            filename: filename.into(),
            mode,
            options: OptionSet::new(),
        }
    }

    /// Read request (RRQ)
    pub fn read(filename: impl Into<String>, mode: TransferMode) -> Self {
        Self::new(RequestKind::Read, filename, mode)
    }

    /// Write request (WRQ)
    pub fn write(filename: impl Into<String>, mode: TransferMode) -> Self {
        Self::new(RequestKind::Write, filename, mode)
    }

    /// Request in the transfer mode `config` names as its default
    pub fn with_default_mode(
        kind: RequestKind,
        filename: impl Into<String>,
        config: &NegotiationConfig,
    ) -> Self {
        Self::new(kind, filename, config.default_mode)
    }

    /// Builder-style option insertion (merges duplicates)
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(TftpOption::new(name, value));
        self
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransferMode) {
        self.mode = mode;
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionSet {
        &mut self.options
    }
}

impl WireMessage for Request {
    fn opcode(&self) -> Opcode {
        self.kind.opcode()
    }

    fn encoded_len(&self) -> usize {
        U16_LEN + str_len(&self.filename) + str_len(self.mode.as_str()) + self.options.encoded_len()
    }

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if self.filename.is_empty() {
            return Err(CodecError::Malformed(ERR_EMPTY_FILENAME));
        }
        let needed = self.encoded_len();
        if buf.len() < needed {
            return Err(CodecError::too_small(needed, buf.len()));
        }

        let mut off = encode_opcode(self.opcode(), buf)?;
        off += encode_str(&self.filename, &mut buf[off..])?;
        off += encode_str(self.mode.as_str(), &mut buf[off..])?;
        off += self.options.encode(&mut buf[off..])?;
        Ok(off)
    }

    fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let (opcode, mut off) = decode_opcode(buf, &[Opcode::ReadRequest, Opcode::WriteRequest])?;
        let kind = match opcode {
            Opcode::WriteRequest => RequestKind::Write,
            _ => RequestKind::Read,
        };

        let (filename, used) = decode_field_str(&buf[off..], FIELD_FILENAME)?;
        if filename.is_empty() {
            return Err(CodecError::Malformed(ERR_EMPTY_FILENAME));
        }
        off += used;

        let (mode_str, used) = decode_field_str(&buf[off..], FIELD_MODE)?;
        off += used;
        let mode = TransferMode::from_wire(&mode_str);
        if !mode.is_valid() {
            debug!(mode = %mode_str, filename = %filename, "Unrecognized transfer mode in request");
        }

        let (options, used) = OptionSet::decode(&buf[off..])?;
        off += used;

        Ok((
            Self {
                kind,
                filename,
                mode,
                options,
            },
            off,
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_default_mode_comes_from_config() {
        let req = Request::with_default_mode(
            RequestKind::Read,
            "boot.cfg",
            &NegotiationConfig::default(),
        );
        assert_eq!(req.mode(), TransferMode::Octet);

        let config = NegotiationConfig {
            default_mode: TransferMode::Netascii,
            ..NegotiationConfig::default()
        };
        let bytes = Request::with_default_mode(RequestKind::Write, "notes.txt", &config)
            .to_bytes()
            .unwrap();
        assert_eq!(&bytes[2..], b"notes.txt\0netascii\0");
    }

    #[test]
    fn test_write_request_opcode() {
        let req = Request::write("upload.bin", TransferMode::Octet);
        let bytes = req.to_bytes().unwrap();
        assert_eq!(&bytes[..2], &[0x00, 0x02]);
        let (decoded, used) = Request::decode(&bytes).unwrap();
        assert_eq!(decoded.kind(), RequestKind::Write);
        assert_eq!(used, bytes.len());
    }

    #[test]
    fn test_request_with_options_roundtrip() {
        let req = Request::read("boot/pxelinux.0", TransferMode::Netascii)
            .with_option("blksize", "1428")
            .with_option("tsize", "0");
        let bytes = req.to_bytes().unwrap();
        let (decoded, _) = Request::decode(&bytes).unwrap();
        assert_eq!(decoded, req);
        assert_eq!(decoded.options().len(), 2);
    }

    #[test]
    fn test_mode_is_case_insensitive_on_decode() {
        let bytes = b"\x00\x01file\0OcTeT\0";
        let (req, _) = Request::decode(bytes).unwrap();
        assert_eq!(req.mode(), TransferMode::Octet);
    }

    #[test]
    fn test_unknown_mode_decodes_to_invalid() {
        let bytes = b"\x00\x01file\0binary\0";
        let (req, used) = Request::decode(bytes).unwrap();
        assert_eq!(req.mode(), TransferMode::Invalid);
        assert_eq!(req.filename(), "file");
        assert_eq!(used, bytes.len());
    }

    #[test]
    fn test_empty_filename_rejected() {
        let req = Request::read("", TransferMode::Octet);
        let mut buf = [0u8; 32];
        assert!(matches!(
            req.encode(&mut buf),
            Err(CodecError::Malformed(ERR_EMPTY_FILENAME))
        ));
        assert!(matches!(
            Request::decode(b"\x00\x01\0octet\0"),
            Err(CodecError::Malformed(ERR_EMPTY_FILENAME))
        ));
    }

    #[test]
    fn test_truncated_fields() {
        assert!(matches!(
            Request::decode(b"\x00"),
            Err(CodecError::Truncated(_))
        ));
        assert!(matches!(
            Request::decode(b"\x00\x01file"),
            Err(CodecError::Truncated(FIELD_FILENAME))
        ));
        assert!(matches!(
            Request::decode(b"\x00\x01file\0oct"),
            Err(CodecError::Truncated(FIELD_MODE))
        ));
    }

    #[test]
    fn test_wrong_opcode_rejected() {
        assert!(matches!(
            Request::decode(&[0x00, 0x04, 0x00, 0x01]),
            Err(CodecError::UnexpectedOpcode { found: 4, .. })
        ));
    }
}
