//! # Protocol Enumerations
//!
//! Opcodes, error codes and transfer modes with their wire representations.
//!
//! Unknown numeric values are never silently mapped: `TryFrom<u16>` hands
//! back the raw value so callers can decide what to do with it. Transfer
//! modes are the exception; an unrecognised mode string becomes
//! [`TransferMode::Invalid`] so the surrounding request stays decodable.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-byte operation selector at the front of every message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Opcode {
    ReadRequest = 1,
    WriteRequest = 2,
    Data = 3,
    Ack = 4,
    Error = 5,
    OptionAck = 6,
}

impl Opcode {
    pub const ALL: [Opcode; 6] = [
        Opcode::ReadRequest,
        Opcode::WriteRequest,
        Opcode::Data,
        Opcode::Ack,
        Opcode::Error,
        Opcode::OptionAck,
    ];

    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Conventional short name (RRQ, WRQ, DATA, ACK, ERROR, OACK)
    pub fn name(self) -> &'static str {
        match self {
            Opcode::ReadRequest => "RRQ",
            Opcode::WriteRequest => "WRQ",
            Opcode::Data => "DATA",
            Opcode::Ack => "ACK",
            Opcode::Error => "ERROR",
            Opcode::OptionAck => "OACK",
        }
    }
}

impl TryFrom<u16> for Opcode {
    type Error = CodecError;

    fn try_from(raw: u16) -> Result<Self, CodecError> {
        match raw {
            1 => Ok(Opcode::ReadRequest),
            2 => Ok(Opcode::WriteRequest),
            3 => Ok(Opcode::Data),
            4 => Ok(Opcode::Ack),
            5 => Ok(Opcode::Error),
            6 => Ok(Opcode::OptionAck),
            other => Err(CodecError::UnknownOpcode(other)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Standard TFTP error codes (RFC 1350, RFC 2347)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    Undefined = 0,
    FileNotFound = 1,
    AccessViolation = 2,
    DiskFull = 3,
    IllegalOperation = 4,
    UnknownTransferId = 5,
    FileAlreadyExists = 6,
    NoSuchUser = 7,
    OptionNegotiationFailed = 8,
}

impl ErrorCode {
    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Message text to use when the caller has nothing more specific
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::Undefined => "Not defined",
            ErrorCode::FileNotFound => "File not found",
            ErrorCode::AccessViolation => "Access violation",
            ErrorCode::DiskFull => "Disk full or allocation exceeded",
            ErrorCode::IllegalOperation => "Illegal TFTP operation",
            ErrorCode::UnknownTransferId => "Unknown transfer ID",
            ErrorCode::FileAlreadyExists => "File already exists",
            ErrorCode::NoSuchUser => "No such user",
            ErrorCode::OptionNegotiationFailed => "Option negotiation failed",
        }
    }
}

impl TryFrom<u16> for ErrorCode {
    /// The unrecognised raw code
    type Error = u16;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ErrorCode::Undefined),
            1 => Ok(ErrorCode::FileNotFound),
            2 => Ok(ErrorCode::AccessViolation),
            3 => Ok(ErrorCode::DiskFull),
            4 => Ok(ErrorCode::IllegalOperation),
            5 => Ok(ErrorCode::UnknownTransferId),
            6 => Ok(ErrorCode::FileAlreadyExists),
            7 => Ok(ErrorCode::NoSuchUser),
            8 => Ok(ErrorCode::OptionNegotiationFailed),
            other => Err(other),
        }
    }
}

/// Encoding of file content negotiated in a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    Netascii,
    #[default]
    Octet,
    Mail,
    /// Sentinel for a mode string that matched none of the above
    Invalid,
}

impl TransferMode {
    /// Wire spelling. `Invalid` has none and encodes as the empty string.
    pub fn as_str(self) -> &'static str {
        match self {
            TransferMode::Netascii => "netascii",
            TransferMode::Octet => "octet",
            TransferMode::Mail => "mail",
            TransferMode::Invalid => "",
        }
    }

    /// Case-insensitive exact match; anything else is `Invalid`.
    pub fn from_wire(s: &str) -> Self {
        if s.eq_ignore_ascii_case("netascii") {
            TransferMode::Netascii
        } else if s.eq_ignore_ascii_case("octet") {
            TransferMode::Octet
        } else if s.eq_ignore_ascii_case("mail") {
            TransferMode::Mail
        } else {
            TransferMode::Invalid
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != TransferMode::Invalid
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Invalid => f.write_str("invalid"),
            mode => f.write_str(mode.as_str()),
        }
    }
}
