//! # Error Types
//!
//! Error handling for the TFTP wire codec.
//!
//! Every encode and decode operation reports failure explicitly through
//! [`CodecError`]. Nothing is signalled through partially written output:
//! a failed encode leaves no valid bytes and a failed decode produces no
//! message.
//!
//! ## Error Categories
//! - **BufferTooSmall**: destination buffer insufficient for an encode
//! - **Truncated**: input ends before a required field is complete
//! - **Malformed**: bytes are present but violate field structure
//! - **Opcode errors**: unknown opcode or a variant decoder fed the wrong one
//! - **Negotiation / Config / I/O**: errors from the surrounding layers
//!
//! ## Example Usage
//! ```rust
//! use tftp_wire::error::CodecError;
//! use tftp_wire::protocol::ack::Ack;
//! use tftp_wire::protocol::message::WireMessage;
//!
//! let mut buf = [0u8; 3];
//! match Ack::new(5).encode(&mut buf) {
//!     Err(CodecError::BufferTooSmall { needed, .. }) => assert_eq!(needed, 4),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use crate::protocol::error_msg::ErrorMessage;
use crate::protocol::opcode::{ErrorCode, Opcode};
use std::io;
use thiserror::Error;

/// Static field names and messages carried by [`CodecError::Truncated`] and
/// [`CodecError::Malformed`].
pub mod constants {
    /// Field names for truncated input
    pub const FIELD_OPCODE: &str = "opcode";
    pub const FIELD_UINT16: &str = "u16 field";
    pub const FIELD_UINT32: &str = "u32 field";
    pub const FIELD_STRING: &str = "string terminator";
    pub const FIELD_FILENAME: &str = "filename";
    pub const FIELD_MODE: &str = "transfer mode";
    pub const FIELD_BLOCK: &str = "block number";
    pub const FIELD_ERROR_CODE: &str = "error code";
    pub const FIELD_ERROR_TEXT: &str = "error message";
    pub const FIELD_OPTION: &str = "option";

    /// Structural violations
    pub const ERR_EMPTY_FILENAME: &str = "request filename is empty";
    pub const ERR_EMPTY_OPTION_NAME: &str = "option name is empty";
    pub const ERR_OPTION_NAME_UNTERMINATED: &str = "option name has no terminator";
    pub const ERR_OPTION_VALUE_UNTERMINATED: &str = "option value has no terminator";
    pub const ERR_INTERIOR_NUL: &str = "string contains an interior NUL byte";
    pub const ERR_INVALID_UTF8: &str = "string is not valid UTF-8";
    pub const ERR_TRAILING_BYTES: &str = "trailing bytes after message";
}

/// CodecError is the error type for all codec operations
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("Truncated input while reading {0}")]
    Truncated(&'static str),

    #[error("Malformed message: {0}")]
    Malformed(&'static str),

    #[error("Unknown opcode: {0}")]
    UnknownOpcode(u16),

    #[error("Unexpected opcode: expected {expected}, found {found}")]
    UnexpectedOpcode { expected: u16, found: u16 },

    #[error("No handler registered for {0}")]
    UnhandledOpcode(Opcode),

    #[error("Data payload too large: {len} bytes (limit {limit})")]
    OversizedPayload { len: usize, limit: usize },

    #[error("Option negotiation failed: {0}")]
    NegotiationFailed(String),

    #[error("Synchronization primitive poisoned")]
    LockPoisoned,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Shorthand used by the encoders when `available < needed`.
    pub(crate) fn too_small(needed: usize, available: usize) -> Self {
        CodecError::BufferTooSmall { needed, available }
    }

    /// Build the TFTP error packet a peer should receive for this failure.
    pub fn to_error_message(&self) -> ErrorMessage {
        let code = match self {
            CodecError::NegotiationFailed(_) => ErrorCode::OptionNegotiationFailed,
            CodecError::Truncated(_)
            | CodecError::Malformed(_)
            | CodecError::UnknownOpcode(_)
            | CodecError::UnexpectedOpcode { .. }
            | CodecError::UnhandledOpcode(_)
            | CodecError::OversizedPayload { .. } => ErrorCode::IllegalOperation,
            CodecError::BufferTooSmall { .. }
            | CodecError::LockPoisoned
            | CodecError::ConfigError(_)
            | CodecError::Io(_) => ErrorCode::Undefined,
        };
        ErrorMessage::new(code.as_u16(), self.to_string())
    }
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
