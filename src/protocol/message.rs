//! # Message Framing
//!
//! Every TFTP message starts with a two-byte opcode followed by a
//! variant-specific body:
//!
//! ```text
//! [Opcode(2)] [Body(N)]
//! ```
//!
//! [`WireMessage`] is the capability shared by the five variants. Decoders
//! always read and validate the opcode before touching the body, which is
//! what lets [`Message::decode`] peek at the first two bytes and pick the
//! right variant.

use crate::core::wire::{decode_u16, encode_u16, U16_LEN};
use crate::error::constants::FIELD_OPCODE;
use crate::error::{CodecError, Result};
use crate::protocol::ack::Ack;
use crate::protocol::data::Data;
use crate::protocol::error_msg::ErrorMessage;
use crate::protocol::oack::OptionAck;
use crate::protocol::opcode::Opcode;
use crate::protocol::request::Request;
use tracing::trace;

/// Encode/decode capability implemented by every message type
pub trait WireMessage: Sized {
    /// Opcode written at the front of the encoded form
    fn opcode(&self) -> Opcode;

    /// Exact number of bytes [`encode`](Self::encode) will write
    fn encoded_len(&self) -> usize;

    /// Write the message into `buf`, returning the bytes written.
    ///
    /// # Errors
    /// `BufferTooSmall` if `buf` is shorter than [`encoded_len`](Self::encoded_len);
    /// `Malformed` if a field cannot be represented on the wire.
    fn encode(&self, buf: &mut [u8]) -> Result<usize>;

    /// Parse a message from the front of `buf`, returning it with the number
    /// of bytes consumed.
    fn decode(buf: &[u8]) -> Result<(Self, usize)>;

    /// Encode into a freshly allocated, exactly sized buffer.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.encoded_len()];
        let written = self.encode(&mut buf)?;
        buf.truncate(written);
        Ok(buf)
    }
}

/// Read the raw opcode without interpreting it.
pub fn peek_opcode(buf: &[u8]) -> Result<u16> {
    decode_u16(buf)
        .map(|(raw, _)| raw)
        .map_err(|_| CodecError::Truncated(FIELD_OPCODE))
}

/// Write the opcode field.
pub(crate) fn encode_opcode(opcode: Opcode, buf: &mut [u8]) -> Result<usize> {
    encode_u16(opcode.as_u16(), buf)
}

/// Read the opcode field and check it is one of `accepted`.
pub(crate) fn decode_opcode(buf: &[u8], accepted: &[Opcode]) -> Result<(Opcode, usize)> {
    let raw = peek_opcode(buf)?;
    let opcode = Opcode::try_from(raw)?;
    if !accepted.contains(&opcode) {
        return Err(CodecError::UnexpectedOpcode {
            expected: accepted.first().map_or(0, |o| o.as_u16()),
            found: raw,
        });
    }
    Ok((opcode, U16_LEN))
}

/// Any TFTP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Read or write request
    Request(Request),
    Data(Data),
    Ack(Ack),
    Error(ErrorMessage),
    OptionAck(OptionAck),
}

impl Message {
    /// Decode one datagram, ignoring bytes after a complete Ack or Error.
    pub fn from_datagram(datagram: &[u8]) -> Result<Self> {
        Self::decode(datagram).map(|(msg, _)| msg)
    }
}

impl WireMessage for Message {
    fn opcode(&self) -> Opcode {
        match self {
            Message::Request(m) => m.opcode(),
            Message::Data(m) => m.opcode(),
            Message::Ack(m) => m.opcode(),
            Message::Error(m) => m.opcode(),
            Message::OptionAck(m) => m.opcode(),
        }
    }

    fn encoded_len(&self) -> usize {
        match self {
            Message::Request(m) => m.encoded_len(),
            Message::Data(m) => m.encoded_len(),
            Message::Ack(m) => m.encoded_len(),
            Message::Error(m) => m.encoded_len(),
            Message::OptionAck(m) => m.encoded_len(),
        }
    }

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        match self {
            Message::Request(m) => m.encode(buf),
            Message::Data(m) => m.encode(buf),
            Message::Ack(m) => m.encode(buf),
            Message::Error(m) => m.encode(buf),
            Message::OptionAck(m) => m.encode(buf),
        }
    }

    fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let opcode = Opcode::try_from(peek_opcode(buf)?)?;
        let (msg, used) = match opcode {
            Opcode::ReadRequest | Opcode::WriteRequest => {
                Request::decode(buf).map(|(m, n)| (Message::Request(m), n))?
            }
            Opcode::Data => Data::decode(buf).map(|(m, n)| (Message::Data(m), n))?,
            Opcode::Ack => Ack::decode(buf).map(|(m, n)| (Message::Ack(m), n))?,
            Opcode::Error => ErrorMessage::decode(buf).map(|(m, n)| (Message::Error(m), n))?,
            Opcode::OptionAck => {
                OptionAck::decode(buf).map(|(m, n)| (Message::OptionAck(m), n))?
            }
        };
        trace!(opcode = %opcode, consumed = used, len = buf.len(), "Decoded message");
        Ok((msg, used))
    }
}

impl From<Request> for Message {
    fn from(m: Request) -> Self {
        Message::Request(m)
    }
}

impl From<Data> for Message {
    fn from(m: Data) -> Self {
        Message::Data(m)
    }
}

impl From<Ack> for Message {
    fn from(m: Ack) -> Self {
        Message::Ack(m)
    }
}

impl From<ErrorMessage> for Message {
    fn from(m: ErrorMessage) -> Self {
        Message::Error(m)
    }
}

impl From<OptionAck> for Message {
    fn from(m: OptionAck) -> Self {
        Message::OptionAck(m)
    }
}
