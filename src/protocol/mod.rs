//! # Protocol Layer
//!
//! TFTP message types, options and negotiation.
//!
//! ## Components
//! - **Opcode**: opcodes, error codes and transfer modes
//! - **Option**: single options and the ordered [`OptionSet`](option::OptionSet)
//! - **Message**: the [`WireMessage`](message::WireMessage) capability and the
//!   [`Message`](message::Message) sum type
//! - **Variants**: [`Request`](request::Request), [`Data`](data::Data),
//!   [`Ack`](ack::Ack), [`ErrorMessage`](error_msg::ErrorMessage),
//!   [`OptionAck`](oack::OptionAck)
//! - **Dispatcher**: opcode-keyed handler routing
//! - **Negotiation**: `blksize` / `timeout` / `tsize` acceptance rules
//!
//! ## Wire Format
//! ```text
//! RRQ/WRQ : [1|2][filename\0][mode\0][option*]
//! DATA    : [3][block:2][payload]
//! ACK     : [4][block:2]
//! ERROR   : [5][code:2][message\0]
//! OACK    : [6][option*]
//! option  : [name\0][value\0]
//! ```

pub mod ack;
pub mod data;
pub mod dispatcher;
pub mod error_msg;
pub mod message;
pub mod negotiation;
pub mod oack;
pub mod opcode;
pub mod option;
pub mod request;

#[cfg(test)]
mod tests;
