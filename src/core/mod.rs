//! # Core Codec Components
//!
//! Low-level byte handling shared by every message type.
//!
//! ## Components
//! - **Wire**: big-endian integer and NUL-terminated string primitives
//! - **Codec**: tokio-util datagram codec mapping one datagram to one [`Message`]
//!
//! ## Wire Format
//! ```text
//! [Opcode(2)] [Body(N)]
//! ```
//!
//! [`Message`]: crate::protocol::message::Message

pub mod codec;
pub mod wire;
