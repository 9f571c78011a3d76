//! # tftp-wire
//!
//! Typed wire codec for the Trivial File Transfer Protocol (RFC 1350) and
//! its option extension (RFC 2347) with the `blksize` (RFC 2348), `timeout`
//! and `tsize` (RFC 2349) options.
//!
//! The crate turns messages into bytes and bytes into messages. It performs
//! no I/O: a transport hands it one datagram at a time and sends whatever a
//! single encode produced.
//!
//! ## Quick Start
//!
//! ```rust
//! use tftp_wire::{Message, Request, TransferMode, WireMessage};
//!
//! let rrq = Request::read("test.txt", TransferMode::Octet).with_option("blksize", "1024");
//! let bytes = rrq.to_bytes()?;
//!
//! match Message::from_datagram(&bytes)? {
//!     Message::Request(req) => {
//!         assert_eq!(req.filename(), "test.txt");
//!         assert_eq!(req.options().find("BLKSIZE").map(|o| o.as_u32()), Some(1024));
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), tftp_wire::CodecError>(())
//! ```
//!
//! ## Message Types
//!
//! | Opcode | Name  | Body                               |
//! |--------|-------|------------------------------------|
//! | 1      | RRQ   | filename, mode, options            |
//! | 2      | WRQ   | filename, mode, options            |
//! | 3      | DATA  | block number, payload              |
//! | 4      | ACK   | block number                       |
//! | 5      | ERROR | error code, message                |
//! | 6      | OACK  | options                            |
//!
//! ## Layout
//! - [`core`]: wire primitives and the `tokio-util` datagram codec
//! - [`protocol`]: message types, options, negotiation, dispatch
//! - [`config`]: TOML/env configuration
//! - [`utils`]: logging setup and metrics

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::codec::TftpCodec;
pub use config::TftpConfig;
pub use error::{CodecError, Result};
pub use protocol::ack::Ack;
pub use protocol::data::Data;
pub use protocol::error_msg::ErrorMessage;
pub use protocol::message::{Message, WireMessage};
pub use protocol::oack::OptionAck;
pub use protocol::opcode::{ErrorCode, Opcode, TransferMode};
pub use protocol::option::{OptionSet, TftpOption};
pub use protocol::request::{Request, RequestKind};
