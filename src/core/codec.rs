//! # Datagram Codec
//!
//! [`TftpCodec`] adapts the message layer to `tokio_util::codec` so it can
//! be dropped into `UdpFramed`. TFTP has no stream framing: each datagram is
//! exactly one message, so `decode` consumes whatever is in the buffer in a
//! single call.
//!
//! ```rust,no_run
//! use tftp_wire::core::codec::TftpCodec;
//! use tokio_util::udp::UdpFramed;
//!
//! # async fn run() -> std::io::Result<()> {
//! let socket = tokio::net::UdpSocket::bind("0.0.0.0:6969").await?;
//! let framed = UdpFramed::new(socket, TftpCodec::default());
//! # drop(framed);
//! # Ok(())
//! # }
//! ```

use crate::config::CodecConfig;
use crate::error::constants::ERR_TRAILING_BYTES;
use crate::error::{CodecError, Result};
use crate::protocol::message::{Message, WireMessage};
use crate::utils::metrics::CodecMetrics;
use bytes::BytesMut;
use std::sync::Arc;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, warn};

/// One datagram, one message
#[derive(Debug, Clone, Default)]
pub struct TftpCodec {
    config: CodecConfig,
    metrics: Option<Arc<CodecMetrics>>,
}

impl TftpCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            metrics: None,
        }
    }

    /// Record activity into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<CodecMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn check_payload(&self, msg: &Message) -> Result<()> {
        if let Message::Data(data) = msg {
            let limit = usize::from(self.config.max_block_size);
            if data.payload().len() > limit {
                warn!(
                    len = data.payload().len(),
                    limit,
                    block = data.block(),
                    "Rejecting oversized data block"
                );
                return Err(CodecError::OversizedPayload {
                    len: data.payload().len(),
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Decode one datagram, returning the message and the bytes it used.
    fn decode_datagram(&self, datagram: &[u8]) -> Result<(Message, usize)> {
        let (msg, used) = Message::decode(datagram)?;
        if used < datagram.len() {
            if self.config.strict_length {
                return Err(CodecError::Malformed(ERR_TRAILING_BYTES));
            }
            debug!(
                opcode = %msg.opcode(),
                trailing = datagram.len() - used,
                "Ignoring trailing bytes after message"
            );
        }
        self.check_payload(&msg)?;
        Ok((msg, used))
    }

    /// Append `msg` to `dst`; on failure `dst` is left as it was.
    fn encode_into(&self, msg: &Message, len: usize, dst: &mut BytesMut) -> Result<()> {
        self.check_payload(msg)?;
        let start = dst.len();
        dst.resize(start + len, 0);
        if let Err(e) = msg.encode(&mut dst[start..]) {
            dst.truncate(start);
            return Err(e);
        }
        Ok(())
    }

    fn record<T>(&self, result: &Result<T>, len: usize, encoding: bool) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        match (result.is_ok(), encoding) {
            (true, true) => metrics.message_encoded(len as u64),
            (true, false) => metrics.message_decoded(len as u64),
            (false, true) => metrics.encode_error(),
            (false, false) => metrics.decode_error(),
        }
    }
}

impl Decoder for TftpCodec {
    type Item = Message;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>> {
        if src.is_empty() {
            return Ok(None);
        }

        let datagram = src.split();
        let result = self.decode_datagram(&datagram);
        let used = result.as_ref().map_or(datagram.len(), |(_, used)| *used);
        self.record(&result, used, false);
        result.map(|(msg, _)| Some(msg))
    }
}

impl Encoder<Message> for TftpCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<()> {
        let len = item.encoded_len();
        let result = self.encode_into(&item, len, dst);
        self.record(&result, len, true);
        result
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::protocol::ack::Ack;
    use crate::protocol::data::Data;

    #[test]
    fn test_empty_buffer_yields_none() {
        let mut codec = TftpCodec::default();
        let mut buf = BytesMut::new();
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_consumes_whole_datagram() {
        let mut codec = TftpCodec::default();
        let mut buf = BytesMut::from(&[0x00, 0x04, 0x00, 0x02, 0xAA][..]);
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg, Message::Ack(Ack::new(2)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_ignored_trailing_bytes_not_counted() {
        let metrics = Arc::new(CodecMetrics::new());
        let mut codec = TftpCodec::default().with_metrics(metrics.clone());
        let mut buf = BytesMut::from(&[0x00, 0x04, 0x00, 0x02, 0xAA, 0xBB][..]);

        codec.decode(&mut buf).unwrap().unwrap();
        let snap = metrics.snapshot();
        assert_eq!(snap.messages_decoded, 1);
        assert_eq!(snap.bytes_decoded, 4);
    }

    #[test]
    fn test_strict_length_rejects_trailing_bytes() {
        let mut codec = TftpCodec::new(CodecConfig {
            strict_length: true,
            ..CodecConfig::default()
        });
        let mut buf = BytesMut::from(&[0x00, 0x04, 0x00, 0x02, 0xAA][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::Malformed(ERR_TRAILING_BYTES))
        ));
    }

    #[test]
    fn test_oversized_block_rejected_both_ways() {
        let metrics = Arc::new(CodecMetrics::new());
        let mut codec = TftpCodec::new(CodecConfig {
            max_block_size: 512,
            ..CodecConfig::default()
        })
        .with_metrics(metrics.clone());

        let big = Message::Data(Data::new(1, vec![0u8; 513]));
        let mut dst = BytesMut::new();
        assert!(matches!(
            codec.encode(big.clone(), &mut dst),
            Err(CodecError::OversizedPayload { len: 513, limit: 512 })
        ));
        assert!(dst.is_empty());

        let mut src = BytesMut::from(&big.to_bytes().unwrap()[..]);
        assert!(matches!(
            codec.decode(&mut src),
            Err(CodecError::OversizedPayload { .. })
        ));

        let snap = metrics.snapshot();
        assert_eq!(snap.encode_errors, 1);
        assert_eq!(snap.decode_errors, 1);
    }

    #[test]
    fn test_encode_appends() {
        let mut codec = TftpCodec::default();
        let mut dst = BytesMut::from(&b"xx"[..]);
        codec.encode(Message::Ack(Ack::new(1)), &mut dst).unwrap();
        assert_eq!(&dst[..], &[b'x', b'x', 0x00, 0x04, 0x00, 0x01]);
    }
}
