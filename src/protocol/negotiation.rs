//! # Option Negotiation
//!
//! Server- and client-side handling of the `blksize`, `timeout` and `tsize`
//! options (RFC 2347, 2348, 2349).
//!
//! The server calls [`negotiate`] with the options from a request and gets
//! back the subset it accepts (to send in an OACK) together with the
//! parameters the transfer should run with. The client checks that OACK
//! against its proposal with [`accept_option_ack`].
//!
//! ```rust
//! use tftp_wire::config::NegotiationConfig;
//! use tftp_wire::protocol::negotiation::negotiate;
//! use tftp_wire::protocol::option::OptionSet;
//!
//! let mut requested = OptionSet::new();
//! requested.insert_value("blksize", "1428");
//! requested.insert_value("tsize", "0");
//!
//! let outcome = negotiate(&requested, &NegotiationConfig::default(), Some(4096));
//! assert_eq!(outcome.params().block_size, 1428);
//! assert_eq!(outcome.params().transfer_size, Some(4096));
//! assert!(outcome.option_ack().is_some());
//! ```

use crate::config::{NegotiationConfig, MIN_BLOCK_SIZE};
use crate::error::{CodecError, Result};
use crate::protocol::data::DEFAULT_BLOCK_SIZE;
use crate::protocol::oack::OptionAck;
use crate::protocol::option::{OptionSet, OPT_BLKSIZE, OPT_TIMEOUT, OPT_TSIZE};
use std::time::Duration;
use tracing::debug;

/// Parameters a transfer runs with once negotiation is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferParams {
    pub block_size: u16,
    /// Retransmission timeout; `None` leaves the transport's default
    pub timeout: Option<Duration>,
    /// Total transfer size, when announced
    pub transfer_size: Option<u64>,
}

impl Default for TransferParams {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE as u16,
            timeout: None,
            transfer_size: None,
        }
    }
}

/// Result of server-side negotiation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Negotiation {
    accepted: OptionSet,
    params: TransferParams,
}

impl Negotiation {
    /// Options the server agreed to, in request order
    pub fn accepted(&self) -> &OptionSet {
        &self.accepted
    }

    pub fn params(&self) -> TransferParams {
        self.params
    }

    /// The OACK to send, or `None` when nothing was accepted and the
    /// transfer should start as plain RFC 1350.
    pub fn option_ack(&self) -> Option<OptionAck> {
        if self.accepted.is_empty() {
            None
        } else {
            Some(OptionAck::new(self.accepted.clone()))
        }
    }
}

/// Decide which requested options to accept.
///
/// `transfer_size` is the size of the file being read, when known. For a
/// write request pass `None` and the client's announced size is echoed.
/// Unsupported and out-of-range options are dropped, never failed.
pub fn negotiate(
    requested: &OptionSet,
    config: &NegotiationConfig,
    transfer_size: Option<u64>,
) -> Negotiation {
    let mut outcome = Negotiation::default();

    for option in requested {
        if option.is_named(OPT_BLKSIZE) && config.blksize_enabled {
            let asked = option.as_u64();
            if asked < u64::from(config.min_block_size) {
                debug!(requested = asked, "Ignoring blksize below minimum");
                continue;
            }
            let size = asked.min(u64::from(config.max_block_size)) as u16;
            if u64::from(size) != asked {
                debug!(requested = asked, granted = size, "Clamped blksize");
            }
            outcome.accepted.insert_number(OPT_BLKSIZE, u64::from(size));
            outcome.params.block_size = size;
        } else if option.is_named(OPT_TIMEOUT) && config.timeout_enabled {
            let secs = option.as_u64();
            let in_range =
                secs >= config.min_timeout.as_secs() && secs <= config.max_timeout.as_secs();
            if !in_range {
                debug!(requested = secs, "Ignoring out-of-range timeout");
                continue;
            }
            outcome.accepted.insert_number(OPT_TIMEOUT, secs);
            outcome.params.timeout = Some(Duration::from_secs(secs));
        } else if option.is_named(OPT_TSIZE) && config.tsize_enabled {
            let size = transfer_size.unwrap_or_else(|| option.as_u64());
            outcome.accepted.insert_number(OPT_TSIZE, size);
            outcome.params.transfer_size = Some(size);
        } else {
            debug!(option = %option, "Ignoring unsupported option");
        }
    }

    outcome
}

/// Validate a server's OACK against what the client proposed.
///
/// # Errors
/// `NegotiationFailed` when the server acknowledges an option that was not
/// proposed, answers `blksize` outside `[8, proposed]`, or alters `timeout`.
pub fn accept_option_ack(proposed: &OptionSet, oack: &OptionSet) -> Result<TransferParams> {
    let mut params = TransferParams::default();

    for option in oack {
        let asked = proposed.find(option.name()).ok_or_else(|| {
            CodecError::NegotiationFailed(format!(
                "server acknowledged unrequested option '{}'",
                option.name()
            ))
        })?;

        if option.is_named(OPT_BLKSIZE) {
            let granted = option.as_u64();
            if granted < u64::from(MIN_BLOCK_SIZE) || granted > asked.as_u64() {
                return Err(CodecError::NegotiationFailed(format!(
                    "blksize {granted} outside proposed range {MIN_BLOCK_SIZE}..={}",
                    asked.as_u64()
                )));
            }
            params.block_size = u16::try_from(granted).map_err(|_| {
                CodecError::NegotiationFailed(format!("blksize {granted} does not fit a block"))
            })?;
        } else if option.is_named(OPT_TIMEOUT) {
            if option.as_u64() != asked.as_u64() {
                return Err(CodecError::NegotiationFailed(format!(
                    "timeout changed from {} to {}",
                    asked.value(),
                    option.value()
                )));
            }
            params.timeout = Some(Duration::from_secs(option.as_u64()));
        } else if option.is_named(OPT_TSIZE) {
            params.transfer_size = Some(option.as_u64());
        }
    }

    Ok(params)
}
