//! Error types for the winnowing/chaffing core.
//!
//! One `thiserror`-derived enum per subsystem: the wire codec, sender, and
//! receiver each surface their own failure kinds rather than sharing one
//! catch-all.

use thiserror::Error;

/// Errors from decoding a packet off the wire.
#[derive(Error, Debug)]
pub enum WireError {
    /// The header's `size` field was zero; zero-size packets are malformed.
    #[error("malformed frame: size field is zero")]
    ZeroSizePayload,

    /// A header was fully read but the payload was short — the source
    /// closed mid-packet rather than at a clean header boundary.
    #[error("malformed frame: payload truncated (expected {expected} bytes, got {actual})")]
    PayloadTruncated {
        /// Bytes the header claimed the payload would contain.
        expected: u32,
        /// Bytes actually available before the source was exhausted.
        actual: usize,
    },

    /// Propagated verbatim from the underlying byte source/sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from [`crate::sender::Sender::close`].
#[derive(Error, Debug)]
pub enum SenderError {
    /// A second `close()` call on an already-closed sender.
    #[error("sender already closed")]
    AlreadyClosed,

    /// The sink rejected a write, or the connection dropped.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cryptographic random source failed to produce chaff content.
    /// Fatal by design: chaff MUST NOT degrade to a deterministic fill,
    /// since predictable chaff is trivially distinguishable from real
    /// packets under HMAC-SHA512's collision resistance.
    #[error("failed to draw chaff randomness: {0}")]
    Rng(#[from] getrandom::Error),
}

/// Errors from [`crate::receiver::Receiver::read_all`].
///
/// Kept distinct from [`WireError`] (rather than a blanket `#[from]`) so
/// that I/O failures and framing failures remain separately inspectable,
/// even though both originate from the wire codec.
#[derive(Error, Debug)]
pub enum ReceiverError {
    /// The source rejected a read, or the connection dropped.
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    /// A header decoded but the frame was otherwise malformed.
    #[error("framing error: {0}")]
    Framing(String),
}

impl From<WireError> for ReceiverError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Io(io_err) => Self::Io(io_err),
            other => Self::Framing(other.to_string()),
        }
    }
}
