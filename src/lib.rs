//! Winnowing-and-chaffing messaging core (Rivest's construction).
//!
//! Confidentiality here comes from interleaving each authentic payload
//! packet with indistinguishable decoy packets, not from encrypting the
//! payload. [`Sender`] produces and interleaves the two streams; the
//! keyed-MAC holder on the other end, [`Receiver`], discards ("winnows")
//! everything whose MAC doesn't verify and keeps the rest, in arrival
//! order.
//!
//! See [`wire`] for the on-the-wire packet format, [`crypto`] for the
//! HMAC-SHA512 MAC engine, and [`chaff`] for decoy generation.

// Suppresses stylistic noise from the generic sink/source bounds below
// while keeping correctness lints enforced.
#![allow(clippy::type_complexity)]

pub mod chaff;
pub mod crypto;
pub mod error;
pub mod receiver;
pub mod sender;
pub mod wire;

pub use error::{ReceiverError, SenderError, WireError};
pub use receiver::Receiver;
pub use sender::{Sender, DEFAULT_NUM_CHAFF};
pub use wire::{Packet, PacketHeader};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
