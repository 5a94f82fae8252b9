//! Receiver / winnower.
//!
//! Reads packets one at a time, verifies each against `secret`, and keeps
//! only the payloads that verify — in arrival order, never reordered by
//! `sequence`. Cross-block order is already plaintext order because the
//! sender never reorders across blocks; within a block, arrival order is
//! the sender's random permutation, which authentic packets pass through
//! untouched since exactly one packet per block is genuine.

use tokio::io::AsyncRead;

use crate::crypto::mac;
use crate::error::ReceiverError;
use crate::wire::Packet;

/// Holds a byte-source exclusively until [`Self::read_all`] drains it.
pub struct Receiver<R> {
    secret: Vec<u8>,
    source: R,
}

impl<R> Receiver<R>
where
    R: AsyncRead + Unpin,
{
    /// Create a receiver bound to `secret` and `source`.
    pub fn new(secret: impl Into<Vec<u8>>, source: R) -> Self {
        Self { secret: secret.into(), source }
    }

    /// Read packets until end-of-stream, winnow out everything that fails
    /// verification, and return the concatenated authentic payloads.
    ///
    /// End-of-stream exactly at a header boundary is normal termination.
    /// A framing error or I/O error mid-packet aborts the read and is
    /// returned to the caller; no partial message is returned — the result
    /// is all-or-nothing.
    pub async fn read_all(mut self) -> Result<Vec<u8>, ReceiverError> {
        let mut message = Vec::new();
        let mut packets_seen = 0u64;
        let mut packets_kept = 0u64;

        loop {
            match Packet::decode_one(&mut self.source).await? {
                None => break,
                Some(packet) => {
                    packets_seen += 1;
                    if mac::verify(&self.secret, &packet.payload, &packet.header.mac) {
                        packets_kept += 1;
                        message.extend_from_slice(&packet.payload);
                    } else {
                        log::trace!("dropped packet at sequence {}", packet.header.sequence);
                    }
                }
            }
        }

        log::info!(
            "receiver drained: {packets_kept}/{packets_seen} packets verified, {} bytes recovered",
            message.len()
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Packet;

    #[tokio::test]
    async fn recovers_single_authentic_packet() {
        let secret = b"k";
        let tag = mac::mac(secret, b"A");
        let packet = Packet::new(0, tag, vec![b'A']);

        let mut wire = Vec::new();
        packet.encode(&mut wire).await.unwrap();

        let cursor = std::io::Cursor::new(wire);
        let receiver = Receiver::new(secret.to_vec(), cursor);
        let message = receiver.read_all().await.unwrap();
        assert_eq!(message, b"A");
    }

    #[tokio::test]
    async fn drops_packets_that_fail_verification() {
        let real_tag = mac::mac(b"k", b"A");
        let real = Packet::new(0, real_tag, vec![b'A']);
        let chaff = Packet::new(0, [0xFFu8; 64], vec![0x00]);

        let mut wire = Vec::new();
        chaff.encode(&mut wire).await.unwrap();
        real.encode(&mut wire).await.unwrap();

        let cursor = std::io::Cursor::new(wire);
        let receiver = Receiver::new(b"k".to_vec(), cursor);
        let message = receiver.read_all().await.unwrap();
        assert_eq!(message, b"A");
    }

    #[tokio::test]
    async fn empty_source_yields_empty_message() {
        let cursor = std::io::Cursor::new(Vec::<u8>::new());
        let receiver = Receiver::new(b"k".to_vec(), cursor);
        let message = receiver.read_all().await.unwrap();
        assert!(message.is_empty());
    }

    #[tokio::test]
    async fn wrong_secret_yields_nothing() {
        let tag = mac::mac(b"k", b"hi");
        let packet = Packet::new(0, tag, vec![b'h']);

        let mut wire = Vec::new();
        packet.encode(&mut wire).await.unwrap();

        let cursor = std::io::Cursor::new(wire);
        let receiver = Receiver::new(b"k-prime".to_vec(), cursor);
        let message = receiver.read_all().await.unwrap();
        assert!(message.is_empty());
    }
}
