//! Decoy packet generation.
//!
//! Each chaff packet's `mac` and `payload` are drawn from a cryptographic
//! random source so that, without `secret`, a chaff packet is
//! distributionally identical to a real one: both are a `sequence` (not
//! secret, not randomized), a `size` of 1, and 65 octets (1 payload + 64
//! MAC) that read as uniform noise to anyone who cannot recompute
//! `HMAC-SHA512(secret, payload)`.

use getrandom::getrandom;

use crate::crypto::{Tag, TAG_SIZE};
use crate::wire::Packet;

/// Build one decoy packet stamped with `sequence`.
///
/// # Errors
/// Returns the underlying [`getrandom::Error`] if the OS random source is
/// unavailable. Chaff MUST NOT fall back to a deterministic fill on
/// failure — that would make decoys distinguishable from real packets by
/// construction — so the caller is expected to treat this as fatal.
pub fn generate(sequence: u32) -> Result<Packet, getrandom::Error> {
    let mut mac: Tag = [0u8; TAG_SIZE];
    getrandom(&mut mac)?;

    let mut payload = [0u8; 1];
    getrandom(&mut payload)?;

    Ok(Packet::new(sequence, mac, payload.to_vec()))
}

/// Build `num_chaff` decoy packets, all stamped with `sequence`.
///
/// This is the per-index chaff block: combined with the single real packet
/// for the same index, it forms the `num_chaff + 1`-element multiset the
/// interleaver permutes.
pub fn generate_block(sequence: u32, num_chaff: u32) -> Result<Vec<Packet>, getrandom::Error> {
    (0..num_chaff).map(|_| generate(sequence)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_block_size() {
        let block = generate_block(3, 5).unwrap();
        assert_eq!(block.len(), 5);
        assert!(block.iter().all(|p| p.header.sequence == 3));
        assert!(block.iter().all(|p| p.payload.len() == 1));
    }

    #[test]
    fn decoys_are_not_trivially_identical() {
        let block = generate_block(0, 32).unwrap();
        let distinct_macs: std::collections::HashSet<_> =
            block.iter().map(|p| p.header.mac).collect();
        // Collisions across 64-octet random tags are astronomically
        // unlikely; this would only fail if randomness were broken.
        assert_eq!(distinct_macs.len(), block.len());
    }
}
