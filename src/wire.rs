//! Binary wire format for packets: a fixed 72-octet header followed by
//! `size` octets of payload, all big-endian, packed, no padding.
//!
//! ```text
//! offset  size   field
//! 0       4      sequence     (u32, big-endian)
//! 4       64     mac          (64 raw octets)
//! 68      4      size         (u32, big-endian)
//! 72      size   payload      (`size` octets)
//! ```
//!
//! In this core `size` is always 1 (one plaintext octet per real packet),
//! giving 73 octets on the wire per packet, but the codec itself places no
//! such restriction on decode — only the real-packet and chaff producers
//! do.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::crypto::{Tag, TAG_SIZE};
use crate::error::WireError;

const SEQUENCE_SIZE: usize = 4;
const SIZE_FIELD_SIZE: usize = 4;

/// Header size in octets: `sequence` (4) + `mac` (64) + `size` (4).
pub const HEADER_SIZE: usize = SEQUENCE_SIZE + TAG_SIZE + SIZE_FIELD_SIZE;

/// Fixed packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Plaintext-octet index this packet claims to carry. Not secret.
    pub sequence: u32,
    /// MAC tag: genuine for real packets, random for chaff.
    pub mac: Tag,
    /// Payload length in octets; always 1 in this core.
    pub size: u32,
}

impl PacketHeader {
    fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.sequence.to_be_bytes());
        buf[4..68].copy_from_slice(&self.mac);
        buf[68..72].copy_from_slice(&self.size.to_be_bytes());
        buf
    }

    fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Self {
        let mut sequence_bytes = [0u8; 4];
        sequence_bytes.copy_from_slice(&buf[0..4]);

        let mut mac = [0u8; TAG_SIZE];
        mac.copy_from_slice(&buf[4..68]);

        let mut size_bytes = [0u8; 4];
        size_bytes.copy_from_slice(&buf[68..72]);

        Self {
            sequence: u32::from_be_bytes(sequence_bytes),
            mac,
            size: u32::from_be_bytes(size_bytes),
        }
    }
}

/// A packet as carried on the wire (header + payload).
///
/// Invariant enforced at construction: `size == payload.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// The packet's header.
    pub header: PacketHeader,
    /// `header.size` octets of content.
    pub payload: Vec<u8>,
}

impl Packet {
    /// Build a packet, setting `header.size` from `payload.len()` so the
    /// two can never disagree.
    #[must_use]
    pub fn new(sequence: u32, mac: Tag, payload: Vec<u8>) -> Self {
        let size = u32::try_from(payload.len()).expect("single-octet payloads fit in u32");
        Self {
            header: PacketHeader { sequence, mac, size },
            payload,
        }
    }

    /// Encode this packet to `sink`: one write for the header, one for the
    /// payload, so the transport can coalesce as it sees fit.
    pub async fn encode<W: AsyncWrite + Unpin>(&self, sink: &mut W) -> std::io::Result<()> {
        sink.write_all(&self.header.to_bytes()).await?;
        sink.write_all(&self.payload).await?;
        Ok(())
    }

    /// Decode one packet from `source`.
    ///
    /// Returns `Ok(None)` when the source is cleanly exhausted exactly at a
    /// header boundary (normal end-of-stream). Any other short read is a
    /// [`WireError::PayloadTruncated`] or an I/O error from the first
    /// partial header read.
    pub async fn decode_one<R: AsyncRead + Unpin>(
        source: &mut R,
    ) -> Result<Option<Self>, WireError> {
        let mut header_buf = [0u8; HEADER_SIZE];

        // read_exact returns UnexpectedEof only once it has read zero bytes
        // in total for this call when the stream is already exhausted; a
        // partial header is reported the same way, so we rely on it to
        // distinguish "no more packets" from "stream died mid-header" by
        // checking how many bytes actually landed via a manual fill loop.
        let mut filled = 0usize;
        while filled < HEADER_SIZE {
            let n = source.read(&mut header_buf[filled..]).await?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(WireError::PayloadTruncated {
                    expected: HEADER_SIZE as u32 - filled as u32,
                    actual: 0,
                });
            }
            filled += n;
        }

        let header = PacketHeader::from_bytes(&header_buf);

        if header.size == 0 {
            return Err(WireError::ZeroSizePayload);
        }

        let mut payload = vec![0u8; header.size as usize];
        let mut read_so_far = 0usize;
        while read_so_far < payload.len() {
            let n = source.read(&mut payload[read_so_far..]).await?;
            if n == 0 {
                return Err(WireError::PayloadTruncated {
                    expected: header.size,
                    actual: read_so_far,
                });
            }
            read_so_far += n;
        }

        Ok(Some(Self { header, payload }))
    }
}
