//! Interleaver / sender.
//!
//! Buffers plaintext until `close()`, then for each plaintext index builds
//! one real packet and `num_chaff` chaff packets, merges them into a
//! single `num_chaff + 1`-element block, applies a uniformly random
//! permutation, and writes the block to the sink. Chaff for the whole
//! message is produced on a background task so the two streams don't
//! serialize; the sink itself has exactly one writer, the interleaver
//! loop below.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;

use crate::chaff;
use crate::crypto::mac;
use crate::error::SenderError;
use crate::wire::Packet;

/// Default chaff-per-real-packet multiplier, matching the reference
/// implementation.
pub const DEFAULT_NUM_CHAFF: u32 = 200;

/// Bound on how many chaff blocks the background producer may get ahead of
/// the interleaver by. Small on purpose: memory stays at O(num_chaff)
/// regardless of message length.
const CHAFF_CHANNEL_DEPTH: usize = 4;

/// Sender state machine: `OPEN` accepts buffered writes, `close()` drains
/// into `CLOSING` and then `CLOSED`. A second `close()` is rejected.
pub struct Sender<W> {
    secret: Vec<u8>,
    buffer: Vec<u8>,
    num_chaff: u32,
    sink: Option<W>,
    closed: bool,
}

impl<W> Sender<W>
where
    W: AsyncWrite + Unpin,
{
    /// Create a sender with the reference chaff multiplier ([`DEFAULT_NUM_CHAFF`]).
    pub fn new(secret: impl Into<Vec<u8>>, sink: W) -> Self {
        Self::with_num_chaff(secret, sink, DEFAULT_NUM_CHAFF)
    }

    /// Create a sender with an explicit chaff-per-real-packet multiplier.
    pub fn with_num_chaff(secret: impl Into<Vec<u8>>, sink: W, num_chaff: u32) -> Self {
        Self {
            secret: secret.into(),
            buffer: Vec::new(),
            num_chaff,
            sink: Some(sink),
            closed: false,
        }
    }

    /// Buffer `bytes` for sending. Pure buffering: no I/O happens until
    /// [`Self::close`], since the final chaff schedule depends on the
    /// total message length.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        self.buffer.extend_from_slice(bytes);
        bytes.len()
    }

    /// Drain the buffer into interleaved real/chaff packets and write them
    /// to the sink, then release it.
    ///
    /// On any error the sink is still dropped (it is owned locally by this
    /// call) and the background chaff task is aborted rather than left to
    /// run to completion.
    pub async fn close(&mut self) -> Result<(), SenderError> {
        if self.closed {
            return Err(SenderError::AlreadyClosed);
        }
        self.closed = true;

        let mut sink = self.sink.take().expect("sink present until close");
        let result = self.interleave_and_write(&mut sink).await;
        log::info!(
            "sender closed: {} plaintext octets, {} chaff per index, ok={}",
            self.buffer.len(),
            self.num_chaff,
            result.is_ok()
        );
        result
    }

    async fn interleave_and_write(&self, sink: &mut W) -> Result<(), SenderError> {
        let len = self.buffer.len();
        let num_chaff = self.num_chaff;

        let (tx, mut rx) = mpsc::channel::<Result<Vec<Packet>, getrandom::Error>>(CHAFF_CHANNEL_DEPTH);
        let chaff_task = tokio::spawn(async move {
            for i in 0..len {
                let sequence = u32::try_from(i).expect("message length fits in u32 sequence field");
                let block = chaff::generate_block(sequence, num_chaff);
                if tx.send(block).await.is_err() {
                    // Interleaver gave up (propagating an earlier error); stop producing.
                    break;
                }
            }
        });

        let mut rng = OsRng;
        for (i, &byte) in self.buffer.iter().enumerate() {
            let sequence = u32::try_from(i).expect("message length fits in u32 sequence field");
            let real = Packet::new(sequence, mac::mac(&self.secret, &[byte]), vec![byte]);

            let chaff_block = match rx.recv().await {
                Some(Ok(block)) => block,
                Some(Err(err)) => {
                    chaff_task.abort();
                    return Err(SenderError::Rng(err));
                }
                None => {
                    // Producer task ended without sending enough blocks; it
                    // can only have panicked, since the loop above covers
                    // every index before returning.
                    chaff_task.abort();
                    return Err(SenderError::Io(std::io::Error::new(
                        std::io::ErrorKind::BrokenPipe,
                        "chaff producer ended early",
                    )));
                }
            };

            let mut block = Vec::with_capacity(chaff_block.len() + 1);
            block.push(real);
            block.extend(chaff_block);
            block.shuffle(&mut rng);

            for packet in &block {
                if let Err(err) = packet.encode(sink).await {
                    chaff_task.abort();
                    return Err(SenderError::Io(err));
                }
            }
            log::debug!("wrote block for sequence {sequence} ({} packets)", block.len());
        }

        let _ = chaff_task.await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;

    /// Drive `sender` to completion against an in-memory duplex pipe and
    /// return every byte the sender wrote to its sink.
    async fn close_and_collect<F>(build: F) -> Vec<u8>
    where
        F: FnOnce(tokio::io::DuplexStream) -> Sender<tokio::io::DuplexStream>,
    {
        let (client, mut server) = tokio::io::duplex(1 << 20);
        let mut sender = build(client);

        let reader = tokio::spawn(async move {
            let mut collected = Vec::new();
            server.read_to_end(&mut collected).await.unwrap();
            collected
        });

        sender.close().await.unwrap();
        reader.await.unwrap()
    }

    #[tokio::test]
    async fn write_then_close_produces_expected_packet_count() {
        let wire = close_and_collect(|sink| {
            let mut sender = Sender::with_num_chaff(b"k".to_vec(), sink, 3);
            sender.write(b"A");
            sender
        })
        .await;
        // header+payload is 73 bytes per packet (72-byte header + 1 payload
        // octet); E3 expects exactly 4 packets for num_chaff=3.
        assert_eq!(wire.len(), 73 * 4);
    }

    #[tokio::test]
    async fn empty_message_writes_zero_packets() {
        let wire = close_and_collect(|sink| Sender::with_num_chaff(b"k".to_vec(), sink, 3)).await;
        assert!(wire.is_empty());
    }

    #[tokio::test]
    async fn second_close_is_rejected_and_performs_no_io() {
        let (client, mut server) = tokio::io::duplex(1 << 20);
        let mut sender = Sender::with_num_chaff(b"k".to_vec(), client, 1);
        sender.write(b"A");

        sender.close().await.unwrap();
        let result = sender.close().await;
        assert!(matches!(result, Err(SenderError::AlreadyClosed)));

        // The second close must not have written anything further: exactly
        // one block's worth of bytes (73 * (num_chaff + 1)) should exist.
        let mut collected = Vec::new();
        drop(sender);
        server.read_to_end(&mut collected).await.unwrap();
        assert_eq!(collected.len(), 73 * 2);
    }
}
