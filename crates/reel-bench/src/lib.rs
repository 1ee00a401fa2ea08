//! Benchmark workloads for Reel.
//!
//! - [`mock_registry`]: a registry over the mock packet set
//! - [`recording`]: a part shaped like a short recording session
//! - [`encoded_chunks`]: a memory cache pre-filled with chunks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use reel_cache::{Builder, WriteableCache};
use reel_core::PacketData;
use reel_protocol::PacketProtocol;
use reel_store::ReplayPart;
use reel_test_utils::{mock_packet_types, sample_packet, MockPacket};

/// Registry with every well-behaved mock packet type.
pub fn mock_registry() -> PacketProtocol<MockPacket> {
    match PacketProtocol::from_table_entries(mock_packet_types()) {
        Ok(registry) => registry,
        Err(err) => panic!("mock packet types must register: {err}"),
    }
}

/// A part of `packets` packets spread over `duration_ms`, a few per tick.
///
/// Times are derived from the packet position so every run sees the same
/// layout.
pub fn recording(packets: usize, duration_ms: i64) -> ReplayPart<MockPacket> {
    let ticks = (packets / 3).max(1) as i64;
    let step = (duration_ms / ticks).max(1);
    ReplayPart::from_packets(
        (0..packets).map(|i| PacketData::new((i as i64 / 3) * step, sample_packet(i))),
    )
}

/// `chunks` chunks of `per_chunk` packets each, and their indices.
pub fn encoded_chunks(
    registry: &PacketProtocol<MockPacket>,
    chunks: usize,
    per_chunk: usize,
) -> (Vec<u8>, Vec<u64>) {
    let mut cache = WriteableCache::new(Vec::new());
    let mut indices = Vec::with_capacity(chunks);
    for c in 0..chunks {
        let mut builder = Builder::new(registry);
        for i in 0..per_chunk {
            builder.add(sample_packet(c * per_chunk + i));
        }
        match builder.build(&mut cache) {
            Ok(index) => indices.push(index),
            Err(err) => panic!("mock chunk must encode: {err}"),
        }
    }
    (cache.into_inner(), indices)
}
