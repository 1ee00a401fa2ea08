//! Moving a part's packets to and from a backing cache.
//!
//! [`page_out`] writes one chunk per distinct timestamp and returns a
//! [`ChunkRef`] for each. The refs are the only record of where the
//! packets went; keep them to [`page_in`] later.

use std::io::Write;

use reel_cache::{Builder, LazyPacketList, ReadableCache, WriteableCache};
use reel_core::Packet;
use reel_protocol::PacketProtocol;
use tracing::debug;

use crate::error::PageError;
use crate::timeline::sealed::Sealed;
use crate::timeline::PacketTimeline;

/// Where the packets of one timestamp were written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkRef {
    /// Time shared by every packet in the chunk.
    pub time: i64,
    /// Cache index of the chunk.
    pub index: u64,
    /// Number of packets in the chunk.
    pub count: usize,
}

/// Write every visible packet of `part` to `cache`, one chunk per
/// timestamp, in time order.
///
/// The part itself is left unchanged.
pub fn page_out<P, T, W>(
    part: &T,
    registry: &PacketProtocol<P>,
    cache: &mut WriteableCache<W>,
) -> Result<Vec<ChunkRef>, PageError>
where
    P: Packet + Clone,
    T: PacketTimeline<P> + ?Sized,
    W: Write,
{
    let mut refs = Vec::new();
    let mut packets = part.packets().into_iter().peekable();
    while let Some(first) = packets.next() {
        let time = first.time();
        let mut builder = Builder::new(registry);
        builder.add(first.into_packet());
        while let Some(next) = packets.next_if(|d| d.time() == time) {
            builder.add(next.into_packet());
        }
        let count = builder.len();
        let index = builder
            .build(cache)
            .map_err(|source| PageError::Build { time, source })?;
        refs.push(ChunkRef { time, index, count });
    }
    debug!(chunks = refs.len(), "paged out part");
    Ok(refs)
}

/// Read back every chunk in `refs` whose time falls inside `target`.
///
/// For a view, that is the window `[from, to]`; a part takes every chunk.
/// Packets are added at their chunk's time after any packets already
/// there. Returns the number of packets added.
///
/// Each chunk is decoded in full before any of its packets reach `target`.
/// A chunk that fails to decode adds nothing; chunks merged before it stay.
pub fn page_in<P, T, C>(
    target: &T,
    refs: &[ChunkRef],
    registry: &PacketProtocol<P>,
    cache: &C,
) -> Result<usize, PageError>
where
    P: Packet + Clone,
    T: PacketTimeline<P> + ?Sized,
    C: ReadableCache + ?Sized,
{
    let mut added = 0;
    let mut chunks = 0;
    for chunk in refs {
        if !target.scope().admits(chunk.time) {
            continue;
        }
        let mut decoded = Vec::new();
        LazyPacketList::new(registry, chunk.index)
            .read(&mut decoded, cache)
            .map_err(|source| PageError::Decode {
                time: chunk.time,
                source,
            })?;
        let count = decoded.len();
        target
            .add_all(chunk.time, decoded)
            .map_err(|source| PageError::Range {
                time: chunk.time,
                source,
            })?;
        added += count;
        chunks += 1;
    }
    debug!(chunks, packets = added, "paged in");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReplayPart;
    use reel_test_utils::{mock_packet_types, sample_stream, MockPacket};

    fn registry() -> PacketProtocol<MockPacket> {
        PacketProtocol::from_table_entries(mock_packet_types()).unwrap()
    }

    #[test]
    fn one_chunk_per_timestamp() {
        let registry = registry();
        let part = ReplayPart::new();
        part.add_all(0, [MockPacket::chat("a"), MockPacket::chat("b")]).unwrap();
        part.add(7, MockPacket::keep_alive(1)).unwrap();

        let mut cache = WriteableCache::new(Vec::new());
        let refs = page_out(&part, &registry, &mut cache).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!((refs[0].time, refs[0].count, refs[0].index), (0, 2, 0));
        assert_eq!((refs[1].time, refs[1].count), (7, 1));
        assert!(refs[1].index > refs[0].index);
        assert_eq!(part.size(), 3);
    }

    #[test]
    fn roundtrip_restores_order() {
        let registry = registry();
        let part = ReplayPart::from_packets(sample_stream(20, 3));
        let expected = part.packets();

        let mut cache = WriteableCache::new(Vec::new());
        let refs = page_out(&part, &registry, &mut cache).unwrap();
        let bytes = cache.into_inner();

        let restored = ReplayPart::new();
        assert_eq!(page_in(&restored, &refs, &registry, &bytes).unwrap(), 20);
        assert_eq!(restored.packets(), expected);
    }

    #[test]
    fn truncated_chunk_adds_nothing() {
        let registry = registry();
        let part = ReplayPart::new();
        part.add_all(5, ["a", "b", "c"].map(MockPacket::chat)).unwrap();

        let mut cache = WriteableCache::new(Vec::new());
        let refs = page_out(&part, &registry, &mut cache).unwrap();
        let mut bytes = cache.into_inner();
        bytes.truncate(bytes.len() - 3);

        let restored = ReplayPart::new();
        let err = page_in(&restored, &refs, &registry, &bytes).unwrap_err();
        assert!(matches!(err, PageError::Decode { time: 5, .. }));
        assert!(restored.is_empty());
    }

    #[test]
    fn failed_chunk_keeps_earlier_whole_chunks() {
        let registry = registry();
        let part = ReplayPart::new();
        part.add_all(0, [MockPacket::keep_alive(1), MockPacket::keep_alive(2)])
            .unwrap();
        part.add_all(9, [MockPacket::chat("x"), MockPacket::chat("y")])
            .unwrap();

        let mut cache = WriteableCache::new(Vec::new());
        let refs = page_out(&part, &registry, &mut cache).unwrap();
        let mut bytes = cache.into_inner();
        bytes.truncate(bytes.len() - 1);

        let restored = ReplayPart::new();
        assert!(page_in(&restored, &refs, &registry, &bytes).is_err());
        let times: Vec<_> = restored.packets().iter().map(|d| d.time()).collect();
        assert_eq!(times, vec![0, 0]);
    }
}
