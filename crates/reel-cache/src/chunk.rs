//! Packet chunks: write a batch once, decode it lazily by index.

use std::fmt;
use std::io::Write;

use reel_core::Packet;
use reel_protocol::{read_varint, write_varint, PacketCodec, PacketProtocol};
use tracing::debug;

use crate::cache::{ReadableCache, WriteableCache};
use crate::error::{ChunkBuildError, ChunkDecodeError};
use crate::sink::PacketSink;

/// Collects packets and writes them to a cache as one chunk.
///
/// [`build`](Self::build) consumes the builder, so a batch is written at
/// most once. Each packet is [released](Packet::release) right after it
/// has been encoded.
pub struct Builder<'r, P: Packet> {
    registry: &'r PacketProtocol<P>,
    codec: PacketCodec,
    packets: Vec<P>,
}

impl<'r, P: Packet> Builder<'r, P> {
    /// An empty batch encoded with the default codec.
    pub fn new(registry: &'r PacketProtocol<P>) -> Self {
        Self::with_codec(registry, PacketCodec::default())
    }

    /// An empty batch encoded with `codec`.
    pub fn with_codec(registry: &'r PacketProtocol<P>, codec: PacketCodec) -> Self {
        Self {
            registry,
            codec,
            packets: Vec::new(),
        }
    }

    /// Queue a packet.
    pub fn add(&mut self, packet: P) {
        self.packets.push(packet);
    }

    /// Number of queued packets.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Whether nothing has been queued.
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Write the chunk and return the index it starts at.
    pub fn build<W: Write>(self, cache: &mut WriteableCache<W>) -> Result<u64, ChunkBuildError> {
        let index = cache.index();
        let count = self.packets.len();
        let prefix = u32::try_from(count).map_err(|_| ChunkBuildError::TooManyPackets { count })?;
        write_varint(cache.writer(), prefix)
            .map_err(|source| ChunkBuildError::Header { index, source })?;

        for (position, mut packet) in self.packets.into_iter().enumerate() {
            self.codec
                .encode(cache.writer(), &packet, self.registry)
                .map_err(|source| ChunkBuildError::Packet {
                    index,
                    position,
                    source,
                })?;
            packet.release();
        }

        debug!(index, count, bytes = cache.index() - index, "built packet chunk");
        Ok(index)
    }
}

impl<P: Packet> fmt::Debug for Builder<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("packets", &self.packets.len())
            .field("codec", &self.codec)
            .finish()
    }
}

/// Handle to a chunk stored at a fixed cache index.
///
/// Holds no packets; every [`read`](Self::read) decodes the chunk afresh.
pub struct LazyPacketList<'r, P: Packet> {
    registry: &'r PacketProtocol<P>,
    codec: PacketCodec,
    index: u64,
}

impl<'r, P: Packet> LazyPacketList<'r, P> {
    /// Handle for the chunk at `index`, decoded with the default codec.
    pub fn new(registry: &'r PacketProtocol<P>, index: u64) -> Self {
        Self::with_codec(registry, PacketCodec::default(), index)
    }

    /// Handle for the chunk at `index`, decoded with `codec`.
    pub fn with_codec(registry: &'r PacketProtocol<P>, codec: PacketCodec, index: u64) -> Self {
        Self {
            registry,
            codec,
            index,
        }
    }

    /// Cache index of the chunk.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Decode every packet of the chunk into `sink`, in order.
    ///
    /// Returns the number of packets delivered. Decoding stops after the
    /// declared count even if more bytes follow. On error, packets already
    /// delivered stay in the sink.
    pub fn read<S, C>(&self, sink: &mut S, cache: &C) -> Result<usize, ChunkDecodeError>
    where
        S: PacketSink<P> + ?Sized,
        C: ReadableCache + ?Sized,
    {
        let index = self.index;
        let mut reader = cache
            .seek(index)
            .map_err(|source| ChunkDecodeError::Seek { index, source })?;
        let count = read_varint(&mut reader)
            .map_err(|source| ChunkDecodeError::Count { index, source })? as usize;

        for position in 0..count {
            let packet = self
                .codec
                .decode(self.registry, &mut reader)
                .map_err(|source| ChunkDecodeError::Packet {
                    index,
                    position,
                    count,
                    source,
                })?;
            sink.accept(packet)
                .map_err(|source| ChunkDecodeError::Sink {
                    index,
                    position,
                    source,
                })?;
        }

        debug!(index, count, "read packet chunk");
        Ok(count)
    }
}

impl<P: Packet> Clone for LazyPacketList<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Packet> Copy for LazyPacketList<'_, P> {}

impl<P: Packet> fmt::Debug for LazyPacketList<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPacketList")
            .field("index", &self.index)
            .finish()
    }
}
