//! Error types for caches, chunks and sinks.

use std::error::Error as StdError;
use std::io;

use reel_protocol::CodecError;
use thiserror::Error;

/// Invalid [`CacheConfig`](crate::CacheConfig) values.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `write_buffer_bytes` is zero.
    #[error("write buffer must be non-zero")]
    ZeroWriteBuffer,
    /// `read_buffer_bytes` is zero.
    #[error("read buffer must be non-zero")]
    ZeroReadBuffer,
}

/// Errors opening or creating a file-backed cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The configuration was rejected.
    #[error("invalid cache configuration: {0}")]
    Config(#[from] ConfigError),
    /// The backing file could not be opened.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A [`PacketSink`](crate::PacketSink) refused a packet.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink rejected the packet for a reason of its own.
    #[error("packet rejected: {reason}")]
    Rejected {
        /// Human-readable explanation.
        reason: String,
    },
    /// The collection behind the sink failed to take the packet.
    #[error("sink target failed")]
    Target(#[source] Box<dyn StdError + Send + Sync>),
}

impl SinkError {
    /// Shorthand for [`SinkError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Wrap a target-side error.
    pub fn target(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Target(Box::new(err))
    }
}

/// Errors writing a chunk.
#[derive(Debug, Error)]
pub enum ChunkBuildError {
    /// The packet count prefix could not be written.
    #[error("failed to write header of chunk at {index}")]
    Header {
        /// Cache index the chunk started at.
        index: u64,
        /// The codec failure.
        #[source]
        source: CodecError,
    },
    /// More packets were added than the count prefix can express.
    #[error("chunk of {count} packets exceeds the u32 count prefix")]
    TooManyPackets {
        /// Number of packets added to the builder.
        count: usize,
    },
    /// Packet `position` could not be encoded. Bytes of earlier packets
    /// have already been appended to the cache.
    #[error("failed to encode packet {position} of chunk at {index}")]
    Packet {
        /// Cache index the chunk started at.
        index: u64,
        /// Zero-based position of the packet within the chunk.
        position: usize,
        /// The codec failure.
        #[source]
        source: CodecError,
    },
}

/// Errors decoding a chunk from a [`ReadableCache`](crate::ReadableCache).
#[derive(Debug, Error)]
pub enum ChunkDecodeError {
    /// No reader could be positioned at the chunk's index.
    #[error("failed to seek to chunk at {index}")]
    Seek {
        /// The chunk index.
        index: u64,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The packet count prefix could not be read.
    #[error("failed to read packet count of chunk at {index}")]
    Count {
        /// The chunk index.
        index: u64,
        /// The codec failure.
        #[source]
        source: CodecError,
    },
    /// Packet `position` of `count` could not be decoded.
    #[error("failed to decode packet {position}/{count} of chunk at {index}")]
    Packet {
        /// The chunk index.
        index: u64,
        /// Zero-based position of the packet within the chunk.
        position: usize,
        /// Packet count declared by the chunk.
        count: usize,
        /// The codec failure.
        #[source]
        source: CodecError,
    },
    /// The sink refused packet `position`; the read was aborted.
    #[error("sink refused packet {position} of chunk at {index}")]
    Sink {
        /// The chunk index.
        index: u64,
        /// Zero-based position of the packet within the chunk.
        position: usize,
        /// The sink's own error.
        #[source]
        source: SinkError,
    },
}

impl ChunkDecodeError {
    /// Index of the chunk that failed to decode.
    pub fn index(&self) -> u64 {
        match self {
            Self::Seek { index, .. }
            | Self::Count { index, .. }
            | Self::Packet { index, .. }
            | Self::Sink { index, .. } => *index,
        }
    }
}
