//! Error types for the registry and the packet codec.

use std::io;

use reel_core::{ConstructError, PayloadError};
use thiserror::Error;

/// Errors from packet registration and lookup.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The construction probe failed while registering an incoming type.
    /// The registration was rolled back.
    #[error("invalid packet type {name} for id {id}")]
    InvalidPacketType {
        /// The id the type was being registered under.
        id: i32,
        /// Name of the rejected type.
        name: &'static str,
        /// Why construction failed.
        #[source]
        source: ConstructError,
    },
    /// No incoming type is registered for this id, or the id is negative.
    #[error("invalid packet id: {id}")]
    UnknownPacketId {
        /// The id that could not be resolved.
        id: i32,
    },
    /// The packet kind has no outgoing id.
    #[error("unregistered outgoing packet kind: {kind}")]
    UnregisteredPacketType {
        /// Debug rendering of the kind tag.
        kind: String,
    },
    /// A registered type passed its probe but failed to construct later.
    #[error("failed to instantiate packet {id} ({name})")]
    InstantiationFailure {
        /// The id being instantiated.
        id: i32,
        /// Name of the registered type.
        name: &'static str,
        /// Why construction failed.
        #[source]
        source: ConstructError,
    },
}

/// Errors from encoding or decoding a single compressed packet record.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An I/O error occurred, including truncation of the source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A varint ran past five bytes.
    #[error("varint exceeds 5 bytes")]
    VarIntTooLong,
    /// A record length exceeds [`MAX_PAYLOAD_BYTES`](crate::MAX_PAYLOAD_BYTES).
    #[error("record of {len} bytes exceeds limit of {max}")]
    PayloadTooLarge {
        /// The offending length.
        len: u64,
        /// The configured limit.
        max: u64,
    },
    /// The id could not be resolved through the registry.
    #[error("protocol: {0}")]
    Protocol(#[from] ProtocolError),
    /// Compressing the payload of packet `id` failed.
    #[error("failed to compress packet {id}")]
    Compression {
        /// Wire id of the packet.
        id: i32,
        /// Underlying compressor error.
        #[source]
        source: io::Error,
    },
    /// Inflating the payload of packet `id` failed.
    #[error("failed to decompress packet {id}")]
    Decompression {
        /// Wire id of the packet.
        id: i32,
        /// Underlying decompressor error.
        #[source]
        source: io::Error,
    },
    /// The packet's own payload hooks rejected the data.
    #[error("payload of packet {id} rejected")]
    Payload {
        /// Wire id of the packet.
        id: i32,
        /// The packet-level error.
        #[source]
        source: PayloadError,
    },
}

/// Errors detected during [`CodecConfig::validate()`](crate::CodecConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The compression level is outside zlib's `0..=9` range.
    #[error("compression level {level} is outside 0..=9")]
    InvalidCompressionLevel {
        /// The configured level.
        level: u32,
    },
}
