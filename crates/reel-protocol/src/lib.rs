//! Packet type registry and compressed packet codec.
//!
//! # Architecture
//!
//! - [`PacketProtocol`] maps wire ids to [`PacketType`](reel_core::PacketType)
//!   descriptors (incoming) and packet kinds to ids (outgoing), backed by a
//!   pluggable [`TypeTable`] strategy
//! - [`PacketCodec`] encodes one packet as a compressed record and decodes
//!   it back through the registry
//! - [`CodecConfig`] selects the compression level
//!
//! # Record format
//!
//! ```text
//! [id: varint] [compressed length: varint] [zlib-compressed payload]
//! ```
//!
//! Varints are unsigned LEB128 over the 32-bit value, so negative ids
//! take the full five bytes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod registry;

pub use codec::{read_varint, varint_len, write_varint, PacketCodec, MAX_PAYLOAD_BYTES};
pub use config::CodecConfig;
pub use error::{CodecError, ConfigError, ProtocolError};
pub use registry::{MapTable, PacketProtocol, TypeTable};
