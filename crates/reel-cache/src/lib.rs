//! Append-only backing cache and lazily decoded packet chunks.
//!
//! # Architecture
//!
//! - [`WriteableCache`] wraps any `Write` sink and counts the bytes that
//!   pass through it; the count is the cache [`index`](WriteableCache::index)
//! - [`Deferred`] buffers bytes off to the side and appends them in one
//!   piece on [`commit`](Deferred::commit)
//! - [`ReadableCache`] hands out independent readers positioned at an
//!   absolute offset; implemented for byte slices, `Vec<u8>` and
//!   [`FileCache`]
//! - [`Builder`] writes a batch of packets as one chunk and returns the
//!   chunk's index; [`LazyPacketList`] remembers that index and decodes the
//!   chunk into a [`PacketSink`] on demand
//!
//! # Chunk format
//!
//! ```text
//! [count: varint] ([id: varint] [len: varint] [zlib payload]){count}
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod chunk;
pub mod config;
pub mod error;
pub mod sink;

pub use cache::{Deferred, FileCache, ReadableCache, WriteableCache};
pub use chunk::{Builder, LazyPacketList};
pub use config::CacheConfig;
pub use error::{CacheError, ChunkBuildError, ChunkDecodeError, ConfigError, SinkError};
pub use sink::{FnSink, PacketSink};
