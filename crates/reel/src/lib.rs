//! Reel: record, page and edit time-ordered game-protocol packet streams.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Reel sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use reel::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Tick(u32);
//!
//! impl Packet for Tick {
//!     type Kind = ();
//!     fn kind(&self) {}
//!     fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), PayloadError> {
//!         out.extend_from_slice(&self.0.to_le_bytes());
//!         Ok(())
//!     }
//!     fn read_payload(&mut self, payload: &[u8]) -> Result<(), PayloadError> {
//!         let mut r = PayloadReader::new(payload);
//!         self.0 = r.read_u32_le()?;
//!         r.finish()
//!     }
//! }
//!
//! let mut registry = PacketProtocol::new();
//! registry.register(0x10, PacketType::new((), "Tick", || Ok(Tick(0)))).unwrap();
//!
//! // Record a few packets, then look at one second of them.
//! let part = ReplayPart::new();
//! for t in 0..5 {
//!     part.add(t * 500, Tick(t as u32)).unwrap();
//! }
//! let second = part.view_range(500, 1500).unwrap();
//! assert_eq!(second.size(), 3);
//!
//! // Persist the window and read it back.
//! let mut cache = WriteableCache::new(Vec::new());
//! let refs = page_out(&second, &registry, &mut cache).unwrap();
//! let bytes = cache.into_inner();
//!
//! let restored = ReplayPart::new();
//! page_in(&restored, &refs, &registry, &bytes).unwrap();
//! assert_eq!(restored.packets(), second.packets());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `reel-core` | `Packet`, `PacketType`, `PacketData`, payload helpers |
//! | [`protocol`] | `reel-protocol` | Packet type registry and compressed record codec |
//! | [`cache`] | `reel-cache` | Backing caches, chunk builder and lazy chunk reader |
//! | [`store`] | `reel-store` | Replay parts, views, cursors and paging |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core packet types and traits (`reel-core`).
pub use reel_core as types;

/// Packet type registry and codec (`reel-protocol`).
///
/// [`protocol::PacketProtocol`] resolves wire ids; [`protocol::PacketCodec`]
/// writes and reads single compressed records.
pub use reel_protocol as protocol;

/// Backing caches and packet chunks (`reel-cache`).
///
/// Write chunks with [`cache::Builder`], read them back with
/// [`cache::LazyPacketList`].
pub use reel_cache as cache;

/// Replay parts and views (`reel-store`).
pub use reel_store as store;

/// Common imports for typical Reel usage.
pub mod prelude {
    // Core
    pub use reel_core::{Packet, PacketData, PacketType, PayloadError, PayloadReader};

    // Registry and codec
    pub use reel_protocol::{CodecConfig, PacketCodec, PacketProtocol, ProtocolError};

    // Cache
    pub use reel_cache::{
        Builder, CacheConfig, FileCache, LazyPacketList, PacketSink, ReadableCache,
        WriteableCache,
    };

    // Store
    pub use reel_store::{
        page_in, page_out, ChunkRef, Cursor, PacketTimeline, RangeError, ReplayPart,
        ReplayPartView,
    };
}
