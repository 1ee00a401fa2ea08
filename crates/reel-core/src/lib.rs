//! Core packet types and traits for the Reel replay store.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions shared by the registry, the paging cache and the
//! time-indexed store: the [`Packet`] trait, the [`PacketType`]
//! descriptor used for registration, the timestamped [`PacketData`]
//! pair, and the payload helpers packet implementations build on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod data;
pub mod error;
pub mod packet;
pub mod payload;

pub use data::PacketData;
pub use error::{ConstructError, PayloadError};
pub use packet::{Constructor, Packet, PacketType};
pub use payload::PayloadReader;
