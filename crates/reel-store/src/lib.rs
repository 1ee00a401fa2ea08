//! Time-indexed replay parts with live windowed views.
//!
//! # Architecture
//!
//! - [`ReplayPart`] owns one time-ordered store of
//!   [`PacketData`](reel_core::PacketData). Equal timestamps keep insertion
//!   order
//! - [`ReplayPartView`] is a window `[from, to]` over a part or another
//!   view. It holds no packets of its own: reads and writes go straight to
//!   the root part's store, and times are the same absolute times the root
//!   uses
//! - [`PacketTimeline`] carries every operation shared by parts and views
//! - [`Cursor`] walks the visible elements in both directions and edits in
//!   place
//! - [`page_out`] / [`page_in`] move a part's packets to and from a
//!   [`WriteableCache`](reel_cache::WriteableCache) as one chunk per
//!   timestamp; [`PartSink`] is the sink that merges decoded packets back
//!
//! Parts and views share storage through `Rc<RefCell<_>>` and are
//! therefore `!Send`. All handles derived from one root part must be used
//! from a single thread.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cursor;
pub mod error;
pub mod paging;
pub mod part;
pub mod sink;
mod timeline;
pub mod view;

pub use cursor::Cursor;
pub use error::{CursorError, PageError, RangeError};
pub use paging::{page_in, page_out, ChunkRef};
pub use part::ReplayPart;
pub use sink::PartSink;
pub use timeline::PacketTimeline;
pub use view::{ReplayPartView, Viewed};
