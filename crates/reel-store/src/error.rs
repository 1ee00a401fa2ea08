//! Error types for parts, views, cursors and paging.

use reel_cache::{ChunkBuildError, ChunkDecodeError};
use thiserror::Error;

/// A time argument fell outside what a part or view accepts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Times are never negative.
    #[error("time {time} is negative")]
    Negative {
        /// The rejected time.
        time: i64,
    },
    /// The time precedes the view's window.
    #[error("time {time} is before the view start {start}")]
    BeforeStart {
        /// The rejected time.
        time: i64,
        /// First time visible through the view.
        start: i64,
    },
    /// The range end lies past the part's or view's length.
    #[error("time {time} is past the end {end}")]
    PastEnd {
        /// The rejected time.
        time: i64,
        /// Current length.
        end: i64,
    },
    /// The range start is after its end.
    #[error("range start {from} is after end {to}")]
    Inverted {
        /// Range start.
        from: i64,
        /// Range end.
        to: i64,
    },
}

/// Errors from editing through a [`Cursor`](crate::Cursor).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CursorError {
    /// `set` or `remove` was called without a preceding `next`/`previous`,
    /// or the element it returned was already removed.
    #[error("cursor has no current element")]
    NoCurrent,
    /// The new element would break time order with its neighbours.
    #[error("time {time} does not fit between {previous:?} and {next:?}")]
    OutOfOrder {
        /// Time of the element being placed.
        time: i64,
        /// Time of the element before the insertion point.
        previous: Option<i64>,
        /// Time of the element after the insertion point.
        next: Option<i64>,
    },
    /// The time lies outside the cursor's window.
    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Errors moving packets between a part and a cache.
#[derive(Debug, Error)]
pub enum PageError {
    /// Writing a chunk failed.
    #[error("page-out failed at time {time}")]
    Build {
        /// Timestamp of the chunk being written.
        time: i64,
        /// The chunk failure.
        #[source]
        source: ChunkBuildError,
    },
    /// Reading a chunk failed.
    #[error("page-in failed at time {time}")]
    Decode {
        /// Timestamp of the chunk being read.
        time: i64,
        /// The chunk failure.
        #[source]
        source: ChunkDecodeError,
    },
    /// A decoded chunk could not be added to the target.
    #[error("page-in rejected chunk at time {time}")]
    Range {
        /// Timestamp of the chunk.
        time: i64,
        /// Why the target refused it.
        #[source]
        source: RangeError,
    },
}
