//! Shared storage, view windows and the [`PacketTimeline`] operations.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reel_core::PacketData;

use crate::cursor::Cursor;
use crate::error::RangeError;
use crate::part::ReplayPart;
use crate::view::ReplayPartView;

// ── Storage ─────────────────────────────────────────────────────

/// The ordered entries of one root part.
#[derive(Debug)]
pub(crate) struct Timeline<P> {
    pub(crate) entries: Vec<PacketData<P>>,
}

impl<P> Timeline<P> {
    /// Entries must already be sorted by time.
    pub(crate) fn from_sorted(entries: Vec<PacketData<P>>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].time() <= w[1].time()));
        Self { entries }
    }

    /// Time of the last entry, or 0.
    pub(crate) fn length(&self) -> i64 {
        self.entries.last().map_or(0, PacketData::time)
    }

    /// Position of the first entry with a time `>= time`.
    pub(crate) fn lower(&self, time: i64) -> usize {
        self.entries.partition_point(|e| e.time() < time)
    }

    /// Position just past the last entry with a time `<= time`.
    pub(crate) fn upper(&self, time: i64) -> usize {
        self.entries.partition_point(|e| e.time() <= time)
    }

    /// Stable insert: after every entry with the same time.
    pub(crate) fn insert(&mut self, data: PacketData<P>) {
        let at = self.upper(data.time());
        self.entries.insert(at, data);
    }
}

pub(crate) type SharedTimeline<P> = Rc<RefCell<Timeline<P>>>;

/// Bounds of one view. `to == None` follows the parent's end.
#[derive(Debug)]
pub(crate) struct Window {
    pub(crate) from: i64,
    pub(crate) to: Cell<Option<i64>>,
    pub(crate) parent: Option<Rc<Window>>,
}

impl Window {
    /// Effective end given the root part's current length.
    pub(crate) fn end(&self, root_length: i64) -> i64 {
        match self.to.get() {
            Some(to) => to,
            None => self
                .parent
                .as_ref()
                .map_or(root_length, |p| p.end(root_length)),
        }
    }
}

// ── Scope ───────────────────────────────────────────────────────

pub(crate) mod sealed {
    use super::Scope;
    use crate::view::Viewed;

    /// Gives the shared operations access to storage and window.
    pub trait Sealed<P> {
        /// The shared store and the window it is seen through.
        fn scope(&self) -> Scope<'_, P>;

        /// A handle onto this part or view, for use as a view's parent.
        fn as_viewed(&self) -> Viewed<P>;
    }
}

/// Borrowed storage handle plus the window it is seen through.
pub struct Scope<'a, P> {
    pub(crate) store: &'a SharedTimeline<P>,
    pub(crate) window: Option<&'a Rc<Window>>,
}

impl<P> Scope<'_, P> {
    pub(crate) fn start(&self) -> i64 {
        self.window.map_or(0, |w| w.from)
    }

    pub(crate) fn end_in(&self, timeline: &Timeline<P>) -> i64 {
        let length = timeline.length();
        self.window.map_or(length, |w| w.end(length))
    }

    pub(crate) fn end(&self) -> i64 {
        self.end_in(&self.store.borrow())
    }

    /// Entry positions `lo..hi` visible through the window.
    pub(crate) fn bounds_in(&self, timeline: &Timeline<P>) -> (usize, usize) {
        match self.window {
            None => (0, timeline.entries.len()),
            Some(_) => {
                let lo = timeline.lower(self.start());
                let hi = timeline.upper(self.end_in(timeline)).max(lo);
                (lo, hi)
            }
        }
    }

    /// Whether a packet at `time` belongs to this scope.
    pub(crate) fn admits(&self, time: i64) -> bool {
        match self.window {
            None => time >= 0,
            Some(_) => time >= self.start() && time <= self.end(),
        }
    }

    pub(crate) fn check_time(&self, time: i64) -> Result<(), RangeError> {
        if time < 0 {
            return Err(RangeError::Negative { time });
        }
        let start = self.start();
        if time < start {
            return Err(RangeError::BeforeStart { time, start });
        }
        Ok(())
    }

    pub(crate) fn check_range(&self, from: i64, to: i64) -> Result<(), RangeError> {
        self.check_time(from)?;
        let end = self.end();
        if to > end {
            return Err(RangeError::PastEnd { time: to, end });
        }
        if from > to {
            return Err(RangeError::Inverted { from, to });
        }
        Ok(())
    }

    /// Extend every fixed window end in the chain to cover `time`.
    pub(crate) fn grow(&self, time: i64) {
        let mut window = self.window;
        while let Some(w) = window {
            if let Some(to) = w.to.get() {
                if time > to {
                    w.to.set(Some(time));
                }
            }
            window = w.parent.as_ref();
        }
    }

    fn child(&self, from: i64, to: Option<i64>) -> Rc<Window> {
        Rc::new(Window {
            from,
            to: Cell::new(to),
            parent: self.window.cloned(),
        })
    }
}

// ── Operations ──────────────────────────────────────────────────

/// Operations shared by [`ReplayPart`] and [`ReplayPartView`].
///
/// All times are absolute. For a part, [`length`](Self::length) is the time
/// of its last element; for a view it is the end of the window. Mutating
/// methods take `&self`: every handle onto the same root part sees the
/// change immediately.
pub trait PacketTimeline<P: Clone>: sealed::Sealed<P> {
    /// End time: last element of a part, window end of a view.
    fn length(&self) -> i64 {
        self.scope().end()
    }

    /// Number of visible elements.
    fn size(&self) -> usize {
        let scope = self.scope();
        let timeline = scope.store.borrow();
        let (lo, hi) = scope.bounds_in(&timeline);
        hi - lo
    }

    /// Whether no elements are visible.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// An independent part holding every visible element.
    fn copy(&self) -> ReplayPart<P> {
        ReplayPart::from_sorted(self.packets())
    }

    /// An independent part holding the visible elements from `from` on.
    ///
    /// A `from` past the end yields an empty part.
    fn copy_of(&self, from: i64) -> Result<ReplayPart<P>, RangeError> {
        let scope = self.scope();
        scope.check_time(from)?;
        let end = scope.end();
        if from > end {
            return Ok(ReplayPart::new());
        }
        self.copy_range(from, end)
    }

    /// An independent part holding the elements with time in `[from, to]`.
    fn copy_range(&self, from: i64, to: i64) -> Result<ReplayPart<P>, RangeError> {
        let scope = self.scope();
        scope.check_range(from, to)?;
        let timeline = scope.store.borrow();
        let (lo, hi) = (timeline.lower(from), timeline.upper(to));
        Ok(ReplayPart::from_sorted(timeline.entries[lo..hi].to_vec()))
    }

    /// A live view from `from` whose end follows this part's end.
    ///
    /// A `from` past the current end gives a view that stays empty until the
    /// end grows to reach it.
    fn view_of(&self, from: i64) -> Result<ReplayPartView<P>, RangeError> {
        let scope = self.scope();
        scope.check_time(from)?;
        Ok(ReplayPartView::new(
            scope.store.clone(),
            scope.child(from, None),
            self.as_viewed(),
        ))
    }

    /// A live view of `[from, to]`.
    fn view_range(&self, from: i64, to: i64) -> Result<ReplayPartView<P>, RangeError> {
        let scope = self.scope();
        scope.check_range(from, to)?;
        Ok(ReplayPartView::new(
            scope.store.clone(),
            scope.child(from, Some(to)),
            self.as_viewed(),
        ))
    }

    /// Insert `packet` at `at`, after any elements with the same time.
    ///
    /// Adding past a view's fixed end moves that end, and the fixed end of
    /// every view it was derived from, out to `at`.
    fn add(&self, at: i64, packet: P) -> Result<(), RangeError> {
        let scope = self.scope();
        scope.check_time(at)?;
        scope.store.borrow_mut().insert(PacketData::new(at, packet));
        scope.grow(at);
        Ok(())
    }

    /// Insert every packet at `at`, keeping their order.
    fn add_all<I>(&self, at: i64, packets: I) -> Result<(), RangeError>
    where
        I: IntoIterator<Item = P>,
    {
        self.add_at(0, packets.into_iter().map(|p| PacketData::new(at, p)))
    }

    /// Insert every element at its own time.
    fn add_data<I>(&self, packets: I) -> Result<(), RangeError>
    where
        I: IntoIterator<Item = PacketData<P>>,
    {
        self.add_at(0, packets)
    }

    /// Insert every element at its own time plus `offset`.
    ///
    /// All times are checked before anything is inserted.
    fn add_at<I>(&self, offset: i64, packets: I) -> Result<(), RangeError>
    where
        I: IntoIterator<Item = PacketData<P>>,
    {
        let scope = self.scope();
        let batch: Vec<_> = packets.into_iter().map(|d| d.shifted(offset)).collect();
        for data in &batch {
            scope.check_time(data.time())?;
        }
        let Some(latest) = batch.iter().map(PacketData::time).max() else {
            return Ok(());
        };
        {
            let mut timeline = scope.store.borrow_mut();
            for data in batch {
                timeline.insert(data);
            }
        }
        scope.grow(latest);
        Ok(())
    }

    /// A new part: these elements, then `other`'s shifted by
    /// [`length`](Self::length). Neither input changes.
    fn append<T>(&self, other: &T) -> ReplayPart<P>
    where
        T: PacketTimeline<P> + ?Sized,
    {
        let shift = self.length();
        let mut entries = self.packets();
        entries.extend(other.packets().into_iter().map(|d| d.shifted(shift)));
        ReplayPart::from_sorted(entries)
    }

    /// Remove and return every element with time in `[from, to]`.
    ///
    /// View windows are unchanged.
    fn remove(&self, from: i64, to: i64) -> Result<Vec<PacketData<P>>, RangeError> {
        let scope = self.scope();
        scope.check_range(from, to)?;
        let mut timeline = scope.store.borrow_mut();
        let (lo, hi) = (timeline.lower(from), timeline.upper(to));
        let removed = timeline.entries.drain(lo..hi).collect();
        Ok(removed)
    }

    /// Snapshot of the visible elements in order.
    fn packets(&self) -> Vec<PacketData<P>> {
        let scope = self.scope();
        let timeline = scope.store.borrow();
        let (lo, hi) = scope.bounds_in(&timeline);
        timeline.entries[lo..hi].to_vec()
    }

    /// A cursor before the first visible element.
    fn cursor(&self) -> Cursor<P> {
        let scope = self.scope();
        Cursor::new(scope.store.clone(), scope.window.cloned(), false)
    }

    /// A cursor after the last visible element.
    fn cursor_at_end(&self) -> Cursor<P> {
        let scope = self.scope();
        Cursor::new(scope.store.clone(), scope.window.cloned(), true)
    }
}
