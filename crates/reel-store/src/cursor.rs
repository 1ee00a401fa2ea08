//! Bidirectional cursor with in-place editing.

use std::fmt;
use std::rc::Rc;

use reel_core::PacketData;

use crate::error::CursorError;
use crate::timeline::{Scope, SharedTimeline, Timeline, Window};

/// A position between two visible elements of a part or view.
///
/// [`Iterator::next`] and [`previous`](Self::previous) move over one
/// element and make it current; [`set`](Self::set) and
/// [`remove`](Self::remove) act on the current element, and
/// [`insert`](Self::insert) places a new element at the position. Every
/// edit must keep the store in time order.
///
/// The cursor shares the store with the part it came from. Edits made
/// through other handles while a cursor is live may shift its position.
pub struct Cursor<P> {
    store: SharedTimeline<P>,
    window: Option<Rc<Window>>,
    pos: usize,
    current: Option<usize>,
}

impl<P: Clone> Cursor<P> {
    pub(crate) fn new(store: SharedTimeline<P>, window: Option<Rc<Window>>, at_end: bool) -> Self {
        let mut cursor = Self {
            store,
            window,
            pos: 0,
            current: None,
        };
        let (lo, hi) = cursor.bounds();
        cursor.pos = if at_end { hi } else { lo };
        cursor
    }

    fn scope(&self) -> Scope<'_, P> {
        Scope {
            store: &self.store,
            window: self.window.as_ref(),
        }
    }

    fn bounds(&self) -> (usize, usize) {
        let timeline = self.store.borrow();
        self.scope().bounds_in(&timeline)
    }

    fn clamped(&self) -> (usize, usize, usize) {
        let (lo, hi) = self.bounds();
        (lo, hi, self.pos.clamp(lo, hi))
    }

    /// Whether [`Iterator::next`] would return an element.
    pub fn has_next(&self) -> bool {
        let (_, hi, pos) = self.clamped();
        pos < hi
    }

    /// Whether [`previous`](Self::previous) would return an element.
    pub fn has_previous(&self) -> bool {
        let (lo, _, pos) = self.clamped();
        pos > lo
    }

    /// Step back over one element and return it.
    pub fn previous(&mut self) -> Option<PacketData<P>> {
        let (lo, _, pos) = self.clamped();
        if pos == lo {
            self.pos = pos;
            return None;
        }
        self.pos = pos - 1;
        self.current = Some(self.pos);
        Some(self.store.borrow().entries[self.pos].clone())
    }

    /// Move to just before the first visible element at or after `time`.
    ///
    /// Clears the current element.
    pub fn skip_to(&mut self, time: i64) -> &mut Self {
        let (lo, hi) = self.bounds();
        let target = self.store.borrow().lower(time);
        self.pos = target.clamp(lo, hi);
        self.current = None;
        self
    }

    /// Remove and return the current element.
    pub fn remove(&mut self) -> Result<PacketData<P>, CursorError> {
        let index = self.current.take().ok_or(CursorError::NoCurrent)?;
        let mut timeline = self.store.borrow_mut();
        if index >= timeline.entries.len() {
            return Err(CursorError::NoCurrent);
        }
        let removed = timeline.entries.remove(index);
        if index < self.pos {
            self.pos -= 1;
        }
        Ok(removed)
    }

    /// Replace the current element, returning the old one.
    ///
    /// The new time must lie between the current element's neighbours.
    pub fn set(&mut self, data: PacketData<P>) -> Result<PacketData<P>, CursorError> {
        let index = self.current.ok_or(CursorError::NoCurrent)?;
        let time = data.time();
        self.scope().check_time(time)?;
        let old = {
            let mut timeline = self.store.borrow_mut();
            if index >= timeline.entries.len() {
                return Err(CursorError::NoCurrent);
            }
            let previous = index.checked_sub(1).map(|i| timeline.entries[i].time());
            let next = timeline.entries.get(index + 1).map(PacketData::time);
            check_order(time, previous, next)?;
            std::mem::replace(&mut timeline.entries[index], data)
        };
        self.scope().grow(time);
        Ok(old)
    }

    /// Insert an element at the cursor position and step over it.
    ///
    /// The new time must lie between the elements on either side of the
    /// position. Clears the current element.
    pub fn insert(&mut self, data: PacketData<P>) -> Result<(), CursorError> {
        let time = data.time();
        self.scope().check_time(time)?;
        let (_, _, pos) = self.clamped();
        {
            let mut timeline = self.store.borrow_mut();
            let (previous, next) = neighbours(&timeline, pos);
            check_order(time, previous, next)?;
            timeline.entries.insert(pos, data);
        }
        self.pos = pos + 1;
        self.current = None;
        self.scope().grow(time);
        Ok(())
    }
}

fn neighbours<P>(timeline: &Timeline<P>, pos: usize) -> (Option<i64>, Option<i64>) {
    let previous = pos.checked_sub(1).map(|i| timeline.entries[i].time());
    let next = timeline.entries.get(pos).map(PacketData::time);
    (previous, next)
}

fn check_order(time: i64, previous: Option<i64>, next: Option<i64>) -> Result<(), CursorError> {
    let after_previous = previous.is_none_or(|p| p <= time);
    let before_next = next.is_none_or(|n| time <= n);
    if after_previous && before_next {
        Ok(())
    } else {
        Err(CursorError::OutOfOrder {
            time,
            previous,
            next,
        })
    }
}

impl<P: Clone> Iterator for Cursor<P> {
    type Item = PacketData<P>;

    fn next(&mut self) -> Option<PacketData<P>> {
        let (_, hi, pos) = self.clamped();
        if pos == hi {
            self.pos = pos;
            return None;
        }
        self.pos = pos + 1;
        self.current = Some(pos);
        Some(self.store.borrow().entries[pos].clone())
    }
}

impl<P> fmt::Debug for Cursor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{CursorError, RangeError};
    use crate::{PacketTimeline, ReplayPart};
    use reel_core::PacketData;

    fn part_at(times: &[i64]) -> ReplayPart<i64> {
        ReplayPart::from_packets(times.iter().map(|&t| PacketData::new(t, t)))
    }

    fn times<T: PacketTimeline<i64>>(t: &T) -> Vec<i64> {
        t.packets().iter().map(PacketData::time).collect()
    }

    #[test]
    fn walks_both_ways() {
        let part = part_at(&[1, 2, 3]);
        let mut cursor = part.cursor();
        assert!(!cursor.has_previous());
        assert_eq!(cursor.next().map(|d| d.time()), Some(1));
        assert_eq!(cursor.next().map(|d| d.time()), Some(2));
        assert_eq!(cursor.previous().map(|d| d.time()), Some(2));
        assert_eq!(cursor.previous().map(|d| d.time()), Some(1));
        assert_eq!(cursor.previous(), None);

        let back: Vec<_> = std::iter::from_fn({
            let mut end = part.cursor_at_end();
            move || end.previous()
        })
        .map(|d| d.time())
        .collect();
        assert_eq!(back, vec![3, 2, 1]);
    }

    #[test]
    fn view_cursor_stays_in_window() {
        let part = part_at(&[0, 5, 10, 15, 20]);
        let view = part.view_range(5, 15).unwrap();
        let seen: Vec<_> = view.cursor().map(|d| d.time()).collect();
        assert_eq!(seen, vec![5, 10, 15]);

        let mut end = view.cursor_at_end();
        assert!(!end.has_next());
        assert_eq!(end.previous().map(|d| d.time()), Some(15));
    }

    #[test]
    fn skip_to_positions_before_time() {
        let part = part_at(&[0, 5, 5, 10]);
        let mut cursor = part.cursor();
        cursor.skip_to(5);
        assert_eq!(cursor.next().map(|d| d.time()), Some(5));
        cursor.skip_to(7);
        assert_eq!(cursor.next().map(|d| d.time()), Some(10));
        cursor.skip_to(100);
        assert!(!cursor.has_next());
        cursor.skip_to(0);
        assert!(!cursor.has_previous());
    }

    #[test]
    fn remove_current() {
        let part = part_at(&[1, 2, 3]);
        let mut cursor = part.cursor();
        assert_eq!(cursor.remove(), Err(CursorError::NoCurrent));
        cursor.next();
        cursor.next();
        assert_eq!(cursor.remove().map(|d| d.time()), Ok(2));
        assert_eq!(cursor.remove(), Err(CursorError::NoCurrent));
        assert_eq!(cursor.next().map(|d| d.time()), Some(3));
        assert_eq!(times(&part), vec![1, 3]);
    }

    #[test]
    fn remove_after_previous_keeps_position() {
        let part = part_at(&[1, 2, 3]);
        let mut cursor = part.cursor_at_end();
        cursor.previous();
        cursor.previous();
        cursor.remove().unwrap();
        assert_eq!(cursor.next().map(|d| d.time()), Some(3));
        assert_eq!(cursor.previous().map(|d| d.time()), Some(3));
        assert_eq!(cursor.previous().map(|d| d.time()), Some(1));
    }

    #[test]
    fn set_respects_neighbours() {
        let part = part_at(&[10, 20, 30]);
        let mut cursor = part.cursor();
        cursor.next();
        cursor.next();
        assert_eq!(
            cursor.set(PacketData::new(35, 0)),
            Err(CursorError::OutOfOrder {
                time: 35,
                previous: Some(10),
                next: Some(30)
            })
        );
        let old = cursor.set(PacketData::new(25, 99)).unwrap();
        assert_eq!(old.into_parts(), (20, 20));
        assert_eq!(times(&part), vec![10, 25, 30]);
    }

    #[test]
    fn insert_in_order_only() {
        let part = part_at(&[10, 20]);
        let mut cursor = part.cursor();
        cursor.next();
        assert!(matches!(
            cursor.insert(PacketData::new(5, 0)),
            Err(CursorError::OutOfOrder { .. })
        ));
        cursor.insert(PacketData::new(15, 15)).unwrap();
        assert_eq!(cursor.remove(), Err(CursorError::NoCurrent));
        assert_eq!(cursor.next().map(|d| d.time()), Some(20));
        assert_eq!(times(&part), vec![10, 15, 20]);
    }

    #[test]
    fn insert_through_view_checks_window_and_grows() {
        let part = part_at(&[0, 5, 10, 30]);
        let view = part.view_range(5, 10).unwrap();

        let mut start = view.cursor();
        assert_eq!(
            start.insert(PacketData::new(2, 0)),
            Err(CursorError::Range(RangeError::BeforeStart { time: 2, start: 5 }))
        );

        let mut end = view.cursor_at_end();
        end.insert(PacketData::new(12, 12)).unwrap();
        assert_eq!(view.to(), 12);
        assert_eq!(times(&view), vec![5, 10, 12]);
        assert_eq!(times(&part), vec![0, 5, 10, 12, 30]);
    }
}
