//! The root [`ReplayPart`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use reel_core::PacketData;

use crate::timeline::sealed::Sealed;
use crate::timeline::{PacketTimeline, Scope, SharedTimeline, Timeline};
use crate::view::Viewed;

/// A time-ordered collection of packets.
///
/// Owns the storage that every [`ReplayPartView`](crate::ReplayPartView)
/// derived from it reads and writes.
///
/// # Examples
///
/// ```
/// use reel_store::{PacketTimeline, ReplayPart};
///
/// let part = ReplayPart::new();
/// part.add(10, 'A').unwrap();
/// part.add(5, 'B').unwrap();
/// part.add(20, 'C').unwrap();
/// part.add(5, 'D').unwrap();
///
/// let order: String = part.cursor().map(|d| *d.packet()).collect();
/// assert_eq!(order, "BDAC");
/// assert_eq!(part.length(), 20);
/// assert_eq!(part.size(), 4);
/// ```
pub struct ReplayPart<P> {
    store: SharedTimeline<P>,
}

impl<P> ReplayPart<P> {
    /// An empty part.
    pub fn new() -> Self {
        Self::from_sorted(Vec::new())
    }

    /// A part holding `packets`, in time order with ties in iteration
    /// order.
    pub fn from_packets(packets: impl IntoIterator<Item = PacketData<P>>) -> Self {
        let mut entries: Vec<_> = packets.into_iter().collect();
        entries.sort_by_key(PacketData::time);
        Self::from_sorted(entries)
    }

    pub(crate) fn from_sorted(entries: Vec<PacketData<P>>) -> Self {
        Self {
            store: Rc::new(RefCell::new(Timeline::from_sorted(entries))),
        }
    }

    /// Another handle onto the same storage.
    pub(crate) fn share(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
        }
    }

    /// Take every element out, leaving the part empty.
    pub fn into_packets(self) -> Vec<PacketData<P>> {
        let mut timeline = self.store.borrow_mut();
        std::mem::take(&mut timeline.entries)
    }
}

impl<P> Default for ReplayPart<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> FromIterator<PacketData<P>> for ReplayPart<P> {
    fn from_iter<I: IntoIterator<Item = PacketData<P>>>(iter: I) -> Self {
        Self::from_packets(iter)
    }
}

impl<P> Sealed<P> for ReplayPart<P> {
    fn scope(&self) -> Scope<'_, P> {
        Scope {
            store: &self.store,
            window: None,
        }
    }

    fn as_viewed(&self) -> Viewed<P> {
        Viewed::Part(self.share())
    }
}

impl<P: Clone> PacketTimeline<P> for ReplayPart<P> {}

impl<P: fmt::Debug> fmt::Debug for ReplayPart<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.store.borrow().entries.iter()).finish()
    }
}
