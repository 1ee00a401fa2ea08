//! Live windows over a part or another view.

use std::fmt;
use std::rc::Rc;

use crate::part::ReplayPart;
use crate::timeline::sealed::Sealed;
use crate::timeline::{PacketTimeline, Scope, SharedTimeline, Window};

/// What a [`ReplayPartView`] was created from.
pub enum Viewed<P> {
    /// A root part.
    Part(ReplayPart<P>),
    /// Another view.
    View(Box<ReplayPartView<P>>),
}

impl<P> fmt::Debug for Viewed<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Part(_) => f.write_str("Viewed::Part"),
            Self::View(view) => f.debug_tuple("Viewed::View").field(view).finish(),
        }
    }
}

/// A window `[from, to]` onto a parent part or view.
///
/// Holds no elements: everything visible through the view lives in the
/// root part's storage, at the same absolute time. Cloning a view yields
/// another handle onto the same window.
///
/// # Examples
///
/// ```
/// use reel_store::{PacketTimeline, ReplayPart};
///
/// let part = ReplayPart::new();
/// for t in [0, 5, 10, 15, 20] {
///     part.add(t, t).unwrap();
/// }
///
/// let view = part.view_range(5, 15).unwrap();
/// assert_eq!(view.size(), 3);
/// assert!(view.add(3, 3).is_err());
///
/// view.add(12, 12).unwrap();
/// assert_eq!(part.size(), 6);
/// ```
pub struct ReplayPartView<P> {
    store: SharedTimeline<P>,
    window: Rc<Window>,
    viewed: Viewed<P>,
}

impl<P> ReplayPartView<P> {
    pub(crate) fn new(store: SharedTimeline<P>, window: Rc<Window>, viewed: Viewed<P>) -> Self {
        Self {
            store,
            window,
            viewed,
        }
    }

    /// The part or view this view was created from.
    pub fn viewed(&self) -> &Viewed<P> {
        &self.viewed
    }

    /// First visible time.
    pub fn from(&self) -> i64 {
        self.window.from
    }

    /// Last visible time: the fixed end, or the parent's current end when
    /// the view follows it.
    pub fn to(&self) -> i64 {
        self.window.end(self.store.borrow().length())
    }

    /// Whether the end follows the parent's end.
    pub fn is_open_ended(&self) -> bool {
        self.window.to.get().is_none()
    }
}

impl<P> Clone for ReplayPartView<P> {
    fn clone(&self) -> Self {
        let viewed = match &self.viewed {
            Viewed::Part(part) => Viewed::Part(part.share()),
            Viewed::View(view) => Viewed::View(Box::new((**view).clone())),
        };
        Self {
            store: Rc::clone(&self.store),
            window: Rc::clone(&self.window),
            viewed,
        }
    }
}

impl<P> Sealed<P> for ReplayPartView<P> {
    fn scope(&self) -> Scope<'_, P> {
        Scope {
            store: &self.store,
            window: Some(&self.window),
        }
    }

    fn as_viewed(&self) -> Viewed<P> {
        Viewed::View(Box::new(self.clone()))
    }
}

impl<P: Clone> PacketTimeline<P> for ReplayPartView<P> {}

impl<P> fmt::Debug for ReplayPartView<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayPartView")
            .field("from", &self.from())
            .field("to", &self.to())
            .field("open_ended", &self.is_open_ended())
            .finish()
    }
}
