//! Merging decoded packets into a part or view.

use reel_cache::{PacketSink, SinkError};

use crate::timeline::PacketTimeline;

/// A [`PacketSink`] that adds every packet it accepts at one fixed time.
///
/// Packets are added through the target's own
/// [`add`](PacketTimeline::add), so a view target rejects times before its
/// start and grows past its end exactly as a direct add would.
pub struct PartSink<'a, T: ?Sized> {
    target: &'a T,
    time: i64,
    accepted: usize,
}

impl<'a, T: ?Sized> PartSink<'a, T> {
    /// A sink adding into `target` at `time`.
    pub fn new(target: &'a T, time: i64) -> Self {
        Self {
            target,
            time,
            accepted: 0,
        }
    }

    /// Change the time subsequent packets are added at.
    pub fn set_time(&mut self, time: i64) {
        self.time = time;
    }

    /// Number of packets added so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl<P, T> PacketSink<P> for PartSink<'_, T>
where
    P: Clone,
    T: PacketTimeline<P> + ?Sized,
{
    fn accept(&mut self, packet: P) -> Result<(), SinkError> {
        self.target
            .add(self.time, packet)
            .map_err(SinkError::target)?;
        self.accepted += 1;
        Ok(())
    }
}
