//! Destinations for decoded packets.

use crate::error::SinkError;

/// Receives packets decoded from a chunk, in chunk order.
///
/// Returning an error aborts the read that is feeding the sink.
pub trait PacketSink<P> {
    /// Take ownership of the next packet.
    fn accept(&mut self, packet: P) -> Result<(), SinkError>;
}

impl<P> PacketSink<P> for Vec<P> {
    fn accept(&mut self, packet: P) -> Result<(), SinkError> {
        self.push(packet);
        Ok(())
    }
}

impl<P, S: PacketSink<P> + ?Sized> PacketSink<P> for &mut S {
    fn accept(&mut self, packet: P) -> Result<(), SinkError> {
        (**self).accept(packet)
    }
}

/// Adapts a closure into a [`PacketSink`].
///
/// ```
/// use reel_cache::{FnSink, PacketSink, SinkError};
///
/// let mut total = 0;
/// let mut sink = FnSink(|n: u32| -> Result<(), SinkError> {
///     total += n;
///     Ok(())
/// });
/// sink.accept(3).unwrap();
/// sink.accept(4).unwrap();
/// drop(sink);
/// assert_eq!(total, 7);
/// ```
pub struct FnSink<F>(pub F);

impl<P, F> PacketSink<P> for FnSink<F>
where
    F: FnMut(P) -> Result<(), SinkError>,
{
    fn accept(&mut self, packet: P) -> Result<(), SinkError> {
        (self.0)(packet)
    }
}
