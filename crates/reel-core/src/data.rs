//! Timestamped packets.

/// An immutable `(time, packet)` pair.
///
/// `time` is in milliseconds from the start of the recording. Equality is
/// structural: two entries are equal when both the time and the packet
/// compare equal.
///
/// # Examples
///
/// ```
/// use reel_core::PacketData;
///
/// let data = PacketData::new(250, "chat");
/// assert_eq!(data.time(), 250);
/// assert_eq!(data.shifted(100).time(), 350);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PacketData<P> {
    time: i64,
    packet: P,
}

impl<P> PacketData<P> {
    /// Pair a packet with its timestamp.
    pub fn new(time: i64, packet: P) -> Self {
        Self { time, packet }
    }

    /// Timestamp in milliseconds.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// The packet.
    pub fn packet(&self) -> &P {
        &self.packet
    }

    /// Take the packet, dropping the timestamp.
    pub fn into_packet(self) -> P {
        self.packet
    }

    /// Split into `(time, packet)`.
    pub fn into_parts(self) -> (i64, P) {
        (self.time, self.packet)
    }

    /// The same packet with `offset` added to its timestamp.
    pub fn shifted(self, offset: i64) -> Self {
        Self {
            time: self.time + offset,
            packet: self.packet,
        }
    }
}

impl<P> From<(i64, P)> for PacketData<P> {
    fn from((time, packet): (i64, P)) -> Self {
        Self::new(time, packet)
    }
}
