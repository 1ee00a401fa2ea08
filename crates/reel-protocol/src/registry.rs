//! The packet type registry.
//!
//! [`PacketProtocol`] holds two independent mappings for one protocol
//! direction: `incoming` (wire id to [`PacketType`]) used when decoding,
//! and `outgoing` (packet kind to wire id) used when encoding. Incoming
//! registrations are probed: the type's zero-argument constructor must
//! succeed or the registration is rolled back.
//!
//! Storage is delegated to a [`TypeTable`] strategy. [`MapTable`] is the
//! default; callers that need to observe or redirect lookups pass their
//! own implementation to [`PacketProtocol::with_table`].

use std::fmt;

use indexmap::IndexMap;
use reel_core::{Packet, PacketType};
use tracing::{trace, warn};

use crate::error::ProtocolError;

/// Storage strategy behind a [`PacketProtocol`].
///
/// Implementations must keep the two directions independent: removing an
/// incoming entry never touches the outgoing map.
pub trait TypeTable<P: Packet>: Send + Sync {
    /// The incoming type registered for `id`.
    fn incoming(&self, id: i32) -> Option<PacketType<P>>;

    /// The outgoing id registered for `kind`.
    fn outgoing(&self, kind: P::Kind) -> Option<i32>;

    /// Map `id` to `ty`, returning the previous incoming entry.
    fn insert_incoming(&mut self, id: i32, ty: PacketType<P>) -> Option<PacketType<P>>;

    /// Remove the incoming entry for `id`, returning it.
    fn remove_incoming(&mut self, id: i32) -> Option<PacketType<P>>;

    /// Map `kind` to `id`, returning the previous outgoing id.
    fn insert_outgoing(&mut self, kind: P::Kind, id: i32) -> Option<i32>;

    /// Remove every entry in both directions.
    fn clear(&mut self);

    /// Number of incoming entries.
    fn incoming_len(&self) -> usize;

    /// Number of outgoing entries.
    fn outgoing_len(&self) -> usize;
}

/// Insertion-ordered [`TypeTable`] backed by two `IndexMap`s.
pub struct MapTable<P: Packet> {
    incoming: IndexMap<i32, PacketType<P>>,
    outgoing: IndexMap<P::Kind, i32>,
}

impl<P: Packet> MapTable<P> {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            incoming: IndexMap::new(),
            outgoing: IndexMap::new(),
        }
    }
}

impl<P: Packet> Default for MapTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Packet> TypeTable<P> for MapTable<P> {
    fn incoming(&self, id: i32) -> Option<PacketType<P>> {
        self.incoming.get(&id).copied()
    }

    fn outgoing(&self, kind: P::Kind) -> Option<i32> {
        self.outgoing.get(&kind).copied()
    }

    fn insert_incoming(&mut self, id: i32, ty: PacketType<P>) -> Option<PacketType<P>> {
        self.incoming.insert(id, ty)
    }

    fn remove_incoming(&mut self, id: i32) -> Option<PacketType<P>> {
        self.incoming.shift_remove(&id)
    }

    fn insert_outgoing(&mut self, kind: P::Kind, id: i32) -> Option<i32> {
        self.outgoing.insert(kind, id)
    }

    fn clear(&mut self) {
        self.incoming.clear();
        self.outgoing.clear();
    }

    fn incoming_len(&self) -> usize {
        self.incoming.len()
    }

    fn outgoing_len(&self) -> usize {
        self.outgoing.len()
    }
}

/// Bidirectional id/type registry for one protocol direction.
///
/// # Examples
///
/// ```
/// use reel_core::{Packet, PacketType, PayloadError};
/// use reel_protocol::PacketProtocol;
///
/// #[derive(Debug, PartialEq)]
/// struct Ping;
///
/// impl Packet for Ping {
///     type Kind = u8;
///     fn kind(&self) -> u8 { 0 }
///     fn write_payload(&self, _: &mut Vec<u8>) -> Result<(), PayloadError> { Ok(()) }
///     fn read_payload(&mut self, _: &[u8]) -> Result<(), PayloadError> { Ok(()) }
/// }
///
/// let mut protocol = PacketProtocol::new();
/// protocol.register(0x21, PacketType::new(0, "Ping", || Ok(Ping))).unwrap();
///
/// assert_eq!(protocol.create_incoming_packet(0x21).unwrap(), Ping);
/// assert_eq!(protocol.get_outgoing_id(0).unwrap(), 0x21);
/// assert!(protocol.create_incoming_packet(0x22).is_err());
/// ```
pub struct PacketProtocol<P: Packet> {
    table: Box<dyn TypeTable<P>>,
}

impl<P: Packet> PacketProtocol<P> {
    /// An empty registry backed by a [`MapTable`].
    pub fn new() -> Self {
        Self::with_table(Box::new(MapTable::new()))
    }

    /// An empty registry backed by a caller-supplied storage strategy.
    ///
    /// The table is used as-is; entries it already holds are visible
    /// immediately and are not re-probed.
    pub fn with_table(table: Box<dyn TypeTable<P>>) -> Self {
        Self { table }
    }

    /// Build a registry from an already-resolved `(id, type)` table,
    /// registering every entry in both directions.
    pub fn from_table_entries(
        entries: impl IntoIterator<Item = (i32, PacketType<P>)>,
    ) -> Result<Self, ProtocolError> {
        let mut protocol = Self::new();
        for (id, ty) in entries {
            protocol.register(id, ty)?;
        }
        Ok(protocol)
    }

    /// Register `ty` under `id` as both incoming and outgoing.
    ///
    /// If the incoming probe fails, nothing is registered.
    pub fn register(&mut self, id: i32, ty: PacketType<P>) -> Result<(), ProtocolError> {
        self.register_incoming(id, ty)?;
        self.register_outgoing(id, ty.kind());
        Ok(())
    }

    /// Register an incoming type, probing its constructor.
    ///
    /// On probe failure the entry for `id` is restored to whatever it was
    /// before the call and [`ProtocolError::InvalidPacketType`] is returned.
    pub fn register_incoming(&mut self, id: i32, ty: PacketType<P>) -> Result<(), ProtocolError> {
        let previous = self.table.insert_incoming(id, ty);
        match self.create_incoming_packet(id) {
            Ok(_probe) => {
                trace!(id, name = ty.name(), "registered incoming packet type");
                Ok(())
            }
            Err(err) => {
                match previous {
                    Some(prev) => {
                        self.table.insert_incoming(id, prev);
                    }
                    None => {
                        self.table.remove_incoming(id);
                    }
                }
                let source = match err {
                    ProtocolError::InstantiationFailure { source, .. } => source,
                    // Negative ids never resolve.
                    other => return Err(other),
                };
                warn!(id, name = ty.name(), error = %source, "rolled back incoming registration");
                Err(ProtocolError::InvalidPacketType {
                    id,
                    name: ty.name(),
                    source,
                })
            }
        }
    }

    /// Register an outgoing id for `kind`. Never fails.
    pub fn register_outgoing(&mut self, id: i32, kind: P::Kind) {
        trace!(id, ?kind, "registered outgoing packet kind");
        self.table.insert_outgoing(kind, id);
    }

    /// Construct a fresh packet for an incoming id.
    pub fn create_incoming_packet(&self, id: i32) -> Result<P, ProtocolError> {
        let ty = self.incoming_type(id)?;
        ty.construct()
            .map_err(|source| ProtocolError::InstantiationFailure {
                id,
                name: ty.name(),
                source,
            })
    }

    /// The incoming type registered for `id`, without constructing it.
    pub fn incoming_type(&self, id: i32) -> Result<PacketType<P>, ProtocolError> {
        if id < 0 {
            return Err(ProtocolError::UnknownPacketId { id });
        }
        self.table
            .incoming(id)
            .ok_or(ProtocolError::UnknownPacketId { id })
    }

    /// The outgoing id registered for `kind`.
    pub fn get_outgoing_id(&self, kind: P::Kind) -> Result<i32, ProtocolError> {
        self.table
            .outgoing(kind)
            .ok_or_else(|| ProtocolError::UnregisteredPacketType {
                kind: format!("{kind:?}"),
            })
    }

    /// Remove every registration in both directions.
    pub fn clear_packets(&mut self) {
        self.table.clear();
    }

    /// Number of registered incoming ids.
    pub fn incoming_len(&self) -> usize {
        self.table.incoming_len()
    }

    /// Number of registered outgoing kinds.
    pub fn outgoing_len(&self) -> usize {
        self.table.outgoing_len()
    }
}

impl<P: Packet> Default for PacketProtocol<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Packet> fmt::Debug for PacketProtocol<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketProtocol")
            .field("incoming", &self.table.incoming_len())
            .field("outgoing", &self.table.outgoing_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::{ConstructError, PayloadError};

    #[derive(Debug, PartialEq)]
    enum Sample {
        A,
        B,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum SampleKind {
        A,
        B,
        Broken,
    }

    impl Packet for Sample {
        type Kind = SampleKind;

        fn kind(&self) -> SampleKind {
            match self {
                Self::A => SampleKind::A,
                Self::B => SampleKind::B,
            }
        }

        fn write_payload(&self, _out: &mut Vec<u8>) -> Result<(), PayloadError> {
            Ok(())
        }

        fn read_payload(&mut self, _payload: &[u8]) -> Result<(), PayloadError> {
            Ok(())
        }
    }

    const A: PacketType<Sample> = PacketType::new(SampleKind::A, "A", || Ok(Sample::A));
    const B: PacketType<Sample> = PacketType::new(SampleKind::B, "B", || Ok(Sample::B));
    const BROKEN: PacketType<Sample> = PacketType::new(SampleKind::Broken, "Broken", || {
        Err(ConstructError::failed("nope"))
    });

    #[test]
    fn register_both_directions() {
        let mut protocol = PacketProtocol::new();
        protocol.register(1, A).unwrap();
        protocol.register(2, B).unwrap();

        assert_eq!(protocol.create_incoming_packet(1).unwrap(), Sample::A);
        assert_eq!(protocol.create_incoming_packet(2).unwrap(), Sample::B);
        assert_eq!(protocol.get_outgoing_id(SampleKind::A).unwrap(), 1);
        assert_eq!(protocol.get_outgoing_id(SampleKind::B).unwrap(), 2);
        assert_eq!(protocol.incoming_len(), 2);
        assert_eq!(protocol.outgoing_len(), 2);
    }

    #[test]
    fn negative_id_is_unknown() {
        let protocol = PacketProtocol::<Sample>::new();
        assert_eq!(
            protocol.create_incoming_packet(-1).unwrap_err(),
            ProtocolError::UnknownPacketId { id: -1 }
        );
    }

    #[test]
    fn outgoing_is_not_probed() {
        let mut protocol = PacketProtocol::<Sample>::new();
        protocol.register_outgoing(9, SampleKind::Broken);
        assert_eq!(protocol.get_outgoing_id(SampleKind::Broken).unwrap(), 9);
        assert!(protocol.create_incoming_packet(9).is_err());
    }

    #[test]
    fn failed_probe_removes_fresh_entry() {
        let mut protocol = PacketProtocol::new();
        let err = protocol.register_incoming(4, BROKEN).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidPacketType { id: 4, name: "Broken", .. }
        ));
        assert_eq!(protocol.incoming_len(), 0);
    }

    #[test]
    fn failed_probe_restores_previous_entry() {
        let mut protocol = PacketProtocol::new();
        protocol.register_incoming(4, A).unwrap();
        assert!(protocol.register_incoming(4, BROKEN).is_err());
        assert_eq!(protocol.incoming_type(4).unwrap(), A);
        assert_eq!(protocol.create_incoming_packet(4).unwrap(), Sample::A);
    }

    #[test]
    fn failed_register_skips_outgoing() {
        let mut protocol = PacketProtocol::new();
        assert!(protocol.register(5, BROKEN).is_err());
        assert!(matches!(
            protocol.get_outgoing_id(SampleKind::Broken),
            Err(ProtocolError::UnregisteredPacketType { .. })
        ));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut protocol = PacketProtocol::new();
        protocol.register(1, A).unwrap();
        protocol.clear_packets();
        assert!(protocol.create_incoming_packet(1).is_err());
        assert!(protocol.get_outgoing_id(SampleKind::A).is_err());

        // Re-registering after a clear behaves like a fresh registry.
        protocol.register(1, B).unwrap();
        assert_eq!(protocol.create_incoming_packet(1).unwrap(), Sample::B);
    }

    #[test]
    fn from_table_entries_stops_at_first_failure() {
        let result = PacketProtocol::from_table_entries([(1, A), (2, BROKEN), (3, B)]);
        assert!(matches!(
            result,
            Err(ProtocolError::InvalidPacketType { id: 2, .. })
        ));
    }
}
