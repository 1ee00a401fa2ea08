//! The [`Packet`] trait and the [`PacketType`] registration descriptor.

use std::fmt;
use std::hash::Hash;

use crate::error::{ConstructError, PayloadError};

/// One protocol message.
///
/// Implemented by the caller's packet set, typically an enum with one
/// variant per packet kind. The registry maps numeric wire ids to
/// [`Packet::Kind`] tags, and the codec uses the payload hooks to move
/// packets in and out of the compressed chunk format.
///
/// # Examples
///
/// ```
/// use reel_core::{Packet, PayloadError, PayloadReader};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct KeepAlive(u64);
///
/// impl Packet for KeepAlive {
///     type Kind = ();
///
///     fn kind(&self) -> Self::Kind {}
///
///     fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), PayloadError> {
///         out.extend_from_slice(&self.0.to_le_bytes());
///         Ok(())
///     }
///
///     fn read_payload(&mut self, payload: &[u8]) -> Result<(), PayloadError> {
///         let mut reader = PayloadReader::new(payload);
///         self.0 = reader.read_u64_le()?;
///         reader.finish()
///     }
/// }
///
/// let mut buf = Vec::new();
/// KeepAlive(7).write_payload(&mut buf).unwrap();
/// let mut decoded = KeepAlive(0);
/// decoded.read_payload(&buf).unwrap();
/// assert_eq!(decoded, KeepAlive(7));
/// ```
pub trait Packet: Sized + 'static {
    /// Tag identifying the packet's type, resolvable through the registry.
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// The type tag of this packet.
    fn kind(&self) -> Self::Kind;

    /// Serialize the payload (without id or length framing) into `out`.
    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), PayloadError>;

    /// Populate a freshly constructed packet from its payload bytes.
    fn read_payload(&mut self, payload: &[u8]) -> Result<(), PayloadError>;

    /// Free payload-side resources once the packet has been persisted.
    ///
    /// Called by the chunk builder right after the packet is serialized.
    fn release(&mut self) {}
}

/// Zero-argument constructor for a packet type.
pub type Constructor<P> = fn() -> Result<P, ConstructError>;

/// Registration descriptor for one packet type.
///
/// Pairs the kind tag with a display name and an optional zero-argument
/// constructor. A descriptor built with
/// [`without_constructor`](PacketType::without_constructor) models a type
/// that cannot be instantiated for decoding; registering it as incoming
/// is rejected.
pub struct PacketType<P: Packet> {
    kind: P::Kind,
    name: &'static str,
    constructor: Option<Constructor<P>>,
}

impl<P: Packet> PacketType<P> {
    /// A packet type that can be constructed for decoding.
    pub const fn new(kind: P::Kind, name: &'static str, constructor: Constructor<P>) -> Self {
        Self {
            kind,
            name,
            constructor: Some(constructor),
        }
    }

    /// A packet type that is only ever sent, never instantiated.
    pub const fn without_constructor(kind: P::Kind, name: &'static str) -> Self {
        Self {
            kind,
            name,
            constructor: None,
        }
    }

    /// The kind tag.
    pub fn kind(&self) -> P::Kind {
        self.kind
    }

    /// The display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether a zero-argument constructor is available.
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Build a fresh instance through the zero-argument constructor.
    pub fn construct(&self) -> Result<P, ConstructError> {
        match self.constructor {
            Some(ctor) => ctor(),
            None => Err(ConstructError::NoConstructor),
        }
    }
}

impl<P: Packet> Clone for PacketType<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Packet> Copy for PacketType<P> {}

impl<P: Packet> PartialEq for PacketType<P> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name
    }
}

impl<P: Packet> Eq for PacketType<P> {}

impl<P: Packet> fmt::Debug for PacketType<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketType")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("constructible", &self.constructor.is_some())
            .finish()
    }
}
