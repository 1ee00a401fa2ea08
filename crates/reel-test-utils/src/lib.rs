//! Test utilities and mock packets for Reel development.
//!
//! Provides [`MockPacket`], a small packet set implementing
//! [`Packet`], plus registration tables with deliberately broken entries
//! for exercising the registry's rejection paths.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;

use reel_core::{ConstructError, Packet, PacketData, PacketType, PayloadError, PayloadReader};

/// Kind tags for [`MockPacket`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MockKind {
    KeepAlive,
    Chat,
    Position,
    Blob,
    /// Constructor always fails.
    Faulty,
    /// Constructor succeeds a limited number of times per thread.
    Flaky,
    /// Registered without a constructor.
    SendOnly,
}

/// A miniature packet set covering fixed-width, string and opaque payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum MockPacket {
    KeepAlive { id: u64 },
    Chat { message: String },
    Position { entity_id: i32, x: f64, y: f64, z: f64 },
    Blob { data: Vec<u8> },
    Flaky,
    SendOnly { tag: u8 },
}

thread_local! {
    static RELEASED: Cell<usize> = const { Cell::new(0) };
    static FLAKY_BUDGET: Cell<usize> = const { Cell::new(usize::MAX) };
}

/// Number of [`Packet::release`] calls made on this thread.
pub fn released_count() -> usize {
    RELEASED.with(Cell::get)
}

/// Allow the flaky constructor to succeed `n` more times on this thread.
pub fn set_flaky_budget(n: usize) {
    FLAKY_BUDGET.with(|b| b.set(n));
}

impl MockPacket {
    pub fn keep_alive(id: u64) -> Self {
        Self::KeepAlive { id }
    }

    pub fn chat(message: impl Into<String>) -> Self {
        Self::Chat {
            message: message.into(),
        }
    }

    pub fn position(entity_id: i32, x: f64, y: f64, z: f64) -> Self {
        Self::Position { entity_id, x, y, z }
    }

    pub fn blob(data: Vec<u8>) -> Self {
        Self::Blob { data }
    }
}

impl Packet for MockPacket {
    type Kind = MockKind;

    fn kind(&self) -> MockKind {
        match self {
            Self::KeepAlive { .. } => MockKind::KeepAlive,
            Self::Chat { .. } => MockKind::Chat,
            Self::Position { .. } => MockKind::Position,
            Self::Blob { .. } => MockKind::Blob,
            Self::Flaky => MockKind::Flaky,
            Self::SendOnly { .. } => MockKind::SendOnly,
        }
    }

    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), PayloadError> {
        match self {
            Self::KeepAlive { id } => out.extend_from_slice(&id.to_le_bytes()),
            Self::Chat { message } => {
                out.extend_from_slice(&(message.len() as u32).to_le_bytes());
                out.extend_from_slice(message.as_bytes());
            }
            Self::Position { entity_id, x, y, z } => {
                out.extend_from_slice(&entity_id.to_le_bytes());
                for v in [x, y, z] {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
            Self::Blob { data } => out.extend_from_slice(data),
            Self::Flaky => {}
            Self::SendOnly { tag } => out.push(*tag),
        }
        Ok(())
    }

    fn read_payload(&mut self, payload: &[u8]) -> Result<(), PayloadError> {
        let mut r = PayloadReader::new(payload);
        match self {
            Self::KeepAlive { id } => *id = r.read_u64_le()?,
            Self::Chat { message } => *message = r.read_length_prefixed_str()?.to_owned(),
            Self::Position { entity_id, x, y, z } => {
                *entity_id = r.read_i32_le()?;
                *x = r.read_f64_le()?;
                *y = r.read_f64_le()?;
                *z = r.read_f64_le()?;
            }
            Self::Blob { data } => *data = r.read_bytes(r.remaining())?.to_vec(),
            Self::Flaky => {}
            Self::SendOnly { tag } => *tag = r.read_u8()?,
        }
        r.finish()
    }

    fn release(&mut self) {
        if let Self::Blob { data } = self {
            *data = Vec::new();
        }
        RELEASED.with(|c| c.set(c.get() + 1));
    }
}

pub const KEEP_ALIVE_ID: i32 = 0x00;
pub const CHAT_ID: i32 = 0x01;
pub const POSITION_ID: i32 = 0x02;
pub const BLOB_ID: i32 = 0x03;

pub const KEEP_ALIVE_TYPE: PacketType<MockPacket> =
    PacketType::new(MockKind::KeepAlive, "KeepAlive", || Ok(MockPacket::keep_alive(0)));
pub const CHAT_TYPE: PacketType<MockPacket> =
    PacketType::new(MockKind::Chat, "Chat", || Ok(MockPacket::chat(String::new())));
pub const POSITION_TYPE: PacketType<MockPacket> = PacketType::new(MockKind::Position, "Position", || {
    Ok(MockPacket::position(0, 0.0, 0.0, 0.0))
});
pub const BLOB_TYPE: PacketType<MockPacket> =
    PacketType::new(MockKind::Blob, "Blob", || Ok(MockPacket::blob(Vec::new())));

/// Constructor always fails.
pub const FAULTY_TYPE: PacketType<MockPacket> = PacketType::new(MockKind::Faulty, "Faulty", || {
    Err(ConstructError::failed("faulty packet refuses construction"))
});

/// Constructor fails once the thread's flaky budget is spent.
pub const FLAKY_TYPE: PacketType<MockPacket> = PacketType::new(MockKind::Flaky, "Flaky", || {
    FLAKY_BUDGET.with(|b| match b.get() {
        0 => Err(ConstructError::failed("flaky budget exhausted")),
        n => {
            b.set(n - 1);
            Ok(MockPacket::Flaky)
        }
    })
});

/// No zero-argument constructor.
pub const SEND_ONLY_TYPE: PacketType<MockPacket> =
    PacketType::without_constructor(MockKind::SendOnly, "SendOnly");

/// The well-behaved packet types with their wire ids.
pub fn mock_packet_types() -> Vec<(i32, PacketType<MockPacket>)> {
    vec![
        (KEEP_ALIVE_ID, KEEP_ALIVE_TYPE),
        (CHAT_ID, CHAT_TYPE),
        (POSITION_ID, POSITION_TYPE),
        (BLOB_ID, BLOB_TYPE),
    ]
}

/// A deterministic packet for position `i` in a synthetic stream.
pub fn sample_packet(i: usize) -> MockPacket {
    match i % 4 {
        0 => MockPacket::keep_alive(i as u64),
        1 => MockPacket::chat(format!("message #{i}")),
        2 => MockPacket::position(i as i32, i as f64 * 0.5, 64.0, -(i as f64)),
        _ => MockPacket::blob(vec![(i % 251) as u8; 16 + i % 48]),
    }
}

/// `n` packets spaced `step_ms` apart, starting at time 0.
pub fn sample_stream(n: usize, step_ms: i64) -> Vec<PacketData<MockPacket>> {
    (0..n)
        .map(|i| PacketData::new(i as i64 * step_ms, sample_packet(i)))
        .collect()
}
