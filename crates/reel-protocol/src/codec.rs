//! Compressed packet records.
//!
//! A record is `varint(id) varint(len) bytes[len]` where `bytes` is the
//! zlib-compressed payload produced by
//! [`Packet::write_payload`](reel_core::Packet::write_payload).
//!
//! [`PacketCodec::decode`] reads the full framing (id, length and the
//! compressed bytes) before resolving the id or inflating anything. Any
//! failure after the framing was read therefore leaves the reader at the
//! end of the malformed record, and a caller may skip it and continue.
//! Framing failures (truncated varint or bytes, oversized length) leave the
//! reader wherever the failing read stopped.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use reel_core::Packet;
use smallvec::SmallVec;

use crate::config::CodecConfig;
use crate::error::{CodecError, ConfigError};
use crate::registry::PacketProtocol;

/// Upper bound on the uncompressed payload, the compressed bytes and the
/// inflated size of one record.
pub const MAX_PAYLOAD_BYTES: u32 = 32 * 1024 * 1024;

// ── Varints ─────────────────────────────────────────────────────

/// Number of bytes [`write_varint`] emits for `value`.
pub fn varint_len(value: u32) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0xfff_ffff => 4,
        _ => 5,
    }
}

/// Write an unsigned LEB128 varint.
pub fn write_varint(w: &mut dyn Write, mut value: u32) -> Result<(), CodecError> {
    let mut buf: SmallVec<[u8; 5]> = SmallVec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
    w.write_all(&buf)?;
    Ok(())
}

/// Read an unsigned LEB128 varint of at most five bytes.
///
/// Encodings longer than five bytes, or whose value does not fit in a
/// `u32`, are [`CodecError::VarIntTooLong`].
pub fn read_varint(r: &mut dyn Read) -> Result<u32, CodecError> {
    let mut value: u32 = 0;
    for i in 0..5 {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)?;
        // The fifth byte carries only the top four bits.
        if i == 4 && byte[0] & 0x70 != 0 {
            return Err(CodecError::VarIntTooLong);
        }
        value |= u32::from(byte[0] & 0x7f) << (7 * i);
        if byte[0] & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::VarIntTooLong)
}

// ── Packet records ──────────────────────────────────────────────

/// Encodes and decodes single packet records.
#[derive(Clone, Copy, Debug)]
pub struct PacketCodec {
    level: Compression,
}

impl PacketCodec {
    /// A codec using the configured compression level.
    pub fn new(config: &CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            level: Compression::new(config.compression_level),
        })
    }

    /// The compression level used when encoding.
    pub fn compression_level(&self) -> u32 {
        self.level.level()
    }

    /// Write one record for `packet`. Returns the number of bytes written.
    pub fn encode<P: Packet>(
        &self,
        out: &mut dyn Write,
        packet: &P,
        registry: &PacketProtocol<P>,
    ) -> Result<usize, CodecError> {
        let id = registry.get_outgoing_id(packet.kind())?;

        let mut payload = Vec::new();
        packet
            .write_payload(&mut payload)
            .map_err(|source| CodecError::Payload { id, source })?;
        if payload.len() as u64 > u64::from(MAX_PAYLOAD_BYTES) {
            return Err(CodecError::PayloadTooLarge {
                len: payload.len() as u64,
                max: u64::from(MAX_PAYLOAD_BYTES),
            });
        }

        let mut encoder = ZlibEncoder::new(Vec::with_capacity(payload.len() / 2 + 16), self.level);
        encoder
            .write_all(&payload)
            .map_err(|source| CodecError::Compression { id, source })?;
        let compressed = encoder
            .finish()
            .map_err(|source| CodecError::Compression { id, source })?;
        if compressed.len() as u64 > u64::from(MAX_PAYLOAD_BYTES) {
            return Err(CodecError::PayloadTooLarge {
                len: compressed.len() as u64,
                max: u64::from(MAX_PAYLOAD_BYTES),
            });
        }

        // Wire ids are the 32-bit pattern of the signed id.
        let raw_id = id as u32;
        let len = compressed.len() as u32;
        write_varint(out, raw_id)?;
        write_varint(out, len)?;
        out.write_all(&compressed)?;
        Ok(varint_len(raw_id) + varint_len(len) + compressed.len())
    }

    /// Read one record and rebuild its packet through `registry`.
    pub fn decode<P: Packet>(
        &self,
        registry: &PacketProtocol<P>,
        r: &mut dyn Read,
    ) -> Result<P, CodecError> {
        let id = read_varint(r)? as i32;
        let len = read_varint(r)?;
        if len > MAX_PAYLOAD_BYTES {
            return Err(CodecError::PayloadTooLarge {
                len: u64::from(len),
                max: u64::from(MAX_PAYLOAD_BYTES),
            });
        }
        let mut compressed = vec![0u8; len as usize];
        r.read_exact(&mut compressed)?;

        let mut packet = registry.create_incoming_packet(id)?;

        let mut payload = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .take(u64::from(MAX_PAYLOAD_BYTES) + 1)
            .read_to_end(&mut payload)
            .map_err(|source| CodecError::Decompression { id, source })?;
        if payload.len() as u64 > u64::from(MAX_PAYLOAD_BYTES) {
            return Err(CodecError::PayloadTooLarge {
                len: payload.len() as u64,
                max: u64::from(MAX_PAYLOAD_BYTES),
            });
        }

        packet
            .read_payload(&payload)
            .map_err(|source| CodecError::Payload { id, source })?;
        Ok(packet)
    }
}

impl Default for PacketCodec {
    fn default() -> Self {
        Self {
            level: Compression::new(crate::config::DEFAULT_COMPRESSION_LEVEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use proptest::prelude::*;
    use reel_test_utils::{mock_packet_types, sample_packet, MockKind, MockPacket, CHAT_ID};

    fn registry() -> PacketProtocol<MockPacket> {
        PacketProtocol::from_table_entries(mock_packet_types()).unwrap()
    }

    // ── Varints ─────────────────────────────────────────────────

    #[test]
    fn varint_known_encodings() {
        let cases: [(u32, &[u8]); 5] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7f]),
            (300, &[0xac, 0x02]),
            (u32::MAX, &[0xff, 0xff, 0xff, 0xff, 0x0f]),
        ];
        for (value, expected) in cases {
            let mut buf = Vec::new();
            write_varint(&mut buf, value).unwrap();
            assert_eq!(buf, expected, "encoding of {value}");
            assert_eq!(varint_len(value), expected.len());
        }
    }

    #[test]
    fn varint_too_long_rejected() {
        let data = [0x80u8, 0x80, 0x80, 0x80, 0x80, 0x01];
        assert!(matches!(
            read_varint(&mut data.as_slice()),
            Err(CodecError::VarIntTooLong)
        ));
    }

    #[test]
    fn varint_overflowing_u32_rejected() {
        let data = [0xffu8, 0xff, 0xff, 0xff, 0x7f];
        assert!(matches!(
            read_varint(&mut data.as_slice()),
            Err(CodecError::VarIntTooLong)
        ));
        let max = [0xffu8, 0xff, 0xff, 0xff, 0x0f];
        assert_eq!(read_varint(&mut max.as_slice()).unwrap(), u32::MAX);
    }

    #[test]
    fn varint_truncated_is_io_error() {
        let data = [0x80u8];
        assert!(matches!(
            read_varint(&mut data.as_slice()),
            Err(CodecError::Io(_))
        ));
    }

    proptest! {
        #[test]
        fn varint_roundtrip(v in any::<u32>()) {
            let mut buf = Vec::new();
            write_varint(&mut buf, v).unwrap();
            prop_assert_eq!(buf.len(), varint_len(v));
            let got = read_varint(&mut buf.as_slice()).unwrap();
            prop_assert_eq!(v, got);
        }
    }

    // ── Records ─────────────────────────────────────────────────

    #[test]
    fn record_roundtrip_for_every_kind() {
        let registry = registry();
        let codec = PacketCodec::default();
        for i in 0..4 {
            let packet = sample_packet(i);
            let mut buf = Vec::new();
            let written = codec.encode(&mut buf, &packet, &registry).unwrap();
            assert_eq!(written, buf.len());

            let mut cursor = buf.as_slice();
            let decoded = codec.decode(&registry, &mut cursor).unwrap();
            assert_eq!(decoded, packet);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn record_starts_with_id_and_length() {
        let registry = registry();
        let mut buf = Vec::new();
        PacketCodec::default()
            .encode(&mut buf, &MockPacket::chat("hi"), &registry)
            .unwrap();

        let mut cursor = buf.as_slice();
        assert_eq!(read_varint(&mut cursor).unwrap(), CHAT_ID as u32);
        let len = read_varint(&mut cursor).unwrap() as usize;
        assert_eq!(cursor.len(), len);
    }

    #[test]
    fn level_zero_still_roundtrips() {
        let registry = registry();
        let codec = PacketCodec::new(&CodecConfig {
            compression_level: 0,
        })
        .unwrap();
        let packet = MockPacket::blob(vec![9; 1024]);
        let mut buf = Vec::new();
        codec.encode(&mut buf, &packet, &registry).unwrap();
        assert_eq!(codec.decode(&registry, &mut buf.as_slice()).unwrap(), packet);
    }

    #[test]
    fn unregistered_kind_fails_encode() {
        let registry = registry();
        let mut buf = Vec::new();
        let err = PacketCodec::default()
            .encode(&mut buf, &MockPacket::SendOnly { tag: 1 }, &registry)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::Protocol(ProtocolError::UnregisteredPacketType { .. })
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn unknown_id_leaves_cursor_after_record() {
        let registry = registry();
        let codec = PacketCodec::default();
        let mut sender = PacketProtocol::new();
        sender.register_outgoing(77, MockKind::Chat);

        let mut buf = Vec::new();
        codec.encode(&mut buf, &MockPacket::chat("lost"), &sender).unwrap();
        codec
            .encode(&mut buf, &MockPacket::keep_alive(5), &registry)
            .unwrap();

        let mut cursor = buf.as_slice();
        let err = codec.decode(&registry, &mut cursor).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Protocol(ProtocolError::UnknownPacketId { id: 77 })
        ));
        // The next record is still readable.
        assert_eq!(
            codec.decode(&registry, &mut cursor).unwrap(),
            MockPacket::keep_alive(5)
        );
    }

    #[test]
    fn corrupt_compressed_bytes_fail_decompression() {
        let registry = registry();
        let mut buf = Vec::new();
        write_varint(&mut buf, CHAT_ID as u32).unwrap();
        write_varint(&mut buf, 4).unwrap();
        buf.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let mut cursor = buf.as_slice();
        let err = PacketCodec::default()
            .decode(&registry, &mut cursor)
            .unwrap_err();
        assert!(matches!(err, CodecError::Decompression { id, .. } if id == CHAT_ID));
        assert!(cursor.is_empty());
    }

    #[test]
    fn truncated_record_is_io_error() {
        let registry = registry();
        let mut buf = Vec::new();
        PacketCodec::default()
            .encode(&mut buf, &MockPacket::chat("truncate me"), &registry)
            .unwrap();
        buf.truncate(buf.len() - 3);
        assert!(matches!(
            PacketCodec::default().decode(&registry, &mut buf.as_slice()),
            Err(CodecError::Io(_))
        ));
    }

    #[test]
    fn payload_mismatch_reports_payload_error() {
        let registry = registry();
        let codec = PacketCodec::default();
        // A chat payload sent under the keep-alive id.
        let mut sender = PacketProtocol::new();
        sender.register_outgoing(0, MockKind::Chat);
        let mut buf = Vec::new();
        codec.encode(&mut buf, &MockPacket::chat("x"), &sender).unwrap();

        let err = codec.decode(&registry, &mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, CodecError::Payload { id: 0, .. }));
    }

    #[test]
    fn oversized_length_rejected_before_allocation() {
        let registry = registry();
        let mut buf = Vec::new();
        write_varint(&mut buf, CHAT_ID as u32).unwrap();
        write_varint(&mut buf, MAX_PAYLOAD_BYTES + 1).unwrap();
        assert!(matches!(
            PacketCodec::default().decode(&registry, &mut buf.as_slice()),
            Err(CodecError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn stored_payload_at_limit_is_rejected_before_writing() {
        let registry = registry();
        let codec = PacketCodec::new(&CodecConfig {
            compression_level: 0,
        })
        .unwrap();
        // Stored blocks add framing, so the record would exceed the limit.
        let packet = MockPacket::blob(vec![0; MAX_PAYLOAD_BYTES as usize]);
        let mut buf = Vec::new();
        let err = codec.encode(&mut buf, &packet, &registry).unwrap_err();
        assert!(matches!(
            err,
            CodecError::PayloadTooLarge { len, max } if len > max
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn negative_outgoing_id_uses_five_bytes() {
        let mut sender = PacketProtocol::new();
        sender.register_outgoing(-2, MockKind::KeepAlive);
        let mut buf = Vec::new();
        PacketCodec::default()
            .encode(&mut buf, &MockPacket::keep_alive(1), &sender)
            .unwrap();
        let mut cursor = buf.as_slice();
        assert_eq!(read_varint(&mut cursor).unwrap() as i32, -2);
        assert_eq!(buf.len() - cursor.len(), 5);
    }
}
