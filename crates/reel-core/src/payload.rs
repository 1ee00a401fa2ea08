//! Bounds-checked reading of packet payloads.
//!
//! [`PayloadReader`] is the read half packet implementations use inside
//! [`Packet::read_payload`](crate::Packet::read_payload). All integers are
//! little-endian; byte arrays and strings are prefixed with a `u32`
//! length. Writing needs no helper: append `to_le_bytes()` to the output
//! vector.

use crate::error::PayloadError;

/// A cursor over a payload slice that reports truncation instead of
/// panicking.
#[derive(Clone, Debug)]
pub struct PayloadReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> PayloadReader<'a> {
    /// Start reading at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Read exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], PayloadError> {
        if len > self.remaining() {
            return Err(PayloadError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.data[start..self.offset])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PayloadError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, PayloadError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, PayloadError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian i32.
    pub fn read_i32_le(&mut self) -> Result<i32, PayloadError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, PayloadError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian i64.
    pub fn read_i64_le(&mut self) -> Result<i64, PayloadError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian f64.
    pub fn read_f64_le(&mut self) -> Result<f64, PayloadError> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Read a `u32`-length-prefixed byte array.
    pub fn read_length_prefixed_bytes(&mut self) -> Result<&'a [u8], PayloadError> {
        let len = self.read_u32_le()? as usize;
        self.read_bytes(len)
    }

    /// Read a `u32`-length-prefixed UTF-8 string.
    pub fn read_length_prefixed_str(&mut self) -> Result<&'a str, PayloadError> {
        let bytes = self.read_length_prefixed_bytes()?;
        std::str::from_utf8(bytes)
            .map_err(|e| PayloadError::invalid(format!("invalid UTF-8 string: {e}")))
    }

    /// Fail if any bytes are left unread.
    pub fn finish(self) -> Result<(), PayloadError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(PayloadError::TrailingBytes { remaining }),
        }
    }
}
