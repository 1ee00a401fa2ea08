//! Codec configuration.

use crate::error::ConfigError;

/// Default zlib compression level (range: 0-9).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Configuration for [`PacketCodec`](crate::PacketCodec).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// zlib compression level. 0 stores, 9 compresses hardest. Default: 6.
    pub compression_level: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl CodecConfig {
    /// Check that every setting is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > 9 {
            return Err(ConfigError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        Ok(())
    }
}
