//! Buffer sizing for file-backed caches.

use crate::error::ConfigError;

/// Default write buffer: 64 KiB.
pub const DEFAULT_WRITE_BUFFER_BYTES: usize = 64 * 1024;

/// Default per-reader buffer: 8 KiB.
pub const DEFAULT_READ_BUFFER_BYTES: usize = 8 * 1024;

/// Buffer sizes used by [`FileCache`](crate::FileCache).
///
/// Memory-backed caches ignore this configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Capacity of the buffered writer behind a file-backed
    /// [`WriteableCache`](crate::WriteableCache).
    pub write_buffer_bytes: usize,
    /// Capacity of each buffered reader returned by
    /// [`ReadableCache::seek`](crate::ReadableCache::seek).
    pub read_buffer_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            write_buffer_bytes: DEFAULT_WRITE_BUFFER_BYTES,
            read_buffer_bytes: DEFAULT_READ_BUFFER_BYTES,
        }
    }
}

impl CacheConfig {
    /// Check that both buffers are non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.write_buffer_bytes == 0 {
            return Err(ConfigError::ZeroWriteBuffer);
        }
        if self.read_buffer_bytes == 0 {
            return Err(ConfigError::ZeroReadBuffer);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(CacheConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_buffers_rejected() {
        let cfg = CacheConfig {
            write_buffer_bytes: 0,
            ..CacheConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroWriteBuffer));

        let cfg = CacheConfig {
            read_buffer_bytes: 0,
            ..CacheConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroReadBuffer));
    }
}
