//! Error types raised by packet implementations.
//!
//! These are the leaf errors: the registry and codec wrap them as the
//! `source` of their own failures so callers can walk back to the
//! packet-level cause.

use thiserror::Error;

/// A packet type could not be instantiated through its zero-argument
/// constructor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConstructError {
    /// The packet type was registered without a constructor.
    #[error("packet type has no zero-argument constructor")]
    NoConstructor,
    /// The constructor ran and reported a failure.
    #[error("constructor failed: {reason}")]
    Failed {
        /// Human-readable description of what went wrong.
        reason: String,
    },
}

impl ConstructError {
    /// Shorthand for [`ConstructError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// A packet payload could not be serialized or deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload ended before a field could be read.
    #[error("payload truncated: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        /// Offset of the field that could not be read.
        offset: usize,
        /// Bytes the field needed.
        needed: usize,
        /// Bytes left in the payload.
        available: usize,
    },
    /// Bytes remained after the last field was read.
    #[error("{remaining} trailing bytes after payload")]
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },
    /// A field held a value the packet cannot represent.
    #[error("invalid payload: {reason}")]
    Invalid {
        /// Description of the rejected value.
        reason: String,
    },
}

impl PayloadError {
    /// Shorthand for [`PayloadError::Invalid`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_details() {
        let err = PayloadError::Truncated {
            offset: 4,
            needed: 8,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "payload truncated: needed 8 bytes at offset 4, 2 available"
        );
        assert_eq!(
            ConstructError::failed("boom").to_string(),
            "constructor failed: boom"
        );
    }
}
