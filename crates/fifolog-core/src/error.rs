//! Error types for the log engine.
//!
//! Only two things are ever reported as errors: a read window that leaves the
//! occupied range, and a configuration (or producer) mistake caught before any
//! ring is touched. Everything else that looks error-like in the retention
//! policy (empty append, still-mode discard, still-mode truncation) is a
//! documented silent outcome, not a failure.

use thiserror::Error;

/// Typed failures surfaced by [`FifoLog`](crate::FifoLog) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FifoLogError {
    /// A read or query window exceeds the currently occupied range.
    #[error("range at offset {offset} with length {len} exceeds occupied length {occupied}")]
    OutOfRange {
        /// Requested logical start offset.
        offset: usize,
        /// Requested window length.
        len: usize,
        /// Occupied length at the time of the call.
        occupied: usize,
    },

    /// The buffer was constructed or driven in a way the engine cannot honor.
    ///
    /// This covers zero/tiny capacities and single append chunks that could
    /// never fit even an empty buffer. It signals misuse by the caller and is
    /// raised before any state mutates.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Human-readable description of the misuse.
        reason: String,
    },
}

impl FifoLogError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let err = FifoLogError::OutOfRange {
            offset: 10,
            len: 5,
            occupied: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 10"));
        assert!(msg.contains("length 5"));
        assert!(msg.contains("occupied length 12"));
    }

    #[test]
    fn invalid_configuration_display() {
        let err = FifoLogError::invalid_config("capacity must be at least 2");
        assert_eq!(
            err.to_string(),
            "invalid configuration: capacity must be at least 2"
        );
    }
}
