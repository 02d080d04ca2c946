//! Change notifications delivered to registered observers.
//!
//! Every mutation of a [`FifoLog`](crate::FifoLog) is reported synchronously,
//! inside the call that produced it, as at most one [`Removed`] followed by at
//! most one [`Inserted`]. Offsets are logical (relative to the current start
//! of occupied data) and expressed in the coordinate space current at
//! delivery time: a `Removed` is delivered before the pending insert is
//! applied, an `Inserted` after eviction has already shifted the window.
//!
//! This is the plain observer rendition of the host-toolkit document events
//! the view layer consumes; no widget types leak through it.

/// A contiguous range of lines or characters in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRange {
    /// Logical start offset of the range, in characters.
    pub start: usize,
    /// Length of the range, in characters.
    pub len: usize,
}

impl LineRange {
    /// One past the last character of the range.
    #[inline]
    #[must_use]
    pub fn end(self) -> usize {
        self.start + self.len
    }
}

/// Payload for an append that made it into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inserted {
    /// Logical character offset where the new text begins.
    pub char_offset: usize,
    /// Number of characters actually written (still mode may have truncated).
    pub char_len: usize,
    /// Logical index of the first line touched by this insert.
    pub line_offset: usize,
    /// Number of line entries touched: new entries plus the extended one.
    pub line_len: usize,
    /// True when the first touched line existed before the insert and was
    /// extended in place rather than newly created.
    pub extended_line: bool,
}

/// Payload for an eviction or clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Removed {
    /// Logical character offset of the removed run. Always 0: removal only
    /// ever happens at the front.
    pub char_offset: usize,
    /// Number of characters removed, including any front-line trim.
    pub char_len: usize,
    /// Logical index of the first removed line. Always 0.
    pub line_offset: usize,
    /// Number of whole line entries removed.
    pub line_len: usize,
    /// When the surviving oldest line was trimmed in place instead of being
    /// dropped, its post-trim descriptor in logical coordinates. `None` when
    /// only whole lines were removed.
    pub shortened_line: Option<LineRange>,
}

/// Observer callback interface.
///
/// Callbacks run synchronously under the buffer's mutual-exclusion domain, in
/// the exact order the mutations occurred. Keep them short; anything slow
/// belongs on the consumer's own dispatch.
pub trait LogObserver: Send {
    /// Text was appended (possibly truncated by still-mode policy).
    fn inserted(&mut self, event: &Inserted);
    /// Old text was evicted, or the buffer was cleared.
    fn removed(&mut self, event: &Removed);
}

/// Handle returned by [`FifoLog::subscribe`](crate::FifoLog::subscribe),
/// used to unregister the observer later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_range_end() {
        let range = LineRange { start: 4, len: 3 };
        assert_eq!(range.end(), 7);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn inserted_serde_roundtrip() {
        let ev = Inserted {
            char_offset: 10,
            char_len: 4,
            line_offset: 2,
            line_len: 1,
            extended_line: true,
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: Inserted = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }
}
