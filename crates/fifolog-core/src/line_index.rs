//! Circular index of line descriptors over the char ring.
//!
//! Each entry records where a line starts in the char ring's physical space
//! and how many bytes it covers, terminator included. The ring uses the same
//! tail/head/one-slot-reserved convention as the char store, and the two are
//! always mutated together so that the entries, walked oldest to newest,
//! exactly tile the occupied byte range: no gaps, no overlaps.
//!
//! `last_line_incomplete` tracks whether the newest entry has seen its
//! terminating newline. While it is set, the next append extends that entry
//! in place instead of opening a new one.

/// Descriptor of one line: physical start index in the char ring plus length
/// in bytes (including the terminating newline, when present).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSpan {
    /// Physical index of the line's first byte.
    pub start: usize,
    /// Byte length of the line.
    pub len: usize,
}

/// Fixed-capacity FIFO ring of [`LineSpan`] entries.
#[derive(Debug, Clone)]
pub struct LineIndex {
    spans: Box<[LineSpan]>,
    /// Index of the newest entry. Equal to `tail` when empty.
    head: usize,
    /// Index one slot before the oldest entry.
    tail: usize,
    /// Char-ring capacity, needed to advance a span start modulo the ring.
    char_capacity: usize,
    last_line_incomplete: bool,
}

impl LineIndex {
    /// Create an index with room for `capacity - 1` entries, over a char ring
    /// of `char_capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`; validated by the buffer configuration.
    #[must_use]
    pub fn new(capacity: usize, char_capacity: usize) -> Self {
        assert!(capacity >= 2, "line index capacity must be at least 2");
        Self {
            spans: vec![LineSpan { start: 0, len: 0 }; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            char_capacity,
            last_line_incomplete: false,
        }
    }

    /// Total slots in the backing array.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.spans.len()
    }

    /// Maximum entry count: one slot is always reserved empty.
    #[inline]
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.spans.len() - 1
    }

    /// Number of entries currently held.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        let cap = self.spans.len();
        (self.head + cap - self.tail) % cap
    }

    /// Whether the index holds no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Remaining entry slots.
    #[inline]
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.max_len() - self.count()
    }

    /// Whether the newest entry is still waiting for its newline.
    #[inline]
    #[must_use]
    pub fn last_line_incomplete(&self) -> bool {
        self.last_line_incomplete
    }

    /// Mark whether the newest entry is complete.
    pub fn set_last_line_incomplete(&mut self, incomplete: bool) {
        debug_assert!(
            !incomplete || !self.is_empty(),
            "an empty index cannot have an incomplete line"
        );
        self.last_line_incomplete = incomplete;
    }

    /// Get an entry by logical index, 0 being the oldest.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<LineSpan> {
        if index >= self.count() {
            return None;
        }
        let slot = (self.tail + 1 + index) % self.spans.len();
        Some(self.spans[slot])
    }

    /// The oldest entry.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<LineSpan> {
        self.get(0)
    }

    /// The newest entry.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<LineSpan> {
        self.count().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate entries oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = LineSpan> + '_ {
        (0..self.count()).map(|i| {
            let slot = (self.tail + 1 + i) % self.spans.len();
            self.spans[slot]
        })
    }

    /// Append a new newest entry.
    ///
    /// The caller must have made room first; the ring never overwrites live
    /// entries.
    pub fn push_back(&mut self, span: LineSpan) {
        debug_assert!(self.free_len() > 0, "line index overflow");
        let cap = self.spans.len();
        self.head = (self.head + 1) % cap;
        self.spans[self.head] = span;
    }

    /// Grow the newest entry by `extra` bytes.
    pub fn extend_back(&mut self, extra: usize) {
        debug_assert!(!self.is_empty(), "extend_back on empty index");
        self.spans[self.head].len += extra;
    }

    /// Drop the `n` oldest entries, returning their descriptors so the caller
    /// can account for the bytes they spanned.
    ///
    /// Evicting the final entry clears the incomplete-line flag: there is no
    /// line left to extend.
    pub fn evict_front(&mut self, n: usize) -> Vec<LineSpan> {
        debug_assert!(n <= self.count(), "evicting {n} of {} lines", self.count());
        let cap = self.spans.len();
        let mut evicted = Vec::with_capacity(n);
        for _ in 0..n {
            self.tail = (self.tail + 1) % cap;
            evicted.push(self.spans[self.tail]);
        }
        if self.is_empty() {
            self.last_line_incomplete = false;
        }
        evicted
    }

    /// Trim `chars` bytes off the front of the oldest entry, in place.
    ///
    /// Used for partial-line eviction: the entry survives with its start
    /// advanced (modulo the char ring) and its length shrunk.
    pub fn shorten_front(&mut self, chars: usize) {
        let slot = (self.tail + 1) % self.spans.len();
        debug_assert!(
            !self.is_empty() && chars < self.spans[slot].len,
            "front trim must leave a non-empty line"
        );
        let span = &mut self.spans[slot];
        span.start = (span.start + chars) % self.char_capacity;
        span.len -= chars;
    }

    /// Drop every entry. The incomplete-line flag resets with them.
    pub fn clear(&mut self) {
        self.tail = self.head;
        self.last_line_incomplete = false;
    }

    /// Logical index of the line containing the logical char offset.
    ///
    /// Binary search over the logical start offsets, which increase
    /// monotonically because the ring is pure FIFO. `start_to_logical`
    /// translates a span's physical start through the char ring. Contract:
    /// an offset at or past the end maps to the last line, and an empty
    /// index maps everything to 0.
    pub fn find_containing<F>(&self, char_offset: usize, start_to_logical: F) -> usize
    where
        F: Fn(usize) -> usize,
    {
        let count = self.count();
        if count == 0 {
            return 0;
        }
        let logical_start = |i: usize| {
            let slot = (self.tail + 1 + i) % self.spans.len();
            start_to_logical(self.spans[slot].start)
        };
        // Find the last line whose start is at or before the offset.
        let mut lo = 0usize;
        let mut hi = count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if logical_start(mid) <= char_offset {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let found = lo.saturating_sub(1).min(count - 1);

        #[cfg(debug_assertions)]
        {
            let linear = self
                .iter()
                .enumerate()
                .find(|(_, span)| {
                    let start = start_to_logical(span.start);
                    char_offset >= start && char_offset < start + span.len
                })
                .map_or(count - 1, |(i, _)| i);
            debug_assert_eq!(found, linear, "binary search diverged at {char_offset}");
        }

        found
    }
}
