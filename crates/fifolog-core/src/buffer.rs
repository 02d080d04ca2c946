//! The log buffer: orchestrates the char ring, line index, and retention
//! policy behind one append/read/notify surface.
//!
//! This type is the ownership boundary for all mutable log state. It keeps
//! both rings and the retention bookkeeping in one place so they are always
//! mutated together, and exposes deterministic APIs for:
//! - appending producer chunks (arbitrary boundaries, newline scanning),
//! - reading logical ranges and line descriptors,
//! - stable stream positions,
//! - synchronous change notifications in mutation order.
//!
//! The buffer itself performs no threading and never blocks. Producer and
//! consumer threads share it through [`SharedFifoLog`], which serializes every
//! operation behind one mutex so the rings are never observed half-updated.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::char_ring::{CharRing, TextSlices};
use crate::error::FifoLogError;
use crate::event::{Inserted, LineRange, LogObserver, ObserverId, Removed};
use crate::line_index::{LineIndex, LineSpan};
use crate::position::StreamPosition;
use crate::retention::{RetentionMode, RetentionPolicy};

/// Default character capacity: what the serial monitor allocates.
pub const DEFAULT_CAPACITY: usize = 10_000_000;

/// Construction-time configuration for [`FifoLog`].
///
/// Only the character capacity is required; the line capacity derives from it
/// and the retention thresholds derive from both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FifoLogConfig {
    /// Total character slots (one is kept empty, so usable space is one less).
    pub capacity: usize,
    /// Total line-descriptor slots, conventionally `capacity / 10`.
    pub line_capacity: usize,
    /// Initial retention mode.
    pub mode: RetentionMode,
    /// Tab width the consuming view should render with.
    pub tab_width: u8,
}

impl FifoLogConfig {
    /// Configuration with everything derived from a character capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            line_capacity: (capacity / 10).max(2),
            mode: RetentionMode::Scrolling,
            tab_width: 4,
        }
    }
}

impl Default for FifoLogConfig {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

/// Snapshot of buffer occupancy and lifetime counters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FifoLogStats {
    /// Usable character capacity.
    pub char_capacity: usize,
    /// Currently occupied characters.
    pub char_len: usize,
    /// Usable line-entry capacity.
    pub line_capacity: usize,
    /// Currently indexed lines.
    pub line_count: usize,
    /// All characters ever accepted into the buffer.
    pub total_written: u64,
    /// Characters no longer readable (evicted or cleared).
    pub total_evicted: u64,
    /// `char_len / char_capacity`.
    pub fill_ratio: f64,
    /// Active retention mode.
    pub mode: RetentionMode,
}

/// Bounded, append-only text log buffer.
///
/// Absorbs a sustained stream of text chunks in O(1) amortized time per byte
/// while letting a consumer read arbitrary historical ranges, track stable
/// positions, and receive incremental append/evict notifications. See the
/// crate docs for the full model.
pub struct FifoLog {
    chars: CharRing,
    lines: LineIndex,
    policy: RetentionPolicy,
    observers: Vec<(ObserverId, Box<dyn LogObserver>)>,
    next_observer_id: u64,
    tab_width: u8,
}

impl FifoLog {
    /// Create a buffer with the given character capacity and derived line
    /// capacity and thresholds.
    pub fn new(capacity: usize) -> Result<Self, FifoLogError> {
        Self::with_config(FifoLogConfig::with_capacity(capacity))
    }

    /// Create a buffer from an explicit configuration.
    pub fn with_config(config: FifoLogConfig) -> Result<Self, FifoLogError> {
        if config.capacity < 2 {
            return Err(FifoLogError::invalid_config(format!(
                "character capacity {} is below the minimum of 2",
                config.capacity
            )));
        }
        if config.line_capacity < 2 {
            return Err(FifoLogError::invalid_config(format!(
                "line capacity {} is below the minimum of 2",
                config.line_capacity
            )));
        }
        tracing::debug!(
            capacity = config.capacity,
            line_capacity = config.line_capacity,
            mode = ?config.mode,
            "fifo log created"
        );
        let mut policy = RetentionPolicy::new(config.capacity, config.line_capacity);
        policy.set_mode(config.mode);
        Ok(Self {
            chars: CharRing::new(config.capacity),
            lines: LineIndex::new(config.line_capacity, config.capacity),
            policy,
            observers: Vec::new(),
            next_observer_id: 0,
            tab_width: config.tab_width,
        })
    }

    /// Currently occupied length in characters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the buffer holds no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of indexed lines.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.count()
    }

    /// The active retention mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> RetentionMode {
        self.policy.mode()
    }

    /// Switch retention strategy. Takes effect on the next append; never
    /// retroactively evicts or restores anything.
    pub fn set_mode(&mut self, mode: RetentionMode) {
        self.policy.set_mode(mode);
    }

    /// Tab width the consuming view should render with.
    #[inline]
    #[must_use]
    pub fn tab_width(&self) -> u8 {
        self.tab_width
    }

    /// Append a chunk of producer text.
    ///
    /// Chunk boundaries are arbitrary: line segmentation depends only on the
    /// newline bytes in the stream. An empty chunk is a silent no-op. A chunk
    /// that could never fit even an empty buffer (more bytes than the char
    /// ring holds, or closing more lines than the line ring holds) fails with
    /// [`FifoLogError::InvalidConfiguration`] before any state changes.
    ///
    /// Observers see at most one `Removed` (eviction) followed by at most one
    /// `Inserted` per call, in that order.
    pub fn append(&mut self, text: &[u8]) -> Result<(), FifoLogError> {
        if text.is_empty() {
            return Ok(());
        }
        if text.len() > self.chars.max_len() {
            return Err(FifoLogError::invalid_config(format!(
                "append of {} bytes exceeds the usable capacity of {}",
                text.len(),
                self.chars.max_len()
            )));
        }
        let new_entries = self.count_new_entries(text);
        if new_entries > self.lines.max_len() {
            return Err(FifoLogError::invalid_config(format!(
                "append closing {} lines exceeds the line capacity of {}",
                new_entries,
                self.lines.max_len()
            )));
        }

        let plan = self.policy.plan(text, new_entries, &self.chars, &self.lines);

        if plan.evicts() {
            let evicted = self.lines.evict_front(plan.evict_lines);
            debug_assert_eq!(
                evicted.iter().map(|span| span.len).sum::<usize>(),
                plan.evict_chars,
                "evicted descriptors must account for the planned bytes"
            );
            if plan.shorten_front_by > 0 {
                self.lines.shorten_front(plan.shorten_front_by);
            }
            self.chars.evict_front(plan.removed_chars());

            let shortened_line = (plan.shorten_front_by > 0)
                .then(|| self.lines.front())
                .flatten()
                .map(|span| LineRange {
                    start: self.chars.physical_to_logical(span.start),
                    len: span.len,
                });
            let event = Removed {
                char_offset: 0,
                char_len: plan.removed_chars(),
                line_offset: 0,
                line_len: plan.evict_lines,
                shortened_line,
            };
            tracing::trace!(
                chars = event.char_len,
                lines = event.line_len,
                trimmed = plan.shorten_front_by,
                "evicted oldest data"
            );
            self.notify_removed(&event);
        }

        if plan.accepted == 0 {
            // Still mode at capacity: the whole chunk is dropped, silently.
            tracing::trace!(len = text.len(), "still mode full, chunk discarded");
            return Ok(());
        }
        let accepted = &text[..plan.accepted];

        let insert_offset = self.chars.len();
        let extended = self.lines.last_line_incomplete();
        let first_line = if extended {
            self.lines.count() - 1
        } else {
            self.lines.count()
        };

        let mut segment_start = self.chars.append(accepted);
        let mut segments = 0usize;
        let mut extending = extended;
        let mut rest = accepted;
        while !rest.is_empty() {
            let seg_len = match rest.iter().position(|&b| b == b'\n') {
                Some(i) => i + 1,
                None => rest.len(),
            };
            if extending {
                self.lines.extend_back(seg_len);
                extending = false;
            } else {
                self.lines.push_back(LineSpan {
                    start: segment_start,
                    len: seg_len,
                });
            }
            segments += 1;
            segment_start = (segment_start + seg_len) % self.chars.capacity();
            rest = &rest[seg_len..];
        }
        self.lines
            .set_last_line_incomplete(!accepted.ends_with(b"\n"));

        self.debug_check_tiling();

        let event = Inserted {
            char_offset: insert_offset,
            char_len: accepted.len(),
            line_offset: first_line,
            line_len: segments,
            extended_line: extended,
        };
        self.notify_inserted(&event);
        Ok(())
    }

    /// Borrow a logical character range as one or two contiguous slices.
    pub fn read(&self, offset: usize, len: usize) -> Result<TextSlices<'_>, FifoLogError> {
        self.chars.read(offset, len)
    }

    /// Borrow the entire occupied range.
    #[must_use]
    pub fn read_all(&self) -> TextSlices<'_> {
        self.chars
            .read(0, self.chars.len())
            .unwrap_or(TextSlices::new(&[], &[]))
    }

    /// Line descriptor by logical line index, in logical character
    /// coordinates.
    pub fn line(&self, index: usize) -> Result<LineRange, FifoLogError> {
        let span = self.lines.get(index).ok_or(FifoLogError::OutOfRange {
            offset: index,
            len: 1,
            occupied: self.lines.count(),
        })?;
        Ok(LineRange {
            start: self.chars.physical_to_logical(span.start),
            len: span.len,
        })
    }

    /// Borrow one line's text.
    pub fn line_text(&self, index: usize) -> Result<TextSlices<'_>, FifoLogError> {
        let range = self.line(index)?;
        self.chars.read(range.start, range.len)
    }

    /// Logical index of the line containing the given character offset.
    ///
    /// Offsets at or past the end map to the last line; an empty buffer maps
    /// everything to line 0.
    #[must_use]
    pub fn line_containing(&self, char_offset: usize) -> usize {
        self.lines
            .find_containing(char_offset, |physical| self.chars.physical_to_logical(physical))
    }

    /// Discard everything that is currently visible.
    ///
    /// The position space (`total_written`) is preserved, so existing
    /// [`StreamPosition`] values keep resolving sensibly. Observers receive a
    /// single `Removed` spanning the whole prior occupancy; clearing an empty
    /// buffer is a no-op with no event.
    pub fn clear(&mut self) {
        let prev_chars = self.chars.len();
        let prev_lines = self.lines.count();
        if prev_chars == 0 && prev_lines == 0 {
            return;
        }
        self.chars.clear();
        self.lines.clear();
        tracing::debug!(chars = prev_chars, lines = prev_lines, "log cleared");
        let event = Removed {
            char_offset: 0,
            char_len: prev_chars,
            line_offset: 0,
            line_len: prev_lines,
            shortened_line: None,
        };
        self.notify_removed(&event);
    }

    /// Create a stable position for the given logical offset.
    ///
    /// Fails with [`FifoLogError::OutOfRange`] when the offset lies past the
    /// occupied length. Offset `len()` is allowed and names the current end
    /// (but, unlike [`StreamPosition::END`], does not track future appends).
    pub fn create_position(&self, offset: usize) -> Result<StreamPosition, FifoLogError> {
        let occupied = self.chars.len();
        if offset > occupied {
            return Err(FifoLogError::OutOfRange {
                offset,
                len: 0,
                occupied,
            });
        }
        let base = self.chars.total_written() - occupied as u64;
        Ok(StreamPosition::new(base + offset as u64))
    }

    /// The sentinel position that tracks the live end of the stream forever.
    #[must_use]
    pub fn end_position(&self) -> StreamPosition {
        StreamPosition::END
    }

    /// Resolve a position back to a readable logical offset.
    ///
    /// A position whose data has scrolled out sticks to the current start
    /// (offset 0); one at or beyond the newest data resolves to `len()`.
    #[must_use]
    pub fn position_offset(&self, position: StreamPosition) -> usize {
        let occupied = self.chars.len();
        if position.is_end() {
            return occupied;
        }
        let base = self.chars.total_written() - occupied as u64;
        let relative = position.absolute().saturating_sub(base);
        usize::try_from(relative.min(occupied as u64)).unwrap_or(occupied)
    }

    /// Register an observer for subsequent change notifications.
    pub fn subscribe(&mut self, observer: Box<dyn LogObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Unregister an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    /// Occupancy and lifetime counters.
    #[must_use]
    pub fn stats(&self) -> FifoLogStats {
        let char_len = self.chars.len();
        FifoLogStats {
            char_capacity: self.chars.max_len(),
            char_len,
            line_capacity: self.lines.max_len(),
            line_count: self.lines.count(),
            total_written: self.chars.total_written(),
            total_evicted: self.chars.total_written() - char_len as u64,
            fill_ratio: char_len as f64 / self.chars.max_len() as f64,
            mode: self.policy.mode(),
        }
    }

    /// Line entries a chunk would open: its newline-delimited segments minus
    /// the one that extends an already-incomplete last line.
    fn count_new_entries(&self, text: &[u8]) -> usize {
        let newlines = text.iter().filter(|&&b| b == b'\n').count();
        let segments = newlines + usize::from(!text.ends_with(b"\n"));
        segments - usize::from(self.lines.last_line_incomplete())
    }

    fn notify_inserted(&mut self, event: &Inserted) {
        for (_, observer) in &mut self.observers {
            observer.inserted(event);
        }
    }

    fn notify_removed(&mut self, event: &Removed) {
        for (_, observer) in &mut self.observers {
            observer.removed(event);
        }
    }

    /// The line entries must exactly tile the occupied character range.
    #[cfg(debug_assertions)]
    fn debug_check_tiling(&self) {
        let mut expected_start = 0usize;
        for span in self.lines.iter() {
            assert_eq!(
                self.chars.physical_to_logical(span.start),
                expected_start,
                "line entries must be gap-free and overlap-free"
            );
            expected_start += span.len;
        }
        assert_eq!(expected_start, self.chars.len(), "line entries must cover all text");
    }

    #[cfg(not(debug_assertions))]
    fn debug_check_tiling(&self) {}
}

impl fmt::Debug for FifoLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoLog")
            .field("len", &self.chars.len())
            .field("line_count", &self.lines.count())
            .field("total_written", &self.chars.total_written())
            .field("mode", &self.policy.mode())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// Clonable thread-safe handle: one mutual-exclusion domain around the whole
/// buffer, so a producer thread appending and a consumer thread reading can
/// never observe the rings half-updated.
#[derive(Clone)]
pub struct SharedFifoLog {
    inner: Arc<Mutex<FifoLog>>,
}

impl SharedFifoLog {
    /// Wrap a buffer in a shared handle.
    #[must_use]
    pub fn new(log: FifoLog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(log)),
        }
    }

    /// Run `f` with exclusive access to the buffer.
    ///
    /// Everything `f` does (mutation plus the observer callbacks it triggers)
    /// happens inside the critical section. A poisoned lock is recovered: the
    /// buffer's state is kept consistent by construction, not by panics.
    pub fn with<R>(&self, f: impl FnOnce(&mut FifoLog) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Append a producer chunk. See [`FifoLog::append`].
    pub fn append(&self, text: &[u8]) -> Result<(), FifoLogError> {
        self.with(|log| log.append(text))
    }

    /// Copy a logical range out of the buffer.
    pub fn read_to_vec(&self, offset: usize, len: usize) -> Result<Vec<u8>, FifoLogError> {
        self.with(|log| log.read(offset, len).map(|text| text.to_vec()))
    }

    /// Currently occupied length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with(|log| log.len())
    }

    /// Whether the buffer holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(|log| log.is_empty())
    }

    /// Number of indexed lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.with(|log| log.line_count())
    }

    /// Switch retention strategy.
    pub fn set_mode(&self, mode: RetentionMode) {
        self.with(|log| log.set_mode(mode));
    }

    /// Discard everything currently visible.
    pub fn clear(&self) {
        self.with(FifoLog::clear);
    }

    /// Occupancy and lifetime counters.
    #[must_use]
    pub fn stats(&self) -> FifoLogStats {
        self.with(|log| log.stats())
    }
}

impl fmt::Debug for SharedFifoLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|log| fmt::Debug::fmt(log, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with_capacity(capacity: usize) -> FifoLog {
        FifoLog::new(capacity).unwrap()
    }

    fn read_string(log: &FifoLog) -> String {
        String::from_utf8(log.read_all().to_vec()).unwrap()
    }

    #[test]
    fn rejects_tiny_capacity() {
        assert!(matches!(
            FifoLog::new(1),
            Err(FifoLogError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            FifoLog::with_config(FifoLogConfig {
                line_capacity: 1,
                ..FifoLogConfig::with_capacity(100)
            }),
            Err(FifoLogError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn append_then_read_round_trips() {
        let mut log = log_with_capacity(100);
        log.append(b"hello\n").unwrap();
        log.append(b"world").unwrap();
        assert_eq!(read_string(&log), "hello\nworld");
        assert_eq!(log.len(), 11);
        assert_eq!(log.line_count(), 2);
    }

    #[test]
    fn empty_append_is_a_silent_no_op() {
        let mut log = log_with_capacity(100);
        log.append(b"").unwrap();
        assert!(log.is_empty());
        assert_eq!(log.line_count(), 0);
    }

    #[test]
    fn oversized_chunk_is_rejected_before_mutation() {
        let mut log = log_with_capacity(10);
        log.append(b"abc").unwrap();
        let err = log.append(&[b'x'; 10]).unwrap_err();
        assert!(matches!(err, FifoLogError::InvalidConfiguration { .. }));
        // Nothing changed.
        assert_eq!(read_string(&log), "abc");
    }

    #[test]
    fn chunk_closing_too_many_lines_is_rejected() {
        let mut log = FifoLog::with_config(FifoLogConfig {
            line_capacity: 3,
            ..FifoLogConfig::with_capacity(100)
        })
        .unwrap();
        let err = log.append(b"a\nb\nc\nd\n").unwrap_err();
        assert!(matches!(err, FifoLogError::InvalidConfiguration { .. }));
        assert!(log.is_empty());
    }

    #[test]
    fn segmentation_is_chunk_boundary_independent() {
        let mut one = log_with_capacity(1000);
        one.append(b"alpha\nbeta\ngamma").unwrap();

        let mut many = log_with_capacity(1000);
        many.append(b"alp").unwrap();
        many.append(b"ha\nbe").unwrap();
        many.append(b"ta\n").unwrap();
        many.append(b"gamma").unwrap();

        assert_eq!(read_string(&one), read_string(&many));
        assert_eq!(one.line_count(), many.line_count());
        for i in 0..one.line_count() {
            assert_eq!(one.line(i).unwrap(), many.line(i).unwrap());
        }
    }

    #[test]
    fn line_lookup_matches_layout() {
        let mut log = log_with_capacity(1000);
        log.append(b"ab\ncdef\ng").unwrap();
        assert_eq!(log.line(0).unwrap(), LineRange { start: 0, len: 3 });
        assert_eq!(log.line(1).unwrap(), LineRange { start: 3, len: 5 });
        assert_eq!(log.line(2).unwrap(), LineRange { start: 8, len: 1 });
        assert!(matches!(log.line(3), Err(FifoLogError::OutOfRange { .. })));

        assert_eq!(log.line_containing(0), 0);
        assert_eq!(log.line_containing(2), 0);
        assert_eq!(log.line_containing(3), 1);
        assert_eq!(log.line_containing(8), 2);
        assert_eq!(log.line_containing(100), 2);

        assert_eq!(log.line_text(1).unwrap().to_vec(), b"cdef\n");
    }

    #[test]
    fn scrolling_eviction_keeps_reads_consistent() {
        let mut log = log_with_capacity(100);
        // Threshold 60. Ten 10-byte lines stream through; the buffer must
        // stay under the cap and keep tiling intact (checked by the append
        // debug assertion).
        for i in 0..10 {
            log.append(format!("line-{i:04}\n").as_bytes()).unwrap();
        }
        assert!(log.len() <= 99);
        assert!(log.len() <= 60);
        let text = read_string(&log);
        assert!(text.ends_with("line-0009\n"));
        // Every remaining line is whole.
        for i in 0..log.line_count() {
            let line = log.line_text(i).unwrap().to_vec();
            assert!(line.ends_with(b"\n"));
        }
    }

    #[test]
    fn still_mode_discards_at_capacity_without_error() {
        let mut log = log_with_capacity(100);
        log.set_mode(RetentionMode::Still);
        log.append(&[b'a'; 99]).unwrap();
        assert_eq!(log.len(), 99);
        log.append(b"0123456789").unwrap();
        assert_eq!(log.len(), 99, "full still buffer drops the whole chunk");
        assert_eq!(log.stats().total_written, 99);
    }

    #[test]
    fn still_mode_truncates_to_free_space() {
        let mut log = log_with_capacity(100);
        log.set_mode(RetentionMode::Still);
        log.append(&[b'a'; 90]).unwrap();
        log.append(&[b'b'; 20]).unwrap();
        assert_eq!(log.len(), 99);
        let text = read_string(&log);
        assert!(text.ends_with("bbbbbbbbb"));
        assert_eq!(text.matches('b').count(), 9);
    }

    #[test]
    fn mode_switch_applies_on_next_append_only() {
        let mut log = log_with_capacity(100);
        for i in 0..10 {
            log.append(format!("line-{i:04}\n").as_bytes()).unwrap();
        }
        let len_before = log.len();
        // Switching modes must not evict or restore anything by itself.
        log.set_mode(RetentionMode::Still);
        assert_eq!(log.len(), len_before);
        log.set_mode(RetentionMode::Scrolling);
        assert_eq!(log.len(), len_before);
    }

    #[test]
    fn clear_empties_and_preserves_position_space() {
        let mut log = log_with_capacity(100);
        log.append(b"some\ntext\n").unwrap();
        let written_before = log.stats().total_written;
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.line_count(), 0);
        assert_eq!(log.stats().total_written, written_before);
        assert!(matches!(
            log.read(0, 1),
            Err(FifoLogError::OutOfRange { .. })
        ));
        // Appending after clear starts a fresh first line.
        log.append(b"next").unwrap();
        assert_eq!(read_string(&log), "next");
        assert_eq!(log.line_count(), 1);
    }

    #[test]
    fn positions_track_content_across_eviction() {
        let mut log = log_with_capacity(100);
        log.append(b"0123456789").unwrap();
        let at_four = log.create_position(4).unwrap();
        assert_eq!(log.position_offset(at_four), 4);

        // Nothing evicted yet: the position still points at '4'.
        log.append(b"ab").unwrap();
        let offset = log.position_offset(at_four);
        assert_eq!(log.read(offset, 1).unwrap().to_vec(), b"4");

        // Force enough churn to evict the position's datum.
        for _ in 0..30 {
            log.append(&[b'z'; 10]).unwrap();
        }
        assert_eq!(log.position_offset(at_four), 0, "evicted position clamps to start");
    }

    #[test]
    fn end_position_tracks_the_live_head() {
        let mut log = log_with_capacity(100);
        let end = log.end_position();
        assert_eq!(log.position_offset(end), 0);
        log.append(b"abcdef").unwrap();
        assert_eq!(log.position_offset(end), 6);
        log.append(b"gh").unwrap();
        assert_eq!(log.position_offset(end), 8);
    }

    #[test]
    fn create_position_bounds() {
        let mut log = log_with_capacity(100);
        log.append(b"abc").unwrap();
        assert!(log.create_position(3).is_ok());
        assert!(matches!(
            log.create_position(4),
            Err(FifoLogError::OutOfRange { .. })
        ));
    }

    #[test]
    fn stats_reflect_lifetime_counters() {
        let mut log = log_with_capacity(100);
        for _ in 0..20 {
            log.append(b"0123456789").unwrap();
        }
        let stats = log.stats();
        assert_eq!(stats.total_written, 200);
        assert_eq!(stats.char_len as u64 + stats.total_evicted, 200);
        assert!(stats.fill_ratio > 0.0 && stats.fill_ratio <= 1.0);
        assert_eq!(stats.mode, RetentionMode::Scrolling);
    }

    #[test]
    fn debug_formats_summarize() {
        let log = log_with_capacity(100);
        let dbg = format!("{log:?}");
        assert!(dbg.contains("FifoLog"));
        assert!(dbg.contains("total_written"));
    }

    #[test]
    fn shared_handle_round_trips_across_threads() {
        let shared = SharedFifoLog::new(log_with_capacity(1000));
        let producer = shared.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..50 {
                producer
                    .append(format!("chunk-{i}\n").as_bytes())
                    .unwrap();
            }
        });
        handle.join().unwrap();
        assert_eq!(shared.line_count(), 50);
        let text = shared.read_to_vec(0, shared.len()).unwrap();
        assert!(text.ends_with(b"chunk-49\n"));
        shared.clear();
        assert!(shared.is_empty());
    }
}
