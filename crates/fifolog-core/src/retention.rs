//! Retention policy: how the buffer makes room for incoming text.
//!
//! Two strategies, selected at runtime and consulted on every append:
//!
//! - **Scrolling** keeps the buffer under a 60% fill target by discarding the
//!   oldest data. Sustained streaming therefore leaves 40% headroom, which is
//!   exactly what lets a later switch to still mode absorb more input before
//!   hitting the cap.
//! - **Still** never discards buffered data. Once the buffer is full the
//!   entire incoming chunk is dropped instead. Losing the newest data may
//!   seem backwards, but the asset that matters most is the reader's
//!   attention: a user who paused scrolling to inspect old output keeps
//!   access to every byte they can currently see.
//!
//! The policy is a pure function: it inspects the rings and the pending chunk
//! and produces an [`AppendPlan`]. The buffer applies the plan and emits the
//! notifications. Switching modes takes effect on the next append and never
//! retroactively evicts.

use crate::char_ring::CharRing;
use crate::line_index::LineIndex;

/// Eviction strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetentionMode {
    /// Discard oldest data to stay under the fill thresholds.
    #[default]
    Scrolling,
    /// Keep all buffered data; reject or truncate new input once full.
    Still,
}

/// What to do with one pending append: how much old data to drop and how much
/// of the chunk to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendPlan {
    /// Whole oldest line entries to evict.
    pub evict_lines: usize,
    /// Bytes spanned by those whole-line evictions.
    pub evict_chars: usize,
    /// Extra bytes to trim off the surviving oldest line, in place.
    pub shorten_front_by: usize,
    /// Prefix length of the chunk to write. Scrolling always accepts all of
    /// it; still mode may truncate to free space or to zero.
    pub accepted: usize,
}

impl AppendPlan {
    /// Total bytes this plan removes from the front.
    #[inline]
    #[must_use]
    pub fn removed_chars(&self) -> usize {
        self.evict_chars + self.shorten_front_by
    }

    /// Whether the plan removes anything at all.
    #[inline]
    #[must_use]
    pub fn evicts(&self) -> bool {
        self.evict_lines > 0 || self.shorten_front_by > 0
    }
}

/// Fill thresholds plus the active [`RetentionMode`].
///
/// Thresholds are fixed at construction as 60% of each ring's total slot
/// count, matching the scrolling strategy's fill target.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    mode: RetentionMode,
    char_threshold: usize,
    line_threshold: usize,
}

impl RetentionPolicy {
    /// Derive thresholds from the two ring capacities.
    #[must_use]
    pub fn new(char_capacity: usize, line_capacity: usize) -> Self {
        Self {
            mode: RetentionMode::Scrolling,
            char_threshold: char_capacity * 6 / 10,
            line_threshold: line_capacity * 6 / 10,
        }
    }

    /// The active mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> RetentionMode {
        self.mode
    }

    /// Switch strategy; effective from the next append.
    pub fn set_mode(&mut self, mode: RetentionMode) {
        self.mode = mode;
    }

    /// Scrolling-mode byte fill target.
    #[inline]
    #[must_use]
    pub fn char_threshold(&self) -> usize {
        self.char_threshold
    }

    /// Scrolling-mode line-entry fill target.
    #[inline]
    #[must_use]
    pub fn line_threshold(&self) -> usize {
        self.line_threshold
    }

    /// Decide evictions and acceptance for one pending chunk.
    ///
    /// `new_entries` is the number of line entries the chunk would open,
    /// i.e. its newline-delimited segments minus the one that merely extends
    /// an already-incomplete last line.
    #[must_use]
    pub fn plan(
        &self,
        text: &[u8],
        new_entries: usize,
        chars: &CharRing,
        lines: &LineIndex,
    ) -> AppendPlan {
        match self.mode {
            RetentionMode::Scrolling => self.plan_scrolling(text.len(), new_entries, chars, lines),
            RetentionMode::Still => self.plan_still(text, chars, lines),
        }
    }

    /// Scrolling: three ordered steps, each only as large as needed.
    fn plan_scrolling(
        &self,
        incoming: usize,
        new_entries: usize,
        chars: &CharRing,
        lines: &LineIndex,
    ) -> AppendPlan {
        let mut plan = AppendPlan {
            accepted: incoming,
            ..AppendPlan::default()
        };
        let mut line_count = lines.count();
        let mut char_len = chars.len();
        let mut oldest = lines.iter();

        let mut evict_whole = |plan: &mut AppendPlan, line_count: &mut usize, char_len: &mut usize| {
            let Some(span) = oldest.next() else {
                return false;
            };
            plan.evict_lines += 1;
            plan.evict_chars += span.len;
            *line_count -= 1;
            *char_len -= span.len;
            true
        };

        // Step 1: whole lines while the line ring would exceed its target.
        while line_count > 0 && line_count + new_entries > self.line_threshold {
            if !evict_whole(&mut plan, &mut line_count, &mut char_len) {
                break;
            }
        }

        // Step 2: whole lines while the char ring would exceed its target,
        // stopping while more than one line remains.
        while line_count > 1 && char_len + incoming > self.char_threshold {
            if !evict_whole(&mut plan, &mut line_count, &mut char_len) {
                break;
            }
        }

        // Step 3: still over target with exactly one line left. Trim it in
        // place by the excess so one line stays addressable after the append.
        // If the excess swallows the whole line (only possible when the chunk
        // alone exceeds the target), drop it instead.
        if line_count == 1 && char_len + incoming > self.char_threshold {
            let excess = char_len + incoming - self.char_threshold;
            if let Some(span) = oldest.next() {
                if excess >= span.len {
                    plan.evict_lines += 1;
                    plan.evict_chars += span.len;
                } else {
                    plan.shorten_front_by = excess;
                }
            }
        }

        plan
    }

    /// Still: no eviction. At cap the whole chunk is discarded; short of the
    /// cap the chunk is truncated to the free byte space and, when the line
    /// ring is the binding constraint, to the newline that fills its last
    /// free entry.
    fn plan_still(&self, text: &[u8], chars: &CharRing, lines: &LineIndex) -> AppendPlan {
        let char_free = chars.free_len();
        let line_free = lines.free_len();
        if char_free == 0 || line_free == 0 {
            return AppendPlan::default();
        }

        let mut accepted = text.len().min(char_free);

        // Accepting through newline number `max_segments` fills the last free
        // entry; anything past it would open one entry too many.
        let max_segments = line_free + usize::from(lines.last_line_incomplete());
        let mut newlines_seen = 0;
        for (i, &byte) in text[..accepted].iter().enumerate() {
            if byte == b'\n' {
                newlines_seen += 1;
                if newlines_seen == max_segments {
                    accepted = i + 1;
                    break;
                }
            }
        }

        AppendPlan {
            accepted,
            ..AppendPlan::default()
        }
    }
}
