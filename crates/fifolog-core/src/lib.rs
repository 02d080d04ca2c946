#![forbid(unsafe_code)]

//! Host-agnostic bounded FIFO text log engine: char ring, line index,
//! retention policy, and change events.
//!
//! A general-purpose mutable-text document pays for arbitrary-location
//! editing with per-edit allocation and element bookkeeping. That cost is
//! unacceptable when millions of small appends per second stream in from a
//! device. This crate keeps only what an append-only log viewer needs:
//!
//! - [`CharRing`]: a fixed circular byte store with O(1) amortized append and
//!   bounded memory;
//! - [`LineIndex`]: a parallel circular ring of line descriptors that always
//!   exactly tiles the occupied bytes;
//! - [`RetentionPolicy`]: the scrolling/still strategy pair deciding what old
//!   data to discard, or how much new input to accept, on every append;
//! - [`FifoLog`]: the orchestrator owning the rings, translating logical
//!   offsets to ring positions on every call, and notifying observers of
//!   [`Inserted`]/[`Removed`] changes in mutation order;
//! - [`StreamPosition`]: stable handles into the absolute stream that survive
//!   any amount of eviction.
//!
//! Insertion only appends; removal only clears. There are no attributes, no
//! undo, and no widget coupling: the view consumes plain events and reads
//! ranges back on demand.
//!
//! ```
//! use fifolog_core::{FifoLog, RetentionMode};
//!
//! let mut log = FifoLog::new(1000)?;
//! log.append(b"boot: ok\n")?;
//! log.append(b"sensor: 42\n")?;
//! assert_eq!(log.line_count(), 2);
//! assert_eq!(log.line_text(1)?.to_vec(), b"sensor: 42\n");
//!
//! // A paused viewer switches to still mode: nothing buffered is lost.
//! log.set_mode(RetentionMode::Still);
//! # Ok::<(), fifolog_core::FifoLogError>(())
//! ```

pub mod buffer;
pub mod char_ring;
pub mod error;
pub mod event;
pub mod line_index;
pub mod position;
pub mod retention;

pub use buffer::{DEFAULT_CAPACITY, FifoLog, FifoLogConfig, FifoLogStats, SharedFifoLog};
pub use char_ring::{CharRing, TextSlices};
pub use error::FifoLogError;
pub use event::{Inserted, LineRange, LogObserver, ObserverId, Removed};
pub use line_index::{LineIndex, LineSpan};
pub use position::StreamPosition;
pub use retention::{AppendPlan, RetentionMode, RetentionPolicy};
