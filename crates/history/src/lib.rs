#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Edit history for regions.
//!
//! Keeps at most one "previous content" snapshot per region and mirrors each
//! snapshot with an undo action attached through the
//! [`AttachmentRegistry`](affix_registry::AttachmentRegistry).
//!
//! # Lifecycle
//!
//! ```text
//!            record / replace                 revert (confirmed)
//! no entry ───────────────────► entry + undo ───────────────────► no entry
//!                                   │  ▲
//!                                   └──┘ record again (last write wins)
//! ```
//!
//! A revert whose current content differs from the snapshot asks the
//! [`Dialog`](affix_primitives::Dialog) first; declining leaves the entry and
//! the undo affordance in place.

mod error;
mod history;
mod options;

pub use error::HistoryError;
pub use history::{EditHistory, HistoryEntry, RecordOutcome, RevertOutcome, WeakEditHistory};
pub use options::HistoryOptions;
