#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Attachment registry.
//!
//! Tracks which actions belong to which regions of the open document and
//! keeps rendered affordances in line with the cursor.
//!
//! # Architecture
//!
//! ```text
//! AttachmentRegistry
//! ├── entries: IndexMap<RegionId, AttachmentEntry>   // per-region actions
//! ├── global: Vec<Action>                            // applied to every region
//! └── subscription ──► CursorBus
//!                          │ notification
//!                          ▼
//!                 reconcile_region(entry) for each entry
//! ```
//!
//! Entries are resynchronized with the document by [`AttachmentRegistry::rescan`],
//! which is push-driven (global attachment and content-change signals), never
//! per cursor move.

mod entry;
mod reconcile;
mod registry;

pub use entry::AttachmentEntry;
pub use reconcile::{ReconcileStats, effective_actions, reconcile_region};
pub use registry::{AttachOutcome, AttachmentRegistry, RescanReport};
