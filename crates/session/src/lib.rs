#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Session wiring.
//!
//! A [`Session`] owns one instance of every component and routes the host's
//! lifecycle signals to them:
//!
//! ```text
//! host signal              effect
//! ───────────────────────  ─────────────────────────────────────────────
//! marker mutation          CursorBus::on_marker_mutation
//! content changed          registry rescan, history pruned for lost regions
//! document transition      bus teardown, entries and history cleared,
//!                          globals resubscribed and rescanned
//! context transition       bus teardown, everything cleared
//! ```
//!
//! Configuration is read from TOML into [`SessionConfig`].

mod config;
mod error;
mod paste;
mod session;

pub use config::{CursorConfig, HistoryConfig, PasteConfig, RegistryConfig, SessionConfig};
pub use error::{ConfigError, SessionError};
pub use paste::normalize_to_lf;
pub use session::{Collaborators, Session};
