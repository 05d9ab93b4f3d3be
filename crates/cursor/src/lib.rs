#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Cursor line tracking.
//!
//! [`CursorSource`] turns the host's cursor marker into a logical line id;
//! [`CursorBus`] fans one notification out to every subscriber.
//!
//! ```text
//! marker mutation ──► CursorBus::on_marker_mutation
//!                        │  CursorSource::current_line (once)
//!                        ▼
//!                  join_all(handler_1(n), handler_2(n), ...)
//! ```

mod bus;
mod source;

pub use bus::{CursorBus, CursorHandler, SubscriptionId};
pub use source::{CursorSource, DEFAULT_CURSOR_LINE_CLASS, find_cursor_line};
