#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Shared vocabulary for the affix workspace.
//!
//! Everything the attachment pipeline exchanges lives here: region identity,
//! actions and their rendered affordances, the cursor notification value, and
//! the collaborator traits through which the host document is reached.
//!
//! # Collaborators
//!
//! ```text
//! DocumentHost   discover_regions / find_attachment_slot / read / write
//! CursorSurface  observe_marker / lines
//! Dialog         confirm
//! Clipboard      read_text
//! ```
//!
//! None of these are implemented here; the embedding application supplies
//! them. In-memory doubles are available under the `test-support` feature.

/// Actions, their handlers, and invocation events.
pub mod action;
/// Rendered affordances and the slots that hold them.
pub mod affordance;
/// Cursor notification and marker observation seams.
pub mod cursor;
/// Collaborator failure type.
pub mod error;
/// Async future aliases.
pub mod future;
/// Host-side collaborator traits.
pub mod host;
/// Identifier types for regions, contexts, and actions.
pub mod ids;
pub mod region;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use action::{Action, ActionError, ActionEvent, ActionHandler, ActionResult, Icon};
pub use affordance::{Affordance, AttachmentSlot};
pub use cursor::{CursorNotification, CursorSurface, LineNode, MarkerObservation};
pub use error::HostError;
pub use future::{BoxFutureSend, BoxFutureStatic};
pub use host::{Clipboard, ConfirmKind, Dialog, DialogAnswer, DialogButton, DocumentHost};
pub use ids::{ActionName, DocumentContext, RegionId};
pub use region::Region;
