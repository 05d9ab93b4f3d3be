use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::HostError;
use crate::future::BoxFutureStatic;
use crate::ids::ActionName;
use crate::region::Region;

/// Outcome of running an action handler.
pub type ActionResult = Result<(), ActionError>;

/// Type-erased action handler.
pub type ActionHandler = Arc<dyn Fn(ActionEvent, Region) -> BoxFutureStatic<ActionResult> + Send + Sync>;

/// Errors surfaced to whoever invoked an affordance.
#[derive(Error, Debug, Clone)]
pub enum ActionError {
	/// A collaborator call failed.
	#[error(transparent)]
	Host(#[from] HostError),
	/// The component backing the action has been dropped.
	#[error("{0} is no longer available")]
	Unavailable(&'static str),
	/// General failure with message.
	#[error("{0}")]
	Failed(String),
}

/// How an affordance was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionEvent {
	/// Pointer activation of the rendered element.
	#[default]
	Pointer,
	/// Keyboard activation.
	Keyboard,
	/// Programmatic invocation (tests, scripted callers).
	Synthetic,
}

/// Icon descriptor: the style classes the host applies to the icon element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Icon(Vec<String>);

impl Icon {
	pub fn new<I, S>(classes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(classes.into_iter().map(Into::into).collect())
	}

	pub fn classes(&self) -> &[String] {
		&self.0
	}
}

/// A named, invocable action.
///
/// Identity is the name: equality ignores the icon and the handler.
#[derive(Clone)]
pub struct Action {
	name: ActionName,
	icon: Icon,
	handler: ActionHandler,
}

impl Action {
	pub fn new<F, Fut>(name: impl Into<ActionName>, icon: Icon, handler: F) -> Self
	where
		F: Fn(ActionEvent, Region) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = ActionResult> + Send + 'static,
	{
		Self {
			name: name.into(),
			icon,
			handler: Arc::new(move |event, region| Box::pin(handler(event, region))),
		}
	}

	/// Builds an action from an already type-erased handler.
	pub fn from_handler(name: impl Into<ActionName>, icon: Icon, handler: ActionHandler) -> Self {
		Self {
			name: name.into(),
			icon,
			handler,
		}
	}

	pub fn name(&self) -> &ActionName {
		&self.name
	}

	pub fn icon(&self) -> &Icon {
		&self.icon
	}

	/// Runs the handler against `region`.
	pub fn invoke(&self, event: ActionEvent, region: Region) -> BoxFutureStatic<ActionResult> {
		(self.handler)(event, region)
	}
}

impl PartialEq for Action {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for Action {}

impl fmt::Debug for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Action").field("name", &self.name).field("icon", &self.icon).finish_non_exhaustive()
	}
}
