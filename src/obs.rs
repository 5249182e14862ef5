//! Flow observability.
//!
//! Every public client operation runs through [`observe`] or [`observe_sync`]. With the `tracing`
//! feature the operation runs inside an `oauth2_thirtysevensignals.flow` span carrying `flow` and
//! `stage` fields. With the `metrics` feature the `oauth2_thirtysevensignals_flow_total` counter
//! is bumped once on entry (`outcome=attempt`) and once on exit (`success` or `failure`). Without
//! either feature both helpers only run the operation.

mod counter;
mod span;

// self
use crate::_prelude::*;

/// Client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization URL construction.
	Authorization,
	/// Authorization code exchange.
	AuthorizationCode,
	/// Refresh token grant.
	Refresh,
	/// Resource-owner profile fetch.
	ResourceOwner,
}
impl FlowKind {
	/// Label used for span and metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorization => "authorization",
			FlowKind::AuthorizationCode => "authorization_code",
			FlowKind::Refresh => "refresh",
			FlowKind::ResourceOwner => "resource_owner",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlowOutcome {
	Attempt,
	Success,
	Failure,
}
impl FlowOutcome {
	const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}

	fn of<T>(result: &Result<T>) -> Self {
		if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure }
	}
}

/// Runs an async client operation inside its flow span and records its outcome.
pub(crate) async fn observe<T, F>(kind: FlowKind, stage: &'static str, flow: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	counter::record(kind, FlowOutcome::Attempt);

	let result = span::traced(kind, stage, flow).await;

	counter::record(kind, FlowOutcome::of(&result));

	result
}

/// Blocking counterpart of [`observe`] for operations that never touch the network.
pub(crate) fn observe_sync<T>(
	kind: FlowKind,
	stage: &'static str,
	flow: impl FnOnce() -> Result<T>,
) -> Result<T> {
	counter::record(kind, FlowOutcome::Attempt);

	let result = span::traced_sync(kind, stage, flow);

	counter::record(kind, FlowOutcome::of(&result));

	result
}
