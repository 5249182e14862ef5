// self
use crate::{_prelude::*, obs::FlowKind};

#[cfg(feature = "tracing")]
fn flow_span(kind: FlowKind, stage: &'static str) -> tracing::Span {
	tracing::info_span!("oauth2_thirtysevensignals.flow", flow = kind.as_str(), stage)
}

pub(super) async fn traced<F>(kind: FlowKind, stage: &'static str, flow: F) -> F::Output
where
	F: Future,
{
	#[cfg(feature = "tracing")]
	{
		use tracing::Instrument;

		flow.instrument(flow_span(kind, stage)).await
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, stage);

		flow.await
	}
}

pub(super) fn traced_sync<T>(kind: FlowKind, stage: &'static str, flow: impl FnOnce() -> T) -> T {
	#[cfg(feature = "tracing")]
	{
		flow_span(kind, stage).in_scope(flow)
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, stage);

		flow()
	}
}
