//! Optional observability helpers for client operations.
//!
//! Enable the `tracing` feature to emit structured spans named `maxymiser_api.op` with
//! the `op` (operation) and `stage` (call site) fields; without it every helper compiles
//! to a no-op.

// self
use crate::_prelude::*;

/// Operation kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Token acquisition against the OAuth2 endpoint.
	Authorize,
	/// Throttled GET dispatch.
	Get,
	/// Throttled POST dispatch.
	Post,
	/// Throttled PUT dispatch.
	Put,
}
impl OpKind {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Authorize => "authorize",
			OpKind::Get => "get",
			OpKind::Post => "post",
			OpKind::Put => "put",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by the authorizer and dispatcher.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("maxymiser_api.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_passes_the_future_through() {
		let span = OpSpan::new(OpKind::Get, "instrument_passes_the_future_through");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
