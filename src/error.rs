//! Error taxonomy for the network graph view.

/// Everything that can go wrong between issuing a graph request and putting
/// pixels on the canvas.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GraphError {
	/// The request never produced a response.
	#[error("network request failed: {0}")]
	Network(String),

	/// The request did not complete within the configured timeout.
	#[error("request timed out after {0} ms")]
	Timeout(u32),

	/// The backend answered with a non-2xx status.
	#[error("request failed with status {status}: {message}")]
	Status { status: u16, message: String },

	/// The payload did not match the graph wire format.
	#[error("invalid graph payload: {0}")]
	Decode(String),

	/// The drawing surface is not usable yet; drawing is deferred.
	#[error("render deferred: {0}")]
	RenderPrecondition(&'static str),
}

impl GraphError {
	/// Transport, timeout and HTTP status failures.
	pub fn is_network(&self) -> bool {
		matches!(
			self,
			GraphError::Network(_) | GraphError::Timeout(_) | GraphError::Status { .. }
		)
	}

	/// Short message shown inline in the graph pane.
	pub fn user_message(&self) -> &'static str {
		match self {
			GraphError::Network(_) | GraphError::Status { .. } => "Failed to load the network graph.",
			GraphError::Timeout(_) => "Loading the network graph timed out.",
			GraphError::Decode(_) => "The network graph returned by the server is invalid.",
			GraphError::RenderPrecondition(_) => "The graph area is not ready yet.",
		}
	}
}
