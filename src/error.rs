//! Error types shared by the token issuer and the rate calculator.
//!
//! Hard failures (bad configuration, network, undecodable bodies, token endpoint rejections)
//! surface as [`Error`]. Errors the calculator endpoint reports about a quote request are not
//! failures; they arrive as [`Calculation::Rejected`](crate::calculator::Calculation::Rejected).

// self
use crate::{_prelude::*, obs::Operation};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant names the [`Operation`] that produced it so callers can trace a failure back
/// to the call site without inspecting the source chain.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error("{operation}: {source}")]
	Config {
		/// Operation that failed.
		operation: Operation,
		/// Underlying configuration failure.
		#[source]
		source: ConfigError,
	},
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error("{operation}: {source}")]
	Transport {
		/// Operation that failed.
		operation: Operation,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Response body could not be decoded as the expected JSON document.
	#[error("{operation}: response body could not be decoded: {source}")]
	Decode {
		/// Operation that failed.
		operation: Operation,
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the undecodable response.
		status: Option<u16>,
	},
	/// Token endpoint rejected the credentials.
	#[error("{operation}: API error '{code}' ({description}).")]
	Api {
		/// Operation that failed.
		operation: Operation,
		/// OAuth error code (e.g. `invalid_client`).
		code: String,
		/// Human-readable description supplied by the carrier.
		description: String,
	},
}
impl Error {
	/// Returns the operation that produced this error.
	pub fn operation(&self) -> Operation {
		match self {
			Self::Config { operation, .. }
			| Self::Transport { operation, .. }
			| Self::Decode { operation, .. }
			| Self::Api { operation, .. } => *operation,
		}
	}

	/// Returns `true` when the carrier itself rejected the request, as opposed to a local or
	/// network failure.
	pub fn is_api(&self) -> bool {
		matches!(self, Self::Api { .. })
	}

	pub(crate) fn config(operation: Operation, source: impl Into<ConfigError>) -> Self {
		Self::Config { operation, source: source.into() }
	}

	pub(crate) fn transport(operation: Operation, source: impl Into<TransportError>) -> Self {
		Self::Transport { operation, source: source.into() }
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Endpoint is not an absolute URL.
	#[error("Endpoint `{endpoint}` is not a valid URL.")]
	InvalidEndpoint {
		/// Endpoint string as configured.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the carrier API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete before the transport's deadline.
	#[error("Request to the carrier API timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the carrier API.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured error value.
	#[error("HTTP client error occurred while calling the carrier API: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
		/// HTTP status code, when a response was received.
		status: Option<u16>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
