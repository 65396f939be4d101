//! Request dispatch and transport error mapping shared by both components.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{CarrierHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::Operation,
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		operation: Operation,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: Operation,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) if inner.is_builder() =>
				Error::config(operation, ConfigError::from(*inner)),
			HttpClientError::Reqwest(inner) => Error::transport(operation, *inner),
			HttpClientError::Http(inner) => Error::config(operation, inner),
			HttpClientError::Io(inner) => Error::transport(operation, inner),
			HttpClientError::Other(message) => map_generic_transport_error(operation, meta, message),
			_ => map_generic_transport_error(operation, meta, "unrecognized transport failure"),
		}
	}
}

/// Builds a [`TransportError::Other`] for failures without a structured error value.
pub fn map_generic_transport_error(
	operation: Operation,
	meta: Option<&ResponseMetadata>,
	message: impl Display,
) -> Error {
	Error::transport(
		operation,
		TransportError::Other {
			message: message.to_string(),
			status: meta.and_then(|value| value.status),
		},
	)
}

/// Injected transport + error mapper pair held by each component.
pub(crate) struct Transport<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	mapper: Arc<M>,
}
impl<C, M> Transport<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(http_client: impl Into<Arc<C>>, mapper: impl Into<Arc<M>>) -> Self {
		Self { http_client: http_client.into(), mapper: mapper.into() }
	}

	/// Executes one request; no retries.
	pub(crate) async fn send(
		&self,
		operation: Operation,
		request: HttpRequest,
	) -> Result<HttpResponse> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());

		handle
			.call(request)
			.await
			.map_err(|err| self.mapper.map_transport_error(operation, meta.take().as_ref(), err))
	}
}
impl<C, M> Clone for Transport<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), mapper: self.mapper.clone() }
	}
}
#[cfg(feature = "reqwest")]
impl Default for Transport<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	fn default() -> Self {
		Self::new(ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}

/// Decodes a JSON body regardless of the HTTP status; the carrier reports errors in-band.
pub(crate) fn decode_json<T>(operation: Operation, response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::Decode {
		operation,
		source,
		status: Some(response.status().as_u16()),
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Sample {
		value: u32,
	}

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			oauth2::http::StatusCode::from_u16(status).expect("Status code should be valid.");

		response
	}

	#[test]
	fn decode_ignores_http_status() {
		let sample: Sample = decode_json(Operation::Calculate, &response(401, "{\"value\":7}"))
			.expect("Body should decode regardless of status.");

		assert_eq!(sample.value, 7);
	}

	#[test]
	fn decode_failure_reports_path_and_status() {
		let err = decode_json::<Sample>(Operation::GetToken, &response(502, "{\"value\":\"x\"}"))
			.expect_err("String values should not decode into integers.");

		match err {
			Error::Decode { operation, source, status } => {
				assert_eq!(operation, Operation::GetToken);
				assert_eq!(source.path().to_string(), "value");
				assert_eq!(status, Some(502));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn generic_transport_errors_keep_status() {
		let meta = ResponseMetadata { status: Some(503) };
		let err = map_generic_transport_error(Operation::Calculate, Some(&meta), "boom");

		assert!(matches!(
			err,
			Error::Transport { source: TransportError::Other { status: Some(503), .. }, .. }
		));
	}
}
