//! Rate calculator client for `/v2/calculator/tarifflist`.
//!
//! [`Client::calculate`] quotes every tariff available between two addresses for one package.
//! The result has two channels: `Ok` carries a [`Calculation`] that is either a list of quotes
//! or the errors the carrier reported, while `Err` is reserved for failures that prevented a
//! usable answer (bad endpoint, network, malformed body). Callers must check for
//! [`Calculation::Rejected`] before trusting the quotes.

pub mod model;

mod wire;

pub use model::*;

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	calculator::wire::{CalculatorRequest, CalculatorResponse},
	endpoint::{self, Environment},
	error::ConfigError,
	http::CarrierHttpClient,
	obs::{self, CallOutcome, CallSpan, Operation},
	transport::{self, Transport, TransportErrorMapper},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, transport::ReqwestTransportErrorMapper};

const JSON_CONTENT_TYPE: &str = "application/json";

#[cfg(feature = "reqwest")]
/// Calculator client specialized for the crate's default reqwest transport stack.
pub type ReqwestCalculatorClient = Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Authenticated tariff calculator client.
///
/// Holds only the bearer token, the resolved endpoint, and shared transport handles, so clones
/// are cheap and a single value may serve concurrent calls.
pub struct Client<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	token: BearerToken,
	endpoint: String,
	transport: Transport<C, M>,
}
impl<C, M> Client<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	///
	/// A non-empty `custom_endpoint` is used verbatim; otherwise `test_mode` picks the sandbox
	/// or production calculator URL. No I/O happens here.
	pub fn with_http_client(
		token: impl Into<BearerToken>,
		test_mode: bool,
		custom_endpoint: Option<&str>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		let endpoint = endpoint::resolve_endpoint(
			custom_endpoint,
			Environment::from_test_mode(test_mode).calculator_url(),
		);

		Self { token: token.into(), endpoint, transport: Transport::new(http_client, mapper) }
	}

	/// Calculator endpoint targeted by this client.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Bearer token sent with every request.
	pub fn token(&self) -> &BearerToken {
		&self.token
	}

	/// Quotes every available tariff between `origin` and `destination` for one package.
	///
	/// Carrier errors come back as [`Calculation::Rejected`]: calculator errors first, then the
	/// request-level errors (e.g. an expired token) flattened in order. An empty tariff list is
	/// returned as-is.
	pub async fn calculate(
		&self,
		origin: &str,
		destination: &str,
		size: Size,
	) -> Result<Calculation> {
		const OPERATION: Operation = Operation::Calculate;

		let span = CallSpan::new(OPERATION, "calculate");

		obs::record_call_outcome(OPERATION, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self
					.build_request(&CalculatorRequest::single(origin, destination, size))
					.map_err(|err| Error::config(OPERATION, err))?;
				let response = self.transport.send(OPERATION, request).await?;
				let body = transport::decode_json::<CalculatorResponse>(OPERATION, &response)?;

				Ok(body.into_calculation())
			})
			.await;

		match &result {
			Ok(Calculation::Quotes(_)) => obs::record_call_outcome(OPERATION, CallOutcome::Success),
			Ok(Calculation::Rejected(_)) =>
				obs::record_call_outcome(OPERATION, CallOutcome::Rejected),
			Err(_) => obs::record_call_outcome(OPERATION, CallOutcome::Failure),
		}

		result
	}

	fn build_request(&self, body: &CalculatorRequest) -> Result<HttpRequest, ConfigError> {
		let url = endpoint::parse_endpoint(&self.endpoint)?;
		let body = serde_json::to_vec(body).map_err(ConfigError::RequestEncode)?;
		let request = Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(AUTHORIZATION, self.token.authorization_header())
			.header(CONTENT_TYPE, JSON_CONTENT_TYPE)
			.header(ACCEPT, JSON_CONTENT_TYPE)
			.body(body)?;

		Ok(request)
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(
		token: impl Into<BearerToken>,
		test_mode: bool,
		custom_endpoint: Option<&str>,
	) -> Self {
		Self::with_http_client(
			token,
			test_mode,
			custom_endpoint,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> Clone for Client<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			token: self.token.clone(),
			endpoint: self.endpoint.clone(),
			transport: self.transport.clone(),
		}
	}
}
impl<C, M> Debug for Client<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("endpoint", &self.endpoint)
			.field("token", &self.token)
			.finish()
	}
}
