//! Token issuer for the carrier's `/v2/oauth/token` endpoint.
//!
//! [`TokenIssuer::get_token`] performs a single `client_credentials` exchange. The issued token
//! is handed back to the caller as a [`TokenGrant`]; nothing is cached, refreshed, or retried
//! here, so callers decide when a new token is needed.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	endpoint::{self, Environment},
	error::ConfigError,
	http::CarrierHttpClient,
	obs::{self, CallOutcome, CallSpan, Operation},
	transport::{self, Transport, TransportErrorMapper},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, transport::ReqwestTransportErrorMapper};

const GRANT_TYPE: &str = "client_credentials";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[cfg(feature = "reqwest")]
/// Token issuer specialized for the crate's default reqwest transport stack.
pub type ReqwestTokenIssuer = TokenIssuer<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Access token issued by the carrier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGrant {
	/// Bearer token to pass to [`Client`](crate::calculator::Client).
	pub access_token: BearerToken,
	/// Lifetime reported by the carrier. Zero when the response omits `expires_in`.
	pub expires_in: Duration,
	/// Local time at which the response was decoded.
	pub received_at: OffsetDateTime,
}
impl TokenGrant {
	/// Instant after which the carrier stops accepting the token.
	///
	/// `None` when the reported lifetime reaches past the range of [`OffsetDateTime`].
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.received_at.checked_add(self.expires_in)
	}

	/// Returns `true` once `now` has reached [`TokenGrant::expires_at`].
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expires_at| now >= expires_at)
	}
}

/// Exchanges account credentials for bearer tokens.
pub struct TokenIssuer<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	endpoint: String,
	transport: Transport<C, M>,
}
impl<C, M> TokenIssuer<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an issuer that reuses the caller-provided transport + mapper pair.
	///
	/// A non-empty `custom_endpoint` is used verbatim; otherwise `test_mode` picks the sandbox
	/// or production token URL.
	pub fn with_http_client(
		test_mode: bool,
		custom_endpoint: Option<&str>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		let endpoint = endpoint::resolve_endpoint(
			custom_endpoint,
			Environment::from_test_mode(test_mode).token_url(),
		);

		Self { endpoint, transport: Transport::new(http_client, mapper) }
	}

	/// Token endpoint targeted by this issuer.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Requests a token with the `client_credentials` grant.
	///
	/// An `error` field in the response fails with [`Error::Api`] carrying the carrier's code
	/// and description. Transport and decoding failures are reported as
	/// [`Error::Transport`] and [`Error::Decode`].
	pub async fn get_token(&self, account: &str, secret: &str) -> Result<TokenGrant> {
		const OPERATION: Operation = Operation::GetToken;

		let span = CallSpan::new(OPERATION, "get_token");

		obs::record_call_outcome(OPERATION, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self
					.build_request(account, secret)
					.map_err(|err| Error::config(OPERATION, err))?;
				let response = self.transport.send(OPERATION, request).await?;
				let body = transport::decode_json::<TokenResponse>(OPERATION, &response)?;

				body.into_grant(OPERATION, OffsetDateTime::now_utc())
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(OPERATION, CallOutcome::Success),
			Err(err) if err.is_api() => obs::record_call_outcome(OPERATION, CallOutcome::Rejected),
			Err(_) => obs::record_call_outcome(OPERATION, CallOutcome::Failure),
		}

		result
	}

	fn build_request(&self, account: &str, secret: &str) -> Result<HttpRequest, ConfigError> {
		let url = endpoint::parse_endpoint(&self.endpoint)?;
		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", GRANT_TYPE)
			.append_pair("client_id", account)
			.append_pair("client_secret", secret)
			.finish();
		let request = Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(ACCEPT, "application/json")
			.body(body.into_bytes())?;

		Ok(request)
	}
}
#[cfg(feature = "reqwest")]
impl TokenIssuer<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates an issuer backed by a default reqwest transport.
	pub fn new(test_mode: bool, custom_endpoint: Option<&str>) -> Self {
		Self::with_http_client(
			test_mode,
			custom_endpoint,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> Clone for TokenIssuer<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self { endpoint: self.endpoint.clone(), transport: self.transport.clone() }
	}
}
impl<C, M> Debug for TokenIssuer<C, M>
where
	C: ?Sized + CarrierHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenIssuer").field("endpoint", &self.endpoint).finish()
	}
}

/// Requests a token once using a default reqwest transport.
///
/// Shorthand for [`TokenIssuer::new`] followed by [`TokenIssuer::get_token`].
#[cfg(feature = "reqwest")]
pub async fn get_token(
	account: &str,
	secret: &str,
	test_mode: bool,
	custom_endpoint: Option<&str>,
) -> Result<TokenGrant> {
	TokenIssuer::new(test_mode, custom_endpoint).get_token(account, secret).await
}

/// `/v2/oauth/token` response; `token_type`, `scope` and `jti` are not used.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TokenResponse {
	access_token: Option<String>,
	expires_in: Option<i64>,
	error: Option<String>,
	error_description: Option<String>,
}
impl TokenResponse {
	fn into_grant(self, operation: Operation, received_at: OffsetDateTime) -> Result<TokenGrant> {
		if let Some(code) = self.error.filter(|code| !code.is_empty()) {
			return Err(Error::Api {
				operation,
				code,
				description: self.error_description.unwrap_or_default(),
			});
		}

		Ok(TokenGrant {
			access_token: BearerToken::new(self.access_token.unwrap_or_default()),
			expires_in: Duration::seconds(self.expires_in.unwrap_or_default()),
			received_at,
		})
	}
}
