mod common;

// std
use std::{error::Error as StdError, net::TcpListener};
// crates.io
use httpmock::prelude::*;
// self
use cdek_calc::{
	Error, TokenIssuer,
	error::TransportError,
	http::ReqwestHttpClient,
	obs::Operation,
	reqwest::Client as ReqwestClient,
	transport::ReqwestTransportErrorMapper,
};

const ACCOUNT: &str = "EMscd6r9JnFiQ3bLoyjJY6eM78JrJceI";
const SECRET: &str = "PjLZkKBHEiLK3YsjtNrt3TGNG0ahs3kG";
const FORM_BODY: &str = "grant_type=client_credentials&client_id=EMscd6r9JnFiQ3bLoyjJY6eM78JrJceI&client_secret=PjLZkKBHEiLK3YsjtNrt3TGNG0ahs3kG";

fn issuer(server: &MockServer) -> TokenIssuer<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	TokenIssuer::with_http_client(
		true,
		Some(&server.url("/v2/oauth/token")),
		common::test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
}

fn closed_port_endpoint(path: &str) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").expect("Loopback listener should bind.");
	let addr = listener.local_addr().expect("Listener should expose its address.");

	drop(listener);

	format!("http://{addr}{path}")
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
	let mut rendered = err.to_string();
	let mut source = err.source();

	while let Some(inner) = source {
		rendered.push_str(" / ");
		rendered.push_str(&inner.to_string());

		source = inner.source();
	}

	rendered
}

#[tokio::test]
async fn get_token_posts_client_credentials_form() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v2/oauth/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.body(FORM_BODY);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"issued-jwt\",\"token_type\":\"bearer\",\"expires_in\":3599,\"scope\":\"order:all payment:all\",\"jti\":\"9adca50a\"}",
			);
		})
		.await;
	let grant = issuer(&server)
		.get_token(ACCOUNT, SECRET)
		.await
		.expect("Token exchange should succeed against the mock server.");

	assert_eq!(grant.access_token.expose(), "issued-jwt");
	assert_eq!(grant.expires_in.whole_seconds(), 3599);

	mock.assert_async().await;
}

#[tokio::test]
async fn get_token_surfaces_api_error_without_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\",\"error_description\":\"bad secret\"}");
		})
		.await;
	let err = issuer(&server)
		.get_token(ACCOUNT, "wrong")
		.await
		.expect_err("Rejected credentials should fail the exchange.");
	let message = err.to_string();

	assert!(message.contains("invalid_client"));
	assert!(message.contains("bad secret"));
	assert!(matches!(err, Error::Api { operation: Operation::GetToken, .. }));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_token_keeps_missing_expiry_at_zero() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"no-expiry\"}");
		})
		.await;
	let grant = issuer(&server)
		.get_token(ACCOUNT, SECRET)
		.await
		.expect("A token without expires_in should still be returned.");

	assert_eq!(grant.access_token.expose(), "no-expiry");
	assert!(grant.expires_in.is_zero());

	mock.assert_async().await;
}

#[tokio::test]
async fn get_token_reports_malformed_body_as_decode_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token");
			then.status(502).header("content-type", "text/html").body("<html>Bad Gateway</html>");
		})
		.await;
	let err = issuer(&server)
		.get_token(ACCOUNT, SECRET)
		.await
		.expect_err("HTML bodies should not decode as token responses.");

	match err {
		Error::Decode { operation, status, .. } => {
			assert_eq!(operation, Operation::GetToken);
			assert_eq!(status, Some(502));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	mock.assert_async().await;
}

#[tokio::test]
async fn get_token_reports_connection_refused_as_transport_error() {
	let endpoint = closed_port_endpoint("/v2/oauth/token");
	let issuer: TokenIssuer<ReqwestHttpClient, ReqwestTransportErrorMapper> =
		TokenIssuer::with_http_client(
			false,
			Some(&endpoint),
			ReqwestHttpClient::with_client(ReqwestClient::new()),
			ReqwestTransportErrorMapper,
		);
	let err = issuer
		.get_token(ACCOUNT, SECRET)
		.await
		.expect_err("A closed port should fail the exchange.");

	assert!(!err.is_api());
	assert!(matches!(
		err,
		Error::Transport { operation: Operation::GetToken, source: TransportError::Network { .. } }
	));
	assert!(err.to_string().starts_with("get_token: "));
}

#[tokio::test]
async fn get_token_reports_overflowing_expiry_without_panicking() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token");
			then.status(200).body("{\"access_token\":\"t\",\"expires_in\":9223372036854775807}");
		})
		.await;
	let grant = issuer(&server)
		.get_token(ACCOUNT, SECRET)
		.await
		.expect("An oversized lifetime should still decode.");

	assert_eq!(grant.expires_at(), None);
	assert!(!grant.is_expired_at(grant.received_at));

	mock.assert_async().await;
}

#[tokio::test]
async fn free_function_uses_custom_endpoint() {
	let endpoint = closed_port_endpoint("/custom/token");
	let err = cdek_calc::get_token(ACCOUNT, SECRET, false, Some(&endpoint))
		.await
		.expect_err("Nothing listens on the custom endpoint.");

	assert!(matches!(
		err,
		Error::Transport { operation: Operation::GetToken, source: TransportError::Network { .. } }
	));
	assert!(
		error_chain(&err).contains(&endpoint),
		"The request should target the custom endpoint: {err:?}."
	);
}
