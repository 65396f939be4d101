//! Carrier endpoint constants and the override policy shared by both components.
//!
//! Each component resolves its endpoint once, at construction: a non-empty custom URL wins,
//! otherwise the [`Environment`] picks the fixed production or test URL.

// self
use crate::{_prelude::*, error::ConfigError};

/// Production OAuth token endpoint.
pub const TOKEN_URL_PRODUCTION: &str = "https://api.cdek.ru/v2/oauth/token";
/// Test (education) OAuth token endpoint.
pub const TOKEN_URL_TESTING: &str = "https://api.edu.cdek.ru/v2/oauth/token";
/// Production tariff calculator endpoint.
pub const CALCULATOR_URL_PRODUCTION: &str = "https://api.cdek.ru/v2/calculator/tarifflist";
/// Test (education) tariff calculator endpoint.
pub const CALCULATOR_URL_TESTING: &str = "https://api.edu.cdek.ru/v2/calculator/tarifflist";

/// Carrier deployment targeted by a client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	#[default]
	/// Live API at `api.cdek.ru`.
	Production,
	/// Sandbox API at `api.edu.cdek.ru`.
	Testing,
}
impl Environment {
	/// Maps the boolean test-mode switch onto an environment.
	pub const fn from_test_mode(test_mode: bool) -> Self {
		if test_mode { Self::Testing } else { Self::Production }
	}

	/// OAuth token endpoint for this environment.
	pub const fn token_url(self) -> &'static str {
		match self {
			Self::Production => TOKEN_URL_PRODUCTION,
			Self::Testing => TOKEN_URL_TESTING,
		}
	}

	/// Tariff calculator endpoint for this environment.
	pub const fn calculator_url(self) -> &'static str {
		match self {
			Self::Production => CALCULATOR_URL_PRODUCTION,
			Self::Testing => CALCULATOR_URL_TESTING,
		}
	}
}

/// Returns `custom` verbatim when it is present and non-empty, otherwise `default`.
pub fn resolve_endpoint(custom: Option<&str>, default: &str) -> String {
	match custom {
		Some(url) if !url.is_empty() => url.to_owned(),
		_ => default.to_owned(),
	}
}

/// Parses a resolved endpoint, rejecting anything that is not an absolute URL.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
	Url::parse(endpoint)
		.map_err(|source| ConfigError::InvalidEndpoint { endpoint: endpoint.to_owned(), source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn test_mode_selects_sandbox_urls() {
		let env = Environment::from_test_mode(true);

		assert_eq!(env, Environment::Testing);
		assert_eq!(env.token_url(), "https://api.edu.cdek.ru/v2/oauth/token");
		assert_eq!(env.calculator_url(), "https://api.edu.cdek.ru/v2/calculator/tarifflist");
		assert_eq!(Environment::from_test_mode(false), Environment::Production);
		assert_eq!(Environment::default(), Environment::Production);
	}

	#[test]
	fn custom_endpoint_wins_unless_empty() {
		assert_eq!(resolve_endpoint(Some("https://x"), TOKEN_URL_TESTING), "https://x");
		assert_eq!(resolve_endpoint(Some(""), TOKEN_URL_TESTING), TOKEN_URL_TESTING);
		assert_eq!(resolve_endpoint(None, TOKEN_URL_PRODUCTION), TOKEN_URL_PRODUCTION);
	}

	#[test]
	fn parse_endpoint_rejects_relative_urls() {
		let err = parse_endpoint("/v2/oauth/token").expect_err("Relative URLs should be rejected.");

		assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
		assert!(parse_endpoint(CALCULATOR_URL_PRODUCTION).is_ok());
	}
}
