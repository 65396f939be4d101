//! Async client for the CDEK shipping API: exchange account credentials for an OAuth bearer
//! token, then quote every available tariff between two addresses for a single package.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod calculator;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod obs;
pub mod transport;

pub use auth::{TokenGrant, TokenIssuer};
#[cfg(feature = "reqwest")] pub use auth::get_token;
pub use calculator::{Calculation, CarrierError, Client, Size, TariffQuote};
pub use endpoint::Environment;
pub use error::{Error, Result};

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
