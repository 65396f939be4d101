//! Optional observability helpers for carrier API calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `cdek_calc.call` with the `operation` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `cdek_calc_call_total` counter for every
//!   attempt/success/rejection/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Carrier API operations exposed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// OAuth client-credentials token request.
	GetToken,
	/// Tariff list calculation.
	Calculate,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::GetToken => "get_token",
			Operation::Calculate => "calculate",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// The carrier answered with domain errors instead of a result.
	Rejected,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Rejected => "rejected",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
