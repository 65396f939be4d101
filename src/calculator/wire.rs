//! Wire documents for `/v2/calculator/tarifflist`. Only the fields this crate sends or reads
//! are modelled.

// self
use crate::{
	_prelude::*,
	calculator::{Calculation, CarrierError, Size, TariffQuote},
};

#[derive(Debug, Serialize)]
pub(crate) struct CalculatorRequest<'a> {
	pub(crate) from_location: Location<'a>,
	pub(crate) to_location: Location<'a>,
	pub(crate) packages: Vec<Size>,
}
impl<'a> CalculatorRequest<'a> {
	/// One-package request between two full address strings.
	pub(crate) fn single(origin: &'a str, destination: &'a str, size: Size) -> Self {
		Self {
			from_location: Location { address: origin },
			to_location: Location { address: destination },
			packages: vec![size],
		}
	}
}

#[derive(Debug, Serialize)]
pub(crate) struct Location<'a> {
	pub(crate) address: &'a str,
}

/// Response document. `requests` is only populated for failures outside the calculator
/// itself, such as an invalid token.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CalculatorResponse {
	tariff_codes: Option<Vec<TariffQuote>>,
	errors: Option<Vec<CarrierError>>,
	requests: Option<Vec<RequestErrors>>,
}
impl CalculatorResponse {
	/// Calculator errors win over request-level errors, which win over quotes.
	pub(crate) fn into_calculation(self) -> Calculation {
		let errors = self.errors.unwrap_or_default();

		if !errors.is_empty() {
			return Calculation::Rejected(errors);
		}

		let requests = self.requests.unwrap_or_default();

		if !requests.is_empty() {
			return Calculation::Rejected(
				requests
					.into_iter()
					.flat_map(|request| request.errors.unwrap_or_default())
					.collect(),
			);
		}

		Calculation::Quotes(self.tariff_codes.unwrap_or_default())
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RequestErrors {
	errors: Option<Vec<CarrierError>>,
}
