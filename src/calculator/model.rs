//! Public data types for tariff calculation.

// self
use crate::_prelude::*;

/// Package dimensions. Zero length, width or height means "unspecified" and is left out of the
/// request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
	/// Total weight in grams.
	pub weight: u32,
	/// Length in centimeters.
	#[serde(default, skip_serializing_if = "is_zero")]
	pub length: u32,
	/// Width in centimeters.
	#[serde(default, skip_serializing_if = "is_zero")]
	pub width: u32,
	/// Height in centimeters.
	#[serde(default, skip_serializing_if = "is_zero")]
	pub height: u32,
}
impl Size {
	/// Package of the given weight with unspecified dimensions.
	pub const fn new(weight: u32) -> Self {
		Self { weight, length: 0, width: 0, height: 0 }
	}

	/// Sets length, width and height in centimeters.
	pub const fn with_dimensions(mut self, length: u32, width: u32, height: u32) -> Self {
		self.length = length;
		self.width = width;
		self.height = height;

		self
	}
}

fn is_zero(value: &u32) -> bool {
	*value == 0
}

/// Price and delivery window for one tariff.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffQuote {
	/// Carrier tariff code.
	pub tariff_code: i32,
	/// Tariff name in the response language.
	pub tariff_name: String,
	/// Tariff description in the response language.
	pub tariff_description: String,
	/// Delivery mode (door/warehouse combination) code.
	pub delivery_mode: i32,
	/// Delivery price.
	pub delivery_sum: f64,
	/// Minimum delivery time in business days.
	pub period_min: u32,
	/// Maximum delivery time in business days.
	pub period_max: u32,
	/// Minimum delivery time in calendar days, when reported.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub calendar_min: Option<u32>,
	/// Maximum delivery time in calendar days, when reported.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub calendar_max: Option<u32>,
}

/// Error object reported by the carrier, either about the calculation itself or about the
/// request as a whole (e.g. an invalid token).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierError {
	/// Carrier error code.
	pub code: String,
	/// Human-readable message.
	pub message: String,
}
impl CarrierError {
	/// Creates a new error value.
	pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { code: code.into(), message: message.into() }
	}
}
impl Display for CarrierError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}: {}", self.code, self.message)
	}
}

/// Outcome of a calculation the carrier answered.
///
/// Carrier-reported errors are ordinary data, not failures: a `Rejected` value means the
/// request reached the carrier and was refused (bad address, bad token, ...). Local and network
/// failures are reported through [`Error`] instead.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum Calculation {
	/// Available tariffs; may be empty.
	Quotes(Vec<TariffQuote>),
	/// Errors reported by the carrier.
	Rejected(Vec<CarrierError>),
}
impl Calculation {
	/// Quoted tariffs, or `None` when the carrier rejected the request.
	pub fn quotes(&self) -> Option<&[TariffQuote]> {
		match self {
			Self::Quotes(quotes) => Some(quotes),
			Self::Rejected(_) => None,
		}
	}

	/// Carrier errors, or `None` when tariffs were quoted.
	pub fn errors(&self) -> Option<&[CarrierError]> {
		match self {
			Self::Quotes(_) => None,
			Self::Rejected(errors) => Some(errors),
		}
	}

	/// Returns `true` when the carrier reported errors.
	pub fn is_rejected(&self) -> bool {
		matches!(self, Self::Rejected(_))
	}

	/// Converts into a plain [`Result`] with carrier errors on the error side.
	pub fn into_result(self) -> Result<Vec<TariffQuote>, Vec<CarrierError>> {
		match self {
			Self::Quotes(quotes) => Ok(quotes),
			Self::Rejected(errors) => Err(errors),
		}
	}
}
