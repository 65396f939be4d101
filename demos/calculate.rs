//! Requests a sandbox token, quotes a Moscow to Voronezh parcel, and prints the tariffs (or the
//! carrier's errors) as JSON.
//!
//! Set `CDEK_ACCOUNT` / `CDEK_SECRET` to use your own sandbox account; the carrier's public test
//! credentials are used otherwise.

// std
use std::env;
// crates.io
use color_eyre::Result;
// self
use cdek_calc::{Calculation, Client, Size, TokenIssuer};

const TEST_ACCOUNT: &str = "EMscd6r9JnFiQ3bLoyjJY6eM78JrJceI";
const TEST_SECRET: &str = "PjLZkKBHEiLK3YsjtNrt3TGNG0ahs3kG";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let account = env::var("CDEK_ACCOUNT").unwrap_or_else(|_| TEST_ACCOUNT.into());
	let secret = env::var("CDEK_SECRET").unwrap_or_else(|_| TEST_SECRET.into());
	let grant = TokenIssuer::new(true, None).get_token(&account, &secret).await?;
	let client = Client::new(grant.access_token, true, None);
	let origin = "Россия, г. Москва, Cлавянский бульвар д.1";
	let destination = "Россия, Воронежская обл., г. Воронеж, ул. Ленина д.43";
	let size = Size::new(100).with_dimensions(10, 10, 10);
	let rendered = match client.calculate(origin, destination, size).await? {
		Calculation::Quotes(quotes) => serde_json::to_string_pretty(&quotes)?,
		Calculation::Rejected(errors) => serde_json::to_string_pretty(&errors)?,
	};

	println!("{rendered}");

	Ok(())
}
