use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

use crate::{LocationCode, ValidationError};

const TRAVEL_DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date in the `YYYY-MM-DD` form used by fare searches.
pub fn parse_travel_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), TRAVEL_DATE_FORMAT).map_err(|_| ValidationError::InvalidTravelDate {
        value: input.to_owned(),
    })
}

/// Render a calendar date back to `YYYY-MM-DD`.
pub fn format_travel_date(date: Date) -> String {
    date.format(TRAVEL_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Search criteria accepted by the gateway and the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareQuery {
    pub origin: LocationCode,
    pub destination: LocationCode,
    pub departure_date: Date,
    pub return_date: Option<Date>,
    pub adults: u32,
}

impl FareQuery {
    pub fn new(
        origin: LocationCode,
        destination: LocationCode,
        departure_date: Date,
        return_date: Option<Date>,
        adults: u32,
    ) -> Result<Self, ValidationError> {
        if adults == 0 {
            return Err(ValidationError::NoPassengers);
        }

        if let Some(return_date) = return_date {
            if return_date < departure_date {
                return Err(ValidationError::ReturnBeforeDeparture {
                    departure_date: format_travel_date(departure_date),
                    return_date: format_travel_date(return_date),
                });
            }
        }

        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date,
            adults,
        })
    }
}

/// Canonical fare quote, immutable once built.
///
/// A record always carries a valid origin/destination pair and a finite,
/// non-negative price; anything else is rejected before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub origin: LocationCode,
    pub destination: LocationCode,
    pub price: f64,
    pub currency: String,
    pub departure_date: Date,
    pub return_date: Option<Date>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub carrier: String,
    pub flight_number: String,
}

impl FlightRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin: LocationCode,
        destination: LocationCode,
        price: f64,
        currency: impl AsRef<str>,
        departure_date: Date,
        return_date: Option<Date>,
        departure_time: Option<String>,
        arrival_time: Option<String>,
        carrier: impl Into<String>,
        flight_number: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;

        let carrier = carrier.into();
        if carrier.trim().is_empty() {
            return Err(ValidationError::EmptyCarrier);
        }

        Ok(Self {
            origin,
            destination,
            price,
            currency: validate_currency_code(currency.as_ref())?,
            departure_date,
            return_date,
            departure_time,
            arrival_time,
            carrier,
            flight_number: flight_number.into(),
        })
    }
}

/// Validate and normalize currency to an uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> (LocationCode, LocationCode) {
        (
            LocationCode::parse("TPE").expect("origin"),
            LocationCode::parse("LAX").expect("destination"),
        )
    }

    #[test]
    fn parses_travel_date() {
        let date = parse_travel_date("2026-09-20").expect("date should parse");
        assert_eq!(format_travel_date(date), "2026-09-20");
    }

    #[test]
    fn rejects_malformed_travel_date() {
        let err = parse_travel_date("20/09/2026").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTravelDate { .. }));
    }

    #[test]
    fn rejects_negative_price() {
        let (origin, destination) = route();
        let departure = parse_travel_date("2026-09-20").expect("date");
        let err = FlightRecord::new(
            origin,
            destination,
            -12.0,
            "USD",
            departure,
            None,
            None,
            None,
            "BR",
            "BR16",
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { .. }));
    }

    #[test]
    fn rejects_return_before_departure() {
        let (origin, destination) = route();
        let departure = parse_travel_date("2026-09-20").expect("date");
        let ret = parse_travel_date("2026-09-01").expect("date");
        let err = FareQuery::new(origin, destination, departure, Some(ret), 1)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::ReturnBeforeDeparture { .. }));
    }

    #[test]
    fn validates_currency() {
        assert_eq!(
            validate_currency_code("usd").expect("must normalize"),
            "USD"
        );
        assert!(matches!(
            validate_currency_code("USDT"),
            Err(ValidationError::InvalidCurrency { .. })
        ));
    }
}
