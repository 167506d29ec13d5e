use serde::Serialize;
use serde_json::Value;

use faretrack_core::LocationCode;
use faretrack_warehouse::{FlightRow, Warehouse};

use super::round_price;
use crate::cli::HistoryArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct StoredFlightView {
    price: f64,
    currency: String,
    departure_date: String,
    return_date: Option<String>,
    carrier: String,
    flight_number: String,
}

impl From<&FlightRow> for StoredFlightView {
    fn from(row: &FlightRow) -> Self {
        Self {
            price: round_price(row.price),
            currency: row.currency.clone(),
            departure_date: row.departure_date.clone(),
            return_date: row.return_date.clone(),
            carrier: row.carrier.clone(),
            flight_number: row.flight_number.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HistoryResponseData {
    origin: String,
    destination: String,
    quote_count: usize,
    best_price: Option<f64>,
    average_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flights: Option<Vec<StoredFlightView>>,
}

pub fn run(args: &HistoryArgs) -> Result<Value, CliError> {
    let origin = LocationCode::parse(args.origin.as_str())?;
    let destination = LocationCode::parse(args.destination.as_str())?;

    let warehouse = Warehouse::open_default()?;

    let flights = warehouse.find_flights_from_to(origin.as_str(), destination.as_str())?;
    let best_price = warehouse
        .find_best_price_from_to(origin.as_str(), destination.as_str())?
        .map(round_price);
    let average_price = warehouse
        .find_average_price_from_to(origin.as_str(), destination.as_str())?
        .map(round_price);

    let data = HistoryResponseData {
        origin: origin.to_string(),
        destination: destination.to_string(),
        quote_count: flights.len(),
        best_price,
        average_price,
        flights: args
            .list
            .then(|| flights.iter().map(StoredFlightView::from).collect()),
    };

    Ok(serde_json::to_value(data)?)
}
