use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use faretrack_core::{
    format_travel_date, parse_travel_date, AddFlights, AmadeusConfig, AmadeusGateway, FareQuery,
    FlightMapper, FlightRecord, LocationCode, ReqwestHttpClient,
};
use faretrack_warehouse::{Warehouse, WarehouseFlightStore};

use super::round_price;
use crate::cli::SearchArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct FlightView {
    origin: String,
    destination: String,
    price: f64,
    currency: String,
    departure_date: String,
    return_date: Option<String>,
    departure_time: Option<String>,
    arrival_time: Option<String>,
    carrier: String,
    flight_number: String,
}

impl From<&FlightRecord> for FlightView {
    fn from(record: &FlightRecord) -> Self {
        Self {
            origin: record.origin.to_string(),
            destination: record.destination.to_string(),
            price: round_price(record.price),
            currency: record.currency.clone(),
            departure_date: format_travel_date(record.departure_date),
            return_date: record.return_date.map(format_travel_date),
            departure_time: record.departure_time.clone(),
            arrival_time: record.arrival_time.clone(),
            carrier: record.carrier.clone(),
            flight_number: record.flight_number.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchResponseData {
    origin: String,
    destination: String,
    departure_date: String,
    return_date: Option<String>,
    stored_count: usize,
    best_price: Option<f64>,
    average_price: Option<f64>,
    flights: Vec<FlightView>,
}

pub async fn run(args: &SearchArgs, timeout_ms: u64) -> Result<Value, CliError> {
    let origin = LocationCode::parse(args.origin.as_str())?;
    let destination = LocationCode::parse(args.destination.as_str())?;
    let departure_date = parse_travel_date(args.departure_date.as_str())?;
    let return_date = args
        .return_date
        .as_deref()
        .map(parse_travel_date)
        .transpose()?;

    let query = FareQuery::new(
        origin.clone(),
        destination.clone(),
        departure_date,
        return_date,
        args.adults,
    )?;

    let config = AmadeusConfig::from_env().with_timeout_ms(timeout_ms);
    let gateway = AmadeusGateway::new(Arc::new(ReqwestHttpClient::new()), config);
    let mapper = FlightMapper::new(Arc::new(gateway));

    let warehouse = Warehouse::open_default()?;
    let store = WarehouseFlightStore::new(warehouse.clone(), "amadeus");

    let pipeline = AddFlights::new(mapper, store);
    let records = pipeline.run(&query).await?;
    tracing::info!(
        origin = %origin,
        destination = %destination,
        stored = records.len(),
        "search ingested fare quotes"
    );

    let best_price = warehouse
        .find_best_price_from_to(origin.as_str(), destination.as_str())?
        .map(round_price);
    let average_price = warehouse
        .find_average_price_from_to(origin.as_str(), destination.as_str())?
        .map(round_price);

    let data = SearchResponseData {
        origin: origin.to_string(),
        destination: destination.to_string(),
        departure_date: format_travel_date(departure_date),
        return_date: return_date.map(format_travel_date),
        stored_count: records.len(),
        best_price,
        average_price,
        flights: records.iter().map(FlightView::from).collect(),
    };

    Ok(serde_json::to_value(data)?)
}
