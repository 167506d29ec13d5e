use serde::Serialize;
use serde_json::Value;

use faretrack_warehouse::{RouteSummary, Warehouse};

use super::round_price;
use crate::cli::RoutesArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct RouteView {
    origin: String,
    destination: String,
    quote_count: i64,
    lowest_price: f64,
    average_price: f64,
}

impl From<RouteSummary> for RouteView {
    fn from(summary: RouteSummary) -> Self {
        Self {
            origin: summary.origin,
            destination: summary.destination,
            quote_count: summary.quote_count,
            lowest_price: round_price(summary.lowest_price),
            average_price: round_price(summary.average_price),
        }
    }
}

#[derive(Debug, Serialize)]
struct RoutesResponseData {
    route_count: usize,
    routes: Vec<RouteView>,
}

pub fn run(args: &RoutesArgs) -> Result<Value, CliError> {
    let warehouse = Warehouse::open_default()?;

    let routes: Vec<RouteView> = warehouse
        .route_summaries()?
        .into_iter()
        .take(args.limit)
        .map(RouteView::from)
        .collect();

    let data = RoutesResponseData {
        route_count: routes.len(),
        routes,
    };

    Ok(serde_json::to_value(data)?)
}
