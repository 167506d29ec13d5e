//! Shared fixtures for the end-to-end ingestion tests.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use faretrack_core::{
    parse_travel_date, FareGateway, FareOffer, FareQuery, GatewayError, LocationCode, ProviderId,
};
use faretrack_warehouse::{Warehouse, WarehouseConfig};

/// Gateway stub that replays a fixed outcome for every search.
pub struct ScriptedGateway {
    outcome: Result<Vec<FareOffer>, GatewayError>,
}

impl ScriptedGateway {
    pub fn returning(offers: Vec<FareOffer>) -> Self {
        Self {
            outcome: Ok(offers),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl FareGateway for ScriptedGateway {
    fn id(&self) -> ProviderId {
        ProviderId::Amadeus
    }

    fn search_offers<'a>(
        &'a self,
        _query: &'a FareQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FareOffer>, GatewayError>> + Send + 'a>> {
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

/// A plausible one-way offer between Taipei and Los Angeles.
pub fn tpe_lax_offer(price: &str) -> FareOffer {
    FareOffer {
        origin: "TPE".to_string(),
        destination: "LAX".to_string(),
        price: price.to_string(),
        currency: "USD".to_string(),
        departure_date: "2026-09-20".to_string(),
        return_date: Some("2026-10-02".to_string()),
        departure_time: Some("23:55".to_string()),
        arrival_time: Some("20:10".to_string()),
        carrier: "BR".to_string(),
        flight_number: "BR16".to_string(),
    }
}

/// The matching search criteria for [`tpe_lax_offer`].
pub fn tpe_lax_query() -> FareQuery {
    FareQuery::new(
        LocationCode::parse("TPE").expect("origin"),
        LocationCode::parse("LAX").expect("destination"),
        parse_travel_date("2026-09-20").expect("departure date"),
        Some(parse_travel_date("2026-10-02").expect("return date")),
        1,
    )
    .expect("query")
}

/// Open a throwaway warehouse rooted under the given temp path.
pub fn open_test_warehouse(root: &Path) -> Warehouse {
    let faretrack_home = root.join("faretrack-home");
    let db_path = faretrack_home.join("faretrack.duckdb");
    Warehouse::open(WarehouseConfig {
        faretrack_home,
        db_path,
        max_pool_size: 2,
    })
    .expect("warehouse open")
}
