//! Transformation from raw provider offers to canonical flight records.

use std::sync::Arc;

use crate::gateway::{FareGateway, FareOffer, GatewayError};
use crate::{parse_travel_date, FareQuery, FlightRecord, LocationCode};

/// Pure mapper over the gateway's response: fetches raw offers for the given
/// criteria and normalizes each one into a validated [`FlightRecord`].
#[derive(Clone)]
pub struct FlightMapper {
    gateway: Arc<dyn FareGateway>,
}

impl FlightMapper {
    pub fn new(gateway: Arc<dyn FareGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch and map offers for the given criteria.
    ///
    /// An empty vector is a valid "no matching offers" result; only
    /// transport and normalization failures surface as errors.
    pub async fn find_flight(&self, query: &FareQuery) -> Result<Vec<FlightRecord>, GatewayError> {
        let offers = self.gateway.search_offers(query).await?;
        offers.into_iter().map(map_offer).collect()
    }
}

fn map_offer(offer: FareOffer) -> Result<FlightRecord, GatewayError> {
    let origin = LocationCode::parse(&offer.origin)
        .map_err(|error| GatewayError::invalid_response(format!("offer origin: {error}")))?;
    let destination = LocationCode::parse(&offer.destination)
        .map_err(|error| GatewayError::invalid_response(format!("offer destination: {error}")))?;

    let price: f64 = offer.price.parse().map_err(|_| {
        GatewayError::invalid_response(format!("offer price is not numeric: '{}'", offer.price))
    })?;

    let departure_date = parse_travel_date(&offer.departure_date).map_err(|error| {
        GatewayError::invalid_response(format!("offer departure date: {error}"))
    })?;
    let return_date = offer
        .return_date
        .as_deref()
        .map(parse_travel_date)
        .transpose()
        .map_err(|error| GatewayError::invalid_response(format!("offer return date: {error}")))?;

    FlightRecord::new(
        origin,
        destination,
        price,
        &offer.currency,
        departure_date,
        return_date,
        offer.departure_time,
        offer.arrival_time,
        offer.carrier,
        offer.flight_number,
    )
    .map_err(|error| GatewayError::invalid_response(format!("offer failed validation: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ProviderId;
    use crate::GatewayErrorKind;
    use std::future::Future;
    use std::pin::Pin;

    struct StaticGateway {
        offers: Result<Vec<FareOffer>, GatewayError>,
    }

    impl FareGateway for StaticGateway {
        fn id(&self) -> ProviderId {
            ProviderId::Amadeus
        }

        fn search_offers<'a>(
            &'a self,
            _query: &'a FareQuery,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<FareOffer>, GatewayError>> + Send + 'a>>
        {
            let offers = self.offers.clone();
            Box::pin(async move { offers })
        }
    }

    fn offer() -> FareOffer {
        FareOffer {
            origin: String::from("TPE"),
            destination: String::from("LAX"),
            price: String::from("675.20"),
            currency: String::from("USD"),
            departure_date: String::from("2026-09-20"),
            return_date: Some(String::from("2026-09-27")),
            departure_time: Some(String::from("07:30:00")),
            arrival_time: Some(String::from("11:50:00")),
            carrier: String::from("BR"),
            flight_number: String::from("BR16"),
        }
    }

    fn query() -> FareQuery {
        FareQuery::new(
            LocationCode::parse("TPE").expect("origin"),
            LocationCode::parse("LAX").expect("destination"),
            parse_travel_date("2026-09-20").expect("date"),
            None,
            1,
        )
        .expect("valid query")
    }

    #[tokio::test]
    async fn maps_offer_into_validated_record() {
        let mapper = FlightMapper::new(Arc::new(StaticGateway {
            offers: Ok(vec![offer()]),
        }));

        let records = mapper.find_flight(&query()).await.expect("mapping");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].origin.as_str(), "TPE");
        assert_eq!(records[0].destination.as_str(), "LAX");
        assert_eq!(records[0].price, 675.20);
        assert_eq!(records[0].carrier, "BR");
        assert!(records[0].return_date.is_some());
    }

    #[tokio::test]
    async fn empty_offers_map_to_empty_records() {
        let mapper = FlightMapper::new(Arc::new(StaticGateway {
            offers: Ok(Vec::new()),
        }));

        let records = mapper.find_flight(&query()).await.expect("mapping");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn non_numeric_price_is_an_invalid_response() {
        let mut bad = offer();
        bad.price = String::from("six hundred");
        let mapper = FlightMapper::new(Arc::new(StaticGateway {
            offers: Ok(vec![bad]),
        }));

        let error = mapper.find_flight(&query()).await.expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn negative_price_is_rejected_before_persistence() {
        let mut bad = offer();
        bad.price = String::from("-5.00");
        let mapper = FlightMapper::new(Arc::new(StaticGateway {
            offers: Ok(vec![bad]),
        }));

        let error = mapper.find_flight(&query()).await.expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let mapper = FlightMapper::new(Arc::new(StaticGateway {
            offers: Err(GatewayError::unavailable("provider down")),
        }));

        let error = mapper.find_flight(&query()).await.expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::Unavailable);
    }
}
