//! Fare ingestion pipeline.
//!
//! [`AddFlights`] runs an ordered, short-circuiting sequence of steps:
//! find flights via the mapper, then store them via the [`FlightStore`].
//! Each step converts only the failures it is responsible for into one of
//! the three [`IngestError`] reasons; nothing escapes the pipeline
//! unclassified. The core defines no retry loop; retry policy, if any,
//! belongs to the caller.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::mapper::FlightMapper;
use crate::{FareQuery, FlightRecord};

/// Storage failure reported by a [`FlightStore`] implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Persistence seam for the pipeline's store step.
///
/// The contract is all-or-nothing: either every record in the batch is
/// persisted or none are. Implementations own storage exclusively; records
/// are never updated or deleted once written.
pub trait FlightStore: Send + Sync {
    fn create_many(&self, records: &[FlightRecord]) -> Result<(), StoreError>;
}

impl<T: FlightStore + ?Sized> FlightStore for std::sync::Arc<T> {
    fn create_many(&self, records: &[FlightRecord]) -> Result<(), StoreError> {
        self.as_ref().create_many(records)
    }
}

/// Pipeline failure reasons, one per stage.
///
/// The display strings are the pipeline's outward contract and are reported
/// verbatim to callers.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No offers matched the search criteria. Expected, non-exceptional.
    #[error("No flights found for the given criteria.")]
    NoFlightsFound,

    /// The provider call or its mapping failed for any reason.
    #[error("Could not find flights")]
    ProviderFailure(#[source] GatewayError),

    /// The batch insert failed; the fetched records are discarded.
    #[error("Could not save flight data")]
    StorageFailure(#[source] StoreError),
}

/// Service that ingests fare quotes for one search.
pub struct AddFlights<S: FlightStore> {
    mapper: FlightMapper,
    store: S,
}

impl<S: FlightStore> AddFlights<S> {
    pub fn new(mapper: FlightMapper, store: S) -> Self {
        Self { mapper, store }
    }

    /// Run the full pipeline: find flights, then store them.
    ///
    /// On success the persisted records are returned; on failure the first
    /// failing step's reason is returned and later steps do not execute.
    pub async fn run(&self, query: &FareQuery) -> Result<Vec<FlightRecord>, IngestError> {
        let records = self.find_flights(query).await?;
        self.store_flights(records)
    }

    async fn find_flights(&self, query: &FareQuery) -> Result<Vec<FlightRecord>, IngestError> {
        let records = self
            .mapper
            .find_flight(query)
            .await
            .map_err(IngestError::ProviderFailure)?;

        if records.is_empty() {
            tracing::info!(
                origin = %query.origin,
                destination = %query.destination,
                "no offers matched the search criteria"
            );
            return Err(IngestError::NoFlightsFound);
        }

        Ok(records)
    }

    fn store_flights(&self, records: Vec<FlightRecord>) -> Result<Vec<FlightRecord>, IngestError> {
        self.store
            .create_many(&records)
            .map_err(IngestError::StorageFailure)?;

        tracing::info!(count = records.len(), "stored flight records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{FareGateway, FareOffer, ProviderId};
    use crate::{parse_travel_date, LocationCode};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubGateway {
        offers: Result<Vec<FareOffer>, GatewayError>,
    }

    impl FareGateway for StubGateway {
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

    #[derive(Default)]
    struct CountingStore {
        fail: bool,
        stored_batches: AtomicUsize,
    }

    impl FlightStore for CountingStore {
        fn create_many(&self, _records: &[FlightRecord]) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::new("disk full"));
            }
            self.stored_batches.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn offer() -> FareOffer {
        FareOffer {
            origin: String::from("TPE"),
            destination: String::from("LAX"),
            price: String::from("200.00"),
            currency: String::from("USD"),
            departure_date: String::from("2026-09-20"),
            return_date: None,
            departure_time: None,
            arrival_time: None,
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

    fn pipeline(
        offers: Result<Vec<FareOffer>, GatewayError>,
        store: Arc<CountingStore>,
    ) -> AddFlights<Arc<CountingStore>> {
        AddFlights::new(
            FlightMapper::new(Arc::new(StubGateway { offers })),
            store,
        )
    }

    #[tokio::test]
    async fn successful_run_returns_the_stored_records() {
        let store = Arc::new(CountingStore::default());
        let pipeline = pipeline(Ok(vec![offer()]), store.clone());

        let records = pipeline.run(&query()).await.expect("pipeline success");
        assert_eq!(records.len(), 1);
        assert_eq!(store.stored_batches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_result_fails_with_no_flights_reason_and_no_write() {
        let store = Arc::new(CountingStore::default());
        let pipeline = pipeline(Ok(Vec::new()), store.clone());

        let error = pipeline.run(&query()).await.expect_err("must fail");
        assert_eq!(
            error.to_string(),
            "No flights found for the given criteria."
        );
        assert_eq!(store.stored_batches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failure_short_circuits_before_the_store_step() {
        let store = Arc::new(CountingStore::default());
        let pipeline = pipeline(
            Err(GatewayError::unavailable("connection reset")),
            store.clone(),
        );

        let error = pipeline.run(&query()).await.expect_err("must fail");
        assert_eq!(error.to_string(), "Could not find flights");
        assert_eq!(store.stored_batches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn storage_failure_is_reported_with_its_own_reason() {
        let store = Arc::new(CountingStore {
            fail: true,
            stored_batches: AtomicUsize::new(0),
        });
        let pipeline = pipeline(Ok(vec![offer()]), store.clone());

        let error = pipeline.run(&query()).await.expect_err("must fail");
        assert_eq!(error.to_string(), "Could not save flight data");
        assert_eq!(store.stored_batches.load(Ordering::SeqCst), 0);
    }
}
