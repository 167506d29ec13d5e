//! Behavior-driven tests for the fare ingestion pipeline.
//!
//! These tests verify HOW the pipeline reports success and failure to its
//! caller, focusing on the exact user-visible reasons.

use std::sync::Arc;

use faretrack_core::{
    AddFlights, FlightMapper, FlightRecord, FlightStore, GatewayError, IngestError, StoreError,
};
use faretrack_warehouse::WarehouseFlightStore;
use tempfile::tempdir;

use faretrack_tests::{open_test_warehouse, tpe_lax_offer, tpe_lax_query, ScriptedGateway};

// =============================================================================
// Pipeline: Success Path
// =============================================================================

#[tokio::test]
async fn when_offers_match_the_records_are_stored_and_returned() {
    // Given: A provider with two offers and a fresh warehouse
    let temp = tempdir().expect("tempdir");
    let warehouse = open_test_warehouse(temp.path());
    let gateway = ScriptedGateway::returning(vec![tpe_lax_offer("420.00"), tpe_lax_offer("515.50")]);

    let pipeline = AddFlights::new(
        FlightMapper::new(Arc::new(gateway)),
        WarehouseFlightStore::new(warehouse.clone(), "amadeus"),
    );

    // When: The user runs a search
    let records = pipeline.run(&tpe_lax_query()).await.expect("pipeline run");

    // Then: Both records come back and are queryable in the warehouse
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].carrier, "BR");

    let stored = warehouse
        .find_flights_from_to("TPE", "LAX")
        .expect("route query");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].price, 420.0, "cheapest quote first");
}

// =============================================================================
// Pipeline: Failure Reasons
// =============================================================================

#[tokio::test]
async fn when_no_offers_match_the_exact_reason_is_reported_and_nothing_is_stored() {
    // Given: A provider that finds nothing
    let temp = tempdir().expect("tempdir");
    let warehouse = open_test_warehouse(temp.path());
    let gateway = ScriptedGateway::returning(Vec::new());

    let pipeline = AddFlights::new(
        FlightMapper::new(Arc::new(gateway)),
        WarehouseFlightStore::new(warehouse.clone(), "amadeus"),
    );

    // When: The user runs a search
    let error = pipeline
        .run(&tpe_lax_query())
        .await
        .expect_err("must fail");

    // Then: The reason is verbatim and the warehouse stays empty
    assert_eq!(error.to_string(), "No flights found for the given criteria.");
    assert!(matches!(error, IngestError::NoFlightsFound));

    let stored = warehouse
        .find_flights_from_to("TPE", "LAX")
        .expect("route query");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn when_the_provider_fails_the_pipeline_reports_could_not_find_flights() {
    // Given: A provider that is down
    let temp = tempdir().expect("tempdir");
    let warehouse = open_test_warehouse(temp.path());
    let gateway = ScriptedGateway::failing(GatewayError::unavailable("502 from upstream"));

    let pipeline = AddFlights::new(
        FlightMapper::new(Arc::new(gateway)),
        WarehouseFlightStore::new(warehouse.clone(), "amadeus"),
    );

    // When/Then: The failure is classified as a provider failure
    let error = pipeline
        .run(&tpe_lax_query())
        .await
        .expect_err("must fail");
    assert_eq!(error.to_string(), "Could not find flights");
    assert!(matches!(error, IngestError::ProviderFailure(_)));
}

#[tokio::test]
async fn when_an_offer_is_malformed_the_pipeline_reports_could_not_find_flights() {
    // Given: A provider whose offer carries a non-numeric price
    let temp = tempdir().expect("tempdir");
    let warehouse = open_test_warehouse(temp.path());
    let mut offer = tpe_lax_offer("420.00");
    offer.price = "n/a".to_string();
    let gateway = ScriptedGateway::returning(vec![offer]);

    let pipeline = AddFlights::new(
        FlightMapper::new(Arc::new(gateway)),
        WarehouseFlightStore::new(warehouse.clone(), "amadeus"),
    );

    // When/Then: Mapping failures count as provider failures, nothing stored
    let error = pipeline
        .run(&tpe_lax_query())
        .await
        .expect_err("must fail");
    assert_eq!(error.to_string(), "Could not find flights");

    let stored = warehouse
        .find_flights_from_to("TPE", "LAX")
        .expect("route query");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn when_storage_fails_the_pipeline_reports_could_not_save_flight_data() {
    // Given: A storage layer that rejects every batch
    struct RefusingStore;

    impl FlightStore for RefusingStore {
        fn create_many(&self, _records: &[FlightRecord]) -> Result<(), StoreError> {
            Err(StoreError::new("disk full"))
        }
    }

    let gateway = ScriptedGateway::returning(vec![tpe_lax_offer("420.00")]);
    let pipeline = AddFlights::new(FlightMapper::new(Arc::new(gateway)), RefusingStore);

    // When/Then: The failure is classified as a storage failure
    let error = pipeline
        .run(&tpe_lax_query())
        .await
        .expect_err("must fail");
    assert_eq!(error.to_string(), "Could not save flight data");
    assert!(matches!(error, IngestError::StorageFailure(_)));
}
