//! [`FlightStore`] implementation backed by the warehouse.

use faretrack_core::{FlightRecord, FlightStore, StoreError};
use uuid::Uuid;

use crate::{FlightRow, Warehouse};

/// Adapts a [`Warehouse`] to the ingestion pipeline's storage contract.
///
/// Each call persists one batch under a fresh request id so the audit log
/// can tell ingestion runs apart.
#[derive(Clone)]
pub struct WarehouseFlightStore {
    warehouse: Warehouse,
    source: String,
}

impl WarehouseFlightStore {
    pub fn new(warehouse: Warehouse, source: impl Into<String>) -> Self {
        Self {
            warehouse,
            source: source.into(),
        }
    }
}

impl FlightStore for WarehouseFlightStore {
    fn create_many(&self, records: &[FlightRecord]) -> Result<(), StoreError> {
        let request_id = Uuid::new_v4().to_string();
        let rows: Vec<FlightRow> = records.iter().map(FlightRow::from).collect();

        self.warehouse
            .create_many(self.source.as_str(), request_id.as_str(), rows.as_slice())
            .map_err(|error| StoreError::new(error.to_string()))
    }
}
