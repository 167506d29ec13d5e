//! # Faretrack Warehouse
//!
//! `DuckDB`-based fare storage layer for faretrack.
//!
//! ## Overview
//!
//! This crate persists validated flight fare quotes and answers the
//! price-history questions the CLI asks: lowest price seen on a route,
//! average price seen on a route, and per-route rollups.
//!
//! ### Features
//!
//! - 🔒 **Secure SQL**: Parameterized queries prevent SQL injection
//! - 📊 **Analytical Queries**: Route aggregations via `DuckDB`
//! - 🔄 **Connection Pooling**: Efficient connection management
//! - 🧾 **Batch Atomicity**: Each fare batch commits or rolls back whole
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faretrack_warehouse::Warehouse;
//!
//! fn main() -> Result<(), faretrack_warehouse::WarehouseError> {
//!     let warehouse = Warehouse::open_default()?;
//!
//!     match warehouse.find_average_price_from_to("TPE", "LAX")? {
//!         Some(average) => println!("average: {average:.2}"),
//!         None => println!("no fare data for this route yet"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `flights` | One row per ingested fare quote |
//! | `ingest_log` | Per-batch ingestion audit log |
//!
//! ## Views
//!
//! | View | Description |
//! |------|-------------|
//! | `vw_route_price_stats` | Quote count, lowest and average price per route |
//! | `vw_ingest_activity` | Batch and record totals by source and day |

pub mod migrations;
pub mod pool;
pub mod store;
pub mod views;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::Connection;
use ::duckdb::ToSql;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use faretrack_core::{format_travel_date, FlightRecord};

pub use pool::{ConnectionPool, PooledConnection};
pub use store::WarehouseFlightStore;

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration for the warehouse database.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Root directory for faretrack data.
    pub faretrack_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_pool_size: usize,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let faretrack_home = resolve_faretrack_home();
        let db_path = faretrack_home.join("faretrack.duckdb");
        Self {
            faretrack_home,
            db_path,
            max_pool_size: 4,
        }
    }
}

/// A flight fare row as stored in the `flights` table.
///
/// Values are already validated by the time they reach this type; the
/// warehouse treats them as plain data and lets the schema constraints
/// catch anything that slipped through.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRow {
    /// Origin location code (e.g., "TPE").
    pub origin: String,
    /// Destination location code (e.g., "LAX").
    pub destination: String,
    /// Total fare price.
    pub price: f64,
    /// Currency code (e.g., "USD").
    pub currency: String,
    /// Outbound departure date as `YYYY-MM-DD`.
    pub departure_date: String,
    /// Inbound departure date as `YYYY-MM-DD`, if a round trip.
    pub return_date: Option<String>,
    /// Outbound departure time, if the provider reported one.
    pub departure_time: Option<String>,
    /// Final arrival time, if the provider reported one.
    pub arrival_time: Option<String>,
    /// Operating carrier code.
    pub carrier: String,
    /// Carrier-assigned flight number.
    pub flight_number: String,
}

impl From<&FlightRecord> for FlightRow {
    fn from(record: &FlightRecord) -> Self {
        Self {
            origin: record.origin.to_string(),
            destination: record.destination.to_string(),
            price: record.price,
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

/// Per-route rollup backed by the `vw_route_price_stats` view.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    /// Origin location code.
    pub origin: String,
    /// Destination location code.
    pub destination: String,
    /// Number of fare quotes stored for the route.
    pub quote_count: i64,
    /// Lowest price seen on the route.
    pub lowest_price: f64,
    /// Average price across every stored quote, duplicates included.
    pub average_price: f64,
}

/// The main warehouse interface for fare storage.
#[derive(Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    pool: ConnectionPool,
}

impl Warehouse {
    /// Open a warehouse with default configuration.
    pub fn open_default() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::default())
    }

    /// Open a warehouse with the specified configuration.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let pool = ConnectionPool::new(config.db_path.clone(), config.max_pool_size);
        let warehouse = Self { config, pool };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Initialize database schema and views.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.pool.acquire()?;
        migrations::apply_migrations(&connection)?;
        views::create_views(&connection)?;
        Ok(())
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        self.pool.db_path()
    }

    /// Get the warehouse root directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        self.config.faretrack_home.as_path()
    }

    /// Persist a batch of fare rows atomically.
    ///
    /// The whole batch runs inside one transaction: either every row lands
    /// together with its `ingest_log` entry, or the transaction rolls back
    /// and the warehouse is unchanged.
    ///
    /// # Security
    /// Uses parameterized queries to prevent SQL injection.
    /// All provider-derived values are passed as query parameters.
    pub fn create_many(
        &self,
        source: &str,
        request_id: &str,
        rows: &[FlightRow],
    ) -> Result<(), WarehouseError> {
        if rows.is_empty() {
            return Ok(());
        }

        let connection = self.pool.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), WarehouseError> {
            for row in rows {
                let id = Uuid::new_v4().to_string();
                // SECURITY: All provider-derived values are passed as parameters
                let params: [&dyn ToSql; 12] = [
                    &id,
                    &row.origin,
                    &row.destination,
                    &row.price,
                    &row.currency,
                    &row.departure_date,
                    &row.return_date,
                    &row.departure_time,
                    &row.arrival_time,
                    &row.carrier,
                    &row.flight_number,
                    &source,
                ];
                connection.execute(
                    "INSERT INTO flights \
                     (id, origin, destination, price, currency, departure_date, return_date, \
                      departure_time, arrival_time, carrier, flight_number, source, ingested_at) \
                     VALUES (?, ?, ?, ?, ?, TRY_CAST(? AS DATE), TRY_CAST(? AS DATE), \
                             ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
                    params.as_slice(),
                )?;
            }

            let record_count = i64::try_from(rows.len()).unwrap_or(i64::MAX);
            let params: [&dyn ToSql; 5] = [
                &request_id,
                &rows[0].origin,
                &rows[0].destination,
                &source,
                &record_count,
            ];
            connection.execute(
                "INSERT INTO ingest_log \
                 (request_id, origin, destination, source, status, record_count, timestamp) \
                 VALUES (?, ?, ?, ?, 'ok', ?, CURRENT_TIMESTAMP)",
                params.as_slice(),
            )?;

            Ok(())
        })();

        let outcome = finalize_transaction(&connection, result);
        match &outcome {
            Ok(()) => tracing::debug!(
                source,
                request_id,
                record_count = rows.len(),
                "fare batch committed"
            ),
            Err(error) => tracing::warn!(
                source,
                request_id,
                error = %error,
                "fare batch rolled back"
            ),
        }
        outcome
    }

    /// Lowest price ever stored for a route, or `None` when the route has
    /// no fare data.
    pub fn find_best_price_from_to(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<f64>, WarehouseError> {
        let connection = self.pool.acquire()?;
        let params: [&dyn ToSql; 2] = [&origin, &destination];
        let best: Option<f64> = connection.query_row(
            "SELECT MIN(price) FROM flights WHERE origin = ? AND destination = ?",
            params.as_slice(),
            |row| row.get(0),
        )?;
        Ok(best)
    }

    /// Average price across every stored quote for a route, or `None` when
    /// the route has no fare data.
    ///
    /// Duplicate quotes are counted at face value, so repeating an
    /// ingestion pulls the average toward the repeated price.
    pub fn find_average_price_from_to(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<f64>, WarehouseError> {
        let connection = self.pool.acquire()?;
        let params: [&dyn ToSql; 2] = [&origin, &destination];
        let average: Option<f64> = connection.query_row(
            "SELECT AVG(price) FROM flights WHERE origin = ? AND destination = ?",
            params.as_slice(),
            |row| row.get(0),
        )?;
        Ok(average)
    }

    /// Every stored fare quote for a route, cheapest first.
    pub fn find_flights_from_to(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<FlightRow>, WarehouseError> {
        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(
            "SELECT origin, destination, price, currency, \
                    CAST(departure_date AS VARCHAR), CAST(return_date AS VARCHAR), \
                    departure_time, arrival_time, carrier, flight_number \
             FROM flights \
             WHERE origin = ? AND destination = ? \
             ORDER BY price ASC, departure_date ASC",
        )?;

        let params: [&dyn ToSql; 2] = [&origin, &destination];
        let rows = statement.query_map(params.as_slice(), |row| {
            Ok(FlightRow {
                origin: row.get(0)?,
                destination: row.get(1)?,
                price: row.get(2)?,
                currency: row.get(3)?,
                departure_date: row.get(4)?,
                return_date: row.get(5)?,
                departure_time: row.get(6)?,
                arrival_time: row.get(7)?,
                carrier: row.get(8)?,
                flight_number: row.get(9)?,
            })
        })?;

        let mut flights = Vec::new();
        for row in rows {
            flights.push(row?);
        }
        Ok(flights)
    }

    /// Per-route rollups across the whole warehouse, busiest routes first.
    pub fn route_summaries(&self) -> Result<Vec<RouteSummary>, WarehouseError> {
        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(
            "SELECT origin, destination, quote_count, lowest_price, average_price \
             FROM vw_route_price_stats \
             ORDER BY quote_count DESC, origin ASC, destination ASC",
        )?;

        let rows = statement.query_map([], |row| {
            Ok(RouteSummary {
                origin: row.get(0)?,
                destination: row.get(1)?,
                quote_count: row.get(2)?,
                lowest_price: row.get(3)?,
                average_price: row.get(4)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

/// Resolve the faretrack home directory from environment or default.
fn resolve_faretrack_home() -> PathBuf {
    if let Some(path) = env::var_os("FARETRACK_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".faretrack");
    }

    PathBuf::from(".faretrack")
}
