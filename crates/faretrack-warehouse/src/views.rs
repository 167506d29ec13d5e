//! Database views for analytical queries.

use ::duckdb::Connection;

/// Create database views for common analytical queries.
///
/// Creates the following views:
/// - `vw_route_price_stats`: Fare count, lowest and average price per route
/// - `vw_ingest_activity`: Batch counts and record totals by source and day
///
/// # Errors
/// Returns an error if the view creation SQL fails to execute.
pub fn create_views(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r"
CREATE OR REPLACE VIEW vw_route_price_stats AS
SELECT
    origin,
    destination,
    COUNT(*) AS quote_count,
    MIN(price)::DOUBLE AS lowest_price,
    AVG(price)::DOUBLE AS average_price,
    MIN(departure_date) AS earliest_departure,
    MAX(departure_date) AS latest_departure
FROM flights
GROUP BY origin, destination;

CREATE OR REPLACE VIEW vw_ingest_activity AS
SELECT
    source,
    CAST(timestamp AS DATE) AS day,
    COUNT(*) AS batch_count,
    SUM(record_count)::BIGINT AS records_ingested
FROM ingest_log
WHERE status = 'ok'
GROUP BY source, CAST(timestamp AS DATE);
",
    )?;

    Ok(())
}
