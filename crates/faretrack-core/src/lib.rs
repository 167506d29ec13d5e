//! # Faretrack Core
//!
//! Domain contracts and the fare ingestion pipeline for faretrack.
//!
//! ## Overview
//!
//! This crate provides the foundational components:
//!
//! - **Canonical domain models** for flight records and fare search criteria
//! - **Fare gateway contract** for external travel-data providers
//! - **Amadeus adapter** with OAuth2 token caching and request throttling
//! - **Flight mapper** that normalizes raw offers into validated records
//! - **Ingestion pipeline** with short-circuiting, typed failure reasons
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider gateways (Amadeus) |
//! | [`domain`] | Domain models (FlightRecord, FareQuery, LocationCode) |
//! | [`error`] | Core error types |
//! | [`gateway`] | Fare gateway trait and raw offer types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`mapper`] | Offer-to-record normalization |
//! | [`pipeline`] | Find-then-store ingestion pipeline |
//! | [`throttling`] | Provider rate limiting |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use faretrack_core::{
//!     AddFlights, AmadeusConfig, AmadeusGateway, FareQuery, FlightMapper,
//!     LocationCode, ReqwestHttpClient, parse_travel_date,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = AmadeusGateway::new(
//!         Arc::new(ReqwestHttpClient::new()),
//!         AmadeusConfig::from_env(),
//!     );
//!     let query = FareQuery::new(
//!         LocationCode::parse("TPE")?,
//!         LocationCode::parse("LAX")?,
//!         parse_travel_date("2026-09-20")?,
//!         None,
//!         1,
//!     )?;
//!
//!     let mapper = FlightMapper::new(Arc::new(gateway));
//!     let records = mapper.find_flight(&query).await?;
//!     println!("found {} offers", records.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The pipeline's outward contract is always "success with records" or one
//! of three failure reasons:
//!
//! ```rust
//! use faretrack_core::IngestError;
//!
//! fn describe(error: &IngestError) -> &'static str {
//!     match error {
//!         IngestError::NoFlightsFound => "expected: nothing matched",
//!         IngestError::ProviderFailure(_) => "provider or mapping failed",
//!         IngestError::StorageFailure(_) => "batch insert failed",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - Provider credentials are read from environment variables only
//! - Tokens are cached in memory and never logged

pub mod adapters;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod mapper;
pub mod pipeline;
pub mod throttling;

// Adapter implementations
pub use adapters::{AmadeusConfig, AmadeusGateway, AmadeusTokenManager};

// Domain models
pub use domain::{
    format_travel_date, parse_travel_date, validate_currency_code, FareQuery, FlightRecord,
    LocationCode,
};

// Error types
pub use error::{CoreError, ValidationError};

// Gateway contract
pub use gateway::{FareGateway, FareOffer, GatewayError, GatewayErrorKind, ProviderId};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Mapper
pub use mapper::FlightMapper;

// Pipeline
pub use pipeline::{AddFlights, FlightStore, IngestError, StoreError};

// Throttling
pub use throttling::ProviderThrottle;
