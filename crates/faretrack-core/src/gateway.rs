//! Fare provider gateway contract.
//!
//! The gateway is the only component that talks to an external travel-data
//! provider. It accepts a [`FareQuery`](crate::FareQuery) and returns raw
//! [`FareOffer`] values; the [`FlightMapper`](crate::FlightMapper) turns
//! those into validated domain records. The core depends only on three
//! facts about a provider: it can fail, it can return zero-or-more offers,
//! and each offer carries enough fields to populate a `FlightRecord`.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::FareQuery;

/// Identifier of a fare data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Amadeus,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amadeus => "amadeus",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    Unavailable,
    RateLimited,
    AuthFailed,
    InvalidResponse,
    InvalidRequest,
    Internal,
}

/// Structured gateway error carried through the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    message: String,
    retryable: bool,
}

impl GatewayError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::AuthFailed,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            GatewayErrorKind::Unavailable => "gateway.unavailable",
            GatewayErrorKind::RateLimited => "gateway.rate_limited",
            GatewayErrorKind::AuthFailed => "gateway.auth_failed",
            GatewayErrorKind::InvalidResponse => "gateway.invalid_response",
            GatewayErrorKind::InvalidRequest => "gateway.invalid_request",
            GatewayErrorKind::Internal => "gateway.internal",
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for GatewayError {}

/// One priced flight option as the provider reported it.
///
/// Fields are raw strings straight off the wire; domain validation happens
/// when the mapper builds a `FlightRecord` out of this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareOffer {
    pub origin: String,
    pub destination: String,
    pub price: String,
    pub currency: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub carrier: String,
    pub flight_number: String,
}

/// Fare provider contract.
///
/// Implementations must be `Send + Sync`; the trait uses boxed futures so
/// gateways can be stored behind `Arc<dyn FareGateway>`.
pub trait FareGateway: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches raw fare offers for the given search criteria.
    ///
    /// An empty vector is a valid "no matching offers" outcome and is not
    /// an error; transport, auth, and decode failures surface as
    /// [`GatewayError`].
    fn search_offers<'a>(
        &'a self,
        query: &'a FareQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FareOffer>, GatewayError>> + Send + 'a>>;
}
