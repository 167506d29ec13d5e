use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Deserialize;

use crate::gateway::{FareGateway, FareOffer, GatewayError, ProviderId};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::throttling::ProviderThrottle;
use crate::{format_travel_date, FareQuery};

const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";
const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const OFFERS_PATH: &str = "/v2/shopping/flight-offers";

/// Seconds subtracted from the provider-reported token TTL so a token is
/// never presented right at its expiry boundary.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Connection settings for the Amadeus self-service API.
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout_ms: u64,
    /// Currency requested from the provider for all offers.
    pub currency: String,
    /// Maximum number of offers requested per search.
    pub max_results: u32,
}

impl AmadeusConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout_ms: 10_000,
            currency: String::from("USD"),
            max_results: 20,
        }
    }

    /// Read credentials from `FARETRACK_AMADEUS_CLIENT_ID` /
    /// `FARETRACK_AMADEUS_CLIENT_SECRET`.
    pub fn from_env() -> Self {
        let client_id =
            std::env::var("FARETRACK_AMADEUS_CLIENT_ID").unwrap_or_else(|_| String::from("demo"));
        let client_secret = std::env::var("FARETRACK_AMADEUS_CLIENT_SECRET")
            .unwrap_or_else(|_| String::from("demo"));
        Self::new(client_id, client_secret)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    fetched_at: Instant,
    ttl_secs: u64,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        let usable = self.ttl_secs.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        self.fetched_at.elapsed().as_secs() < usable
    }
}

/// Manages the OAuth2 client-credentials token Amadeus requires.
///
/// Tokens are cached in memory and refreshed once the provider-reported
/// TTL (minus a safety margin) has elapsed.
#[derive(Clone, Default)]
pub struct AmadeusTokenManager {
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl AmadeusTokenManager {
    fn cached(&self) -> Option<String> {
        let guard = self
            .token
            .lock()
            .expect("amadeus token cache should not be poisoned");
        guard
            .as_ref()
            .filter(|token| token.is_valid())
            .map(|token| token.access_token.clone())
    }

    async fn get_token(
        &self,
        http_client: &Arc<dyn HttpClient>,
        config: &AmadeusConfig,
    ) -> Result<String, GatewayError> {
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        let body = format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            urlencoding::encode(&config.client_id),
            urlencoding::encode(&config.client_secret),
        );
        let request = HttpRequest::post(format!("{}{}", config.base_url, TOKEN_PATH))
            .with_header("content-type", "application/x-www-form-urlencoded")
            .with_body(body)
            .with_timeout_ms(config.timeout_ms);

        let response = http_client.execute(request).await.map_err(|error| {
            GatewayError::unavailable(format!("amadeus token request failed: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(GatewayError::auth_failed(format!(
                "amadeus token endpoint returned status {}",
                response.status
            )));
        }

        let payload: TokenPayload = serde_json::from_str(&response.body).map_err(|error| {
            GatewayError::invalid_response(format!("amadeus token payload: {error}"))
        })?;

        let mut guard = self
            .token
            .lock()
            .expect("amadeus token cache should not be poisoned");
        *guard = Some(CachedToken {
            access_token: payload.access_token.clone(),
            fetched_at: Instant::now(),
            ttl_secs: payload.expires_in,
        });

        Ok(payload.access_token)
    }
}

/// Fare gateway for the Amadeus flight-offers search API.
#[derive(Clone)]
pub struct AmadeusGateway {
    http_client: Arc<dyn HttpClient>,
    config: AmadeusConfig,
    tokens: AmadeusTokenManager,
    throttle: ProviderThrottle,
}

impl AmadeusGateway {
    pub fn new(http_client: Arc<dyn HttpClient>, config: AmadeusConfig) -> Self {
        Self {
            http_client,
            config,
            tokens: AmadeusTokenManager::default(),
            throttle: ProviderThrottle::default(),
        }
    }

    pub fn with_throttle(mut self, throttle: ProviderThrottle) -> Self {
        self.throttle = throttle;
        self
    }

    fn offers_url(&self, query: &FareQuery) -> String {
        let mut url = format!(
            "{}{}?originLocationCode={}&destinationLocationCode={}&departureDate={}&adults={}",
            self.config.base_url,
            OFFERS_PATH,
            urlencoding::encode(query.origin.as_str()),
            urlencoding::encode(query.destination.as_str()),
            urlencoding::encode(&format_travel_date(query.departure_date)),
            query.adults,
        );
        if let Some(return_date) = query.return_date {
            url.push_str("&returnDate=");
            url.push_str(&urlencoding::encode(&format_travel_date(return_date)));
        }
        url.push_str("&currencyCode=");
        url.push_str(&urlencoding::encode(&self.config.currency));
        url.push_str("&max=");
        url.push_str(&self.config.max_results.to_string());
        url
    }

    async fn fetch_offers(&self, query: &FareQuery) -> Result<Vec<FareOffer>, GatewayError> {
        if let Err(delay) = self.throttle.acquire() {
            return Err(GatewayError::rate_limited(format!(
                "amadeus request quota exhausted; retry in {}ms",
                delay.as_millis()
            )));
        }

        let token = self.tokens.get_token(&self.http_client, &self.config).await?;
        let request = HttpRequest::get(self.offers_url(query))
            .with_auth(&HttpAuth::BearerToken(token))
            .with_timeout_ms(self.config.timeout_ms);

        tracing::debug!(
            origin = %query.origin,
            destination = %query.destination,
            "requesting amadeus flight offers"
        );

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                GatewayError::unavailable(format!("amadeus transport error: {}", error.message()))
            } else {
                GatewayError::internal(format!("amadeus transport error: {}", error.message()))
            }
        })?;

        if response.status == 429 {
            return Err(GatewayError::rate_limited(
                "amadeus upstream returned status 429",
            ));
        }
        if !response.is_success() {
            return Err(GatewayError::unavailable(format!(
                "amadeus upstream returned status {}",
                response.status
            )));
        }

        let payload: OffersPayload = serde_json::from_str(&response.body).map_err(|error| {
            GatewayError::invalid_response(format!("amadeus offers payload: {error}"))
        })?;

        payload
            .data
            .into_iter()
            .map(flatten_offer)
            .collect::<Result<Vec<_>, _>>()
    }
}

impl FareGateway for AmadeusGateway {
    fn id(&self) -> ProviderId {
        ProviderId::Amadeus
    }

    fn search_offers<'a>(
        &'a self,
        query: &'a FareQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FareOffer>, GatewayError>> + Send + 'a>> {
        Box::pin(self.fetch_offers(query))
    }
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: String,
    #[serde(default = "default_token_ttl")]
    expires_in: u64,
}

fn default_token_ttl() -> u64 {
    1_799
}

#[derive(Debug, Deserialize)]
struct OffersPayload {
    #[serde(default)]
    data: Vec<OfferPayload>,
}

#[derive(Debug, Deserialize)]
struct OfferPayload {
    itineraries: Vec<ItineraryPayload>,
    price: PricePayload,
}

#[derive(Debug, Deserialize)]
struct ItineraryPayload {
    segments: Vec<SegmentPayload>,
}

#[derive(Debug, Deserialize)]
struct SegmentPayload {
    departure: EndpointPayload,
    arrival: EndpointPayload,
    #[serde(rename = "carrierCode")]
    carrier_code: String,
    number: String,
}

#[derive(Debug, Deserialize)]
struct EndpointPayload {
    #[serde(rename = "iataCode")]
    iata_code: String,
    at: String,
}

#[derive(Debug, Deserialize)]
struct PricePayload {
    currency: String,
    #[serde(rename = "grandTotal")]
    grand_total: Option<String>,
    total: Option<String>,
}

/// Collapse one provider offer into the flat shape the mapper consumes.
///
/// The outbound itinerary supplies route, schedule, and carrier; the second
/// itinerary (when present) supplies the return date.
fn flatten_offer(offer: OfferPayload) -> Result<FareOffer, GatewayError> {
    let outbound = offer
        .itineraries
        .first()
        .ok_or_else(|| GatewayError::invalid_response("offer has no itineraries"))?;
    let first_segment = outbound
        .segments
        .first()
        .ok_or_else(|| GatewayError::invalid_response("itinerary has no segments"))?;
    let last_segment = outbound
        .segments
        .last()
        .ok_or_else(|| GatewayError::invalid_response("itinerary has no segments"))?;

    let (departure_date, departure_time) = split_local_datetime(&first_segment.departure.at);
    let (_, arrival_time) = split_local_datetime(&last_segment.arrival.at);

    let return_date = offer
        .itineraries
        .get(1)
        .and_then(|itinerary| itinerary.segments.first())
        .map(|segment| split_local_datetime(&segment.departure.at).0);

    let price = offer
        .price
        .grand_total
        .or(offer.price.total)
        .ok_or_else(|| GatewayError::invalid_response("offer price has no total"))?;

    Ok(FareOffer {
        origin: first_segment.departure.iata_code.clone(),
        destination: last_segment.arrival.iata_code.clone(),
        price,
        currency: offer.price.currency,
        departure_date,
        return_date,
        departure_time,
        arrival_time,
        carrier: first_segment.carrier_code.clone(),
        flight_number: format!("{}{}", first_segment.carrier_code, first_segment.number),
    })
}

/// Split an Amadeus local datetime (`2026-09-20T07:30:00`) into its date and
/// optional time parts.
fn split_local_datetime(value: &str) -> (String, Option<String>) {
    match value.split_once('T') {
        Some((date, time)) => (date.to_owned(), Some(time.to_owned())),
        None => (value.to_owned(), None),
    }
}
