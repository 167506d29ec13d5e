//! Provider gateway implementations.

mod amadeus;

pub use amadeus::{AmadeusConfig, AmadeusGateway, AmadeusTokenManager};
