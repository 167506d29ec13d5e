//! Canonical domain types for faretrack fare data.
//!
//! All types validate their invariants at construction time: a
//! [`FlightRecord`] that exists is safe to persist, and a [`FareQuery`]
//! that exists describes a searchable route.

mod flight;
mod location;

pub use flight::{
    format_travel_date, parse_travel_date, validate_currency_code, FareQuery, FlightRecord,
};
pub use location::LocationCode;
