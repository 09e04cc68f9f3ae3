//! Read-through forecast cache.
//!
//! Decides whether a stored forecast is still usable and, when it is not,
//! fetches fresh data and writes it back for future requests.

pub mod engine;
pub mod freshness;

pub use engine::{ForecastService, ForecastSource};
pub use freshness::{is_fresh, CacheLookup};
