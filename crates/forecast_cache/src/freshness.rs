//! Cache freshness evaluation.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Outcome of a cache lookup.
///
/// Misses, expired entries, and infrastructure/decode failures all route to
/// the fallback fetch, but stay distinct so the branches remain testable.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// Usable cached payload.
    Hit(Value),
    /// No object exists at the key.
    Miss,
    /// An object exists but is older than the TTL.
    Stale,
    /// The store was unreachable or the entry was undecodable.
    ReadError,
}

/// Returns true iff `now - last_modified < ttl`.
///
/// An entry exactly `ttl` old is stale. Callers with no last-modified
/// metadata substitute the Unix epoch, which evaluates stale against any
/// realistic clock.
pub fn is_fresh(last_modified: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(last_modified) < ttl
}
