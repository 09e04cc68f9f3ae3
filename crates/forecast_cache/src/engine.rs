//! Cache-backed forecast fetch orchestration.
//!
//! Single pass per call: check the store, serve a fresh hit, otherwise fetch
//! from the upstream source and write the result back best-effort. At most
//! one store read, one upstream call, and one store write per invocation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use common::Result;
use object_store::{ObjectStore, StoreError};
use tomorrow_client::TomorrowClient;

use crate::freshness::{is_fresh, CacheLookup};

/// Upstream source of forecast payloads.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_forecast(&self, location: &str) -> Result<Value>;
}

#[async_trait]
impl ForecastSource for TomorrowClient {
    async fn fetch_forecast(&self, location: &str) -> Result<Value> {
        TomorrowClient::fetch_forecast(self, location).await
    }
}

/// Cache-backed forecast orchestrator.
///
/// Holds the store and source handles plus the TTL; immutable after
/// construction so one instance serves every request.
pub struct ForecastService<S, U> {
    store: Arc<S>,
    source: Arc<U>,
    ttl: Duration,
}

impl<S, U> ForecastService<S, U>
where
    S: ObjectStore,
    U: ForecastSource,
{
    pub fn new(store: Arc<S>, source: Arc<U>, ttl: Duration) -> Self {
        Self { store, source, ttl }
    }

    /// Store key for a location.
    ///
    /// The location is trimmed and lowercased so one location string always
    /// addresses one entry, on both the read and the write path.
    pub fn cache_key(location: &str) -> String {
        format!("weather-{}.json", location.trim().to_ascii_lowercase())
    }

    /// Serve the forecast for `location`, preferring the cached copy.
    ///
    /// Store failures and corrupt entries degrade to a refetch; only an
    /// upstream failure is surfaced to the caller.
    pub async fn get_forecast(&self, location: &str) -> Result<Value> {
        let key = Self::cache_key(location);

        match self.lookup(&key).await {
            CacheLookup::Hit(payload) => {
                debug!("Returning cached forecast for {}", location);
                return Ok(payload);
            }
            CacheLookup::Miss => debug!("No cached forecast for {}", location),
            CacheLookup::Stale => debug!("Cached forecast for {} is too old", location),
            CacheLookup::ReadError => debug!("Cached forecast for {} unusable", location),
        }

        let payload = self.source.fetch_forecast(location).await?;
        self.write_back(&key, &payload).await;
        Ok(payload)
    }

    /// Classify the cache entry at `key`.
    async fn lookup(&self, key: &str) -> CacheLookup {
        let object = match self.store.get(key).await {
            Ok(object) => object,
            Err(StoreError::NotFound(_)) => return CacheLookup::Miss,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return CacheLookup::ReadError;
            }
        };

        // Missing metadata must never produce a false "fresh".
        let last_modified = object.last_modified.unwrap_or(DateTime::UNIX_EPOCH);
        let now = Utc::now();
        debug!(
            "Cache entry {} age: {}s",
            key,
            now.signed_duration_since(last_modified).num_seconds()
        );

        if !is_fresh(last_modified, now, self.ttl) {
            return CacheLookup::Stale;
        }

        match serde_json::from_slice(&object.bytes) {
            Ok(payload) => CacheLookup::Hit(payload),
            Err(e) => {
                warn!("Corrupt cache entry at {}, refetching: {}", key, e);
                CacheLookup::ReadError
            }
        }
    }

    /// Best-effort write-back; a failure only costs the next request a refetch.
    async fn write_back(&self, key: &str, payload: &Value) {
        let bytes = match serde_json::to_vec(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize forecast for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.put(key, bytes).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }
}
