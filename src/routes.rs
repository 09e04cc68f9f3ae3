//! HTTP surface: request adapter and router.
//!
//! Maps the transport request onto the orchestrator — defaulted location in,
//! payload or `{"error": ...}` JSON out. The configuration check runs here,
//! before the core is invoked.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use forecast_cache::{ForecastService, ForecastSource};
use object_store::ObjectStore;

/// Shared request-handling state.
pub struct AppState<S, U> {
    pub service: ForecastService<S, U>,
    pub api_key_present: bool,
    pub default_location: String,
}

/// Inbound request body; every field optional.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub location: Option<String>,
}

/// Error surfaced at the transport boundary as `{"error": ...}` JSON.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn config(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// `POST /forecast` — serve the forecast for the requested location.
pub async fn forecast<S, U>(
    State(state): State<Arc<AppState<S, U>>>,
    body: Option<Json<ForecastRequest>>,
) -> Result<Json<Value>, ApiError>
where
    S: ObjectStore + 'static,
    U: ForecastSource + 'static,
{
    if !state.api_key_present {
        error!("API_KEY environment variable is not set");
        return Err(ApiError::config("API_KEY configuration is missing"));
    }

    let requested = body.and_then(|Json(req)| req.location).unwrap_or_default();
    let location = if requested.trim().is_empty() {
        state.default_location.clone()
    } else {
        requested
    };

    info!("Forecast request for location: {}", location);

    match state.service.get_forecast(&location).await {
        Ok(payload) => Ok(Json(payload)),
        Err(e) => {
            error!("Forecast request for {} failed: {}", location, e);
            Err(ApiError::internal("failed to fetch forecast data"))
        }
    }
}

/// `GET /healthz` — liveness probe.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the router with CORS allowing cross-origin `POST`/`OPTIONS`.
pub fn build_router<S, U>(state: Arc<AppState<S, U>>) -> Router
where
    S: ObjectStore + 'static,
    U: ForecastSource + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/forecast", post(forecast::<S, U>))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Duration;
    use object_store::MemoryStore;

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ForecastSource for CountingSource {
        async fn fetch_forecast(&self, _location: &str) -> common::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"temp": 72}))
        }
    }

    type TestState = Arc<AppState<MemoryStore, CountingSource>>;

    fn make_state(api_key_present: bool) -> (TestState, Arc<MemoryStore>, Arc<CountingSource>) {
        let store = Arc::new(MemoryStore::new());
        let source = Arc::new(CountingSource::new());
        let service = ForecastService::new(store.clone(), source.clone(), Duration::hours(12));
        let state = Arc::new(AppState {
            service,
            api_key_present,
            default_location: "Charlotte".into(),
        });
        (state, store, source)
    }

    #[tokio::test]
    async fn test_missing_api_key_short_circuits() {
        // End-to-end scenario C: no store or upstream interaction at all.
        let (state, store, source) = make_state(false);

        let err = forecast(State(state), None).await.expect_err("config error");

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("API_KEY"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_absent_body_uses_default_location() {
        let (state, store, source) = make_state(true);

        let Json(payload) = forecast(State(state), None).await.expect("default serve");

        assert_eq!(payload, json!({"temp": 72}));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(
            store.get("weather-charlotte.json").await.is_ok(),
            "write should land under the default location's key"
        );
    }

    #[tokio::test]
    async fn test_blank_location_uses_default() {
        let (state, store, _source) = make_state(true);
        let body = Json(ForecastRequest {
            location: Some("   ".into()),
        });

        forecast(State(state), Some(body)).await.expect("default serve");

        assert!(store.get("weather-charlotte.json").await.is_ok());
    }

    #[tokio::test]
    async fn test_named_location_is_used() {
        let (state, store, _source) = make_state(true);
        let body = Json(ForecastRequest {
            location: Some("Seattle".into()),
        });

        forecast(State(state), Some(body)).await.expect("serve");

        assert!(store.get("weather-seattle.json").await.is_ok());
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_generic_error() {
        struct FailingSource;

        #[async_trait]
        impl ForecastSource for FailingSource {
            async fn fetch_forecast(&self, _location: &str) -> common::Result<Value> {
                Err(common::Error::Upstream("boom".into()))
            }
        }

        let store = Arc::new(MemoryStore::new());
        let service = ForecastService::new(store, Arc::new(FailingSource), Duration::hours(12));
        let state = Arc::new(AppState {
            service,
            api_key_present: true,
            default_location: "Charlotte".into(),
        });

        let err = forecast(State(state), None).await.expect_err("upstream error");

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "failed to fetch forecast data");
    }
}
