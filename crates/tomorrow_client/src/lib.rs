//! tomorrow.io forecast API client.
//!
//! Fetches the daily-timestep forecast for a location and returns the JSON
//! payload verbatim — the caching layer treats it as an opaque blob.

use common::Error;
use serde_json::Value;
use tracing::debug;

const FORECAST_URL: &str = "https://api.tomorrow.io/v4/weather/forecast";
const TIMESTEPS: &str = "1d";

/// tomorrow.io API client.
#[derive(Debug, Clone)]
pub struct TomorrowClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TomorrowClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("weather-api/0.1")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build tomorrow.io HTTP client");

        Self {
            client,
            base_url: FORECAST_URL.to_string(),
            api_key,
        }
    }

    /// Point the client at a different endpoint, for tests.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fetch the forecast for `location`, returning the body verbatim.
    pub async fn fetch_forecast(&self, location: &str) -> Result<Value, Error> {
        debug!("Fetching forecast for location: {}", location);

        let resp = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(&[
                ("location", location),
                ("timesteps", TIMESTEPS),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(format!("forecast request for {location}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "tomorrow.io returned {} for {location}: {}",
                status.as_u16(),
                &body[..body.len().min(500)]
            )));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| Error::Upstream(format!("JSON parse error for {location}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_forecast_returns_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("location", "Charlotte"))
            .and(query_param("timesteps", "1d"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"temp": 72})))
            .mount(&server)
            .await;

        let client = TomorrowClient::new("test-key".into(), 5).with_base_url(server.uri());
        let payload = client
            .fetch_forecast("Charlotte")
            .await
            .expect("fetch should succeed");

        assert_eq!(payload, json!({"temp": 72}));
    }

    #[tokio::test]
    async fn test_fetch_forecast_maps_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let client = TomorrowClient::new("test-key".into(), 5).with_base_url(server.uri());
        let err = client
            .fetch_forecast("Charlotte")
            .await
            .expect_err("non-200 should error");

        assert!(matches!(err, Error::Upstream(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_forecast_rejects_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = TomorrowClient::new("test-key".into(), 5).with_base_url(server.uri());
        let err = client
            .fetch_forecast("Charlotte")
            .await
            .expect_err("non-JSON body should error");

        assert!(matches!(err, Error::Upstream(_)));
    }
}
