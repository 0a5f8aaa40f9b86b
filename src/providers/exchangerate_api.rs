use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::core::error::ConverterError;
use crate::core::provider::RateProvider;
use crate::core::snapshot::RateSnapshot;

// ExchangeRateApiProvider implementation for RateProvider
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn latest_url(&self, base: &str) -> String {
        format!("{}/v6/{}/latest/{}", self.base_url, self.api_key, base)
    }

    // Keeps the API key out of the logs
    fn redacted_url(&self, base: &str) -> String {
        format!("{}/v6/***/latest/{}", self.base_url, base)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn latest(&self, base: &str) -> Result<RateSnapshot, ConverterError> {
        let url = self.latest_url(base);
        debug!("Requesting rates from {}", self.redacted_url(base));

        let client = reqwest::Client::builder()
            .user_agent("cambio/0.1")
            .build()
            .map_err(|e| {
                debug!(error = %e, "Failed to build HTTP client");
                ConverterError::Connection
            })?;

        let response = client.get(&url).send().await.map_err(|e| {
            debug!(error = %e, "Request error for base currency {}", base);
            ConverterError::Connection
        })?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "HTTP error for base currency {}", base);
            return Err(ConverterError::Connection);
        }

        let text = response.text().await.map_err(|e| {
            debug!(error = %e, "Failed to read response body for {}", base);
            ConverterError::Connection
        })?;

        let snapshot: RateSnapshot = serde_json::from_str(&text).map_err(|e| {
            debug!(error = %e, "Failed to parse JSON response for {}", base);
            ConverterError::Connection
        })?;

        if snapshot.is_error() {
            debug!(error_type = ?snapshot.error_type, "Provider returned an error payload");
            return Err(ConverterError::from_error_type(
                snapshot.error_type.as_deref(),
            ));
        }

        debug!(
            rates = snapshot.rates().map_or(0, |r| r.len()),
            "Received rates for {}", base
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Converter;
    use crate::core::surface::{MemorySurface, Surface};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "test-key";

    pub async fn create_mock_server(base: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v6/{API_KEY}/latest/{base}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "time_last_update_unix": 1585267200,
            "conversion_rates": {
                "USD": 1,
                "BRL": "5.00",
                "EUR": 0.9013
            }
        }"#;
        let mock_server = create_mock_server("USD", 200, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), API_KEY);
        let snapshot = provider.latest("USD").await.unwrap();

        assert_eq!(snapshot.result, "success");
        assert_eq!(snapshot.base_code, "USD");
        let rates = snapshot.rates().unwrap();
        assert_eq!(rates.codes().collect::<Vec<_>>(), vec!["USD", "BRL", "EUR"]);
        assert_eq!(rates.get("BRL"), Some("5.00"));
        assert_eq!(rates.get("EUR"), Some("0.9013"));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_response = r#"{"result": "success", "conversion_rates": {"EUR": 1}}"#;
        let mock_server = create_mock_server("EUR", 200, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&format!("{}/", mock_server.uri()), API_KEY);
        assert!(provider.latest("EUR").await.is_ok());
    }

    #[tokio::test]
    async fn test_api_error_payload() {
        let mock_response = r#"{"result": "error", "error-type": "invalid-key"}"#;
        let mock_server = create_mock_server("USD", 200, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), API_KEY);
        let err = provider.latest("USD").await.unwrap_err();

        assert_eq!(err.to_string(), "Chave de API invalida.");
        assert_eq!(
            err,
            ConverterError::Api {
                error_type: Some("invalid-key".to_string()),
                message: "Chave de API invalida.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_api_error_type() {
        let mock_response = r#"{"result": "error", "error-type": "something-new"}"#;
        let mock_server = create_mock_server("USD", 200, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), API_KEY);
        let err = provider.latest("USD").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            crate::core::error::UNKNOWN_API_ERROR
        );
    }

    #[tokio::test]
    async fn test_http_error_is_connection_error() {
        let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let mock_server = create_mock_server("XXX", 404, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), API_KEY);
        let err = provider.latest("XXX").await.unwrap_err();
        assert_eq!(err, ConverterError::Connection);
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server("USD", 200, "<html>oops</html>").await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), API_KEY);
        let err = provider.latest("USD").await.unwrap_err();
        assert_eq!(err, ConverterError::Connection);
    }

    #[tokio::test]
    async fn test_missing_rates_passes_through() {
        let mock_response = r#"{"result": "success", "base_code": "USD"}"#;
        let mock_server = create_mock_server("USD", 200, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), API_KEY);
        let snapshot = provider.latest("USD").await.unwrap();
        assert!(snapshot.conversion_rates.is_none());
    }

    #[tokio::test]
    async fn test_falsy_rates_reach_validation() {
        let mock_response = r#"{"result": "success", "base_code": "USD", "conversion_rates": false}"#;
        let mock_server = create_mock_server("USD", 200, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), API_KEY);
        let snapshot = provider.latest("USD").await.unwrap();
        assert!(snapshot.conversion_rates.is_none());

        let mut converter = Converter::new(provider, MemorySurface::new()).unwrap();
        converter.init("USD", "BRL").await;

        let alerts = converter.surface().alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, ConverterError::Validation.to_string());
        assert!(converter.state().get().rates().is_none());
    }
}
