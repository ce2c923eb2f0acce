use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::{imaging::ImagePayload, log_info, settings::OracleSettings};

use super::{parse_model_output, ClassificationOracle, OracleError, OracleResult};

const ENABLE_LOGS: bool = true;
const USER_AGENT: &str = concat!("IKARA/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the `analyze-art` proxy function.
pub struct HttpOracle {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpOracle {
    pub fn new(settings: &OracleSettings) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| OracleError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| fallback.to_string())
}

fn map_status(status: StatusCode, body: &str) -> OracleError {
    match status.as_u16() {
        429 => OracleError::RateLimited,
        402 => OracleError::QuotaExhausted,
        code => OracleError::Service {
            status: code,
            message: error_message(body, "AI analysis failed"),
        },
    }
}

/// Turns a successful proxy body into a result. The proxy may still report an
/// `{ "error": ... }` payload with a 2xx status.
fn interpret_body(status: StatusCode, body: &str) -> Result<OracleResult, OracleError> {
    if body.trim().is_empty() {
        return Err(OracleError::EmptyResponse);
    }
    if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(body) {
        return Err(OracleError::Service {
            status: status.as_u16(),
            message: error,
        });
    }
    Ok(parse_model_output(body))
}

#[async_trait]
impl ClassificationOracle for HttpOracle {
    async fn classify(&self, image: &ImagePayload) -> Result<OracleResult, OracleError> {
        log_info!(
            "Analyzing artwork via {} ({} bytes, {})",
            self.endpoint,
            image.bytes().len(),
            image.mime()
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "imageBase64": image.to_data_uri() }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout
            } else {
                OracleError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(map_status(status, &body));
        }

        let result = interpret_body(status, &body)?;
        log_info!(
            "Analysis complete: {} ({:.2})",
            result.label,
            result.confidence
        );
        Ok(result)
    }
}
