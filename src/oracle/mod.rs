//! The hosted vision model that performs the actual classification, reached
//! through a serverless proxy. Only its request/response contract lives here.

mod http;
mod parse;
mod scripted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{catalog::Label, imaging::ImagePayload};

pub use http::HttpOracle;
pub use parse::parse_model_output;
pub use scripted::ScriptedOracle;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OracleError {
    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("AI credits exhausted. Please add funds to continue.")]
    QuotaExhausted,

    #[error("The analysis service did not respond in time")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("AI analysis failed ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("No analysis result received")]
    EmptyResponse,
}

impl OracleError {
    /// Short text for a transient toast. Every oracle failure is retryable.
    pub fn user_message(&self) -> String {
        match self {
            OracleError::RateLimited => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            OracleError::QuotaExhausted => {
                "AI credits exhausted. Please add funds to continue.".to_string()
            }
            OracleError::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// One `{label, confidence}` pair as reported by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelConfidence {
    pub label: String,
    pub confidence: f64,
}

/// Parsed oracle response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleResult {
    pub label: Label,
    pub confidence: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub all_predictions: Option<Vec<LabelConfidence>>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl OracleResult {
    pub fn new(label: impl Into<Label>, confidence: f64, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confidence,
            description: description.into(),
            all_predictions: None,
            version: None,
            model: None,
            timestamp: None,
        }
    }

    pub fn with_distribution(mut self, entries: Vec<LabelConfidence>) -> Self {
        self.all_predictions = Some(entries);
        self
    }
}

#[async_trait]
pub trait ClassificationOracle: Send + Sync {
    async fn classify(&self, image: &ImagePayload) -> Result<OracleResult, OracleError>;
}
