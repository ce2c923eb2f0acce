pub mod distribution;
pub mod store;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{catalog::Label, feedback::Correction, oracle::OracleResult};

pub use distribution::{Distribution, DistributionSource, StyleConfidence};
pub use store::PredictionStore;

pub const DEFAULT_MODEL_VERSION: &str = "IKARA Vision v1.0";
pub const CORRECTED_VERSION: &str = "User Corrected";
pub const CORRECTED_MODEL: &str = "IKARA + Human Feedback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    ModelDerived,
    UserCorrected,
}

/// The classification shown for the active image.
///
/// A user-corrected prediction always has confidence 1.0 and a one-hot
/// distribution at its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub id: String,
    pub label: Label,
    pub confidence: f64,
    pub description: String,
    pub distribution: Distribution,
    pub provenance: Provenance,
    pub version: Option<String>,
    pub model: Option<String>,
    pub image_digest: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Prediction {
    pub fn from_oracle<R: Rng + ?Sized>(
        result: OracleResult,
        image_digest: Option<String>,
        rng: &mut R,
    ) -> Self {
        let confidence = result.confidence.clamp(0.0, 1.0);
        let distribution = match result.all_predictions.as_deref() {
            Some(reported) if !reported.is_empty() => Distribution::from_reported(reported),
            _ => Distribution::synthesize(result.label, confidence, rng),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            label: result.label,
            confidence,
            description: result.description,
            distribution,
            provenance: Provenance::ModelDerived,
            version: result
                .version
                .or_else(|| Some(DEFAULT_MODEL_VERSION.to_string())),
            model: result.model,
            image_digest,
            created_at: Utc::now(),
        }
    }

    /// Replacement for `self` after an accepted correction.
    pub fn corrected(&self, correction: &Correction) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: Label::Style(correction.style),
            confidence: 1.0,
            description: correction.style.record().description.to_string(),
            distribution: Distribution::one_hot(correction.style),
            provenance: Provenance::UserCorrected,
            version: Some(CORRECTED_VERSION.to_string()),
            model: Some(CORRECTED_MODEL.to_string()),
            image_digest: self.image_digest.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn confidence_percent(&self) -> u32 {
        percent(self.confidence)
    }

    pub fn share_text(&self) -> String {
        format!(
            "I just discovered that this artwork is \"{}\" style with {}% confidence using IKARA - Indian Art Classifier!",
            self.label,
            self.confidence_percent()
        )
    }
}

pub(crate) fn percent(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}
