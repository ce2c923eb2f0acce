//! User disputes of a prediction: evidence matching, the accept/explain
//! decision, and the audit log of every submitted claim.

pub mod audit;
pub mod matcher;
pub mod reconciler;

use serde::Serialize;

use crate::catalog::{Label, StyleName};

pub use audit::{FeedbackLog, FeedbackRecord};
pub use matcher::count_matches;
pub use reconciler::reconcile;

/// "This is actually `claimed_label`", plus the user's reasoning.
#[derive(Debug, Clone)]
pub struct CorrectionClaim {
    pub predicted_label: Label,
    pub claimed_label: String,
    pub justification_text: String,
    pub image_digest: Option<String>,
}

impl CorrectionClaim {
    pub fn new(
        predicted_label: Label,
        claimed_label: impl Into<String>,
        justification_text: impl Into<String>,
    ) -> Self {
        Self {
            predicted_label,
            claimed_label: claimed_label.into(),
            justification_text: justification_text.into(),
            image_digest: None,
        }
    }

    pub fn with_image_digest(mut self, digest: Option<String>) -> Self {
        self.image_digest = digest;
        self
    }
}

/// The user agreed with the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub style: StyleName,
    pub origin: &'static str,
    pub characteristics: Vec<&'static str>,
    pub message: String,
}

impl Confirmation {
    pub fn new(style: StyleName) -> Self {
        let record = style.record();
        let message = format!(
            "The model's prediction \"{style}\" matches your selection. {style} art from {} is recognized by {}.",
            record.origin,
            record.characteristics.join(", ").to_lowercase()
        );
        Self {
            style,
            origin: record.origin,
            characteristics: record.characteristics.to_vec(),
            message,
        }
    }
}

/// A correction the store should apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub style: StyleName,
    pub previous: Label,
    pub keyword_matches: usize,
    pub origin: &'static str,
    pub characteristics: Vec<&'static str>,
    pub message: String,
}

#[cfg(test)]
impl Correction {
    pub(crate) fn for_test(style: StyleName, previous: Label) -> Self {
        let record = style.record();
        Self {
            style,
            previous,
            keyword_matches: 0,
            origin: record.origin,
            characteristics: record.characteristics.iter().take(4).copied().collect(),
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReconciliationOutcome {
    Confirmed(Confirmation),
    /// The justification carries evidence for the claimed style.
    Accepted(Correction),
    /// Honored without supporting evidence.
    AcceptedWeak(Correction),
}

impl ReconciliationOutcome {
    pub fn correction(&self) -> Option<&Correction> {
        match self {
            ReconciliationOutcome::Confirmed(_) => None,
            ReconciliationOutcome::Accepted(correction)
            | ReconciliationOutcome::AcceptedWeak(correction) => Some(correction),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.correction().is_some()
    }

    pub fn message(&self) -> &str {
        match self {
            ReconciliationOutcome::Confirmed(confirmation) => &confirmation.message,
            ReconciliationOutcome::Accepted(correction)
            | ReconciliationOutcome::AcceptedWeak(correction) => &correction.message,
        }
    }
}
