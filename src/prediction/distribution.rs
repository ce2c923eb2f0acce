use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Label, StyleName},
    oracle::LabelConfidence,
};

/// Upper bound of a synthesized residual, as a fraction of `1 - confidence`.
pub const RESIDUAL_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributionSource {
    /// Reported by the oracle.
    Oracle,
    /// Display filler. Carries no information about model uncertainty.
    Synthesized,
    /// One-hot distribution of a user correction.
    Corrected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleConfidence {
    #[serde(rename = "label")]
    pub style: StyleName,
    pub confidence: f64,
}

/// Per-style confidence for all eight styles, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub source: DistributionSource,
    pub entries: Vec<StyleConfidence>,
}

impl Distribution {
    fn build(source: DistributionSource, mut value: impl FnMut(StyleName) -> f64) -> Self {
        let entries = StyleName::ALL
            .into_iter()
            .map(|style| StyleConfidence {
                style,
                confidence: value(style),
            })
            .collect();
        Self { source, entries }
    }

    /// Maps reported pairs onto the catalog. Unknown labels are dropped and
    /// styles the model did not mention get zero.
    pub fn from_reported(reported: &[LabelConfidence]) -> Self {
        Self::build(DistributionSource::Oracle, |style| {
            reported
                .iter()
                .find(|entry| Label::from(entry.label.as_str()) == Label::Style(style))
                .map(|entry| entry.confidence.clamp(0.0, 1.0))
                .unwrap_or(0.0)
        })
    }

    /// Winner gets `confidence`; every other style gets a random residual in
    /// `[0, RESIDUAL_FRACTION * (1 - confidence))`.
    pub fn synthesize<R: Rng + ?Sized>(label: Label, confidence: f64, rng: &mut R) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        let ceiling = RESIDUAL_FRACTION * (1.0 - confidence);
        Self::build(DistributionSource::Synthesized, |style| {
            if label == Label::Style(style) {
                confidence
            } else {
                rng.gen::<f64>() * ceiling
            }
        })
    }

    pub fn one_hot(winner: StyleName) -> Self {
        Self::build(DistributionSource::Corrected, |style| {
            if style == winner {
                1.0
            } else {
                0.0
            }
        })
    }

    pub fn get(&self, style: StyleName) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.style == style)
            .map(|entry| entry.confidence)
            .unwrap_or(0.0)
    }

    pub fn is_synthesized(&self) -> bool {
        self.source == DistributionSource::Synthesized
    }
}
