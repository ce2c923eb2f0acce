use rand::Rng;

use crate::{
    error::{IkaraError, Result},
    feedback::ReconciliationOutcome,
    oracle::OracleResult,
};

use super::Prediction;

/// Owns the prediction for the active image. Every change replaces the whole
/// value; no field is ever mutated in place.
#[derive(Debug, Default)]
pub struct PredictionStore {
    current: Option<Prediction>,
}

impl PredictionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_from_oracle(
        &mut self,
        result: OracleResult,
        image_digest: Option<String>,
    ) -> &Prediction {
        self.set_from_oracle_with_rng(result, image_digest, &mut rand::thread_rng())
    }

    pub fn set_from_oracle_with_rng<R: Rng + ?Sized>(
        &mut self,
        result: OracleResult,
        image_digest: Option<String>,
        rng: &mut R,
    ) -> &Prediction {
        self.current
            .insert(Prediction::from_oracle(result, image_digest, rng))
    }

    /// Replaces the current prediction with the corrected one.
    ///
    /// `Confirmed` outcomes carry nothing to apply and are rejected.
    pub fn apply_correction(&mut self, outcome: &ReconciliationOutcome) -> Result<&Prediction> {
        let correction = outcome
            .correction()
            .ok_or(IkaraError::ConfirmationNotApplicable)?;
        let previous = self.current.as_ref().ok_or(IkaraError::NoCurrentPrediction)?;
        let corrected = previous.corrected(correction);
        Ok(&*self.current.insert(corrected))
    }

    pub fn current(&self) -> Option<&Prediction> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) -> Option<Prediction> {
        self.current.take()
    }
}
