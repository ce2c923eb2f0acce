//! Single-image flow: analyze, dispute, clear. Owns the prediction store and
//! writes every new or corrected prediction to history.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::{IkaraError, Result},
    feedback::{reconcile, CorrectionClaim, FeedbackLog, ReconciliationOutcome},
    history::{HistoryEntry, HistoryLedger},
    imaging::ImagePayload,
    log_error, log_info, log_warn,
    oracle::ClassificationOracle,
    prediction::{Prediction, PredictionStore},
    storage::KeyValueStore,
};

const ENABLE_LOGS: bool = true;

pub struct AnalysisService {
    oracle: Arc<dyn ClassificationOracle>,
    predictions: Mutex<PredictionStore>,
    ledger: HistoryLedger,
    feedback: FeedbackLog,
}

impl AnalysisService {
    pub fn new(oracle: Arc<dyn ClassificationOracle>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            oracle,
            predictions: Mutex::new(PredictionStore::new()),
            ledger: HistoryLedger::new(Arc::clone(&store)),
            feedback: FeedbackLog::new(store),
        }
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn feedback_log(&self) -> &FeedbackLog {
        &self.feedback
    }

    fn store(&self) -> MutexGuard<'_, PredictionStore> {
        self.predictions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Classifies `image` and makes the result current.
    ///
    /// On oracle failure the previous prediction stays in place. A history
    /// write failure is logged and does not fail the analysis.
    pub async fn analyze(&self, image: &ImagePayload) -> Result<Prediction> {
        let digest = match image.digest() {
            Ok(digest) => Some(digest),
            Err(err) => {
                log_warn!("Could not fingerprint uploaded image: {err:#}");
                None
            }
        };

        let result = self.oracle.classify(image).await.map_err(|err| {
            log_warn!("Art analysis failed: {err}");
            IkaraError::Oracle(err)
        })?;

        let prediction = self.store().set_from_oracle(result, digest).clone();
        log_info!(
            "Detected {} ({:.2})",
            prediction.label,
            prediction.confidence
        );
        self.record_in_background(&prediction).await;
        Ok(prediction)
    }

    /// Reconciles the user's claim against the current prediction and applies
    /// the correction when accepted. Writes to the store synchronously.
    pub fn submit_feedback(
        &self,
        claimed_label: &str,
        justification: &str,
    ) -> Result<ReconciliationOutcome> {
        let mut store = self.store();
        let current = store.current().ok_or(IkaraError::NoCurrentPrediction)?;
        let claim = CorrectionClaim::new(current.label, claimed_label, justification)
            .with_image_digest(current.image_digest.clone());

        let outcome = reconcile(&claim, &self.feedback)?;
        if outcome.is_accepted() {
            let corrected = store.apply_correction(&outcome)?.clone();
            self.record(&corrected);
        }
        Ok(outcome)
    }

    pub fn current(&self) -> Option<Prediction> {
        self.store().current().cloned()
    }

    /// Drops the current prediction, e.g. when the image is removed.
    pub fn clear(&self) {
        self.store().clear();
    }

    pub fn share_text(&self) -> Result<String> {
        self.store()
            .current()
            .map(Prediction::share_text)
            .ok_or(IkaraError::NoCurrentPrediction)
    }

    /// Store writes block on the database thread, so they run on tokio's
    /// blocking pool rather than an async worker.
    async fn record_in_background(&self, prediction: &Prediction) {
        let ledger = self.ledger.clone();
        let entry = HistoryEntry::from(prediction);
        match tokio::task::spawn_blocking(move || ledger.append(entry)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => log_error!("Failed to save prediction to history: {err}"),
            Err(err) => log_error!("History write task failed: {err}"),
        }
    }

    fn record(&self, prediction: &Prediction) {
        if let Err(err) = self.ledger.append(HistoryEntry::from(prediction)) {
            log_error!("Failed to save prediction to history: {err}");
        }
    }
}
