use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::{
    error::{IkaraError, Result},
    feedback::ReconciliationOutcome,
    imaging::ImagePayload,
    log_error, log_info, log_warn,
    oracle::{ClassificationOracle, OracleError, OracleResult},
    prediction::Prediction,
};

use super::compare;

const ENABLE_LOGS: bool = true;

pub const MAX_SLOTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SlotState {
    Empty,
    /// Image selected, not yet analyzed.
    Pending,
    Analyzing,
    Resolved { prediction: Prediction },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSlot {
    pub id: String,
    #[serde(skip)]
    image: Option<ImagePayload>,
    /// Bumped whenever the image changes, so late results for a replaced
    /// image are dropped.
    #[serde(skip)]
    revision: u64,
    pub state: SlotState,
}

impl ComparisonSlot {
    fn empty() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            image: None,
            revision: 0,
            state: SlotState::Empty,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.state {
            SlotState::Resolved { prediction } => Some(prediction),
            _ => None,
        }
    }

    fn awaiting_analysis(&self) -> bool {
        self.image.is_some() && matches!(self.state, SlotState::Pending | SlotState::Failed { .. })
    }
}

/// Slot images handed out by [`ComparisonSession::begin_analysis`]. Running
/// the batch needs no access to the session.
#[derive(Debug, Default)]
pub struct AnalysisBatch {
    jobs: Vec<(String, u64, ImagePayload)>,
}

/// Oracle replies for a batch, applied with
/// [`ComparisonSession::finish_analysis`].
#[derive(Debug)]
pub struct AnalysisResults {
    dispatched: Vec<(String, u64)>,
    outcomes: Vec<SlotOutcome>,
}

#[derive(Debug)]
struct SlotOutcome {
    slot_id: String,
    revision: u64,
    digest: Option<String>,
    result: std::result::Result<OracleResult, OracleError>,
}

impl AnalysisBatch {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Classifies every image concurrently.
    pub async fn run(self, oracle: Arc<dyn ClassificationOracle>) -> AnalysisResults {
        let dispatched = self
            .jobs
            .iter()
            .map(|(slot_id, revision, _)| (slot_id.clone(), *revision))
            .collect();

        let mut tasks = JoinSet::new();
        for (slot_id, revision, image) in self.jobs {
            let oracle = Arc::clone(&oracle);
            tasks.spawn(async move {
                let digest = match image.digest() {
                    Ok(digest) => Some(digest),
                    Err(err) => {
                        log_warn!("Could not fingerprint comparison image: {err:#}");
                        None
                    }
                };
                let result = oracle.classify(&image).await;
                SlotOutcome {
                    slot_id,
                    revision,
                    digest,
                    result,
                }
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => log_error!("Comparison analysis task failed: {err}"),
            }
        }

        AnalysisResults {
            dispatched,
            outcomes,
        }
    }
}

/// Up to three images analyzed independently and then compared. Any change
/// to a slot discards the last comparison text.
#[derive(Debug)]
pub struct ComparisonSession {
    slots: Vec<ComparisonSlot>,
    last_comparison: Option<String>,
}

impl Default for ComparisonSession {
    fn default() -> Self {
        Self {
            slots: vec![ComparisonSlot::empty()],
            last_comparison: None,
        }
    }
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[ComparisonSlot] {
        &self.slots
    }

    pub fn last_comparison(&self) -> Option<&str> {
        self.last_comparison.as_deref()
    }

    pub fn add_slot(&mut self) -> Result<String> {
        if self.slots.len() >= MAX_SLOTS {
            return Err(IkaraError::TooManySlots { max: MAX_SLOTS });
        }
        let slot = ComparisonSlot::empty();
        let id = slot.id.clone();
        self.slots.push(slot);
        Ok(id)
    }

    /// Removes a slot. The last remaining slot is kept; returns whether
    /// anything was removed.
    pub fn remove_slot(&mut self, slot_id: &str) -> Result<bool> {
        let index = self.index_of(slot_id)?;
        if self.slots.len() <= 1 {
            return Ok(false);
        }
        self.slots.remove(index);
        self.last_comparison = None;
        Ok(true)
    }

    pub fn set_image(&mut self, slot_id: &str, image: ImagePayload) -> Result<()> {
        let slot = self.slot_mut(slot_id)?;
        slot.image = Some(image);
        slot.revision += 1;
        slot.state = SlotState::Pending;
        self.last_comparison = None;
        Ok(())
    }

    /// Marks every pending or previously failed slot as `Analyzing` and hands
    /// out their images.
    pub fn begin_analysis(&mut self) -> AnalysisBatch {
        let mut batch = AnalysisBatch::default();
        for slot in self.slots.iter_mut().filter(|slot| slot.awaiting_analysis()) {
            let Some(image) = slot.image.clone() else {
                continue;
            };
            slot.state = SlotState::Analyzing;
            batch.jobs.push((slot.id.clone(), slot.revision, image));
        }
        batch
    }

    /// Writes oracle replies back. Replies for removed slots or replaced
    /// images are dropped. Returns the number of slots that resolved.
    pub fn finish_analysis(&mut self, results: AnalysisResults) -> usize {
        let mut resolved = 0;
        for outcome in results.outcomes {
            let SlotOutcome {
                slot_id,
                revision,
                digest,
                result,
            } = outcome;
            let Some(slot) = self.current_analysis_mut(&slot_id, revision) else {
                log_info!("Dropping stale analysis result for slot {slot_id}");
                continue;
            };
            slot.state = match result {
                Ok(result) => {
                    resolved += 1;
                    let prediction =
                        Prediction::from_oracle(result, digest, &mut rand::thread_rng());
                    log_info!("Slot {slot_id} detected {}", prediction.label);
                    SlotState::Resolved { prediction }
                }
                Err(err) => {
                    log_warn!("Slot {slot_id} analysis failed: {err}");
                    SlotState::Failed {
                        message: err.user_message(),
                    }
                }
            };
        }

        for (slot_id, revision) in &results.dispatched {
            if let Some(slot) = self.current_analysis_mut(slot_id, *revision) {
                slot.state = SlotState::Failed {
                    message: "Analysis failed".to_string(),
                };
            }
        }

        if resolved > 0 {
            self.last_comparison = None;
        }
        resolved
    }

    /// Runs a whole analysis round while holding `&mut self`. Callers sharing
    /// the session behind a lock should use `begin_analysis`, release the
    /// lock for `AnalysisBatch::run`, then `finish_analysis`.
    pub async fn analyze_all(&mut self, oracle: Arc<dyn ClassificationOracle>) -> usize {
        let results = self.begin_analysis().run(oracle).await;
        self.finish_analysis(results)
    }

    /// Applies an accepted correction to a resolved slot.
    pub fn apply_correction(
        &mut self,
        slot_id: &str,
        outcome: &ReconciliationOutcome,
    ) -> Result<&Prediction> {
        let correction = outcome
            .correction()
            .ok_or(IkaraError::ConfirmationNotApplicable)?;
        let index = self.index_of(slot_id)?;
        let corrected = self.slots[index]
            .prediction()
            .ok_or(IkaraError::NoCurrentPrediction)?
            .corrected(correction);

        self.last_comparison = None;
        let slot = &mut self.slots[index];
        slot.state = SlotState::Resolved {
            prediction: corrected,
        };
        slot.prediction().ok_or(IkaraError::NoCurrentPrediction)
    }

    pub fn resolved_predictions(&self) -> Vec<&Prediction> {
        self.slots.iter().filter_map(ComparisonSlot::prediction).collect()
    }

    pub fn run_comparison(&mut self) -> Result<&str> {
        let text = compare(self.resolved_predictions())?;
        Ok(self.last_comparison.insert(text).as_str())
    }

    fn index_of(&self, slot_id: &str) -> Result<usize> {
        self.slots
            .iter()
            .position(|slot| slot.id == slot_id)
            .ok_or_else(|| IkaraError::SlotNotFound(slot_id.to_string()))
    }

    fn current_analysis_mut(&mut self, slot_id: &str, revision: u64) -> Option<&mut ComparisonSlot> {
        self.slots.iter_mut().find(|slot| {
            slot.id == slot_id && slot.revision == revision && slot.state == SlotState::Analyzing
        })
    }

    fn slot_mut(&mut self, slot_id: &str) -> Result<&mut ComparisonSlot> {
        let index = self.index_of(slot_id)?;
        Ok(&mut self.slots[index])
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::{
        catalog::{Label, StyleName},
        feedback::Correction,
        oracle::{OracleError, OracleResult, ScriptedOracle},
    };

    fn image() -> ImagePayload {
        ImagePayload::from_bytes(vec![0, 1, 2], "image/png").unwrap()
    }

    fn session_with(count: usize) -> (ComparisonSession, Vec<String>) {
        let mut session = ComparisonSession::new();
        let mut ids = vec![session.slots()[0].id.clone()];
        for _ in 1..count {
            ids.push(session.add_slot().unwrap());
        }
        for id in &ids {
            session.set_image(id, image()).unwrap();
        }
        (session, ids)
    }

    #[test]
    fn slots_are_capped_at_three() {
        let mut session = ComparisonSession::new();
        session.add_slot().unwrap();
        session.add_slot().unwrap();
        assert!(matches!(
            session.add_slot(),
            Err(IkaraError::TooManySlots { max: 3 })
        ));
    }

    #[test]
    fn last_slot_cannot_be_removed() {
        let mut session = ComparisonSession::new();
        let id = session.slots()[0].id.clone();
        assert!(!session.remove_slot(&id).unwrap());
        assert_eq!(session.slots().len(), 1);
        assert!(matches!(
            session.remove_slot("missing"),
            Err(IkaraError::SlotNotFound(_))
        ));
    }

    #[tokio::test]
    async fn pending_slots_are_analyzed_concurrently() {
        let oracle = Arc::new(ScriptedOracle::with_delay(Duration::from_millis(200)));
        oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.9, "")));
        oracle.push(Ok(OracleResult::new(StyleName::Gond, 0.8, "")));
        oracle.push(Err(OracleError::RateLimited));

        let (mut session, _) = session_with(3);
        let started = Instant::now();
        let resolved = session.analyze_all(oracle.clone()).await;

        assert!(started.elapsed() < Duration::from_millis(550));
        assert_eq!(resolved, 2);
        assert_eq!(oracle.calls(), 3);

        let failed: Vec<_> = session
            .slots()
            .iter()
            .filter(|s| matches!(s.state, SlotState::Failed { .. }))
            .collect();
        assert_eq!(failed.len(), 1);

        let mut labels: Vec<Label> = session
            .resolved_predictions()
            .iter()
            .map(|p| p.label)
            .collect();
        labels.sort_by_key(|l| l.as_str());
        assert_eq!(
            labels,
            vec![Label::Style(StyleName::Gond), Label::Style(StyleName::Warli)]
        );
    }

    #[tokio::test]
    async fn comparison_uses_resolved_slots_and_is_invalidated() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.9, "")));
        oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.7, "")));

        let (mut session, ids) = session_with(2);
        session.analyze_all(oracle).await;

        let text = session.run_comparison().unwrap().to_string();
        assert!(text.contains("All artworks belong to the Warli style."));
        assert_eq!(session.last_comparison(), Some(text.as_str()));

        let outcome = ReconciliationOutcome::Accepted(Correction::for_test(
            StyleName::Kangra,
            Label::Style(StyleName::Warli),
        ));
        let corrected = session.apply_correction(&ids[1], &outcome).unwrap();
        assert_eq!(corrected.confidence, 1.0);
        assert!(session.last_comparison().is_none());

        let text = session.run_comparison().unwrap();
        assert!(text.contains("Detected 2 different art styles"));
    }

    #[tokio::test]
    async fn comparison_needs_two_resolved_slots() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.9, "")));

        let (mut session, _) = session_with(1);
        session.add_slot().unwrap();
        session.analyze_all(oracle).await;

        assert!(matches!(
            session.run_comparison(),
            Err(IkaraError::InsufficientInput { resolved: 1 })
        ));
    }

    #[test]
    fn unresolved_slot_cannot_be_corrected() {
        let (mut session, ids) = session_with(1);
        let outcome = ReconciliationOutcome::Accepted(Correction::for_test(
            StyleName::Gond,
            Label::Unknown,
        ));
        assert!(matches!(
            session.apply_correction(&ids[0], &outcome),
            Err(IkaraError::NoCurrentPrediction)
        ));
    }

    #[tokio::test]
    async fn failed_slot_is_sent_again_on_the_next_round() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push(Err(OracleError::RateLimited));
        oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.9, "")));

        let (mut session, _) = session_with(1);
        assert_eq!(session.analyze_all(oracle.clone()).await, 0);
        assert!(matches!(session.slots()[0].state, SlotState::Failed { .. }));

        assert_eq!(session.analyze_all(oracle.clone()).await, 1);
        assert_eq!(oracle.calls(), 2);
        assert_eq!(
            session.slots()[0].prediction().map(|p| p.label),
            Some(Label::Style(StyleName::Warli))
        );
    }

    #[tokio::test]
    async fn resolved_slots_are_not_sent_again() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push(Ok(OracleResult::new(StyleName::Gond, 0.9, "")));

        let (mut session, _) = session_with(1);
        session.analyze_all(oracle.clone()).await;
        assert!(session.begin_analysis().is_empty());
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn slots_read_as_analyzing_while_the_batch_runs() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push(Ok(OracleResult::new(StyleName::Kangra, 0.9, "")));
        oracle.push(Ok(OracleResult::new(StyleName::Pichwai, 0.9, "")));

        let (mut session, _) = session_with(2);
        let batch = session.begin_analysis();
        assert_eq!(batch.len(), 2);
        assert!(session
            .slots()
            .iter()
            .all(|slot| slot.state == SlotState::Analyzing));
        assert!(session.begin_analysis().is_empty());

        let results = batch.run(oracle).await;
        assert_eq!(session.finish_analysis(results), 2);
        assert_eq!(session.resolved_predictions().len(), 2);
    }

    #[tokio::test]
    async fn result_for_a_replaced_image_is_dropped() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push(Ok(OracleResult::new(StyleName::Mandana, 0.9, "")));

        let (mut session, ids) = session_with(1);
        let batch = session.begin_analysis();
        session.set_image(&ids[0], image()).unwrap();

        let results = batch.run(oracle).await;
        assert_eq!(session.finish_analysis(results), 0);
        assert_eq!(session.slots()[0].state, SlotState::Pending);
    }

    #[tokio::test]
    async fn result_for_a_removed_slot_is_dropped() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.9, "")));
        oracle.push(Ok(OracleResult::new(StyleName::Gond, 0.9, "")));

        let (mut session, ids) = session_with(2);
        let batch = session.begin_analysis();
        assert!(session.remove_slot(&ids[1]).unwrap());

        let results = batch.run(oracle).await;
        assert_eq!(session.finish_analysis(results), 1);
        assert_eq!(session.slots().len(), 1);
        assert!(session.slots()[0].prediction().is_some());
    }
}
