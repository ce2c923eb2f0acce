use tauri::State;

use crate::{
    catalog::{self, StyleRecord},
    comparison::ComparisonSlot,
    error::IkaraError,
    feedback::{reconcile, CorrectionClaim, ReconciliationOutcome},
    history::HistoryEntry,
    imaging::ImagePayload,
    log_warn,
    prediction::Prediction,
    settings::AppSettings,
    AppState,
};

const ENABLE_LOGS: bool = true;
const CONSOLE_HISTORY_LIMIT: usize = 5;

fn to_message(err: IkaraError) -> String {
    match err {
        IkaraError::Oracle(oracle) => oracle.user_message(),
        other => other.to_string(),
    }
}

#[tauri::command]
pub async fn analyze_image(
    state: State<'_, AppState>,
    image_data: String,
) -> Result<Prediction, String> {
    let image = ImagePayload::from_data_uri(&image_data).map_err(|e| e.to_string())?;
    state.analysis.analyze(&image).await.map_err(to_message)
}

#[tauri::command]
pub fn current_prediction(state: State<'_, AppState>) -> Result<Option<Prediction>, String> {
    Ok(state.analysis.current())
}

#[tauri::command]
pub fn clear_prediction(state: State<'_, AppState>) -> Result<(), String> {
    state.analysis.clear();
    Ok(())
}

#[tauri::command]
pub fn submit_feedback(
    state: State<'_, AppState>,
    claimed_style: String,
    description: Option<String>,
) -> Result<ReconciliationOutcome, String> {
    state
        .analysis
        .submit_feedback(&claimed_style, description.as_deref().unwrap_or_default())
        .map_err(to_message)
}

#[tauri::command]
pub fn share_prediction(state: State<'_, AppState>) -> Result<String, String> {
    state.analysis.share_text().map_err(to_message)
}

#[tauri::command]
pub fn get_history(state: State<'_, AppState>) -> Result<Vec<HistoryEntry>, String> {
    state.analysis.ledger().all().map_err(to_message)
}

/// A stale index is ignored so a double click never surfaces an error.
#[tauri::command]
pub fn delete_history_item(state: State<'_, AppState>, index: usize) -> Result<(), String> {
    match state.analysis.ledger().remove_at(index) {
        Ok(_) => Ok(()),
        Err(err @ IkaraError::IndexOutOfRange { .. }) => {
            log_warn!("Ignoring history deletion: {err}");
            Ok(())
        }
        Err(err) => Err(to_message(err)),
    }
}

#[tauri::command]
pub fn clear_history(state: State<'_, AppState>) -> Result<(), String> {
    state.analysis.ledger().clear().map_err(to_message)
}

#[tauri::command]
pub fn history_summary(
    state: State<'_, AppState>,
    limit: Option<usize>,
) -> Result<String, String> {
    state
        .analysis
        .ledger()
        .recent_summary(limit.unwrap_or(CONSOLE_HISTORY_LIMIT))
        .map_err(to_message)
}

#[tauri::command]
pub fn get_style_catalog() -> Result<&'static [StyleRecord], String> {
    Ok(catalog::all())
}

#[tauri::command]
pub async fn comparison_state(state: State<'_, AppState>) -> Result<Vec<ComparisonSlot>, String> {
    let session = state.comparison.lock().await;
    Ok(session.slots().to_vec())
}

#[tauri::command]
pub async fn comparison_add_slot(state: State<'_, AppState>) -> Result<String, String> {
    let mut session = state.comparison.lock().await;
    session.add_slot().map_err(to_message)
}

#[tauri::command]
pub async fn comparison_remove_slot(
    state: State<'_, AppState>,
    slot_id: String,
) -> Result<bool, String> {
    let mut session = state.comparison.lock().await;
    session.remove_slot(&slot_id).map_err(to_message)
}

#[tauri::command]
pub async fn comparison_set_image(
    state: State<'_, AppState>,
    slot_id: String,
    image_data: String,
) -> Result<(), String> {
    let image = ImagePayload::from_data_uri(&image_data).map_err(|e| e.to_string())?;
    let mut session = state.comparison.lock().await;
    session.set_image(&slot_id, image).map_err(to_message)
}

/// The session lock is released while the oracle runs, so slot state stays
/// readable and editable during analysis.
#[tauri::command]
pub async fn comparison_analyze(state: State<'_, AppState>) -> Result<Vec<ComparisonSlot>, String> {
    let batch = state.comparison.lock().await.begin_analysis();
    if !batch.is_empty() {
        let results = batch.run(state.oracle.clone()).await;
        state.comparison.lock().await.finish_analysis(results);
    }
    let session = state.comparison.lock().await;
    Ok(session.slots().to_vec())
}

#[tauri::command]
pub async fn comparison_submit_feedback(
    state: State<'_, AppState>,
    slot_id: String,
    claimed_style: String,
    description: Option<String>,
) -> Result<ReconciliationOutcome, String> {
    let mut session = state.comparison.lock().await;
    let predicted = session
        .slots()
        .iter()
        .find(|slot| slot.id == slot_id)
        .and_then(ComparisonSlot::prediction)
        .ok_or_else(|| to_message(IkaraError::NoCurrentPrediction))?;

    let claim = CorrectionClaim::new(
        predicted.label,
        claimed_style,
        description.unwrap_or_default(),
    )
    .with_image_digest(predicted.image_digest.clone());

    let outcome = reconcile(&claim, state.analysis.feedback_log()).map_err(to_message)?;
    if outcome.is_accepted() {
        session
            .apply_correction(&slot_id, &outcome)
            .map_err(to_message)?;
    }
    Ok(outcome)
}

#[tauri::command]
pub async fn compare_predictions(state: State<'_, AppState>) -> Result<String, String> {
    let mut session = state.comparison.lock().await;
    session
        .run_comparison()
        .map(str::to_string)
        .map_err(to_message)
}

#[tauri::command]
pub fn get_settings(state: State<'_, AppState>) -> Result<AppSettings, String> {
    Ok(state.settings.settings())
}

/// Oracle endpoint changes apply on the next launch.
#[tauri::command]
pub fn update_settings(state: State<'_, AppState>, settings: AppSettings) -> Result<(), String> {
    state.settings.update(settings).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn set_dark_mode(state: State<'_, AppState>, dark_mode: bool) -> Result<(), String> {
    state
        .settings
        .set_dark_mode(dark_mode)
        .map_err(|e| e.to_string())
}
