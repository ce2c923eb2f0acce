use crate::catalog::{Label, StyleName};
use crate::log_warn;

use super::OracleResult;

const ENABLE_LOGS: bool = true;
const FALLBACK_FOUND_CONFIDENCE: f64 = 0.7;
const FALLBACK_MISSING_CONFIDENCE: f64 = 0.3;
const FALLBACK_DESCRIPTION_CHARS: usize = 200;

/// Interprets raw model output. Never fails: text that is not the expected
/// JSON degrades to a substring scan for the known style names.
pub fn parse_model_output(raw: &str) -> OracleResult {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<OracleResult>(&cleaned) {
        Ok(mut result) => {
            result.confidence = clamp_unit(result.confidence);
            if let Some(entries) = result.all_predictions.as_mut() {
                for entry in entries.iter_mut() {
                    entry.confidence = clamp_unit(entry.confidence);
                }
            }
            result
        }
        Err(err) => {
            log_warn!("Failed to parse model output, falling back to keyword scan: {err}");
            fallback(raw)
        }
    }
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn fallback(raw: &str) -> OracleResult {
    let lowered = raw.to_lowercase();
    let detected = StyleName::SCAN_ORDER
        .into_iter()
        .find(|style| lowered.contains(&style.as_str().to_lowercase()));

    let (label, confidence) = match detected {
        Some(style) => (Label::Style(style), FALLBACK_FOUND_CONFIDENCE),
        None => (Label::Unknown, FALLBACK_MISSING_CONFIDENCE),
    };

    let description: String = raw.chars().take(FALLBACK_DESCRIPTION_CHARS).collect();
    OracleResult::new(label, confidence, description)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
