use chrono::Utc;

use crate::{
    catalog::{Label, StyleName},
    error::{IkaraError, Result},
    log_error, log_info,
};

use super::{
    matcher::count_style_matches, Confirmation, Correction, CorrectionClaim, FeedbackLog,
    FeedbackRecord, ReconciliationOutcome,
};

const ENABLE_LOGS: bool = true;

/// Keyword hits needed for a correction to count as evidenced.
pub const MIN_KEYWORD_MATCHES: usize = 2;
/// A justification longer than this (in characters) also counts as evidence.
pub const DETAILED_JUSTIFICATION_CHARS: usize = 50;

const CITED_CHARACTERISTICS: usize = 4;

/// Decides how to answer a correction claim and records it in `log`.
///
/// A claim for a different style is always accepted; evidence only changes
/// the explanation. Claims naming an unrecognized style fail before anything
/// is logged. A failed audit write is logged and does not block the outcome.
pub fn reconcile(claim: &CorrectionClaim, log: &FeedbackLog) -> Result<ReconciliationOutcome> {
    let claimed: StyleName = claim
        .claimed_label
        .parse()
        .map_err(|_| IkaraError::InvalidStyle(claim.claimed_label.clone()))?;

    let outcome = decide(claim, claimed);

    log_info!(
        "Reconciled claim {} -> {}: {}",
        claim.predicted_label,
        claimed,
        match &outcome {
            ReconciliationOutcome::Confirmed(_) => "confirmed",
            ReconciliationOutcome::Accepted(_) => "accepted",
            ReconciliationOutcome::AcceptedWeak(_) => "accepted without evidence",
        }
    );

    let record = FeedbackRecord {
        predicted: claim.predicted_label,
        claimed: claimed.as_str().to_string(),
        justification: claim.justification_text.clone(),
        timestamp: Utc::now(),
        accepted: outcome.is_accepted(),
        image_digest: claim.image_digest.clone(),
    };
    if let Err(err) = log.append(record) {
        log_error!("Failed to record feedback: {err:#}");
    }

    Ok(outcome)
}

fn decide(claim: &CorrectionClaim, claimed: StyleName) -> ReconciliationOutcome {
    if claim.predicted_label == Label::Style(claimed) {
        return ReconciliationOutcome::Confirmed(Confirmation::new(claimed));
    }

    let record = claimed.record();
    let keyword_matches = count_style_matches(&claim.justification_text, claimed);
    let detailed = claim.justification_text.chars().count() > DETAILED_JUSTIFICATION_CHARS;
    let characteristics: Vec<&'static str> = record
        .characteristics
        .iter()
        .take(CITED_CHARACTERISTICS)
        .copied()
        .collect();

    if keyword_matches >= MIN_KEYWORD_MATCHES || detailed {
        let message = format!(
            "Correction accepted: this artwork is {claimed}. Your description is consistent with {claimed} art from {}, known for {}.",
            record.origin,
            characteristics.join(", ").to_lowercase()
        );
        return ReconciliationOutcome::Accepted(Correction {
            style: claimed,
            previous: claim.predicted_label,
            keyword_matches,
            origin: record.origin,
            characteristics,
            message,
        });
    }

    let message = format!(
        "Correction recorded: this artwork is now labelled {claimed}. {} {claimed} art from {} typically shows {}.",
        why_predicted(claim.predicted_label),
        record.origin,
        characteristics.join(", ").to_lowercase()
    );
    ReconciliationOutcome::AcceptedWeak(Correction {
        style: claimed,
        previous: claim.predicted_label,
        keyword_matches,
        origin: record.origin,
        characteristics,
        message,
    })
}

fn why_predicted(predicted: Label) -> String {
    match predicted.style() {
        Some(style) => {
            let traits: Vec<String> = style
                .record()
                .characteristics
                .iter()
                .take(2)
                .map(|c| c.to_lowercase())
                .collect();
            format!(
                "The model predicted {style} because it saw features such as {}.",
                traits.join(" and ")
            )
        }
        None => "The model could not match the artwork to a known style.".to_string(),
    }
}
