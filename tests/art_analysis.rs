use std::{io::Cursor, sync::Arc};

use image::{ImageFormat, Rgb, RgbImage};
use ikara_lib::{
    comparison::ComparisonSession,
    db::Database,
    feedback::{reconcile, CorrectionClaim, ReconciliationOutcome},
    history::HistoryLedger,
    imaging::ImagePayload,
    oracle::{LabelConfidence, OracleResult, ScriptedOracle},
    prediction::{DistributionSource, Provenance},
    storage::{KeyValueStore, MemoryStore},
    AnalysisService, IkaraError, Label, StyleName,
};
use tempfile::tempdir;

fn png(shade: u8) -> ImagePayload {
    let img = RgbImage::from_fn(32, 32, |x, y| {
        Rgb([shade, (x * 8) as u8, (y * 8) as u8])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    ImagePayload::from_bytes(bytes, "image/png").unwrap()
}

#[tokio::test]
async fn reported_distribution_is_kept_and_correction_is_one_hot() {
    let oracle = Arc::new(ScriptedOracle::new());
    oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.55, "Stick figures in a circle")
        .with_distribution(vec![
            LabelConfidence {
                label: "Warli".to_string(),
                confidence: 0.55,
            },
            LabelConfidence {
                label: "Gond".to_string(),
                confidence: 0.3,
            },
        ])));
    let service = AnalysisService::new(oracle, Arc::new(MemoryStore::new()));

    let prediction = service.analyze(&png(40)).await.unwrap();
    assert_eq!(prediction.distribution.source, DistributionSource::Oracle);
    assert!(prediction.image_digest.is_some());

    let outcome = service
        .submit_feedback("gond", "dot patterns and nature motifs")
        .unwrap();
    let ReconciliationOutcome::Accepted(correction) = &outcome else {
        panic!("expected an evidence-backed correction, got {outcome:?}");
    };
    assert_eq!(correction.previous, Label::Style(StyleName::Warli));
    assert!(correction.keyword_matches >= 2);

    let current = service.current().unwrap();
    assert_eq!(current.label, Label::Style(StyleName::Gond));
    assert_eq!(current.confidence, 1.0);
    assert_eq!(current.provenance, Provenance::UserCorrected);
    assert_eq!(current.distribution.source, DistributionSource::Corrected);
    assert_eq!(current.image_digest, prediction.image_digest);
}

#[tokio::test]
async fn weak_claims_are_still_honored() {
    let oracle = Arc::new(ScriptedOracle::new());
    oracle.push(Ok(OracleResult::new(StyleName::Kalighat, 0.8, "")));
    let service = AnalysisService::new(oracle, Arc::new(MemoryStore::new()));
    service.analyze(&png(10)).await.unwrap();

    let outcome = service.submit_feedback("Pichwai", "trust me").unwrap();
    assert!(matches!(outcome, ReconciliationOutcome::AcceptedWeak(_)));
    assert_eq!(
        service.current().unwrap().label,
        Label::Style(StyleName::Pichwai)
    );

    let records = service.feedback_log().records().unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].accepted);
    assert_eq!(records[0].claimed, "Pichwai");
}

#[tokio::test]
async fn invalid_claims_change_nothing() {
    let oracle = Arc::new(ScriptedOracle::new());
    oracle.push(Ok(OracleResult::new(StyleName::Mandana, 0.7, "")));
    let service = AnalysisService::new(oracle, Arc::new(MemoryStore::new()));
    let before = service.analyze(&png(90)).await.unwrap();

    assert!(matches!(
        service.submit_feedback("Tanjore", "gold leaf"),
        Err(IkaraError::InvalidStyle(_))
    ));
    assert_eq!(service.current(), Some(before));
    assert!(service.feedback_log().is_empty().unwrap());
}

#[tokio::test]
async fn history_survives_reopening_the_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ikara.sqlite3");

    {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push(Ok(OracleResult::new(StyleName::Madhubani, 0.9, "")));
        oracle.push(Ok(OracleResult::new(StyleName::KeralaMural, 0.85, "")));
        let store: Arc<dyn KeyValueStore> = Arc::new(Database::new(path.clone()).unwrap());
        let service = AnalysisService::new(oracle, store);
        service.analyze(&png(1)).await.unwrap();
        service.analyze(&png(2)).await.unwrap();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(Database::new(path).unwrap());
    let ledger = HistoryLedger::new(store);
    let history = ledger.all().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].label, Label::Style(StyleName::KeralaMural));
    assert_eq!(history[1].label, Label::Style(StyleName::Madhubani));

    let summary = ledger.recent_summary(5).unwrap();
    assert!(summary.contains("Kerala Mural"));
}

#[tokio::test]
async fn comparison_slots_can_be_corrected_through_the_feedback_log() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let feedback = ikara_lib::feedback::FeedbackLog::new(Arc::clone(&store));

    let oracle = Arc::new(ScriptedOracle::new());
    oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.9, "")));
    oracle.push(Ok(OracleResult::new(StyleName::Warli, 0.6, "")));

    let mut session = ComparisonSession::new();
    let first = session.slots()[0].id.clone();
    let second = session.add_slot().unwrap();
    session.set_image(&first, png(5)).unwrap();
    session.set_image(&second, png(200)).unwrap();
    assert_eq!(session.analyze_all(oracle).await, 2);

    assert!(session
        .run_comparison()
        .unwrap()
        .contains("All artworks belong to the Warli style."));

    let predicted = session.slots()[1].prediction().unwrap().label;
    let claim = CorrectionClaim::new(predicted, "Madhubani", "double line borders, natural dyes");
    let outcome = reconcile(&claim, &feedback).unwrap();
    assert!(outcome.is_accepted());
    session.apply_correction(&second, &outcome).unwrap();

    let text = session.run_comparison().unwrap();
    assert!(text.contains("Detected 2 different art styles"));
    assert!(text.contains("Warli (Maharashtra, India) vs Madhubani (Bihar, India)"));
    assert_eq!(feedback.len().unwrap(), 1);
}
