use std::fmt::Write as _;

use crate::{
    catalog::Label,
    error::{IkaraError, Result},
    prediction::Prediction,
};

use super::MAX_SLOTS;

const SIGNIFICANCE_EXCERPT_CHARS: usize = 80;
const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━";

/// Builds the comparison report for two or three predictions.
///
/// Only labels are read, so the report is deterministic for a given set of
/// labels and the static catalog.
pub fn compare<'a, I>(predictions: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Prediction>,
{
    let labels: Vec<Label> = predictions.into_iter().map(|p| p.label).collect();
    if labels.len() < 2 {
        return Err(IkaraError::InsufficientInput {
            resolved: labels.len(),
        });
    }
    if labels.len() > MAX_SLOTS {
        return Err(IkaraError::TooManySlots { max: MAX_SLOTS });
    }

    let mut distinct: Vec<Label> = Vec::new();
    for label in &labels {
        if !distinct.contains(label) {
            distinct.push(*label);
        }
    }

    let mut text = String::from("📊 COMPARISON ANALYSIS\n\n");
    if let [only] = distinct.as_slice() {
        consensus(&mut text, *only);
    } else {
        differences(&mut text, &labels, &distinct);
    }
    Ok(text)
}

fn origin(label: Label) -> &'static str {
    label
        .style()
        .map(|style| style.record().origin)
        .unwrap_or(Label::UNKNOWN)
}

fn characteristics(label: Label) -> &'static [&'static str] {
    label
        .style()
        .map(|style| style.record().characteristics)
        .unwrap_or(&[])
}

fn consensus(text: &mut String, label: Label) {
    let _ = writeln!(text, "✓ All artworks belong to the {label} style.\n");
    let traits = characteristics(label);
    if !traits.is_empty() {
        text.push_str("Common Characteristics:\n");
        for characteristic in traits {
            let _ = writeln!(text, "• {characteristic}");
        }
    }
}

fn differences(text: &mut String, labels: &[Label], distinct: &[Label]) {
    let _ = writeln!(text, "Detected {} different art styles:\n", distinct.len());

    for label in distinct {
        let count = labels.iter().filter(|l| *l == label).count();
        let plural = if count > 1 { "s" } else { "" };
        let key_features: Vec<&str> = characteristics(*label).iter().take(2).copied().collect();
        let _ = writeln!(text, "【{label}】 ({count} artwork{plural})");
        let _ = writeln!(text, "  Origin: {}", origin(*label));
        let _ = writeln!(text, "  Key features: {}\n", key_features.join(", "));
    }

    let _ = writeln!(text, "{DIVIDER}\n");
    text.push_str("KEY DIFFERENCES:\n\n");

    let origins: Vec<String> = distinct
        .iter()
        .map(|label| format!("{label} ({})", origin(*label)))
        .collect();
    let _ = writeln!(text, "• Style Origin: {}\n", origins.join(" vs "));

    let techniques: Vec<String> = distinct
        .iter()
        .map(|label| match characteristics(*label).first() {
            Some(first) => format!("{label} uses {}", first.to_lowercase()),
            None => format!("{label} has no catalogued technique"),
        })
        .collect();
    let _ = writeln!(text, "• Technique: {}\n", techniques.join(", while "));

    text.push_str("• Cultural Significance:\n");
    for label in distinct {
        if let Some(style) = label.style() {
            let excerpt: String = style
                .record()
                .significance
                .chars()
                .take(SIGNIFICANCE_EXCERPT_CHARS)
                .collect();
            let _ = writeln!(text, "  - {label}: {excerpt}...");
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{catalog::StyleName, oracle::OracleResult};

    fn prediction(label: impl Into<Label>, seed: u64) -> Prediction {
        Prediction::from_oracle(
            OracleResult::new(label, 0.8, ""),
            None,
            &mut StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn same_style_reports_consensus() {
        let inputs = [prediction(StyleName::Warli, 1), prediction(StyleName::Warli, 2)];
        let text = compare(&inputs).unwrap();

        assert!(text.contains("All artworks belong to the Warli style."));
        for characteristic in ["Geometric shapes", "White on brown", "Daily life scenes", "Circular motifs"] {
            assert!(text.contains(&format!("• {characteristic}")), "missing {characteristic}");
        }
        assert!(!text.contains("KEY DIFFERENCES"));
    }

    #[test]
    fn distinct_styles_list_origins() {
        let inputs = [
            prediction(StyleName::Warli, 1),
            prediction(StyleName::Madhubani, 2),
            prediction(StyleName::Gond, 3),
        ];
        let text = compare(&inputs).unwrap();

        assert!(text.contains("Detected 3 different art styles"));
        assert!(text.contains("Warli (Maharashtra, India) vs Madhubani (Bihar, India) vs Gond (Madhya Pradesh, India)"));
        assert!(text.contains("Warli uses geometric shapes, while Madhubani uses geometric patterns, while Gond uses dot patterns"));
        assert!(text.contains("  - Gond: Reflects the Gond philosophy"));
    }

    #[test]
    fn occurrence_counts_are_pluralized() {
        let inputs = [
            prediction(StyleName::Kangra, 1),
            prediction(StyleName::Kangra, 2),
            prediction(StyleName::Pichwai, 3),
        ];
        let text = compare(&inputs).unwrap();
        assert!(text.contains("【Kangra】 (2 artworks)"));
        assert!(text.contains("【Pichwai】 (1 artwork)\n"));
        assert!(text.contains("  Key features: Krishna themes, Large scale"));
    }

    #[test]
    fn significance_is_excerpted() {
        let inputs = [prediction(StyleName::Mandana, 1), prediction(StyleName::Kalighat, 2)];
        let text = compare(&inputs).unwrap();
        let full = StyleName::Mandana.record().significance;
        let excerpt: String = full.chars().take(80).collect();
        assert!(text.contains(&format!("  - Mandana: {excerpt}...")));
        assert!(!text.contains(full));
    }

    #[test]
    fn unknown_labels_have_unknown_origin() {
        let inputs = [prediction(Label::Unknown, 1), prediction(StyleName::Gond, 2)];
        let text = compare(&inputs).unwrap();
        assert!(text.contains("Unknown (Unknown)"));
    }

    #[test]
    fn single_prediction_is_insufficient() {
        let inputs = [prediction(StyleName::Warli, 1)];
        assert!(matches!(
            compare(&inputs),
            Err(IkaraError::InsufficientInput { resolved: 1 })
        ));
    }

    #[test]
    fn output_ignores_distribution_noise() {
        let first = [prediction(StyleName::Warli, 1), prediction(StyleName::Gond, 2)];
        let second = [prediction(StyleName::Warli, 99), prediction(StyleName::Gond, 100)];
        assert_ne!(first[0].distribution, second[0].distribution);
        assert_eq!(compare(&first).unwrap(), compare(&second).unwrap());
    }

    #[test]
    fn more_than_three_predictions_are_rejected() {
        let inputs = [
            prediction(StyleName::Warli, 1),
            prediction(StyleName::Gond, 2),
            prediction(StyleName::Kangra, 3),
            prediction(StyleName::Pichwai, 4),
        ];
        assert!(matches!(
            compare(&inputs),
            Err(IkaraError::TooManySlots { max: 3 })
        ));
    }
}
