//! Pure mapping from a classification result to what the results panel shows.

use serde::Serialize;

use crate::{
    content::{condition_blurb, text, ConditionBlurb, TextKey},
    context::Language,
};

use super::models::{ClassificationResult, ConfidenceTier};

/// Dominant percentages under this get the low-confidence banner.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStyle {
    pub severity: Severity,
    pub color: &'static str,
}

pub fn tier_style(tier: ConfidenceTier) -> TierStyle {
    match tier {
        ConfidenceTier::High => TierStyle {
            severity: Severity::Success,
            color: "#10b981",
        },
        ConfidenceTier::Medium => TierStyle {
            severity: Severity::Warning,
            color: "#f59e0b",
        },
        ConfidenceTier::Low => TierStyle {
            severity: Severity::Danger,
            color: "#ef4444",
        },
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub label: String,
    pub percentage: f64,
    pub display_percentage: String,
    pub tier: ConfidenceTier,
    pub severity: Severity,
    pub color: &'static str,
    pub dominant: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DominantCard {
    pub heading: String,
    pub label: String,
    pub percentage: f64,
    pub symptoms_label: &'static str,
    pub affected_label: &'static str,
    pub blurb: Option<ConditionBlurb>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub severity: Severity,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Disclaimer {
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatPrompt {
    pub button_label: &'static str,
    pub seed: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayModel {
    pub heading: &'static str,
    pub breakdown_heading: &'static str,
    pub dominant: DominantCard,
    pub bars: Vec<Bar>,
    pub warning: Option<Banner>,
    pub chat_prompt: ChatPrompt,
    pub disclaimer: Disclaimer,
}

pub fn present(result: &ClassificationResult, language: Language) -> DisplayModel {
    let bars = result
        .predictions()
        .iter()
        .enumerate()
        .map(|(index, prediction)| {
            let style = tier_style(prediction.confidence_tier);
            Bar {
                label: prediction.label.clone(),
                percentage: prediction.percentage,
                display_percentage: format!("{:.1}%", prediction.percentage),
                tier: prediction.confidence_tier,
                severity: style.severity,
                color: style.color,
                dominant: index == 0,
            }
        })
        .collect();

    let top = result.dominant();
    let dominant = DominantCard {
        heading: format!("{} {}", text(language, TextKey::MostLikely), top.label),
        label: top.label.clone(),
        percentage: top.percentage,
        symptoms_label: text(language, TextKey::Symptoms),
        affected_label: text(language, TextKey::AffectedAreas),
        blurb: condition_blurb(&top.label, language),
    };

    let warning = (top.percentage < LOW_CONFIDENCE_THRESHOLD).then(|| Banner {
        severity: Severity::Warning,
        text: text(language, TextKey::LowConfidenceBanner),
    });

    DisplayModel {
        heading: text(language, TextKey::ResultsHeading),
        breakdown_heading: text(language, TextKey::ConfidenceBreakdown),
        dominant,
        bars,
        warning,
        chat_prompt: ChatPrompt {
            button_label: text(language, TextKey::AskAssistant),
            seed: format_chat_seed(&top.label, language),
        },
        disclaimer: Disclaimer {
            title: text(language, TextKey::DisclaimerTitle),
            text: text(language, TextKey::DisclaimerText),
        },
    }
}

/// Question prefilled when the user asks the assistant about a label.
pub fn format_chat_seed(label: &str, language: Language) -> String {
    match language {
        Language::En => format!("Tell me more about {label} and how to manage it"),
        Language::Tr => {
            format!("{label} hakkında daha fazla bilgi ve nasıl yönetileceğini söyler misiniz")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Prediction;

    fn sample() -> ClassificationResult {
        ClassificationResult::new(vec![
            Prediction::new("acne", 72.0, ConfidenceTier::High),
            Prediction::new("eczema", 18.0, ConfidenceTier::Low),
            Prediction::new("vitiligo", 10.0, ConfidenceTier::Low),
        ])
        .unwrap()
    }

    #[test]
    fn three_bars_summing_to_one_hundred() {
        let model = present(&sample(), Language::En);

        assert_eq!(model.bars.len(), 3);
        let total: f64 = model.bars.iter().map(|bar| bar.percentage).sum();
        assert!((total - 100.0).abs() <= 0.1);
        assert_eq!(model.dominant.label, "acne");
        assert!(model.bars[0].dominant);
        assert!(model.bars[1..].iter().all(|bar| !bar.dominant));
        assert_eq!(model.disclaimer.text, text(Language::En, TextKey::DisclaimerText));
    }

    #[test]
    fn tiers_map_to_fixed_colors() {
        let model = present(&sample(), Language::En);
        assert_eq!(model.bars[0].color, "#10b981");
        assert_eq!(model.bars[1].severity, Severity::Danger);
        assert_eq!(
            tier_style(ConfidenceTier::Medium).severity,
            Severity::Warning
        );
    }

    #[test]
    fn confident_result_has_blurb_and_no_banner() {
        let model = present(&sample(), Language::Tr);
        assert!(model.dominant.blurb.is_some());
        assert!(model.warning.is_none());
        assert_eq!(model.bars[0].display_percentage, "72.0%");
    }

    #[test]
    fn unknown_verdict_stays_dominant_over_higher_class() {
        let result = ClassificationResult::new(vec![
            Prediction::new("Other / Unknown", 45.0, ConfidenceTier::Low),
            Prediction::new("Acne", 55.0, ConfidenceTier::Medium),
            Prediction::new("Eczema", 30.0, ConfidenceTier::Low),
            Prediction::new("Vitiligo", 15.0, ConfidenceTier::Low),
        ])
        .unwrap();
        let model = present(&result, Language::En);

        assert_eq!(model.dominant.label, "Other / Unknown");
        assert_eq!(model.dominant.heading, "Most Likely: Other / Unknown");
        assert!(model.dominant.blurb.is_none());
        assert!(model.warning.is_some());
        assert!(model.bars[0].dominant);
        assert_eq!(model.bars[1].label, "Acne");
        assert_eq!(
            model.chat_prompt.seed,
            "Tell me more about Other / Unknown and how to manage it"
        );
    }

    #[test]
    fn chat_seed_is_localized() {
        assert_eq!(
            format_chat_seed("Acne", Language::En),
            "Tell me more about Acne and how to manage it"
        );
        assert!(format_chat_seed("Akne", Language::Tr).starts_with("Akne hakkında"));
    }
}
