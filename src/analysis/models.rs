use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    /// The service tags its synthetic "Other / Unknown" entry as `uncertain`.
    #[serde(alias = "uncertain")]
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub label: String,
    pub percentage: f64,
    pub confidence_tier: ConfidenceTier,
}

impl Prediction {
    pub fn new(label: impl Into<String>, percentage: f64, confidence_tier: ConfidenceTier) -> Self {
        Self {
            label: label.into(),
            percentage,
            confidence_tier,
        }
    }
}

/// Ranked classifier output, non-empty, in the order the service sent it. Index 0
/// is the service's verdict and is never reordered: below its confidence floor the
/// service puts "Other / Unknown" first even when a named class scores higher.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    predictions: Vec<Prediction>,
}

impl ClassificationResult {
    pub fn new(mut predictions: Vec<Prediction>) -> Result<Self, ServiceError> {
        if predictions.is_empty() {
            return Err(ServiceError::Malformed("empty predictions list".into()));
        }
        for prediction in &mut predictions {
            if !prediction.percentage.is_finite() {
                return Err(ServiceError::Malformed(format!(
                    "non-numeric percentage for {}",
                    prediction.label
                )));
            }
            prediction.percentage = prediction.percentage.clamp(0.0, 100.0);
        }
        Ok(Self { predictions })
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn dominant(&self) -> &Prediction {
        &self.predictions[0]
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePrediction {
    #[serde(rename = "class")]
    label: String,
    percentage: f64,
    confidence: ConfidenceTier,
}

impl From<WirePrediction> for Prediction {
    fn from(wire: WirePrediction) -> Self {
        Prediction::new(wire.label, wire.percentage, wire.confidence)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub predictions: Option<Vec<WirePrediction>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ServiceHealth {
    pub fn is_ready(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassCatalog {
    pub classes: Vec<String>,
    #[serde(default)]
    pub count: usize,
}
