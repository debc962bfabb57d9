use serde::{Deserialize, Serialize};

use crate::{
    analysis::ClassificationResult,
    media::{asset::AssetSummary, ImageAsset},
};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UiPhase {
    #[default]
    Idle,
    Previewing,
    Analyzing,
    ResultsShown,
    Errored,
}

#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub phase: UiPhase,
    pub pending: Option<ImageAsset>,
    pub result: Option<ClassificationResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSnapshot {
    pub phase: UiPhase,
    pub pending: Option<AssetSummary>,
    pub submit_enabled: bool,
    pub result: Option<ClassificationResult>,
    pub error: Option<String>,
}

impl UploadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A staged asset and nothing in flight. Results and errors keep the trigger
    /// live so the same photo can be re-analyzed.
    pub fn submit_enabled(&self) -> bool {
        self.pending.is_some()
            && matches!(
                self.phase,
                UiPhase::Previewing | UiPhase::ResultsShown | UiPhase::Errored
            )
    }

    pub fn is_analyzing(&self) -> bool {
        self.phase == UiPhase::Analyzing
    }

    pub fn stage(&mut self, asset: ImageAsset) {
        *self = Self {
            phase: UiPhase::Previewing,
            pending: Some(asset),
            result: None,
            error: None,
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Moves to `Analyzing` and hands back the asset to submit, or `None` when the
    /// trigger is disabled.
    pub fn begin_analysis(&mut self) -> Option<ImageAsset> {
        if !self.submit_enabled() {
            return None;
        }
        self.phase = UiPhase::Analyzing;
        self.error = None;
        self.pending.clone()
    }

    pub fn finish_success(&mut self, result: ClassificationResult) {
        self.result = Some(result);
        self.error = None;
        self.phase = UiPhase::ResultsShown;
    }

    pub fn finish_failure(&mut self, message: String) {
        self.result = None;
        self.error = Some(message);
        self.phase = UiPhase::Errored;
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        UploadSnapshot {
            phase: self.phase,
            pending: self.pending.as_ref().map(ImageAsset::summary),
            submit_enabled: self.submit_enabled(),
            result: self.result.clone(),
            error: self.error.clone(),
        }
    }
}
