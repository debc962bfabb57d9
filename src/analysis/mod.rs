pub mod client;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod models;
pub mod presenter;

pub use client::{AnalysisClient, ClassificationService};
pub use models::{ClassificationResult, ConfidenceTier, Prediction};
pub use presenter::{format_chat_seed, present, DisplayModel};
