#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod phase;

pub use controller::UploadController;
pub use phase::{UiPhase, UploadSnapshot, UploadState};
