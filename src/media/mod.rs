pub mod asset;
pub mod bridge;
pub mod capture;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod validator;

pub use asset::{ImageAsset, SourceKind};
pub use bridge::WebviewCamera;
pub use capture::{CameraBackend, CaptureState, FacingMode, MediaCaptureSession};
pub use validator::validate;
