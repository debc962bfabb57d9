use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::DeviceError,
    events::{CoreEvent, EventSink},
    log_info, log_warn,
};

use super::asset::{ImageAsset, SourceKind, CAPTURE_FILE_NAME, CAPTURE_MIME_TYPE};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FacingMode {
    #[default]
    Environment,
    User,
}

impl FacingMode {
    pub fn opposite(&self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CaptureState {
    Closed,
    Opening,
    Open,
    Capturing,
}

/// Ownership token for a live camera stream. Not `Clone`: whoever holds it owns
/// the device, and giving it back to [`CameraBackend::release`] consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct CameraDeviceHandle {
    id: u64,
    facing: FacingMode,
}

impl CameraDeviceHandle {
    pub fn new(id: u64, facing: FacingMode) -> Self {
        Self { id, facing }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }
}

#[async_trait]
pub trait CameraBackend: Send + Sync {
    async fn acquire(&self, facing: FacingMode) -> Result<CameraDeviceHandle, DeviceError>;

    /// Still frame from the live stream, JPEG encoded.
    async fn snapshot(&self, handle: &CameraDeviceHandle) -> Result<Vec<u8>, DeviceError>;

    fn release(&self, handle: CameraDeviceHandle);
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CameraSnapshot {
    pub state: CaptureState,
    pub facing_mode: FacingMode,
}

/// Exclusive owner of at most one camera handle.
pub struct MediaCaptureSession {
    backend: Arc<dyn CameraBackend>,
    events: Arc<dyn EventSink>,
    state: CaptureState,
    facing: FacingMode,
    handle: Option<CameraDeviceHandle>,
}

impl MediaCaptureSession {
    pub fn new(backend: Arc<dyn CameraBackend>, events: Arc<dyn EventSink>) -> Self {
        Self {
            backend,
            events,
            state: CaptureState::Closed,
            facing: FacingMode::default(),
            handle: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn facing_mode(&self) -> FacingMode {
        self.facing
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            state: self.state,
            facing_mode: self.facing,
        }
    }

    pub async fn open(&mut self, facing: FacingMode) -> Result<CameraSnapshot, DeviceError> {
        self.release_handle();
        self.facing = facing;
        self.set_state(CaptureState::Opening);

        match self.backend.acquire(facing).await {
            Ok(handle) => {
                log_info!("camera {} opened ({:?})", handle.id(), facing);
                self.handle = Some(handle);
                self.set_state(CaptureState::Open);
                Ok(self.snapshot())
            }
            Err(err) => {
                log_warn!("camera open failed ({:?}): {}", facing, err);
                self.set_state(CaptureState::Closed);
                Err(err)
            }
        }
    }

    /// Snapshots the live frame. The session stays open afterwards.
    pub async fn capture(&mut self) -> Result<ImageAsset, DeviceError> {
        if self.state != CaptureState::Open || self.handle.is_none() {
            return Err(DeviceError::NotOpen);
        }

        self.set_state(CaptureState::Capturing);
        let frame = match &self.handle {
            Some(handle) => self.backend.snapshot(handle).await,
            None => Err(DeviceError::NotOpen),
        };
        self.set_state(CaptureState::Open);

        let bytes = frame?;
        Ok(ImageAsset::from_bytes(
            SourceKind::Capture,
            CAPTURE_FILE_NAME,
            CAPTURE_MIME_TYPE,
            bytes,
        ))
    }

    /// Releases the current device, then opens the opposite facing mode. A failed
    /// reopen leaves the session closed with the new facing mode remembered.
    pub async fn switch_facing(&mut self) -> Result<CameraSnapshot, DeviceError> {
        let next = self.facing.opposite();
        self.close();
        self.open(next).await
    }

    pub fn close(&mut self) -> CameraSnapshot {
        self.release_handle();
        self.set_state(CaptureState::Closed);
        self.snapshot()
    }

    fn release_handle(&mut self) {
        if let Some(handle) = self.handle.take() {
            log_info!("camera {} released", handle.id());
            self.backend.release(handle);
        }
    }

    fn set_state(&mut self, next: CaptureState) {
        if self.state == next {
            return;
        }
        self.state = next;
        self.events.emit(CoreEvent::CameraChanged(self.snapshot()));
    }
}

impl Drop for MediaCaptureSession {
    fn drop(&mut self) {
        self.release_handle();
    }
}
