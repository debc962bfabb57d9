use std::sync::Mutex;

use serde::Serialize;

use crate::{
    chat::ChatSnapshot,
    content::{text, TextKey},
    context::{Language, SessionContext},
    error::{DeviceError, ServiceError, ValidationError},
    media::{bridge::CameraRequest, capture::CameraSnapshot},
    upload::UploadSnapshot,
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeCode {
    NotAnImage,
    TooLarge,
    CameraPermissionDenied,
    CameraUnavailable,
    CameraNotOpen,
    AnalysisFailed,
    AnalysisBusy,
    InvalidImage,
}

/// Alert payload for the presentation layer's toast/alert renderer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub code: NoticeCode,
    pub message: String,
    /// Server-provided detail, when there was one.
    pub detail: Option<String>,
}

impl Notice {
    pub fn new(code: NoticeCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
        }
    }

    pub fn validation(err: ValidationError, language: Language) -> Self {
        match err {
            ValidationError::NotAnImage => {
                Self::new(NoticeCode::NotAnImage, text(language, TextKey::NoticeNotAnImage))
            }
            ValidationError::TooLarge => {
                Self::new(NoticeCode::TooLarge, text(language, TextKey::NoticeTooLarge))
            }
        }
    }

    pub fn device(err: DeviceError, language: Language) -> Self {
        match err {
            DeviceError::PermissionDenied => Self::new(
                NoticeCode::CameraPermissionDenied,
                text(language, TextKey::NoticeCameraDenied),
            ),
            DeviceError::DeviceUnavailable => Self::new(
                NoticeCode::CameraUnavailable,
                text(language, TextKey::NoticeCameraUnavailable),
            ),
            DeviceError::NotOpen => Self::new(
                NoticeCode::CameraNotOpen,
                text(language, TextKey::NoticeCameraUnavailable),
            ),
        }
    }

    pub fn analysis(err: &ServiceError, language: Language) -> Self {
        Self {
            code: NoticeCode::AnalysisFailed,
            message: text(language, TextKey::NoticeAnalysisFailed).to_string(),
            detail: err.server_message().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum CoreEvent {
    UploadChanged(UploadSnapshot),
    CameraChanged(CameraSnapshot),
    CameraRequest(CameraRequest),
    ChatChanged(ChatSnapshot),
    Notice(Notice),
    PreferencesChanged(SessionContext),
}

impl CoreEvent {
    /// Event name the webview subscribes to.
    pub fn name(&self) -> &'static str {
        match self {
            CoreEvent::UploadChanged(_) => "upload-changed",
            CoreEvent::CameraChanged(_) => "camera-changed",
            CoreEvent::CameraRequest(_) => "camera-request",
            CoreEvent::ChatChanged(_) => "chat-changed",
            CoreEvent::Notice(_) => "notice",
            CoreEvent::PreferencesChanged(_) => "preferences-changed",
        }
    }
}

/// Where the core publishes state changes. The desktop shell forwards them to the
/// webview; headless embedders can collect them in memory.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CoreEvent);
}

/// Keeps every emitted event, in order.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<CoreEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CoreEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                CoreEvent::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn camera_requests(&self) -> Vec<CameraRequest> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                CoreEvent::CameraRequest(request) => Some(request),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: CoreEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(feature = "desktop")]
pub use desktop::TauriEvents;

#[cfg(feature = "desktop")]
mod desktop {
    use tauri::{AppHandle, Emitter};

    use super::{CoreEvent, EventSink};

    pub struct TauriEvents {
        app_handle: AppHandle,
    }

    impl TauriEvents {
        pub fn new(app_handle: AppHandle) -> Self {
            Self { app_handle }
        }
    }

    impl EventSink for TauriEvents {
        fn emit(&self, event: CoreEvent) {
            let name = event.name();
            let result = match &event {
                CoreEvent::UploadChanged(payload) => self.app_handle.emit(name, payload),
                CoreEvent::CameraChanged(payload) => self.app_handle.emit(name, payload),
                CoreEvent::CameraRequest(payload) => self.app_handle.emit(name, payload),
                CoreEvent::ChatChanged(payload) => self.app_handle.emit(name, payload),
                CoreEvent::Notice(payload) => self.app_handle.emit(name, payload),
                CoreEvent::PreferencesChanged(payload) => self.app_handle.emit(name, payload),
            };
            if let Err(err) = result {
                log::warn!("failed to emit {name}: {err}");
            }
        }
    }
}
