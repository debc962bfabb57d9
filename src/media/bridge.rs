//! Camera backend served by the webview's media devices.
//!
//! The core decides when a device is acquired, snapshotted or released; the
//! webview only executes those requests and answers them by request id. Each
//! `acquire`/`snapshot` suspends until the matching answer arrives or the reply
//! timeout elapses, whichever comes first.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::{
    error::DeviceError,
    events::{CoreEvent, EventSink},
    log_debug, log_error, log_warn,
};

use super::{
    asset::{ImageAsset, SourceKind, CAPTURE_FILE_NAME},
    capture::{CameraBackend, CameraDeviceHandle, FacingMode},
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CameraRequest {
    #[serde(rename_all = "camelCase")]
    Acquire {
        request_id: u64,
        facing_mode: FacingMode,
    },
    #[serde(rename_all = "camelCase")]
    Snapshot { request_id: u64, handle_id: u64 },
    #[serde(rename_all = "camelCase")]
    Release { handle_id: u64 },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CameraReply {
    Granted,
    Denied {
        reason: DeviceError,
    },
    #[serde(rename_all = "camelCase")]
    Frame {
        data_uri: String,
    },
}

pub struct WebviewCamera {
    events: Arc<dyn EventSink>,
    pending: Mutex<HashMap<u64, oneshot::Sender<CameraReply>>>,
    next_request: AtomicU64,
    reply_timeout: Duration,
}

impl WebviewCamera {
    pub fn new(events: Arc<dyn EventSink>, reply_timeout: Duration) -> Self {
        Self {
            events,
            pending: Mutex::new(HashMap::new()),
            next_request: AtomicU64::new(1),
            reply_timeout,
        }
    }

    /// Delivers the webview's answer. Returns `false` for unknown or already
    /// answered request ids.
    pub fn resolve(&self, request_id: u64, reply: CameraReply) -> bool {
        let sender = match self.pending.lock() {
            Ok(mut guard) => guard.remove(&request_id),
            Err(poisoned) => poisoned.into_inner().remove(&request_id),
        };
        match sender {
            Some(sender) => sender.send(reply).is_ok(),
            None => {
                log_warn!("camera reply for unknown request {}", request_id);
                false
            }
        }
    }

    fn register(&self) -> (u64, oneshot::Receiver<CameraReply>) {
        let request_id = self.next_request.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        match self.pending.lock() {
            Ok(mut guard) => guard.insert(request_id, tx),
            Err(poisoned) => poisoned.into_inner().insert(request_id, tx),
        };
        (request_id, rx)
    }

    fn forget(&self, request_id: u64) {
        match self.pending.lock() {
            Ok(mut guard) => guard.remove(&request_id),
            Err(poisoned) => poisoned.into_inner().remove(&request_id),
        };
    }

    /// Waits for the answer to `request_id`. An unanswered request is dropped
    /// from the pending table so a late reply is refused.
    async fn await_reply(
        &self,
        request_id: u64,
        rx: oneshot::Receiver<CameraReply>,
    ) -> Result<CameraReply, DeviceError> {
        match tokio::time::timeout(self.reply_timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(DeviceError::DeviceUnavailable),
            Err(_) => {
                self.forget(request_id);
                log_error!(
                    "camera request {} unanswered after {:?}",
                    request_id,
                    self.reply_timeout
                );
                Err(DeviceError::DeviceUnavailable)
            }
        }
    }
}

#[async_trait]
impl CameraBackend for WebviewCamera {
    async fn acquire(&self, facing: FacingMode) -> Result<CameraDeviceHandle, DeviceError> {
        let (request_id, rx) = self.register();
        log_debug!("camera acquire request {} ({:?})", request_id, facing);
        self.events.emit(CoreEvent::CameraRequest(CameraRequest::Acquire {
            request_id,
            facing_mode: facing,
        }));

        match self.await_reply(request_id, rx).await {
            Ok(CameraReply::Granted) => Ok(CameraDeviceHandle::new(request_id, facing)),
            Ok(CameraReply::Denied { reason }) => Err(reason),
            Ok(CameraReply::Frame { .. }) => Err(DeviceError::DeviceUnavailable),
            Err(err) => {
                // A stream the webview opens after giving up is never owned here.
                self.events.emit(CoreEvent::CameraRequest(CameraRequest::Release {
                    handle_id: request_id,
                }));
                Err(err)
            }
        }
    }

    async fn snapshot(&self, handle: &CameraDeviceHandle) -> Result<Vec<u8>, DeviceError> {
        let (request_id, rx) = self.register();
        self.events.emit(CoreEvent::CameraRequest(CameraRequest::Snapshot {
            request_id,
            handle_id: handle.id(),
        }));

        match self.await_reply(request_id, rx).await? {
            CameraReply::Frame { data_uri } => {
                ImageAsset::from_data_uri(SourceKind::Capture, CAPTURE_FILE_NAME, &data_uri)
                    .and_then(|asset| asset.bytes().map(|bytes| bytes.into_owned()))
                    .map_err(|err| {
                        log_warn!("unreadable camera frame: {}", err);
                        DeviceError::DeviceUnavailable
                    })
            }
            CameraReply::Denied { reason } => Err(reason),
            CameraReply::Granted => Err(DeviceError::DeviceUnavailable),
        }
    }

    fn release(&self, handle: CameraDeviceHandle) {
        self.events.emit(CoreEvent::CameraRequest(CameraRequest::Release {
            handle_id: handle.id(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use crate::media::capture::{CaptureState, MediaCaptureSession};

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn next_request(sink: &MemorySink, seen: usize) -> CameraRequest {
        for _ in 0..100 {
            let requests = sink.camera_requests();
            if requests.len() > seen {
                return requests[seen].clone();
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("no camera request emitted");
    }

    #[tokio::test]
    async fn granted_acquire_yields_handle_for_request() {
        let sink = Arc::new(MemorySink::new());
        let camera = Arc::new(WebviewCamera::new(sink.clone(), TIMEOUT));

        let task = {
            let camera = camera.clone();
            tokio::spawn(async move { camera.acquire(FacingMode::User).await })
        };

        let CameraRequest::Acquire { request_id, facing_mode } = next_request(&sink, 0).await else {
            panic!("expected acquire request");
        };
        assert_eq!(facing_mode, FacingMode::User);
        assert!(camera.resolve(request_id, CameraReply::Granted));

        let handle = task.await.unwrap().unwrap();
        assert_eq!(handle.id(), request_id);
        assert_eq!(handle.facing(), FacingMode::User);
    }

    #[tokio::test]
    async fn denied_acquire_surfaces_reason() {
        let sink = Arc::new(MemorySink::new());
        let camera = Arc::new(WebviewCamera::new(sink.clone(), TIMEOUT));

        let task = {
            let camera = camera.clone();
            tokio::spawn(async move { camera.acquire(FacingMode::Environment).await })
        };
        let CameraRequest::Acquire { request_id, .. } = next_request(&sink, 0).await else {
            panic!("expected acquire request");
        };
        camera.resolve(
            request_id,
            CameraReply::Denied {
                reason: DeviceError::PermissionDenied,
            },
        );

        assert_eq!(task.await.unwrap().unwrap_err(), DeviceError::PermissionDenied);
    }

    #[tokio::test]
    async fn snapshot_decodes_frame() {
        let sink = Arc::new(MemorySink::new());
        let camera = Arc::new(WebviewCamera::new(sink.clone(), TIMEOUT));
        let handle = CameraDeviceHandle::new(42, FacingMode::Environment);

        let task = {
            let camera = camera.clone();
            tokio::spawn(async move { camera.snapshot(&handle).await })
        };
        let CameraRequest::Snapshot { request_id, handle_id } = next_request(&sink, 0).await else {
            panic!("expected snapshot request");
        };
        assert_eq!(handle_id, 42);
        camera.resolve(
            request_id,
            CameraReply::Frame {
                data_uri: format!("data:image/jpeg;base64,{}", STANDARD.encode([0xFF, 0xD8])),
            },
        );

        assert_eq!(task.await.unwrap().unwrap(), vec![0xFF, 0xD8]);
    }

    #[test]
    fn unknown_reply_is_ignored() {
        let camera = WebviewCamera::new(Arc::new(MemorySink::new()), TIMEOUT);
        assert!(!camera.resolve(7, CameraReply::Granted));
    }

    #[test]
    fn release_is_published() {
        let sink = Arc::new(MemorySink::new());
        let camera = WebviewCamera::new(sink.clone(), TIMEOUT);
        camera.release(CameraDeviceHandle::new(3, FacingMode::User));
        assert_eq!(
            sink.camera_requests(),
            vec![CameraRequest::Release { handle_id: 3 }]
        );
    }

    #[test]
    fn replies_parse_from_webview_json() {
        let reply: CameraReply =
            serde_json::from_str(r#"{"outcome":"denied","reason":"permission-denied"}"#).unwrap();
        assert_eq!(
            reply,
            CameraReply::Denied {
                reason: DeviceError::PermissionDenied
            }
        );
        let frame: CameraReply =
            serde_json::from_str(r#"{"outcome":"frame","dataUri":"data:image/jpeg;base64,AA=="}"#)
                .unwrap();
        assert!(matches!(frame, CameraReply::Frame { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_acquire_times_out() {
        let sink = Arc::new(MemorySink::new());
        let camera = WebviewCamera::new(sink.clone(), TIMEOUT);

        let err = camera.acquire(FacingMode::User).await.unwrap_err();
        assert_eq!(err, DeviceError::DeviceUnavailable);

        let requests = sink.camera_requests();
        let CameraRequest::Acquire { request_id, .. } = requests[0].clone() else {
            panic!("expected acquire request");
        };
        assert_eq!(requests[1], CameraRequest::Release { handle_id: request_id });
        assert!(!camera.resolve(request_id, CameraReply::Granted));
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_snapshot_times_out() {
        let sink = Arc::new(MemorySink::new());
        let camera = WebviewCamera::new(sink.clone(), TIMEOUT);
        let handle = CameraDeviceHandle::new(9, FacingMode::Environment);

        let started = tokio::time::Instant::now();
        let err = camera.snapshot(&handle).await.unwrap_err();

        assert_eq!(err, DeviceError::DeviceUnavailable);
        assert!(started.elapsed() >= TIMEOUT);
        let CameraRequest::Snapshot { request_id, .. } = sink.camera_requests()[0].clone() else {
            panic!("expected snapshot request");
        };
        assert!(!camera.resolve(request_id, CameraReply::Frame { data_uri: String::new() }));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_webview_does_not_wedge_the_session() {
        let sink = Arc::new(MemorySink::new());
        let camera = Arc::new(WebviewCamera::new(sink.clone(), TIMEOUT));
        let session = Arc::new(tokio::sync::Mutex::new(MediaCaptureSession::new(
            camera,
            sink.clone(),
        )));

        let opener = tokio::spawn({
            let session = session.clone();
            async move { session.lock().await.open(FacingMode::Environment).await }
        });
        assert!(matches!(
            next_request(&sink, 0).await,
            CameraRequest::Acquire { .. }
        ));

        let closed = session.lock().await.close();
        assert_eq!(closed.state, CaptureState::Closed);
        assert_eq!(
            opener.await.unwrap().unwrap_err(),
            DeviceError::DeviceUnavailable
        );
        assert_eq!(session.lock().await.state(), CaptureState::Closed);
    }
}
