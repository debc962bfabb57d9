use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;

use crate::{
    analysis::{present, ClassificationResult, ClassificationService, DisplayModel},
    content::{text, TextKey},
    context::Language,
    error::{CoreError, CoreResult},
    events::{CoreEvent, EventSink, Notice, NoticeCode},
    log_info, log_warn,
    media::{
        asset::{mime_for_path, SourceKind},
        validate, validator::validate_parts, ImageAsset, MediaCaptureSession,
    },
};

use super::{UploadSnapshot, UploadState};

const ENABLE_LOGS: bool = true;

/// Owns the pending-image slot and the upload phase for one upload flow.
#[derive(Clone)]
pub struct UploadController {
    state: Arc<Mutex<UploadState>>,
    analysis: Arc<dyn ClassificationService>,
    events: Arc<dyn EventSink>,
}

impl UploadController {
    pub fn new(analysis: Arc<dyn ClassificationService>, events: Arc<dyn EventSink>) -> Self {
        Self {
            state: Arc::new(Mutex::new(UploadState::new())),
            analysis,
            events,
        }
    }

    pub async fn snapshot(&self) -> UploadSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn last_result(&self) -> Option<ClassificationResult> {
        self.state.lock().await.result.clone()
    }

    pub async fn present(&self, language: Language) -> Option<DisplayModel> {
        self.last_result()
            .await
            .map(|result| present(&result, language))
    }

    /// Data URI of the staged image for the preview pane.
    pub async fn pending_preview(&self) -> CoreResult<Option<String>> {
        let state = self.state.lock().await;
        state
            .pending
            .as_ref()
            .map(ImageAsset::to_data_uri)
            .transpose()
    }

    /// File picker input. Type and size are checked before the file is read.
    pub async fn select_file(&self, path: &Path, language: Language) -> CoreResult<UploadSnapshot> {
        let (file_name, mime_type, bytes) = self.read_checked(path, language).await?;
        self.accept(
            ImageAsset::from_bytes(SourceKind::File, file_name, mime_type, bytes),
            language,
        )
        .await
    }

    /// Files dropped onto the window. Only the first one is considered; an empty
    /// drop leaves everything as it was.
    pub async fn accept_dropped_paths(
        &self,
        paths: &[PathBuf],
        language: Language,
    ) -> CoreResult<UploadSnapshot> {
        let Some(path) = paths.first() else {
            return Ok(self.snapshot().await);
        };
        if paths.len() > 1 {
            log_info!("{} files dropped, using {}", paths.len(), path.display());
        }

        let (file_name, mime_type, bytes) = self.read_checked(path, language).await?;
        self.accept_dropped(&file_name, mime_type, bytes, language)
            .await
    }

    async fn read_checked(
        &self,
        path: &Path,
        language: Language,
    ) -> CoreResult<(String, &'static str, Vec<u8>)> {
        let display_path = path.display().to_string();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| CoreError::Io {
                path: display_path.clone(),
                source,
            })?;
        let mime_type = mime_for_path(path);

        if let Err(err) = validate_parts(mime_type, metadata.len()) {
            self.reject(Notice::validation(err, language));
            return Err(err.into());
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| CoreError::Io {
            path: display_path,
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok((file_name, mime_type, bytes))
    }

    /// Webview file input, delivered as a data URI.
    pub async fn accept_data_uri(
        &self,
        file_name: &str,
        data_uri: &str,
        language: Language,
    ) -> CoreResult<UploadSnapshot> {
        match ImageAsset::from_data_uri(SourceKind::File, file_name, data_uri) {
            Ok(asset) => self.accept(asset, language).await,
            Err(err) => {
                self.reject(Notice::new(
                    NoticeCode::InvalidImage,
                    text(language, TextKey::NoticeNotAnImage),
                ));
                Err(err)
            }
        }
    }

    pub async fn accept_dropped(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
        language: Language,
    ) -> CoreResult<UploadSnapshot> {
        self.accept(
            ImageAsset::from_bytes(SourceKind::File, file_name, mime_type, bytes),
            language,
        )
        .await
    }

    /// Snapshots the camera and stages the frame. The device is released once the
    /// frame is taken, whether or not the frame is accepted.
    pub async fn capture_from(
        &self,
        session: &mut MediaCaptureSession,
        language: Language,
    ) -> CoreResult<UploadSnapshot> {
        if self.state.lock().await.is_analyzing() {
            self.reject(Notice::new(
                NoticeCode::AnalysisBusy,
                text(language, TextKey::NoticeBusy),
            ));
            return Err(CoreError::Busy);
        }

        let captured = session.capture().await;
        session.close();

        match captured {
            Ok(asset) => self.accept(asset, language).await,
            Err(err) => {
                self.reject(Notice::device(err, language));
                Err(err.into())
            }
        }
    }

    /// Funnels a candidate through validation into the pending slot. A rejected
    /// candidate leaves phase and pending asset untouched.
    pub async fn accept(&self, asset: ImageAsset, language: Language) -> CoreResult<UploadSnapshot> {
        let mut state = self.state.lock().await;
        if state.is_analyzing() {
            log_warn!("ignoring {} while an analysis is in flight", asset.file_name);
            self.reject(Notice::new(
                NoticeCode::AnalysisBusy,
                text(language, TextKey::NoticeBusy),
            ));
            return Err(CoreError::Busy);
        }

        if let Err(err) = validate(&asset) {
            log_info!("rejected {}: {}", asset.file_name, err);
            self.reject(Notice::validation(err, language));
            return Err(err.into());
        }

        log_info!(
            "staged {} ({:?}, {} bytes)",
            asset.file_name,
            asset.source_kind,
            asset.size_bytes
        );
        state.stage(asset);
        let snapshot = state.snapshot();
        self.events.emit(CoreEvent::UploadChanged(snapshot.clone()));
        Ok(snapshot)
    }

    pub async fn remove_pending(&self) -> CoreResult<UploadSnapshot> {
        let mut state = self.state.lock().await;
        if state.is_analyzing() {
            return Err(CoreError::Busy);
        }
        state.clear();
        let snapshot = state.snapshot();
        self.events.emit(CoreEvent::UploadChanged(snapshot.clone()));
        Ok(snapshot)
    }

    /// Sends the staged image for analysis. A no-op returning the current snapshot
    /// when the trigger is disabled.
    pub async fn submit(&self, language: Language) -> UploadSnapshot {
        let asset = {
            let mut state = self.state.lock().await;
            let Some(asset) = state.begin_analysis() else {
                log_info!("submit ignored in phase {:?}", state.phase);
                return state.snapshot();
            };
            self.events.emit(CoreEvent::UploadChanged(state.snapshot()));
            asset
        };

        let outcome = self.analysis.analyze(&asset).await;

        let mut state = self.state.lock().await;
        match outcome {
            Ok(result) => {
                log_info!(
                    "analysis finished: {} at {:.1}%",
                    result.dominant().label,
                    result.dominant().percentage
                );
                state.finish_success(result);
            }
            Err(err) => {
                let notice = Notice::analysis(&err, language);
                let message = notice
                    .detail
                    .clone()
                    .unwrap_or_else(|| notice.message.clone());
                state.finish_failure(message);
                self.events.emit(CoreEvent::Notice(notice));
            }
        }
        let snapshot = state.snapshot();
        self.events.emit(CoreEvent::UploadChanged(snapshot.clone()));
        snapshot
    }

    fn reject(&self, notice: Notice) {
        self.events.emit(CoreEvent::Notice(notice));
    }
}
