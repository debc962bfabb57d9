pub mod analysis;
pub mod chat;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod events;
pub mod media;
pub mod settings;
pub mod upload;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;

use analysis::AnalysisClient;
use chat::{ChatClient, ChatSession, ConversationService, LocalAssistant};
use config::AppConfig;
use events::EventSink;
use media::{MediaCaptureSession, WebviewCamera};
use settings::SettingsStore;
use upload::UploadController;

const ENABLE_LOGS: bool = true;

/// Everything the intent commands operate on, built once at startup.
pub struct AppState {
    pub settings: SettingsStore,
    pub events: Arc<dyn EventSink>,
    pub analysis: Arc<AnalysisClient>,
    pub upload: UploadController,
    pub camera: Arc<Mutex<MediaCaptureSession>>,
    pub camera_bridge: Arc<WebviewCamera>,
    pub chat: ChatSession,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        settings: SettingsStore,
        events: Arc<dyn EventSink>,
    ) -> anyhow::Result<Self> {
        let analysis =
            Arc::new(AnalysisClient::new(config).context("failed to build analysis client")?);

        let conversation: Arc<dyn ConversationService> = if config.offline_chat {
            log_info!("chat answers come from the local assistant");
            Arc::new(LocalAssistant)
        } else {
            Arc::new(ChatClient::new(config).context("failed to build chat client")?)
        };

        let camera_bridge = Arc::new(WebviewCamera::new(events.clone(), config.camera_timeout));
        let camera = MediaCaptureSession::new(camera_bridge.clone(), events.clone());

        Ok(Self {
            settings,
            upload: UploadController::new(analysis.clone(), events.clone()),
            chat: ChatSession::new(conversation, events.clone(), config.warning_delay),
            camera: Arc::new(Mutex::new(camera)),
            camera_bridge,
            analysis,
            events,
        })
    }
}

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;

    use tauri::{DragDropEvent, Manager, State, Window, WindowEvent};

    use crate::{
        analysis::commands::{check_service_health, list_classes},
        chat::commands::{clear_chat, discuss_condition, get_chat, send_chat_message},
        config::AppConfig,
        context::{Language, SessionContext, Theme},
        events::{CoreEvent, TauriEvents},
        media::commands::{camera_reply, close_camera, get_camera_state, open_camera, switch_camera},
        settings::SettingsStore,
        upload::commands::{
            accept_image_data, capture_photo, get_pending_preview, get_results, get_upload_state,
            remove_pending_image, select_image_file, submit_image,
        },
        AppState,
    };

    #[tauri::command]
    fn get_preferences(state: State<AppState>) -> Result<SessionContext, String> {
        Ok(state.settings.context())
    }

    #[tauri::command]
    fn set_language(language: Language, state: State<AppState>) -> Result<SessionContext, String> {
        let context = state
            .settings
            .set_language(language)
            .map_err(|e| e.to_string())?;
        state.events.emit(CoreEvent::PreferencesChanged(context));
        Ok(context)
    }

    #[tauri::command]
    fn set_theme(theme: Theme, state: State<AppState>) -> Result<SessionContext, String> {
        let context = state.settings.set_theme(theme).map_err(|e| e.to_string())?;
        state.events.emit(CoreEvent::PreferencesChanged(context));
        Ok(context)
    }

    /// Files dropped onto the window go through the same path as the file picker.
    fn handle_window_event(window: &Window, event: &WindowEvent) {
        let WindowEvent::DragDrop(DragDropEvent::Drop { paths, .. }) = event else {
            return;
        };
        let app = window.app_handle().clone();
        let paths = paths.clone();

        tauri::async_runtime::spawn(async move {
            let Some(state) = app.try_state::<AppState>() else {
                log::warn!("drop ignored, app state not ready");
                return;
            };
            let language = state.settings.context().language;
            if let Err(err) = state.upload.accept_dropped_paths(&paths, language).await {
                log::warn!("dropped file not staged: {}", err);
            }
        });
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        // Initialize logging (reads RUST_LOG env var)
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("DermAssist starting up...");

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .setup(|app| {
                let result = (|| -> anyhow::Result<()> {
                    let app_data_dir = app
                        .path()
                        .app_data_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    std::fs::create_dir_all(&app_data_dir)?;

                    let config = AppConfig::from_env();
                    log::info!("analysis service at {}", config.api_url);

                    let settings_path = app_data_dir.join("settings.json");
                    let settings_store = SettingsStore::new(settings_path)?;

                    let events = Arc::new(TauriEvents::new(app.handle().clone()));
                    app.manage(AppState::new(&config, settings_store, events)?);

                    Ok(())
                })();

                result.map_err(|err| err.into())
            })
            .on_window_event(handle_window_event)
            .invoke_handler(tauri::generate_handler![
                get_preferences,
                set_language,
                set_theme,
                get_upload_state,
                select_image_file,
                accept_image_data,
                capture_photo,
                remove_pending_image,
                get_pending_preview,
                submit_image,
                get_results,
                get_camera_state,
                open_camera,
                switch_camera,
                close_camera,
                camera_reply,
                get_chat,
                send_chat_message,
                discuss_condition,
                clear_chat,
                check_service_health,
                list_classes,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}

#[cfg(feature = "desktop")]
pub use desktop::run;
