use tauri::State;

use crate::{
    events::{CoreEvent, Notice},
    media::{bridge::CameraReply, capture::CameraSnapshot, FacingMode},
    AppState,
};

#[tauri::command]
pub async fn get_camera_state(state: State<'_, AppState>) -> Result<CameraSnapshot, String> {
    Ok(state.camera.lock().await.snapshot())
}

#[tauri::command]
pub async fn open_camera(
    state: State<'_, AppState>,
    facing_mode: Option<FacingMode>,
) -> Result<CameraSnapshot, String> {
    let language = state.settings.context().language;
    let mut camera = state.camera.lock().await;
    let facing = facing_mode.unwrap_or_else(|| camera.facing_mode());
    camera.open(facing).await.map_err(|e| {
        state.events.emit(CoreEvent::Notice(Notice::device(e, language)));
        e.to_string()
    })
}

#[tauri::command]
pub async fn switch_camera(state: State<'_, AppState>) -> Result<CameraSnapshot, String> {
    let language = state.settings.context().language;
    let mut camera = state.camera.lock().await;
    camera.switch_facing().await.map_err(|e| {
        state.events.emit(CoreEvent::Notice(Notice::device(e, language)));
        e.to_string()
    })
}

#[tauri::command]
pub async fn close_camera(state: State<'_, AppState>) -> Result<CameraSnapshot, String> {
    Ok(state.camera.lock().await.close())
}

/// Answer from the webview to a `camera-request` event.
#[tauri::command]
pub fn camera_reply(
    state: State<'_, AppState>,
    request_id: u64,
    reply: CameraReply,
) -> Result<bool, String> {
    Ok(state.camera_bridge.resolve(request_id, reply))
}
