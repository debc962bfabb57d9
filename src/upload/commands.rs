use std::path::PathBuf;

use tauri::State;

use crate::{
    analysis::DisplayModel,
    upload::{UploadController, UploadSnapshot},
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> UploadController {
    state.upload.clone()
}

#[tauri::command]
pub async fn get_upload_state(state: State<'_, AppState>) -> Result<UploadSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.snapshot().await)
}

#[tauri::command]
pub async fn select_image_file(
    state: State<'_, AppState>,
    path: PathBuf,
) -> Result<UploadSnapshot, String> {
    let controller = controller_from_state(&state);
    let language = state.settings.context().language;
    controller
        .select_file(&path, language)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn accept_image_data(
    state: State<'_, AppState>,
    file_name: String,
    data_uri: String,
) -> Result<UploadSnapshot, String> {
    let controller = controller_from_state(&state);
    let language = state.settings.context().language;
    controller
        .accept_data_uri(&file_name, &data_uri, language)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn capture_photo(state: State<'_, AppState>) -> Result<UploadSnapshot, String> {
    let controller = controller_from_state(&state);
    let language = state.settings.context().language;
    let mut camera = state.camera.lock().await;
    controller
        .capture_from(&mut camera, language)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn remove_pending_image(state: State<'_, AppState>) -> Result<UploadSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.remove_pending().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_pending_preview(state: State<'_, AppState>) -> Result<Option<String>, String> {
    let controller = controller_from_state(&state);
    controller.pending_preview().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn submit_image(state: State<'_, AppState>) -> Result<UploadSnapshot, String> {
    let controller = controller_from_state(&state);
    let language = state.settings.context().language;
    Ok(controller.submit(language).await)
}

#[tauri::command]
pub async fn get_results(state: State<'_, AppState>) -> Result<Option<DisplayModel>, String> {
    let controller = controller_from_state(&state);
    let language = state.settings.context().language;
    Ok(controller.present(language).await)
}
