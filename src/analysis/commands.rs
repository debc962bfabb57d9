use tauri::State;

use crate::{
    analysis::models::{ClassCatalog, ServiceHealth},
    AppState,
};

#[tauri::command]
pub async fn check_service_health(state: State<'_, AppState>) -> Result<ServiceHealth, String> {
    state.analysis.health().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_classes(state: State<'_, AppState>) -> Result<ClassCatalog, String> {
    state.analysis.classes().await.map_err(|e| e.to_string())
}
