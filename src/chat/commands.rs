use tauri::State;

use crate::{
    chat::{ChatSession, ChatSnapshot},
    AppState,
};

fn session_from_state(state: &State<'_, AppState>) -> ChatSession {
    state.chat.clone()
}

#[tauri::command]
pub async fn get_chat(state: State<'_, AppState>) -> Result<ChatSnapshot, String> {
    let session = session_from_state(&state);
    Ok(session.snapshot().await)
}

#[tauri::command]
pub async fn send_chat_message(
    state: State<'_, AppState>,
    message: String,
) -> Result<ChatSnapshot, String> {
    let session = session_from_state(&state);
    let language = state.settings.context().language;
    session
        .send(&message, language)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn discuss_condition(
    state: State<'_, AppState>,
    label: String,
) -> Result<ChatSnapshot, String> {
    let session = session_from_state(&state);
    let language = state.settings.context().language;
    session
        .discuss(&label, language)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn clear_chat(state: State<'_, AppState>) -> Result<ChatSnapshot, String> {
    let session = session_from_state(&state);
    Ok(session.clear().await)
}
