use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_WARNING_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_CAMERA_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime knobs read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL serving `/predict`, `/chatbot`, `/health` and `/classes`.
    pub api_url: String,
    /// Answer chat messages with the local keyword assistant instead of the service.
    pub offline_chat: bool,
    /// Optional per-request timeout. Unset means the transport's own behaviour.
    pub request_timeout: Option<Duration>,
    /// Pause before the low-confidence caution follows an assistant reply.
    pub warning_delay: Duration,
    /// How long the webview gets to answer a camera request.
    pub camera_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            offline_chat: false,
            request_timeout: None,
            warning_delay: DEFAULT_WARNING_DELAY,
            camera_timeout: DEFAULT_CAMERA_TIMEOUT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("DERMASSIST_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.api_url);

        let offline_chat = lookup("DERMASSIST_OFFLINE_CHAT")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.offline_chat);

        let request_timeout = lookup("DERMASSIST_REQUEST_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let warning_delay = lookup("DERMASSIST_WARNING_DELAY_MS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.warning_delay);

        let camera_timeout = lookup("DERMASSIST_CAMERA_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.camera_timeout);

        Self {
            api_url,
            offline_chat,
            request_timeout,
            warning_delay,
            camera_timeout,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
