use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, context::Language, error::ServiceError, log_debug, log_warn};

use super::router::route;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    /// The most recent classification the service knows of scored under 70%.
    pub low_confidence: bool,
    pub has_prediction: bool,
}

#[async_trait]
pub trait ConversationService: Send + Sync {
    async fn reply(&self, message: &str, language: Language) -> Result<ChatReply, ServiceError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    success: bool,
    response: Option<String>,
    #[serde(default)]
    low_confidence: Option<bool>,
    #[serde(default)]
    has_prediction: Option<bool>,
    error: Option<String>,
}

/// JSON client for the conversational endpoint.
pub struct ChatClient {
    client: Client,
    chatbot_url: String,
}

impl ChatClient {
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            chatbot_url: config.endpoint("chatbot"),
        })
    }
}

#[async_trait]
impl ConversationService for ChatClient {
    async fn reply(&self, message: &str, _language: Language) -> Result<ChatReply, ServiceError> {
        let response = self
            .client
            .post(&self.chatbot_url)
            .json(&ChatRequest { message })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        log_debug!("chatbot responded HTTP {} ({} bytes)", status, body.len());

        let outcome = parse_chat_response(status, &body);
        if let Err(err) = &outcome {
            log_warn!("chatbot request failed: {}", err);
        }
        outcome
    }
}

pub(crate) fn parse_chat_response(status: StatusCode, body: &str) -> Result<ChatReply, ServiceError> {
    match serde_json::from_str::<ChatResponse>(body) {
        Ok(payload) if payload.success => match payload.response {
            Some(text) => Ok(ChatReply {
                text,
                low_confidence: payload.low_confidence.unwrap_or(false),
                has_prediction: payload.has_prediction.unwrap_or(false),
            }),
            None => Err(ServiceError::Malformed("reply without `response`".into())),
        },
        Ok(payload) => Err(ServiceError::Rejected(payload.error)),
        Err(_) if !status.is_success() => Err(ServiceError::Transport(format!("HTTP {status}"))),
        Err(err) => Err(ServiceError::Malformed(err.to_string())),
    }
}

/// Answers from the bundled keyword tables without touching the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAssistant;

#[async_trait]
impl ConversationService for LocalAssistant {
    async fn reply(&self, message: &str, language: Language) -> Result<ChatReply, ServiceError> {
        let (_, response) = route(message, language);
        Ok(ChatReply {
            text: response.to_string(),
            low_confidence: false,
            has_prediction: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_reply_reads_flags() {
        let body = r#"{"success": true, "response": "Acne is common.", "has_prediction": true, "low_confidence": true}"#;
        let reply = parse_chat_response(StatusCode::OK, body).unwrap();
        assert_eq!(reply.text, "Acne is common.");
        assert!(reply.low_confidence);
        assert!(reply.has_prediction);
    }

    #[test]
    fn null_low_confidence_reads_as_false() {
        let body = r#"{"success": true, "response": "ok", "low_confidence": null}"#;
        assert!(!parse_chat_response(StatusCode::OK, body).unwrap().low_confidence);
    }

    #[test]
    fn explicit_failure_is_rejected() {
        let body = r#"{"success": false, "error": "No message provided"}"#;
        assert_eq!(
            parse_chat_response(StatusCode::BAD_REQUEST, body).unwrap_err(),
            ServiceError::Rejected(Some("No message provided".into()))
        );
    }

    #[test]
    fn html_error_page_is_transport() {
        assert!(matches!(
            parse_chat_response(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            Err(ServiceError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn local_assistant_routes_by_keyword() {
        let reply = LocalAssistant
            .reply("any tips for a skincare routine?", Language::En)
            .await
            .unwrap();
        assert!(reply.text.starts_with("Here are some basic skincare tips"));
        assert!(!reply.low_confidence);
    }
}
