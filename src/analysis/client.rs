use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};

use crate::{
    config::AppConfig,
    error::ServiceError,
    log_debug, log_info, log_warn,
    media::asset::ImageAsset,
};

use super::models::{
    ClassCatalog, ClassificationResult, PredictResponse, Prediction, ServiceHealth,
};

const ENABLE_LOGS: bool = true;

/// Multipart field the classification service reads the image from.
pub const UPLOAD_FIELD: &str = "file";

#[async_trait]
pub trait ClassificationService: Send + Sync {
    async fn analyze(&self, asset: &ImageAsset) -> Result<ClassificationResult, ServiceError>;
}

/// HTTP client for the remote classification service.
pub struct AnalysisClient {
    client: Client,
    predict_url: String,
    health_url: String,
    classes_url: String,
}

impl AnalysisClient {
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            predict_url: config.endpoint("predict"),
            health_url: config.endpoint("health"),
            classes_url: config.endpoint("classes"),
        })
    }

    pub async fn health(&self) -> Result<ServiceHealth, ServiceError> {
        let response = self.client.get(&self.health_url).send().await?;
        if !response.status().is_success() {
            return Err(ServiceError::Transport(format!(
                "health check returned HTTP {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    pub async fn classes(&self) -> Result<ClassCatalog, ServiceError> {
        let response = self.client.get(&self.classes_url).send().await?;
        if !response.status().is_success() {
            return Err(ServiceError::Transport(format!(
                "classes returned HTTP {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ClassificationService for AnalysisClient {
    async fn analyze(&self, asset: &ImageAsset) -> Result<ClassificationResult, ServiceError> {
        let bytes = asset
            .bytes()
            .map_err(|err| ServiceError::Transport(format!("image payload unreadable: {err}")))?
            .into_owned();
        log_info!(
            "submitting {} ({} bytes, {}) for analysis",
            asset.file_name,
            bytes.len(),
            asset.mime_type
        );

        let part = multipart::Part::bytes(bytes)
            .file_name(asset.upload_file_name())
            .mime_str(&asset.mime_type)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        log_debug!("analysis responded HTTP {} ({} bytes)", status, body.len());

        let outcome = parse_predict_response(status, &body);
        if let Err(err) = &outcome {
            log_warn!("analysis failed: {}", err);
        }
        outcome
    }
}

/// Maps a `/predict` reply to a result. Only an explicit `success: true` with a
/// non-empty predictions list on a 2xx response counts as success.
pub(crate) fn parse_predict_response(
    status: StatusCode,
    body: &str,
) -> Result<ClassificationResult, ServiceError> {
    match serde_json::from_str::<PredictResponse>(body) {
        Ok(payload) if payload.success && status.is_success() => {
            let predictions = payload
                .predictions
                .unwrap_or_default()
                .into_iter()
                .map(Prediction::from)
                .collect();
            ClassificationResult::new(predictions)
        }
        Ok(payload) if !payload.success => Err(ServiceError::Rejected(payload.error)),
        Ok(_) => Err(ServiceError::Transport(format!("HTTP {status}"))),
        Err(_) if !status.is_success() => Err(ServiceError::Transport(format!("HTTP {status}"))),
        Err(err) => Err(ServiceError::Malformed(err.to_string())),
    }
}
