use super::types::*;
use crate::curriculum::payload::SelectedTopicRecord;
use crate::errors::ApiError;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

/// A client for the tutoring backend's HTTP API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: ReqwestClient,
    base_url: String,
}

impl ApiClient {
    /// Creates a client with reqwest's default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ApiError::ReqwestClientBuild)?;
        Ok(Self::from_parts(client, base_url.into()))
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::ReqwestClientBuild)?;
        Ok(Self::from_parts(client, base_url.into()))
    }

    fn from_parts(client: ReqwestClient, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- System ---

    pub async fn health(&self) -> Result<Value, ApiError> {
        self.get_json("/health").await
    }

    pub async fn stats(&self) -> Result<Value, ApiError> {
        self.get_json("/stats").await
    }

    pub async fn collections(&self) -> Result<Value, ApiError> {
        self.get_json("/system/collections").await
    }

    pub async fn curriculum(&self) -> Result<Value, ApiError> {
        self.get_json("/curriculum").await
    }

    // --- General services ---

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.post_json("/chat", request).await
    }

    pub async fn generate_questions(
        &self,
        request: &QuestionGenerationRequest,
    ) -> Result<Value, ApiError> {
        self.post_json("/generate/questions", request).await
    }

    pub async fn generate_study_plan(&self, request: &StudyPlanRequest) -> Result<Value, ApiError> {
        self.post_json("/generate/study-plan", request).await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<Value, ApiError> {
        self.post_json("/search", request).await
    }

    pub async fn analyze_content(&self, request: &AnalysisRequest) -> Result<Value, ApiError> {
        self.post_json("/analyze/content", request).await
    }

    /// Uploads a local file as multipart form data.
    pub async fn upload_document(
        &self,
        path: &Path,
        description: &str,
        analysis_type: &str,
    ) -> Result<Value, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("description", description.to_string())
            .text("analysis_type", analysis_type.to_string());

        let url = self.url("/upload/document");
        info!("Uploading {} to: {}", path.display(), url);
        self.send(self.client.post(&url).multipart(form)).await
    }

    pub async fn analyze_document(
        &self,
        request: &DocumentAnalysisRequest,
    ) -> Result<Value, ApiError> {
        self.post_json("/document/analyze", request).await
    }

    pub async fn analyze_web(&self, request: &UrlAnalysisRequest) -> Result<Value, ApiError> {
        self.post_json("/web/analyze", request).await
    }

    pub async fn analyze_youtube(&self, request: &UrlAnalysisRequest) -> Result<Value, ApiError> {
        self.post_json("/youtube/analyze", request).await
    }

    pub async fn conversation_memory(&self, session_id: &str) -> Result<Value, ApiError> {
        self.get_json(&format!("/memory/{session_id}")).await
    }

    pub async fn clear_conversation_memory(&self, session_id: &str) -> Result<Value, ApiError> {
        let url = self.url(&format!("/memory/{session_id}/clear"));
        info!("Sending PUT to: {}", url);
        self.send(self.client.put(&url)).await
    }

    // --- Curriculum features ---

    pub async fn curriculum_questions(
        &self,
        topics: &[SelectedTopicRecord],
        options: QuestionOptions,
    ) -> Result<QuestionsResponse, ApiError> {
        self.post_curriculum("/curriculum/questions", topics, options.clamped())
            .await
    }

    pub async fn curriculum_summary(
        &self,
        topics: &[SelectedTopicRecord],
        options: SummaryOptions,
    ) -> Result<SummaryResponse, ApiError> {
        self.post_curriculum("/curriculum/summarize", topics, options)
            .await
    }

    pub async fn curriculum_concept_map(
        &self,
        topics: &[SelectedTopicRecord],
        options: ConceptMapOptions,
    ) -> Result<ConceptMapResponse, ApiError> {
        self.post_curriculum("/curriculum/concept-map", topics, options)
            .await
    }

    pub async fn curriculum_explanation(
        &self,
        topics: &[SelectedTopicRecord],
        options: ExplanationOptions,
    ) -> Result<ExplanationResponse, ApiError> {
        self.post_curriculum("/curriculum/explain", topics, options)
            .await
    }

    pub async fn curriculum_socratic(
        &self,
        topics: &[SelectedTopicRecord],
        options: &SocraticOptions,
    ) -> Result<ChatResponse, ApiError> {
        self.post_curriculum("/curriculum/socratic", topics, options)
            .await
    }

    // --- Plumbing ---

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_curriculum<O, T>(
        &self,
        endpoint: &str,
        topics: &[SelectedTopicRecord],
        options: O,
    ) -> Result<T, ApiError>
    where
        O: Serialize,
        T: DeserializeOwned,
    {
        if topics.is_empty() {
            error!("Refusing to call {endpoint} without selected topics");
            return Err(ApiError::NoSelection);
        }
        let body = CurriculumRequest {
            selected_topics: topics,
            options,
        };
        self.post_json(endpoint, &body).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        info!("Fetching from: {}", url);
        self.send(self.client.get(&url)).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        info!("Posting to: {}", url);
        self.send(self.client.post(&url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::Request)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::Request)?;

        if !status.is_success() {
            let message = error_message(status, &text);
            error!("Backend responded with {}: {}", status, message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            ApiError::Deserialization(format!("{e}. Raw response: {text}"))
        })?;
        if value.get("success") == Some(&Value::Bool(false)) {
            return Err(ApiError::Backend(value.to_string()));
        }
        debug!("Backend response: {}", text);
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Builds a readable message from an error body, preferring FastAPI's
/// `detail` field.
pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let fallback = format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    );
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return fallback;
    };
    match parsed.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(validation_message)
            .collect::<Vec<_>>()
            .join(", "),
        Some(detail @ Value::Object(_)) => detail.to_string(),
        _ => fallback,
    }
}

/// One pydantic validation entry as text.
fn validation_message(item: &Value) -> String {
    if let Some(s) = item.as_str() {
        return s.to_string();
    }
    if let Some(msg) = item.get("msg").and_then(Value::as_str) {
        return msg.to_string();
    }
    let kind = item.get("type").and_then(Value::as_str);
    if let (Some(kind), Some(Value::Array(loc))) = (kind, item.get("loc")) {
        let loc = loc
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        return format!("{kind} at {loc}");
    }
    item.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn detail_string_is_used_verbatim() {
        let message = error_message(StatusCode::BAD_REQUEST, r#"{"detail":"Konu seçilmedi"}"#);
        assert_eq!(message, "Konu seçilmedi");
    }

    #[test]
    fn validation_details_are_joined() {
        let body = r#"{"detail":[{"msg":"field required"},{"type":"value_error","loc":["body","count"]}]}"#;
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "field required, value_error at body.count"
        );
    }

    #[test]
    fn falls_back_to_status_line() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            "HTTP 500: Internal Server Error"
        );
    }
}
