use thiserror::Error;

/// Errors raised while loading or classifying a subject's curriculum document.
#[derive(Error, Debug)]
pub enum CurriculumError {
    #[error("Malformed curriculum document: {0}")]
    Schema(String),
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),
    #[error("Subject '{0}' is not present in the curriculum document")]
    SubjectNotInDocument(String),
    #[error("No curriculum topics selected")]
    NoSelection,
    #[error("Failed to parse curriculum JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read curriculum file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to fetch curriculum: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Curriculum server responded with status {status}: {body}")]
    FetchStatus { status: u16, body: String },
}

/// Errors raised by the backend API client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to backend: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize backend response: {0}")]
    Deserialization(String),
    /// Non-success HTTP status. The message is taken from the body's `detail` when present.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// The backend answered `success: false`; carries the stringified body.
    #[error("Backend reported failure: {0}")]
    Backend(String),
    #[error("No curriculum topics selected. Select topics in the curriculum browser first.")]
    NoSelection,
    #[error("Failed to read upload file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the session handoff slot.
#[derive(Error, Debug)]
pub enum HandoffError {
    #[error("Session store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown curriculum action type: {0}")]
    UnknownAction(String),
}
