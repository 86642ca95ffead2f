//! Request and response bodies exchanged with the tutoring backend.
//!
//! Option enums serialize to the backend's snake_case wire names. Typed
//! responses keep whatever else the backend sends in a flattened `extra` map.

use crate::curriculum::payload::SelectedTopicRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MIN_QUESTION_COUNT: u8 = 1;
pub const MAX_QUESTION_COUNT: u8 = 20;

// --- Option enums ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    FillBlank,
    ShortAnswer,
    Essay,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    #[default]
    Tyt,
    Ayt,
    Yks,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    #[default]
    Detailed,
    Brief,
    BulletPoints,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    #[default]
    Hierarchical,
    Network,
    Flowchart,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationLevel {
    Basic,
    #[default]
    Comprehensive,
    Advanced,
}

// --- Curriculum feature options ---

/// Options for `/curriculum/questions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionOptions {
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
    pub count: u8,
    pub exam_type: ExamType,
}

impl Default for QuestionOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            question_type: QuestionType::default(),
            count: 5,
            exam_type: ExamType::default(),
        }
    }
}

impl QuestionOptions {
    /// Returns a copy with `count` clamped to the range the backend accepts.
    pub fn clamped(self) -> Self {
        Self {
            count: self.count.clamp(MIN_QUESTION_COUNT, MAX_QUESTION_COUNT),
            ..self
        }
    }
}

/// Options for `/curriculum/summarize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryOptions {
    pub summary_style: SummaryStyle,
    pub include_examples: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            summary_style: SummaryStyle::default(),
            include_examples: true,
        }
    }
}

/// Options for `/curriculum/concept-map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConceptMapOptions {
    pub map_type: MapType,
    pub include_connections: bool,
}

impl Default for ConceptMapOptions {
    fn default() -> Self {
        Self {
            map_type: MapType::default(),
            include_connections: true,
        }
    }
}

/// Options for `/curriculum/explain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExplanationOptions {
    pub explanation_level: ExplanationLevel,
    pub include_examples: bool,
    pub include_formulas: bool,
}

impl Default for ExplanationOptions {
    fn default() -> Self {
        Self {
            explanation_level: ExplanationLevel::default(),
            include_examples: true,
            include_formulas: true,
        }
    }
}

/// Extra fields of a `/curriculum/socratic` turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SocraticOptions {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

/// The shared body of every curriculum feature: the selection plus the
/// feature's own options at the top level.
#[derive(Debug, Serialize)]
pub struct CurriculumRequest<'a, O: Serialize> {
    pub selected_topics: &'a [SelectedTopicRecord],
    #[serde(flatten)]
    pub options: O,
}

// --- General service requests ---

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    pub use_memory: bool,
    pub stream: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionGenerationRequest {
    pub subject: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_type: Option<ExamType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudyPlanRequest {
    pub student_profile: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_exam: Option<ExamType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_hours: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_personalization: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_suggestions: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentAnalysisRequest {
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_questions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand_topics: Option<bool>,
}

/// Body of `/web/analyze` and `/youtube/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UrlAnalysisRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

// --- Responses ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionsResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    /// Either a list of question objects or a raw model string.
    #[serde(default)]
    pub questions: Value,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub agent_used: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub summary_style: Option<String>,
    #[serde(default)]
    pub topics_count: Option<u32>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConceptMapResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    /// Usually text; some agents return a structured map.
    #[serde(default)]
    pub concept_map: Value,
    #[serde(default)]
    pub map_type: Option<String>,
    #[serde(default)]
    pub main_concepts: Option<Value>,
    #[serde(default)]
    pub connections_count: Option<u32>,
    #[serde(default)]
    pub topics_count: Option<u32>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExplanationResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub explanation_level: Option<String>,
    #[serde(default)]
    pub topics_count: Option<u32>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
    #[serde(default)]
    pub grade_levels: Option<Vec<String>>,
    #[serde(default)]
    pub include_examples: Option<bool>,
    #[serde(default)]
    pub include_formulas: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A reply from `/chat` or `/curriculum/socratic`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub system_used: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

impl ConceptMapResponse {
    /// The concept map as display text.
    pub fn concept_map_text(&self) -> String {
        match &self.concept_map {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}
