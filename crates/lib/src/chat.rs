//! # Curriculum Conversations
//!
//! AI chat and Socratic dialogue over a curriculum selection. Both modes talk
//! to `/curriculum/socratic`; they differ in the opening message, the `topic`
//! tag and whether `socratic_mode` is set in the context. Follow-up turns carry
//! the prior conversation so the backend can keep the thread.

use crate::api::{ApiClient, ChatResponse, SocraticOptions};
use crate::curriculum::payload::SelectedTopicRecord;
use crate::errors::ApiError;
use crate::handoff::ActionType;
use crate::prompts::{ai_chat_opening, socratic_opening, AI_CHAT_TOPIC, SOCRATIC_TOPIC};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    AiChat,
    Socratic,
}

impl ChatMode {
    pub fn topic(&self) -> &'static str {
        match self {
            ChatMode::AiChat => AI_CHAT_TOPIC,
            ChatMode::Socratic => SOCRATIC_TOPIC,
        }
    }

    /// The chat mode that serves a handoff action, if any.
    pub fn for_action(action: ActionType) -> Option<Self> {
        match action {
            ActionType::AiChat => Some(ChatMode::AiChat),
            ActionType::Socratic => Some(ChatMode::Socratic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// One conversation over a fixed selection of topics.
#[derive(Debug, Clone)]
pub struct ChatSession {
    mode: ChatMode,
    session_id: String,
    topics: Vec<SelectedTopicRecord>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Starts a session with a fresh UUID v4 id.
    pub fn new(mode: ChatMode, topics: Vec<SelectedTopicRecord>) -> Self {
        Self {
            mode,
            session_id: Uuid::new_v4().to_string(),
            topics,
            messages: Vec::new(),
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn topics(&self) -> &[SelectedTopicRecord] {
        &self.topics
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_started(&self) -> bool {
        !self.messages.is_empty()
    }

    /// The first message for this mode. `goal` only applies to Socratic
    /// sessions.
    pub fn opening_message(&self, goal: Option<&str>) -> String {
        match self.mode {
            ChatMode::AiChat => ai_chat_opening(&self.topics),
            ChatMode::Socratic => socratic_opening(&self.topics, goal),
        }
    }

    /// Builds the request options for the next user `message`.
    pub fn next_turn(&self, message: &str) -> SocraticOptions {
        let mut context = Map::new();
        if self.is_started() {
            context.insert("conversation".to_string(), json!(self.messages));
        }
        if self.mode == ChatMode::Socratic {
            context.insert("socratic_mode".to_string(), Value::Bool(true));
        }
        SocraticOptions {
            message: message.to_string(),
            topic: Some(self.mode.topic().to_string()),
            session_id: Some(self.session_id.clone()),
            context: Some(context),
        }
    }

    /// Sends the opening message and returns the assistant's reply.
    pub async fn start(
        &mut self,
        client: &ApiClient,
        goal: Option<&str>,
    ) -> Result<String, ApiError> {
        let opening = self.opening_message(goal);
        self.send(client, &opening).await
    }

    /// Sends `message` and records both sides of the turn. Nothing is
    /// recorded when the request fails.
    pub async fn send(&mut self, client: &ApiClient, message: &str) -> Result<String, ApiError> {
        let options = self.next_turn(message);
        info!(
            session_id = %self.session_id,
            turn = self.messages.len() / 2 + 1,
            "Sending {} turn",
            self.mode.topic()
        );
        let response: ChatResponse = client.curriculum_socratic(&self.topics, &options).await?;
        self.messages.push(ChatMessage {
            role: Role::User,
            content: message.to_string(),
        });
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: response.response.clone(),
        });
        Ok(response.response)
    }
}
