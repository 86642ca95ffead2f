//! # Conversation Prompt Templates
//!
//! Opening messages for the curriculum chat features. Templates are plain
//! strings with `{placeholder}` markers filled by the helpers below.

use crate::curriculum::payload::SelectedTopicRecord;

/// The `topic` sent with every AI-chat turn.
pub const AI_CHAT_TOPIC: &str = "AI Chat";

/// The `topic` sent with every Socratic turn.
pub const SOCRATIC_TOPIC: &str = "Socratic Learning";

/// Used when the student does not state a learning goal.
pub const DEFAULT_LEARNING_GOAL: &str = "Konuları derinlemesine anlamak";

/// The first message of an AI-chat session.
///
/// Placeholders: `{titles}`
pub const AI_CHAT_OPENING_PROMPT: &str =
    "Merhaba! Seçtiğim müfredat konuları hakkında AI ile sohbet etmek istiyorum. Konularım: {titles}";

/// The first message of a Socratic session.
///
/// Placeholders: `{goal}`, `{titles}`
pub const SOCRATIC_OPENING_PROMPT: &str = "Sokratik öğretim metoduyla öğrenmek istiyorum. Hedefim: {goal}. Seçtiğim konular: {titles}. Lütfen sorular sorarak öğrenmeme yardım et.";

/// Joins the topics' titles with `", "`.
pub fn topic_titles(topics: &[SelectedTopicRecord]) -> String {
    topics
        .iter()
        .map(|t| t.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn ai_chat_opening(topics: &[SelectedTopicRecord]) -> String {
    AI_CHAT_OPENING_PROMPT.replace("{titles}", &topic_titles(topics))
}

/// A blank or missing goal falls back to [`DEFAULT_LEARNING_GOAL`].
pub fn socratic_opening(topics: &[SelectedTopicRecord], goal: Option<&str>) -> String {
    let goal = goal
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_LEARNING_GOAL);
    SOCRATIC_OPENING_PROMPT
        .replace("{goal}", goal)
        .replace("{titles}", &topic_titles(topics))
}
