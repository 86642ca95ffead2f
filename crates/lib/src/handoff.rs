//! # Session Handoff Slot
//!
//! The curriculum browser hands its selection to the feature commands through
//! a small key-value slot: the JSON-encoded topic records plus an action tag.
//! The producer writes both values once; consumers read them and never delete,
//! so a later read can see a selection made earlier in the session.

use crate::constants::{ACTION_TYPE_KEY, SELECTED_TOPICS_KEY};
use crate::curriculum::payload::SelectedTopicRecord;
use crate::errors::HandoffError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// The downstream feature a selection is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    Questions,
    Summary,
    ConceptMap,
    Explanation,
    AiChat,
    Socratic,
}

impl ActionType {
    pub const ALL: [ActionType; 6] = [
        ActionType::Questions,
        ActionType::Summary,
        ActionType::ConceptMap,
        ActionType::Explanation,
        ActionType::AiChat,
        ActionType::Socratic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Questions => "questions",
            ActionType::Summary => "summary",
            ActionType::ConceptMap => "concept-map",
            ActionType::Explanation => "explanation",
            ActionType::AiChat => "ai-chat",
            ActionType::Socratic => "socratic",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = HandoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| HandoffError::UnknownAction(s.to_string()))
    }
}

/// A complete selection handed from the browser to a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub selected_topics: Vec<SelectedTopicRecord>,
    pub action: ActionType,
}

/// A string key-value store scoped to one user session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, HandoffError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), HandoffError>;
}

/// Writes the selection and action tag into the slot, overwriting any
/// previous handoff.
pub fn write_handoff<S: SessionStore + ?Sized>(
    store: &mut S,
    handoff: &Handoff,
) -> Result<(), HandoffError> {
    let topics = serde_json::to_string(&handoff.selected_topics)?;
    store.set(SELECTED_TOPICS_KEY, &topics)?;
    store.set(ACTION_TYPE_KEY, handoff.action.as_str())?;
    info!(
        action = %handoff.action,
        topics = handoff.selected_topics.len(),
        "Wrote curriculum handoff"
    );
    Ok(())
}

/// Reads the last handoff. Returns `None` when no selection was ever written.
///
/// A missing action tag defaults to `questions`, the first feature page.
pub fn read_handoff<S: SessionStore + ?Sized>(store: &S) -> Result<Option<Handoff>, HandoffError> {
    let Some(raw_topics) = store.get(SELECTED_TOPICS_KEY)? else {
        return Ok(None);
    };
    let selected_topics: Vec<SelectedTopicRecord> = serde_json::from_str(&raw_topics)?;
    let action = match store.get(ACTION_TYPE_KEY)? {
        Some(tag) => tag.parse()?,
        None => ActionType::Questions,
    };
    Ok(Some(Handoff {
        selected_topics,
        action,
    }))
}

/// A session store persisted as a JSON object in a file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, HandoffError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, HandoffError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), HandoffError> {
        let mut state = self.read_all()?;
        state.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, &state)?;
        Ok(())
    }
}
