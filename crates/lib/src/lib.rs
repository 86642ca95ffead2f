//! # PromptiTron Curriculum Core
//!
//! This crate loads the YKS curriculum documents, lets a student browse and
//! select topics, and hands the selection to the tutoring backend's features
//! (question generation, summaries, concept maps, explanations and chat).
//!
//! The flow is: a [`source::CurriculumSource`] fetches a subject document,
//! [`curriculum`] normalizes and browses it, [`handoff`] carries the exported
//! selection to a feature, and [`api::ApiClient`] calls the backend.

pub mod api;
pub mod chat;
pub mod constants;
pub mod curriculum;
pub mod errors;
pub mod handoff;
pub mod prompts;
pub mod questions;
pub mod source;

pub use api::ApiClient;
pub use chat::{ChatMode, ChatSession};
pub use constants::{find_subject, SubjectInfo, YKS_SUBJECTS};
pub use curriculum::{
    CurriculumBrowser, CurriculumTree, PathKey, SelectedTopicRecord, SelectionState,
};
pub use errors::{ApiError, CurriculumError, HandoffError};
pub use handoff::{read_handoff, write_handoff, ActionType, FileSessionStore, Handoff, SessionStore};
pub use source::{create_source, load_subject, CurriculumSource, FileSource, HttpSource};
