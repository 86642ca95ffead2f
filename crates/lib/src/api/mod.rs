//! # Backend API
//!
//! Typed access to the tutoring backend: the curriculum features that consume
//! a [`SelectedTopicRecord`](crate::curriculum::payload::SelectedTopicRecord)
//! selection, plus the general chat, generation, search and analysis services.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;
