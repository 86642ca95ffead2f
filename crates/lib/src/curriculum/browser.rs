//! # Curriculum Browser
//!
//! The state behind one browsing session: the chosen subject, its loaded tree,
//! an error banner and the disclosure/check state. All mutation happens in
//! response to a user action; loading is the only async step.

use crate::curriculum::path::PathKey;
use crate::curriculum::payload::export_selection;
use crate::curriculum::schema::CurriculumTree;
use crate::curriculum::traversal::{rows, Rows, SelectionState};
use crate::errors::CurriculumError;
use crate::handoff::{ActionType, Handoff};
use crate::source::{load_subject, CurriculumSource};
use tracing::{info, warn};

/// Banner prefix shown when a subject fails to load.
pub const LOAD_ERROR_PREFIX: &str = "Veri yüklenirken hata oluştu";

#[derive(Debug, Clone, Default)]
pub struct CurriculumBrowser {
    subject: Option<String>,
    tree: Option<CurriculumTree>,
    error: Option<String>,
    state: SelectionState,
}

impl CurriculumBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to `subject`, dropping the tree, the banner and all
    /// selection and expansion state.
    pub fn select_subject(&mut self, subject: &str) {
        self.subject = Some(subject.to_string());
        self.tree = None;
        self.error = None;
        self.state = SelectionState::new();
    }

    /// Stores the outcome of a load for `subject`.
    ///
    /// Results for a subject that is no longer selected are dropped, so the
    /// slot always holds the last selection's data. A failure only sets the
    /// banner; the selection is left as it was.
    pub fn apply_load(&mut self, subject: &str, result: Result<CurriculumTree, CurriculumError>) {
        if self.subject.as_deref() != Some(subject) {
            warn!(subject, "Dropping curriculum load for a subject that is no longer selected");
            return;
        }
        match result {
            Ok(tree) => {
                info!(subject, grades = tree.grades.len(), "Curriculum loaded");
                self.tree = Some(tree);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(format!("{LOAD_ERROR_PREFIX}: {e}"));
            }
        }
    }

    /// Selects `subject` and loads it from `source`.
    pub async fn load(&mut self, source: &dyn CurriculumSource, subject: &str) {
        self.select_subject(subject);
        let result = load_subject(source, subject).await;
        self.apply_load(subject, result);
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn tree(&self) -> Option<&CurriculumTree> {
        self.tree.as_ref()
    }

    /// The current banner message, if the last load failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn checked(&self) -> &[PathKey] {
        self.state.checked()
    }

    /// Visible rows, or `None` while no tree is loaded.
    pub fn rows(&self) -> Option<Rows<'_>> {
        self.tree.as_ref().map(|tree| rows(tree, &self.state))
    }

    pub fn toggle_expanded(&mut self, key: &PathKey) {
        self.state = self.state.toggle_expanded(key);
    }

    pub fn toggle_checked(&mut self, key: &PathKey) {
        self.state = self.state.toggle_checked(key);
    }

    pub fn clear_checked(&mut self) {
        self.state = self.state.clear_checked();
    }

    /// Builds the handoff for `action` from the checked keys.
    pub fn proceed(&self, action: ActionType) -> Result<Handoff, CurriculumError> {
        let tree = self.tree.as_ref().ok_or(CurriculumError::NoSelection)?;
        if self.state.checked().is_empty() {
            return Err(CurriculumError::NoSelection);
        }
        Ok(Handoff {
            selected_topics: export_selection(self.state.checked(), tree),
            action,
        })
    }
}
