//! # Curriculum Tree
//!
//! Loading, browsing and exporting a subject's YKS curriculum:
//!
//! 1. [`schema`] normalizes a raw document into a [`CurriculumTree`].
//! 2. [`traversal`] lists the visible rows for the current [`SelectionState`].
//! 3. [`resolver`] classifies checked [`PathKey`]s.
//! 4. [`payload`] turns them into self-contained [`SelectedTopicRecord`]s.
//!
//! [`browser::CurriculumBrowser`] ties the steps together for one session.

pub mod browser;
pub mod path;
pub mod payload;
pub mod resolver;
pub mod schema;
pub mod traversal;

pub use browser::CurriculumBrowser;
pub use path::PathKey;
pub use payload::{build_export_payload, export_selection, SelectedTopicRecord};
pub use resolver::{resolve, ResolvedSelection, SelectionKind};
pub use schema::{normalize, normalize_subject, CurriculumTree, Node, NodeKind, SchemaVariant};
pub use traversal::{all_path_keys, rows, Row, Rows, SelectionState};
