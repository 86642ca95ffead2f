//! # Export Payload
//!
//! Builds the self-contained records that every downstream feature consumes.
//! Each record is built from a fresh walk of the tree so that it carries the
//! full pedagogical content (explanations, key concepts) and no reference back
//! into the tree.

use crate::curriculum::path::PathKey;
use crate::curriculum::resolver::{resolve, ResolvedSelection, SelectionKind};
use crate::curriculum::schema::{CurriculumTree, Node};
use serde::{Deserialize, Serialize};

/// The exported unit, one per checked key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTopicRecord {
    pub ders: String,
    pub sinif: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub konu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kazanim: Option<String>,
    pub title: String,
    /// Flattened explanatory text, empty when the node has none.
    #[serde(default)]
    pub aciklama: String,
    /// Key concepts of the selected node itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anahtar_kavramlar: Option<String>,
    /// Key concepts of the owning topic, when the selection lies below it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub konu_anahtar_kavramlar: Option<String>,
    pub path: PathKey,
    #[serde(rename = "type")]
    pub kind: SelectionKind,
}

/// Builds one record per resolved selection, in the selections' order.
pub fn build_export_payload(
    resolved: &[ResolvedSelection],
    tree: &CurriculumTree,
) -> Vec<SelectedTopicRecord> {
    resolved
        .iter()
        .map(|selection| build_record(selection, tree))
        .collect()
}

/// Convenience: resolve and build in one go.
pub fn export_selection(checked: &[PathKey], tree: &CurriculumTree) -> Vec<SelectedTopicRecord> {
    build_export_payload(&resolve(checked, tree), tree)
}

/// Joins `label -> text` pairs as `"<label>) <text>"` separated by single spaces.
pub fn flatten_explanations(explanations: &[(String, String)]) -> String {
    explanations
        .iter()
        .map(|(label, text)| format!("{label}) {text}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_record(selection: &ResolvedSelection, tree: &CurriculumTree) -> SelectedTopicRecord {
    let ancestry = tree.ancestry(&selection.path_key);
    let target = tree.find(&selection.path_key);

    let aciklama = match (selection.kind, target) {
        (SelectionKind::Explanation, Some(node)) => format!("{}) {}", node.key, node.title),
        (_, Some(node)) => node
            .explanations
            .as_deref()
            .map(flatten_explanations)
            .unwrap_or_default(),
        (_, None) => String::new(),
    };

    SelectedTopicRecord {
        ders: selection.ders.clone(),
        sinif: selection.sinif.clone(),
        konu: selection.konu.clone(),
        kazanim: selection.kazanim.clone(),
        title: selection.title.clone(),
        aciklama,
        anahtar_kavramlar: target.and_then(|node| node.key_concepts.clone()),
        konu_anahtar_kavramlar: target.and_then(|_| topic_key_concepts(&ancestry)),
        path: selection.path_key.clone(),
        kind: selection.kind,
    }
}

/// Key concepts of the topic directly under the grade, unless the topic is
/// the target itself.
fn topic_key_concepts(ancestry: &[&Node]) -> Option<String> {
    match ancestry {
        [_grade, topic, _below, ..] => topic.key_concepts.clone(),
        _ => None,
    }
}
