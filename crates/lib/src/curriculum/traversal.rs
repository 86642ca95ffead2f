//! # Tree Traversal & Selection State
//!
//! Produces the visible rows of a curriculum browser from a normalized tree and
//! the current [`SelectionState`]. The sequence is lazy: a node's children are
//! only visited when its key is in the expanded set, so nothing is
//! materialized beyond what is on screen.

use crate::curriculum::path::PathKey;
use crate::curriculum::schema::{CurriculumTree, Node, NodeKind};
use std::collections::HashSet;

/// Browser UI state for one subject.
///
/// Toggle operations are pure: they return the next state and leave `self`
/// untouched. Expansion is tracked per node, so collapsing a parent keeps its
/// descendants' flags and re-expanding restores the previous disclosure.
/// Checking never cascades to ancestors or descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    expanded: HashSet<PathKey>,
    /// Checked keys in the order they were checked.
    checked: Vec<PathKey>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: &PathKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn is_checked(&self, key: &PathKey) -> bool {
        self.checked.contains(key)
    }

    /// Checked keys in check order.
    pub fn checked(&self) -> &[PathKey] {
        &self.checked
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    pub fn toggle_expanded(&self, key: &PathKey) -> Self {
        let mut next = self.clone();
        if !next.expanded.remove(key) {
            next.expanded.insert(key.clone());
        }
        next
    }

    pub fn toggle_checked(&self, key: &PathKey) -> Self {
        let mut next = self.clone();
        match next.checked.iter().position(|k| k == key) {
            Some(index) => {
                next.checked.remove(index);
            }
            None => next.checked.push(key.clone()),
        }
        next
    }

    /// Drops every checked key, keeping disclosure state.
    pub fn clear_checked(&self) -> Self {
        Self {
            expanded: self.expanded.clone(),
            checked: Vec::new(),
        }
    }
}

/// One visible line of the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub path_key: PathKey,
    /// 0 for grades, +1 per level below.
    pub depth: usize,
    pub title: &'a str,
    pub kind: NodeKind,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_checked: bool,
    pub node: &'a Node,
}

/// Lazy depth-first, pre-order iterator over the visible rows.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    stack: Vec<(&'a Node, PathKey, usize)>,
    state: &'a SelectionState,
}

/// Starts a fresh walk over `tree` driven by `state`.
pub fn rows<'a>(tree: &'a CurriculumTree, state: &'a SelectionState) -> Rows<'a> {
    let stack = tree
        .grades
        .iter()
        .rev()
        .map(|grade| (grade, PathKey::grade(&tree.subject, &grade.key), 0))
        .collect();
    Rows { stack, state }
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, path_key, depth) = self.stack.pop()?;
        let is_expanded = self.state.is_expanded(&path_key);
        if is_expanded {
            for child in node.children.iter().rev() {
                self.stack.push((child, path_key.child(&child.key), depth + 1));
            }
        }
        Some(Row {
            is_checked: self.state.is_checked(&path_key),
            path_key,
            depth,
            title: &node.title,
            kind: node.kind,
            has_children: node.has_children(),
            is_expanded,
            node,
        })
    }
}

/// Every path key in the tree, fully expanded, in traversal order.
pub fn all_path_keys(tree: &CurriculumTree) -> Vec<PathKey> {
    fn visit(node: &Node, key: PathKey, out: &mut Vec<PathKey>) {
        out.push(key.clone());
        for child in &node.children {
            visit(child, key.child(&child.key), out);
        }
    }
    let mut out = Vec::new();
    for grade in &tree.grades {
        visit(grade, PathKey::grade(&tree.subject, &grade.key), &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::schema::normalize;
    use serde_json::json;

    fn tree() -> CurriculumTree {
        normalize(&json!({
            "yks": { "felsefe": {
                "10": { "T1": { "K1": { "baslik": "k1", "aciklama": { "a": "x" } } } },
                "11": { "T2": { "K2": { "baslik": "k2" } } }
            } }
        }))
        .unwrap()
    }

    fn keys(tree: &CurriculumTree, state: &SelectionState) -> Vec<String> {
        rows(tree, state).map(|r| r.path_key.encode()).collect()
    }

    #[test]
    fn collapsed_tree_shows_only_grades() {
        let tree = tree();
        assert_eq!(keys(&tree, &SelectionState::new()), ["felsefe-10", "felsefe-11"]);
    }

    #[test]
    fn expansion_reveals_children_in_pre_order() {
        let tree = tree();
        let state = SelectionState::new()
            .toggle_expanded(&PathKey::decode("felsefe-10"))
            .toggle_expanded(&PathKey::decode("felsefe-10-T1"))
            .toggle_expanded(&PathKey::decode("felsefe-10-T1-K1"));
        let rows: Vec<_> = rows(&tree, &state).collect();
        let encoded: Vec<_> = rows.iter().map(|r| r.path_key.encode()).collect();
        assert_eq!(
            encoded,
            [
                "felsefe-10",
                "felsefe-10-T1",
                "felsefe-10-T1-K1",
                "felsefe-10-T1-K1-a",
                "felsefe-11"
            ]
        );
        let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, [0, 1, 2, 3, 0]);
        assert_eq!(rows[3].kind, NodeKind::Explanation);
        assert!(!rows[3].has_children);
    }

    #[test]
    fn collapsing_a_parent_keeps_descendant_flags() {
        let tree = tree();
        let grade = PathKey::decode("felsefe-10");
        let topic = PathKey::decode("felsefe-10-T1");
        let open = SelectionState::new()
            .toggle_expanded(&grade)
            .toggle_expanded(&topic);
        let closed = open.toggle_expanded(&grade);
        assert!(closed.is_expanded(&topic));
        assert_eq!(keys(&tree, &closed), ["felsefe-10", "felsefe-11"]);
        let reopened = closed.toggle_expanded(&grade);
        assert_eq!(keys(&tree, &reopened), keys(&tree, &open));
    }

    #[test]
    fn toggling_expansion_twice_is_identity() {
        let tree = tree();
        let base = SelectionState::new().toggle_expanded(&PathKey::decode("felsefe-11"));
        let key = PathKey::decode("felsefe-10");
        let twice = base.toggle_expanded(&key).toggle_expanded(&key);
        assert_eq!(keys(&tree, &twice), keys(&tree, &base));
        assert_eq!(twice, base);
    }

    #[test]
    fn checking_is_per_node_and_ordered() {
        let a = PathKey::decode("felsefe-11-T2-K2");
        let b = PathKey::decode("felsefe-10");
        let state = SelectionState::new().toggle_checked(&a).toggle_checked(&b);
        assert_eq!(state.checked(), &[a.clone(), b.clone()]);
        assert!(!state.is_checked(&PathKey::decode("felsefe-11-T2")));
        let unchecked = state.toggle_checked(&a);
        assert_eq!(unchecked.checked(), &[b]);
    }

    #[test]
    fn check_then_uncheck_restores_state() {
        let before = SelectionState::new().toggle_checked(&PathKey::decode("felsefe-10"));
        let key = PathKey::decode("felsefe-10-T1");
        assert_eq!(before.toggle_checked(&key).toggle_checked(&key), before);
    }

    #[test]
    fn toggles_do_not_mutate_the_source_state() {
        let state = SelectionState::new();
        let _ = state.toggle_checked(&PathKey::decode("felsefe-10"));
        assert!(state.checked().is_empty());
    }

    #[test]
    fn rows_report_checked_flags() {
        let tree = tree();
        let state = SelectionState::new().toggle_checked(&PathKey::decode("felsefe-11"));
        let flags: Vec<_> = rows(&tree, &state).map(|r| r.is_checked).collect();
        assert_eq!(flags, [false, true]);
    }

    #[test]
    fn all_path_keys_covers_every_node() {
        let tree = tree();
        let all = all_path_keys(&tree);
        assert_eq!(all.len(), 7);
        for key in &all {
            assert_eq!(&PathKey::decode(&key.encode()), key);
            assert!(tree.find(key).is_some());
        }
    }
}
