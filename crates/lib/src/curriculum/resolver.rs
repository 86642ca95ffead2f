//! # Selection Resolver
//!
//! Turns checked path keys back into human-readable context (subject, grade,
//! topic title, objective title) by re-walking the normalized tree.
//!
//! Classification is by segment count: 2 is a grade, 3 a topic, 4 or more an
//! objective whose owning topic is the second-to-last segment. The one
//! exception is the flat variant's fifth level, which holds explanation
//! entries. Segments that no longer resolve (stale keys after a reload) fall
//! back to their raw text instead of failing the whole resolution.

use crate::curriculum::path::PathKey;
use crate::curriculum::schema::{CurriculumTree, Node, SchemaVariant};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The level a selection was made at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Subject,
    Grade,
    Topic,
    Objective,
    Explanation,
}

/// A checked key with its recovered display context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub path_key: PathKey,
    pub kind: SelectionKind,
    /// Subject key.
    pub ders: String,
    /// Grade key.
    pub sinif: String,
    /// Owning topic title.
    pub konu: Option<String>,
    /// Objective title.
    pub kazanim: Option<String>,
    /// Display title for the selection's own level.
    pub title: String,
}

/// Resolves every checked key, preserving input order.
pub fn resolve(checked: &[PathKey], tree: &CurriculumTree) -> Vec<ResolvedSelection> {
    checked
        .iter()
        .filter_map(|key| resolve_one(key, tree))
        .collect()
}

/// Resolves a single key. Returns `None` only for an empty key.
pub fn resolve_one(key: &PathKey, tree: &CurriculumTree) -> Option<ResolvedSelection> {
    let segments = key.segments();
    let ders = segments.first()?.clone();
    let sinif = segments.get(1).cloned().unwrap_or_default();

    let ancestry = tree.ancestry(key);
    if ancestry.len() + 1 < segments.len() {
        warn!(path = %key, "Selection no longer resolves; falling back to raw keys");
    }
    let title_at = |index: usize| segment_title(&ancestry, segments, index);

    let (kind, konu, kazanim, title) = match segments.len() {
        1 => (SelectionKind::Subject, None, None, ders.clone()),
        2 => (SelectionKind::Grade, None, None, grade_title(&sinif)),
        3 => {
            let konu = title_at(2);
            (SelectionKind::Topic, Some(konu.clone()), None, konu)
        }
        5 if tree.variant == SchemaVariant::Flat => {
            let konu = title_at(2);
            let kazanim = title_at(3);
            (
                SelectionKind::Explanation,
                Some(konu),
                Some(kazanim),
                title_at(4),
            )
        }
        n => {
            let konu = title_at(n - 2);
            let kazanim = title_at(n - 1);
            (
                SelectionKind::Objective,
                Some(konu),
                Some(kazanim.clone()),
                kazanim,
            )
        }
    };

    Some(ResolvedSelection {
        path_key: key.clone(),
        kind,
        ders,
        sinif,
        konu,
        kazanim,
        title,
    })
}

/// Display title of a grade, e.g. `9. Sınıf`.
pub fn grade_title(grade_key: &str) -> String {
    format!("{grade_key}. Sınıf")
}

/// Title of the node at segment `index`, or the raw segment when the walk
/// stopped short of it. `ancestry[0]` is the grade, i.e. segment 1.
fn segment_title(ancestry: &[&Node], segments: &[String], index: usize) -> String {
    index
        .checked_sub(1)
        .and_then(|i| ancestry.get(i))
        .map(|node| node.title.clone())
        .unwrap_or_else(|| segments[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::schema::normalize;
    use serde_json::json;

    fn nested() -> CurriculumTree {
        normalize(&json!({ "yks": { "kimya": { "9": { "alt": {
            "0": {
                "baslik": "Kimya Bilimi",
                "alt": {
                    "0": { "baslik": "Atom Modelleri" },
                    "1": { "baslik": "Periyodik Sistem", "alt": {
                        "0": { "baslik": "Gruplar" }
                    } }
                }
            }
        } } } } }))
        .unwrap()
    }

    fn flat() -> CurriculumTree {
        normalize(&json!({ "yks": { "felsefe": { "11": {
            "Bilgi Felsefesi": {
                "K.11.1": { "title": "Bilgiyi sorgular.", "aciklama": { "a": "birinci", "b": "ikinci" } }
            }
        } } } }))
        .unwrap()
    }

    #[test]
    fn grade_selection() {
        let r = resolve_one(&PathKey::decode("kimya-9"), &nested()).unwrap();
        assert_eq!(r.kind, SelectionKind::Grade);
        assert_eq!(r.sinif, "9");
        assert_eq!(r.title, "9. Sınıf");
        assert!(r.konu.is_none());
    }

    #[test]
    fn nested_topic_uses_title_attribute() {
        let r = resolve_one(&PathKey::decode("kimya-9-0"), &nested()).unwrap();
        assert_eq!(r.kind, SelectionKind::Topic);
        assert_eq!(r.konu.as_deref(), Some("Kimya Bilimi"));
        assert_eq!(r.title, "Kimya Bilimi");
    }

    #[test]
    fn nested_objective_resolves_owning_topic_title() {
        let r = resolve_one(&PathKey::decode("kimya-9-0-0"), &nested()).unwrap();
        assert_eq!(r.kind, SelectionKind::Objective);
        assert_eq!(r.konu.as_deref(), Some("Kimya Bilimi"));
        assert_eq!(r.kazanim.as_deref(), Some("Atom Modelleri"));
    }

    #[test]
    fn deep_nested_objective_uses_parent_title() {
        let r = resolve_one(&PathKey::decode("kimya-9-0-1-0"), &nested()).unwrap();
        assert_eq!(r.kind, SelectionKind::Objective);
        assert_eq!(r.konu.as_deref(), Some("Periyodik Sistem"));
        assert_eq!(r.kazanim.as_deref(), Some("Gruplar"));
    }

    #[test]
    fn flat_objective_uses_raw_topic_key() {
        let key = PathKey::decode("felsefe-11-Bilgi Felsefesi-K.11.1");
        let r = resolve_one(&key, &flat()).unwrap();
        assert_eq!(r.kind, SelectionKind::Objective);
        assert_eq!(r.konu.as_deref(), Some("Bilgi Felsefesi"));
        assert_eq!(r.kazanim.as_deref(), Some("Bilgiyi sorgular."));
    }

    #[test]
    fn flat_explanation_level() {
        let key = PathKey::decode("felsefe-11-Bilgi Felsefesi-K.11.1-b");
        let r = resolve_one(&key, &flat()).unwrap();
        assert_eq!(r.kind, SelectionKind::Explanation);
        assert_eq!(r.kazanim.as_deref(), Some("Bilgiyi sorgular."));
        assert_eq!(r.title, "ikinci");
    }

    #[test]
    fn stale_keys_degrade_to_raw_segments() {
        let r = resolve_one(&PathKey::decode("kimya-9-5-3"), &nested()).unwrap();
        assert_eq!(r.kind, SelectionKind::Objective);
        assert_eq!(r.konu.as_deref(), Some("5"));
        assert_eq!(r.kazanim.as_deref(), Some("3"));

        let r = resolve_one(&PathKey::decode("kimya-12-0"), &nested()).unwrap();
        assert_eq!(r.konu.as_deref(), Some("0"));
    }

    #[test]
    fn resolve_keeps_check_order() {
        let keys = [
            PathKey::decode("kimya-9-0-0"),
            PathKey::decode("kimya-9"),
            PathKey::decode("kimya-9-0"),
        ];
        let kinds: Vec<_> = resolve(&keys, &nested()).iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            [
                SelectionKind::Objective,
                SelectionKind::Grade,
                SelectionKind::Topic
            ]
        );
    }

    #[test]
    fn empty_keys_are_skipped() {
        assert!(resolve(&[PathKey::new(Vec::<String>::new())], &nested()).is_empty());
    }
}
