//! # Curriculum Schema Normalizer
//!
//! Subject documents come in two shapes:
//!
//! - **Flat**: `grade -> topic -> objective -> { baslik, aciklama: {label: text} }`,
//!   plain keyed maps with no nesting marker.
//! - **Nested**: `grade -> { alt: { topic } }` where every topic node is
//!   `{ baslik, anahtar_kavramlar?, aciklama?, alt? }`, recursively.
//!
//! The shape is detected once here and recorded as a [`SchemaVariant`]; every
//! later stage walks the uniform [`Node`] tree and never probes raw JSON again.

use crate::constants::{
    CHILDREN_FIELDS, CURRICULUM_ROOT_KEY, EXPLANATION_FIELDS, KEY_CONCEPT_FIELDS, TITLE_FIELDS,
};
use crate::curriculum::path::PathKey;
use crate::errors::CurriculumError;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Which raw shape a subject document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    Flat,
    Nested,
}

/// The level a node occupies in the curriculum hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Subject,
    Grade,
    Topic,
    SubTopic,
    Objective,
    Explanation,
}

/// Ordered `label -> text` pairs, in source order.
pub type Explanations = Vec<(String, String)>;

/// One node of a normalized curriculum tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The raw map key this node was stored under.
    pub key: String,
    pub kind: NodeKind,
    /// Display title. Falls back to the raw key when the source has none.
    pub title: String,
    pub key_concepts: Option<String>,
    pub explanations: Option<Explanations>,
    /// Children in source order; keys are unique.
    pub children: Vec<Node>,
}

impl Node {
    fn leaf(key: &str, kind: NodeKind, title: String) -> Self {
        Self {
            key: key.to_string(),
            kind,
            title,
            key_concepts: None,
            explanations: None,
            children: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, key: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.key == key)
    }
}

/// A normalized subject: grades in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumTree {
    pub subject: String,
    pub variant: SchemaVariant,
    pub grades: Vec<Node>,
}

impl CurriculumTree {
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    pub fn grade(&self, key: &str) -> Option<&Node> {
        self.grades.iter().find(|g| g.key == key)
    }

    /// Walks `path` from the subject root and returns the nodes matched along
    /// the way. The walk stops at the first segment that does not resolve, so
    /// the result may be shorter than `path.len() - 1`.
    pub fn ancestry(&self, path: &PathKey) -> Vec<&Node> {
        let mut found = Vec::new();
        if path.subject() != Some(self.subject.as_str()) {
            return found;
        }
        let Some(mut node) = path.grade_key().and_then(|g| self.grade(g)) else {
            return found;
        };
        found.push(node);
        for segment in path.below_grade() {
            match node.child(segment) {
                Some(next) => {
                    found.push(next);
                    node = next;
                }
                None => break,
            }
        }
        found
    }

    /// Resolves a full path to its node, if every segment exists.
    pub fn find(&self, path: &PathKey) -> Option<&Node> {
        let ancestry = self.ancestry(path);
        if path.len() >= 2 && ancestry.len() == path.len() - 1 {
            ancestry.last().copied()
        } else {
            None
        }
    }

    /// Number of objective nodes in the tree.
    pub fn objective_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            let own = usize::from(node.kind == NodeKind::Objective);
            own + node.children.iter().map(count).sum::<usize>()
        }
        self.grades.iter().map(count).sum()
    }
}

/// Normalizes a document holding a single subject (`{ yks: { <subject>: ... } }`).
///
/// When the root holds several subjects the first one is used.
pub fn normalize(raw: &Value) -> Result<CurriculumTree, CurriculumError> {
    let subjects = root_subjects(raw)?;
    let (subject, grades) = subjects
        .iter()
        .next()
        .ok_or_else(|| CurriculumError::Schema("document contains no subject".to_string()))?;
    normalize_grades(subject, grades)
}

/// Normalizes one named subject out of a curriculum document.
pub fn normalize_subject(raw: &Value, subject: &str) -> Result<CurriculumTree, CurriculumError> {
    let subjects = root_subjects(raw)?;
    let grades = subjects
        .get(subject)
        .ok_or_else(|| CurriculumError::SubjectNotInDocument(subject.to_string()))?;
    normalize_grades(subject, grades)
}

/// Classifies a grade map: nested iff its first entry is an object carrying a
/// children field.
pub fn detect_variant(grade_map: &Map<String, Value>) -> SchemaVariant {
    match grade_map.values().next() {
        Some(Value::Object(first)) if field(first, CHILDREN_FIELDS).is_some() => {
            SchemaVariant::Nested
        }
        _ => SchemaVariant::Flat,
    }
}

fn root_subjects(raw: &Value) -> Result<&Map<String, Value>, CurriculumError> {
    raw.get(CURRICULUM_ROOT_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            CurriculumError::Schema(format!(
                "expected an object under the '{CURRICULUM_ROOT_KEY}' root key"
            ))
        })
}

fn normalize_grades(subject: &str, grades: &Value) -> Result<CurriculumTree, CurriculumError> {
    let grade_map = grades.as_object().ok_or_else(|| {
        CurriculumError::Schema(format!("grades of '{subject}' must be an object"))
    })?;
    let variant = detect_variant(grade_map);

    let grades = grade_map
        .iter()
        .map(|(grade_key, grade)| match variant {
            SchemaVariant::Flat => flat_grade(grade_key, grade),
            SchemaVariant::Nested => nested_grade(grade_key, grade),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tree = CurriculumTree {
        subject: subject.to_string(),
        variant,
        grades,
    };
    debug!(
        subject,
        ?variant,
        grades = tree.grades.len(),
        objectives = tree.objective_count(),
        "Normalized curriculum"
    );
    Ok(tree)
}

// --- Flat variant ---

fn flat_grade(grade_key: &str, grade: &Value) -> Result<Node, CurriculumError> {
    let topics = expect_object(grade, || format!("grade '{grade_key}'"))?;
    let mut node = Node::leaf(grade_key, NodeKind::Grade, grade_key.to_string());
    for (topic_key, topic) in topics {
        let objectives = expect_object(topic, || format!("topic '{topic_key}'"))?;
        let mut topic_node = Node::leaf(topic_key, NodeKind::Topic, topic_key.to_string());
        for (objective_key, objective) in objectives {
            topic_node.children.push(flat_objective(objective_key, objective)?);
        }
        node.children.push(topic_node);
    }
    Ok(node)
}

fn flat_objective(key: &str, value: &Value) -> Result<Node, CurriculumError> {
    let obj = expect_object(value, || format!("objective '{key}'"))?;
    let mut node = Node::leaf(key, NodeKind::Objective, title_of(obj, key));
    node.key_concepts = key_concepts_of(obj, key)?;
    node.explanations = explanations_of(obj, key)?;
    if let Some(explanations) = &node.explanations {
        node.children = explanations
            .iter()
            .map(|(label, text)| Node::leaf(label, NodeKind::Explanation, text.clone()))
            .collect();
    }
    Ok(node)
}

// --- Nested variant ---

fn nested_grade(grade_key: &str, grade: &Value) -> Result<Node, CurriculumError> {
    let obj = expect_object(grade, || format!("grade '{grade_key}'"))?;
    let children = field(obj, CHILDREN_FIELDS).ok_or_else(|| {
        CurriculumError::Schema(format!("grade '{grade_key}' has no children map"))
    })?;
    let mut node = Node::leaf(grade_key, NodeKind::Grade, grade_key.to_string());
    if children.is_null() {
        return Ok(node);
    }
    let children = expect_object(children, || format!("children of grade '{grade_key}'"))?;
    for (key, child) in children {
        node.children.push(nested_node(key, child, 0)?);
    }
    Ok(node)
}

fn nested_node(key: &str, value: &Value, depth: usize) -> Result<Node, CurriculumError> {
    let obj = expect_object(value, || format!("node '{key}'"))?;
    let mut children = Vec::new();
    if let Some(raw_children) = field(obj, CHILDREN_FIELDS) {
        if !raw_children.is_null() {
            let map = expect_object(raw_children, || format!("children of '{key}'"))?;
            for (child_key, child) in map {
                children.push(nested_node(child_key, child, depth + 1)?);
            }
        }
    }
    let kind = match (depth, children.is_empty()) {
        (0, _) => NodeKind::Topic,
        (_, false) => NodeKind::SubTopic,
        (_, true) => NodeKind::Objective,
    };
    Ok(Node {
        key: key.to_string(),
        kind,
        title: title_of(obj, key),
        key_concepts: key_concepts_of(obj, key)?,
        explanations: explanations_of(obj, key)?,
        children,
    })
}

// --- Field helpers ---

fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| obj.get(*name))
}

fn expect_object<F>(value: &Value, what: F) -> Result<&Map<String, Value>, CurriculumError>
where
    F: FnOnce() -> String,
{
    value
        .as_object()
        .ok_or_else(|| CurriculumError::Schema(format!("{} must be an object", what())))
}

fn title_of(obj: &Map<String, Value>, key: &str) -> String {
    field(obj, TITLE_FIELDS)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

fn key_concepts_of(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, CurriculumError> {
    match field(obj, KEY_CONCEPT_FIELDS) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Array(items)) => {
            let parts = items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        CurriculumError::Schema(format!("key concepts of '{key}' must be strings"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(parts.join(", ")))
        }
        Some(_) => Err(CurriculumError::Schema(format!(
            "key concepts of '{key}' must be a string or a list"
        ))),
    }
}

fn explanations_of(
    obj: &Map<String, Value>,
    key: &str,
) -> Result<Option<Explanations>, CurriculumError> {
    let Some(raw) = field(obj, EXPLANATION_FIELDS) else {
        return Ok(None);
    };
    if raw.is_null() {
        return Ok(None);
    }
    let map = expect_object(raw, || format!("explanations of '{key}'"))?;
    let pairs = map
        .iter()
        .map(|(label, text)| {
            let text = match text {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(CurriculumError::Schema(format!(
                        "explanation '{label}' of '{key}' must be text"
                    )))
                }
            };
            Ok((label.clone(), text))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat_doc() -> Value {
        json!({
            "yks": {
                "felsefe": {
                    "10": {
                        "Felsefeyi Tanıma": {
                            "K.10.1": { "baslik": "Felsefenin anlamını açıklar.", "aciklama": { "a": "x", "b": "y" } },
                            "K.10.2": { "baslik": "Felsefi düşüncenin özelliklerini açıklar." }
                        }
                    },
                    "11": {
                        "Bilgi Felsefesi": {
                            "K.11.1": { "title": "Bilginin kaynağını sorgular.", "aciklama": { "a": "z" } }
                        }
                    }
                }
            }
        })
    }

    fn nested_doc() -> Value {
        json!({
            "yks": {
                "kimya": {
                    "9": {
                        "alt": {
                            "0": {
                                "baslik": "Kimya Bilimi",
                                "anahtar_kavramlar": "simya, kimya",
                                "alt": {
                                    "0": { "baslik": "Atom Modelleri", "aciklama": { "A": "metin1", "B": "metin2" } },
                                    "1": {
                                        "baslik": "Alt Konu",
                                        "alt": { "0": { "baslik": "Derin Kazanım" } }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn detects_flat_variant() {
        let tree = normalize(&flat_doc()).unwrap();
        assert_eq!(tree.variant, SchemaVariant::Flat);
        assert_eq!(tree.subject, "felsefe");
        let keys: Vec<_> = tree.grades.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["10", "11"]);
        assert_eq!(tree.objective_count(), 3);
    }

    #[test]
    fn flat_objectives_expose_explanations_as_children() {
        let tree = normalize(&flat_doc()).unwrap();
        let objective = &tree.grades[0].children[0].children[0];
        assert_eq!(objective.kind, NodeKind::Objective);
        assert_eq!(objective.title, "Felsefenin anlamını açıklar.");
        let labels: Vec<_> = objective.children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(labels, ["a", "b"]);
        assert!(objective
            .children
            .iter()
            .all(|c| c.kind == NodeKind::Explanation));
    }

    #[test]
    fn flat_topic_title_is_its_key() {
        let tree = normalize(&flat_doc()).unwrap();
        let topic = &tree.grades[1].children[0];
        assert_eq!(topic.kind, NodeKind::Topic);
        assert_eq!(topic.title, "Bilgi Felsefesi");
    }

    #[test]
    fn detects_nested_variant_and_classifies_depths() {
        let tree = normalize(&nested_doc()).unwrap();
        assert_eq!(tree.variant, SchemaVariant::Nested);
        let topic = &tree.grades[0].children[0];
        assert_eq!(topic.kind, NodeKind::Topic);
        assert_eq!(topic.title, "Kimya Bilimi");
        assert_eq!(topic.key_concepts.as_deref(), Some("simya, kimya"));
        assert_eq!(topic.children[0].kind, NodeKind::Objective);
        assert_eq!(topic.children[1].kind, NodeKind::SubTopic);
        assert_eq!(topic.children[1].children[0].kind, NodeKind::Objective);
    }

    #[test]
    fn nested_explanations_stay_inline() {
        let tree = normalize(&nested_doc()).unwrap();
        let objective = &tree.grades[0].children[0].children[0];
        assert!(objective.children.is_empty());
        assert_eq!(
            objective.explanations,
            Some(vec![
                ("A".to_string(), "metin1".to_string()),
                ("B".to_string(), "metin2".to_string())
            ])
        );
    }

    #[test]
    fn empty_grade_map_gives_empty_tree() {
        let tree = normalize(&json!({ "yks": { "fizik": {} } })).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.variant, SchemaVariant::Flat);
    }

    #[test]
    fn malformed_grade_is_a_schema_error() {
        let err = normalize(&json!({ "yks": { "fizik": { "9": 42 } } })).unwrap_err();
        assert!(matches!(err, CurriculumError::Schema(_)));

        let err = normalize(&json!({ "yks": { "fizik": { "9": null } } })).unwrap_err();
        assert!(matches!(err, CurriculumError::Schema(_)));
    }

    #[test]
    fn nested_grade_without_children_is_rejected() {
        let doc = json!({ "yks": { "kimya": { "9": { "alt": {} }, "10": { "baslik": "x" } } } });
        let err = normalize(&doc).unwrap_err();
        assert!(err.to_string().contains("no children map"));
    }

    #[test]
    fn nested_grade_with_null_children_is_empty() {
        let doc = json!({ "yks": { "kimya": {
            "9": { "alt": null },
            "10": { "alt": { "0": { "baslik": "T" } } }
        } } });
        let tree = normalize(&doc).unwrap();
        assert_eq!(tree.variant, SchemaVariant::Nested);
        assert!(!tree.grades[0].has_children());
        assert_eq!(tree.grades[1].children[0].title, "T");
    }

    #[test]
    fn missing_root_is_rejected() {
        assert!(matches!(
            normalize(&json!({ "lgs": {} })),
            Err(CurriculumError::Schema(_))
        ));
    }

    #[test]
    fn key_concept_lists_are_joined() {
        let doc = json!({ "yks": { "kimya": { "9": { "children": {
            "t": { "title": "T", "key_concepts": ["mol", "kütle"] }
        } } } } });
        let tree = normalize(&doc).unwrap();
        assert_eq!(
            tree.grades[0].children[0].key_concepts.as_deref(),
            Some("mol, kütle")
        );
    }

    #[test]
    fn find_walks_full_paths_only() {
        let tree = normalize(&nested_doc()).unwrap();
        let deep = PathKey::decode("kimya-9-0-1-0");
        assert_eq!(tree.find(&deep).map(|n| n.title.as_str()), Some("Derin Kazanım"));
        assert!(tree.find(&PathKey::decode("kimya-9-0-7")).is_none());
        assert_eq!(tree.ancestry(&PathKey::decode("kimya-9-0-7")).len(), 2);
        assert!(tree.find(&PathKey::decode("fizik-9")).is_none());
    }

    #[test]
    fn normalize_subject_picks_by_name() {
        let doc = json!({ "yks": { "a": {}, "b": { "9": { "T": {} } } } });
        let tree = normalize_subject(&doc, "b").unwrap();
        assert_eq!(tree.subject, "b");
        assert_eq!(tree.grades.len(), 1);
        assert!(matches!(
            normalize_subject(&doc, "c"),
            Err(CurriculumError::SubjectNotInDocument(_))
        ));
    }
}
