//! # Shared Constants
//!
//! Field names, storage keys and the subject catalogue shared by the library
//! and the CLI. Keeping them here avoids "magic strings" drifting apart.

/// The root key of every curriculum document (`{ "yks": { <subject>: ... } }`).
pub const CURRICULUM_ROOT_KEY: &str = "yks";

/// The separator placed between path segments when a `PathKey` is serialized.
pub const PATH_DELIMITER: char = '-';

/// Escape character used when a segment itself contains the delimiter.
pub const PATH_ESCAPE: char = '\\';

// --- Raw curriculum field names (primary spelling first) ---

pub const TITLE_FIELDS: &[&str] = &["baslik", "title"];
pub const CHILDREN_FIELDS: &[&str] = &["alt", "children"];
pub const KEY_CONCEPT_FIELDS: &[&str] = &["anahtar_kavramlar", "key_concepts"];
pub const EXPLANATION_FIELDS: &[&str] = &["aciklama", "explanations"];

// --- Session handoff keys ---

/// Slot holding the JSON-encoded selected topic records.
pub const SELECTED_TOPICS_KEY: &str = "selectedCurriculumTopics";

/// Slot holding the downstream action tag.
pub const ACTION_TYPE_KEY: &str = "curriculumActionType";

/// The default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// One entry of the YKS subject catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub file: &'static str,
}

/// All subjects that have a curriculum document.
pub const YKS_SUBJECTS: &[SubjectInfo] = &[
    SubjectInfo {
        name: "matematik",
        display_name: "Matematik",
        file: "kazanimlar_matematik.json",
    },
    SubjectInfo {
        name: "felsefe",
        display_name: "Felsefe",
        file: "kazanimlar_felsefe.json",
    },
    SubjectInfo {
        name: "biyoloji",
        display_name: "Biyoloji",
        file: "kazanimlar_biyoloji.json",
    },
    SubjectInfo {
        name: "cografya",
        display_name: "Coğrafya",
        file: "kazanimlar_cografya.json",
    },
    SubjectInfo {
        name: "din_kulturu",
        display_name: "Din Kültürü",
        file: "kazanimlar_din_kulturu.json",
    },
    SubjectInfo {
        name: "fizik",
        display_name: "Fizik",
        file: "kazanimlar_fizik.json",
    },
    SubjectInfo {
        name: "inkilap",
        display_name: "İnkılap Tarihi",
        file: "kazanimlar_inkilap_ve_ataturkculuk.json",
    },
    SubjectInfo {
        name: "kimya",
        display_name: "Kimya",
        file: "kazanimlar_kimya.json",
    },
    SubjectInfo {
        name: "tarih",
        display_name: "Tarih",
        file: "kazanimlar_tarih.json",
    },
    SubjectInfo {
        name: "turk_dili_ve_edebiyati",
        display_name: "Türk Dili ve Edebiyatı",
        file: "kazanimlar_turk_dili_ve_edebiyati.json",
    },
];

/// Looks up a subject by its catalogue name.
pub fn find_subject(name: &str) -> Option<&'static SubjectInfo> {
    YKS_SUBJECTS.iter().find(|s| s.name == name)
}
