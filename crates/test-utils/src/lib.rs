//! Shared fixtures and fakes for the PromptiTron test suites.

use async_trait::async_trait;
use promptitron::errors::{CurriculumError, HandoffError};
use promptitron::handoff::SessionStore;
use promptitron::source::CurriculumSource;
use promptitron::SubjectInfo;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Installs a test tracing subscriber once per process.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// --- Curriculum fixtures ---

/// A nested-variant chemistry document.
///
/// `kimya-9-0-0` is "Atom Modelleri" with explanations `A) metin1 B) metin2`;
/// `kimya-10-0-0-1` sits one level deeper under a sub-topic.
pub fn kimya_nested() -> Value {
    json!({ "yks": { "kimya": {
        "9": { "alt": {
            "0": {
                "baslik": "Kimya Bilimi",
                "anahtar_kavramlar": ["simya", "kimya disiplinleri"],
                "alt": {
                    "0": { "baslik": "Atom Modelleri", "aciklama": { "A": "metin1", "B": "metin2" } },
                    "1": { "baslik": "Kimyanın Sembolik Dili", "anahtar_kavramlar": "element, bileşik" }
                }
            },
            "1": { "baslik": "Atom ve Periyodik Sistem" }
        } },
        "10": { "alt": {
            "0": {
                "baslik": "Maddenin Halleri",
                "alt": {
                    "0": {
                        "baslik": "Gazlar",
                        "alt": {
                            "0": { "baslik": "Gaz Basıncı" },
                            "1": { "baslik": "Gaz Kanunları", "aciklama": { "a": "Boyle", "b": "Charles" } }
                        }
                    }
                }
            }
        } }
    } } })
}

/// A flat-variant philosophy document.
///
/// `felsefe-11-Bilgi Felsefesi-K.11.1` is an objective whose topic title is
/// the raw key; "Varlık-Bilgi İlişkisi" contains the path delimiter.
pub fn felsefe_flat() -> Value {
    json!({ "yks": { "felsefe": {
        "10": {
            "Felsefeyi Tanıma": {
                "K.10.1": { "baslik": "Felsefenin anlamını açıklar.", "aciklama": { "a": "Felsefe kavramı" } }
            }
        },
        "11": {
            "Bilgi Felsefesi": {
                "K.11.1": {
                    "baslik": "Bilginin kaynağını sorgular.",
                    "aciklama": { "a": "Akılcılık", "b": "Deneycilik" }
                },
                "K.11.2": { "baslik": "Doğruluk ölçütlerini açıklar." }
            },
            "Varlık-Bilgi İlişkisi": {
                "K.11.3": { "baslik": "Varlık ve bilgi arasındaki ilişkiyi tartışır." }
            }
        }
    } } })
}

/// All fixture documents keyed by their catalogue file name.
pub fn fixture_files() -> Vec<(&'static str, Value)> {
    vec![
        ("kazanimlar_kimya.json", kimya_nested()),
        ("kazanimlar_felsefe.json", felsefe_flat()),
    ]
}

// --- Session store ---

/// An in-memory session store.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, HandoffError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), HandoffError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// --- Mock curriculum source ---

/// A curriculum source serving pre-programmed documents and recording which
/// files were requested.
#[derive(Clone, Debug, Default)]
pub struct MockCurriculumSource {
    documents: Arc<Mutex<HashMap<String, Value>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockCurriculumSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source preloaded with [`fixture_files`].
    pub fn with_fixtures() -> Self {
        let source = Self::new();
        for (file, document) in fixture_files() {
            source.add_document(file, document);
        }
        source
    }

    pub fn add_document(&self, file: &str, document: Value) {
        self.documents
            .lock()
            .unwrap()
            .insert(file.to_string(), document);
    }

    /// The requested file names, in call order.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CurriculumSource for MockCurriculumSource {
    async fn fetch(&self, subject: &SubjectInfo) -> Result<Value, CurriculumError> {
        self.calls.lock().unwrap().push(subject.file.to_string());
        self.documents
            .lock()
            .unwrap()
            .get(subject.file)
            .cloned()
            .ok_or_else(|| CurriculumError::FetchStatus {
                status: 404,
                body: format!("MockCurriculumSource: no document for '{}'", subject.file),
            })
    }
}
