//! # Curriculum Sources
//!
//! Subject documents are static JSON files, served either from a local
//! directory or from a static file server. `CurriculumSource` hides the
//! difference; [`create_source`] picks an implementation from the location.

use crate::constants::{find_subject, SubjectInfo};
use crate::curriculum::schema::{normalize, normalize_subject, CurriculumTree};
use crate::errors::CurriculumError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use std::fmt::Debug;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Anything that can hand out the raw JSON of a subject's curriculum.
#[async_trait]
pub trait CurriculumSource: Send + Sync + Debug + DynClone {
    /// Fetches and parses the subject's document without interpreting it.
    async fn fetch(&self, subject: &SubjectInfo) -> Result<Value, CurriculumError>;
}

dyn_clone::clone_trait_object!(CurriculumSource);

/// Reads subject documents from a local directory.
#[derive(Clone, Debug)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl CurriculumSource for FileSource {
    async fn fetch(&self, subject: &SubjectInfo) -> Result<Value, CurriculumError> {
        let path = self.dir.join(subject.file);
        info!("Reading curriculum from: {}", path.display());
        let raw = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Fetches subject documents from `<base_url>/<file>`.
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: ReqwestClient,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CurriculumError> {
        let client = ReqwestClient::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CurriculumSource for HttpSource {
    async fn fetch(&self, subject: &SubjectInfo) -> Result<Value, CurriculumError> {
        let url = format!("{}/{}", self.base_url, subject.file);
        info!("Fetching curriculum from: {}", url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CurriculumError::FetchStatus { status, body });
        }
        let raw = response.text().await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Creates a source for `location`: `http(s)://` URLs get an [`HttpSource`],
/// anything else is treated as a directory.
pub fn create_source(location: &str) -> Result<Box<dyn CurriculumSource>, CurriculumError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// Loads and normalizes one catalogue subject.
///
/// If the document stores the subject under a different key than the
/// catalogue name, its first subject is used and renamed, so path keys always
/// start with the catalogue name.
pub async fn load_subject(
    source: &dyn CurriculumSource,
    name: &str,
) -> Result<CurriculumTree, CurriculumError> {
    let subject =
        find_subject(name).ok_or_else(|| CurriculumError::UnknownSubject(name.to_string()))?;
    let result = source.fetch(subject).await.and_then(|raw| {
        match normalize_subject(&raw, subject.name) {
            Ok(tree) => Ok(tree),
            Err(CurriculumError::SubjectNotInDocument(_)) => {
                warn!(
                    subject = subject.name,
                    "Subject key not found; using first subject in document"
                );
                let mut tree = normalize(&raw)?;
                tree.subject = subject.name.to_string();
                Ok(tree)
            }
            Err(e) => Err(e),
        }
    });
    if let Err(e) = &result {
        error!(subject = subject.name, "Failed to load curriculum: {e}");
    }
    result
}
