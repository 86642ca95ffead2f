//! # Curriculum Source Tests
//!
//! Loads subject documents from a temporary directory and from a mocked
//! static file server.

use promptitron::curriculum::SchemaVariant;
use promptitron::{create_source, load_subject, CurriculumError, FileSource, HttpSource};
use promptitron_test_utils::{felsefe_flat, fixture_files, kimya_nested, setup_tracing};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn file_source_loads_catalogue_files() {
    // --- 1. Arrange ---
    setup_tracing();
    let dir = tempfile::tempdir().unwrap();
    for (file, document) in fixture_files() {
        std::fs::write(dir.path().join(file), document.to_string()).unwrap();
    }
    let source = FileSource::new(dir.path());

    // --- 2. Act ---
    let kimya = load_subject(&source, "kimya").await.unwrap();
    let felsefe = load_subject(&source, "felsefe").await.unwrap();

    // --- 3. Assert ---
    assert_eq!(kimya.variant, SchemaVariant::Nested);
    assert_eq!(kimya.grades.len(), 2);
    assert_eq!(felsefe.variant, SchemaVariant::Flat);
    assert_eq!(felsefe.subject, "felsefe");
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    setup_tracing();
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::new(dir.path());
    let result = load_subject(&source, "fizik").await;
    assert!(matches!(result, Err(CurriculumError::Io(_))));
}

#[tokio::test]
async fn malformed_json_is_reported() {
    setup_tracing();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("kazanimlar_tarih.json"), "{ yks: ").unwrap();
    let source = FileSource::new(dir.path());
    let result = load_subject(&source, "tarih").await;
    assert!(matches!(result, Err(CurriculumError::Json(_))));
}

#[tokio::test]
async fn http_source_fetches_from_the_base_url() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kazanimlar/kazanimlar_kimya.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kimya_nested()))
        .expect(1)
        .mount(&server)
        .await;
    let source = create_source(&format!("{}/kazanimlar/", server.uri())).unwrap();

    // --- 2. Act ---
    let tree = load_subject(source.as_ref(), "kimya").await.unwrap();

    // --- 3. Assert ---
    assert_eq!(tree.subject, "kimya");
    assert_eq!(tree.objective_count(), 4);
}

#[tokio::test]
async fn http_errors_carry_the_status() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    let source = HttpSource::new(server.uri()).unwrap();

    let err = load_subject(&source, "biyoloji").await.unwrap_err();
    match err {
        CurriculumError::FetchStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn a_document_under_another_key_is_renamed() {
    setup_tracing();
    let server = MockServer::start().await;
    let mut document = felsefe_flat();
    let grades = document["yks"]["felsefe"].take();
    document["yks"] = json!({ "Felsefe": grades });
    Mock::given(method("GET"))
        .and(path("/kazanimlar_felsefe.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .mount(&server)
        .await;
    let source = HttpSource::new(server.uri()).unwrap();

    let tree = load_subject(&source, "felsefe").await.unwrap();
    assert_eq!(tree.subject, "felsefe");
    assert_eq!(tree.grades.len(), 2);
}

#[test]
fn create_source_picks_by_scheme() {
    let local = create_source("kazanimlar").unwrap();
    assert!(format!("{local:?}").starts_with("FileSource"));
    let remote = create_source("https://cdn.example.com/kazanimlar").unwrap();
    assert!(format!("{remote:?}").starts_with("HttpSource"));
}
