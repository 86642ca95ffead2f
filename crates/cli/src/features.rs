//! # Feature Runners
//!
//! Reads the handed-off selection and calls the matching backend feature,
//! printing the result the way the web pages lay it out.

use anyhow::{bail, Result};
use promptitron::api::{
    ApiClient, ConceptMapOptions, ExplanationOptions, QuestionOptions, QuestionsResponse,
    SummaryOptions,
};
use promptitron::chat::{ChatMode, ChatSession};
use promptitron::curriculum::SelectedTopicRecord;
use promptitron::handoff::{read_handoff, ActionType, Handoff, SessionStore};
use promptitron::questions::{answer_key, questions_from_response};
use std::io::{BufRead, Write};
use tracing::info;

/// Shown when a feature is started without a selection.
pub const NO_SELECTION_MESSAGE: &str =
    "Seçilen konular bulunamadı. Lütfen önce `promptitron browse` ile konuları seçin.";

/// Per-feature options gathered from the command line.
#[derive(Debug, Clone, Default)]
pub struct FeatureOptions {
    pub questions: QuestionOptions,
    pub summary: SummaryOptions,
    pub concept_map: ConceptMapOptions,
    pub explanation: ExplanationOptions,
    /// Learning goal for Socratic sessions.
    pub goal: Option<String>,
}

/// Loads the handoff, failing with [`NO_SELECTION_MESSAGE`] when it is
/// missing or empty. `action` overrides the stored tag.
pub fn load_selection<S: SessionStore + ?Sized>(
    store: &S,
    action: Option<ActionType>,
) -> Result<Handoff> {
    match read_handoff(store)? {
        Some(mut handoff) if !handoff.selected_topics.is_empty() => {
            if let Some(action) = action {
                handoff.action = action;
            }
            Ok(handoff)
        }
        _ => bail!(NO_SELECTION_MESSAGE),
    }
}

pub fn print_selection(topics: &[SelectedTopicRecord], out: &mut impl Write) -> Result<()> {
    writeln!(out, "Seçilen Konular ({})", topics.len())?;
    for topic in topics {
        let mut context = vec![topic.ders.clone(), format!("{}. Sınıf", topic.sinif)];
        if let Some(konu) = topic.konu.as_ref().filter(|k| *k != &topic.title) {
            context.push(konu.clone());
        }
        writeln!(out, "  - {} ({})", topic.title, context.join(" · "))?;
    }
    writeln!(out)?;
    Ok(())
}

/// Runs a one-shot feature and prints its result.
pub async fn run_feature(
    client: &ApiClient,
    handoff: &Handoff,
    options: &FeatureOptions,
    out: &mut impl Write,
) -> Result<()> {
    let topics = &handoff.selected_topics;
    info!(action = %handoff.action, topics = topics.len(), "Running curriculum feature");
    print_selection(topics, out)?;

    match handoff.action {
        ActionType::Questions => {
            let response = client
                .curriculum_questions(topics, options.questions)
                .await?;
            print_questions(&response, out)?;
        }
        ActionType::Summary => {
            let response = client.curriculum_summary(topics, options.summary).await?;
            writeln!(out, "{}", response.summary)?;
            print_subjects(response.topics_count, response.subjects.as_deref(), out)?;
        }
        ActionType::ConceptMap => {
            let response = client
                .curriculum_concept_map(topics, options.concept_map)
                .await?;
            writeln!(out, "{}", response.concept_map_text())?;
            if let Some(count) = response.connections_count {
                writeln!(out, "Bağlantı sayısı: {count}")?;
            }
            print_subjects(response.topics_count, response.subjects.as_deref(), out)?;
        }
        ActionType::Explanation => {
            let response = client
                .curriculum_explanation(topics, options.explanation)
                .await?;
            writeln!(out, "{}", response.explanation)?;
            print_subjects(response.topics_count, response.subjects.as_deref(), out)?;
        }
        ActionType::AiChat | ActionType::Socratic => {
            bail!("'{}' is a conversation; use `promptitron chat`", handoff.action)
        }
    }
    Ok(())
}

fn print_subjects(
    topics_count: Option<u32>,
    subjects: Option<&[String]>,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(count) = topics_count {
        writeln!(out, "\nKonu sayısı: {count}")?;
    }
    if let Some(subjects) = subjects.filter(|s| !s.is_empty()) {
        writeln!(out, "Dersler: {}", subjects.join(", "))?;
    }
    Ok(())
}

pub fn print_questions(response: &QuestionsResponse, out: &mut impl Write) -> Result<()> {
    let questions = questions_from_response(&response.questions);
    writeln!(out, "✅ {} soru oluşturuldu.\n", questions.len())?;

    for (index, question) in questions.iter().enumerate() {
        writeln!(out, "Soru {}: {}", index + 1, question.text)?;
        for option in &question.options {
            writeln!(out, "    {}) {}", option.letter, option.text)?;
        }
        writeln!(out)?;
    }

    let key = answer_key(&questions);
    if !key.is_empty() {
        writeln!(out, "Cevap Anahtarı")?;
        for entry in key {
            writeln!(out, "  Soru {}: {}", entry.number, entry.answer)?;
            if let Some(explanation) = entry.explanation {
                writeln!(out, "    Açıklama: {explanation}")?;
            }
        }
    }

    if let Some(agent) = &response.agent_used {
        writeln!(out, "\nKullanılan Sistem: {agent}")?;
    }
    Ok(())
}

/// Runs a conversation: sends the opening message, then one turn per input
/// line until `q` or end of input.
pub async fn run_chat(
    client: &ApiClient,
    mode: ChatMode,
    topics: Vec<SelectedTopicRecord>,
    goal: Option<&str>,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<usize> {
    print_selection(&topics, out)?;
    let mut session = ChatSession::new(mode, topics);
    info!(session_id = session.session_id(), "Starting {}", mode.topic());

    let opening = session.opening_message(goal);
    writeln!(out, "Sen: {opening}")?;
    let reply = session.start(client, goal).await?;
    writeln!(out, "AI: {reply}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "q" || message == "quit" {
            break;
        }
        let reply = session.send(client, message).await?;
        writeln!(out, "AI: {reply}")?;
        out.flush()?;
    }
    Ok(session.messages().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptitron::curriculum::{PathKey, SelectionKind};
    use promptitron::handoff::write_handoff;
    use promptitron::FileSessionStore;
    use serde_json::json;

    fn topic() -> SelectedTopicRecord {
        SelectedTopicRecord {
            ders: "tarih".into(),
            sinif: "10".into(),
            konu: Some("Osmanlı Kuruluş".into()),
            kazanim: Some("Beylikten devlete geçişi açıklar.".into()),
            title: "Beylikten devlete geçişi açıklar.".into(),
            aciklama: String::new(),
            anahtar_kavramlar: None,
            konu_anahtar_kavramlar: None,
            path: PathKey::decode("tarih-10-Osmanlı Kuruluş-10.1.1"),
            kind: SelectionKind::Objective,
        }
    }

    #[test]
    fn empty_or_missing_selection_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::new(dir.path().join("s.json"));
        let err = load_selection(&store, None).unwrap_err();
        assert_eq!(err.to_string(), NO_SELECTION_MESSAGE);

        write_handoff(
            &mut store,
            &Handoff {
                selected_topics: Vec::new(),
                action: ActionType::Summary,
            },
        )
        .unwrap();
        assert!(load_selection(&store, None).is_err());
    }

    #[test]
    fn action_override_replaces_stored_tag() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::new(dir.path().join("s.json"));
        write_handoff(
            &mut store,
            &Handoff {
                selected_topics: vec![topic()],
                action: ActionType::Summary,
            },
        )
        .unwrap();
        let handoff = load_selection(&store, Some(ActionType::ConceptMap)).unwrap();
        assert_eq!(handoff.action, ActionType::ConceptMap);
    }

    #[test]
    fn questions_render_with_answer_key() {
        let response: QuestionsResponse = serde_json::from_value(json!({
            "success": true,
            "questions": [
                { "question_text": "Osmanlı hangi yıl kuruldu?", "options": ["1299", "1453"], "correct_answer": "A", "explanation": "Kuruluş 1299." },
                { "question_text": "Açık uçlu soru" }
            ],
            "agent_used": "crew"
        }))
        .unwrap();
        let mut out = Vec::new();
        print_questions(&response, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Soru 1: Osmanlı hangi yıl kuruldu?"));
        assert!(printed.contains("    B) 1453"));
        assert!(printed.contains("Cevap Anahtarı\n  Soru 1: A\n    Açıklama: Kuruluş 1299."));
        assert!(!printed.contains("  Soru 2:"));
        assert!(printed.contains("Kullanılan Sistem: crew"));
    }

    #[test]
    fn selection_lists_context() {
        let mut out = Vec::new();
        print_selection(&[topic()], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Seçilen Konular (1)\n  - Beylikten devlete geçişi açıklar. (tarih · 10. Sınıf · Osmanlı Kuruluş)\n\n"
        );
    }
}
