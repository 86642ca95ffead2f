//! # Generated Question Parsing
//!
//! Question generation agents do not always return clean JSON. The `questions`
//! field may be a list, a single object, or a model's raw text with JSON
//! somewhere inside it. [`parse_questions`] degrades through several
//! strategies and never fails; [`normalize_question`] then maps the many field
//! spellings agents use onto one [`Question`] shape.

use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;
use tracing::{debug, warn};

const TEXT_FIELDS: &[&str] = &["question_text", "soru_metni", "soru", "question"];
const OPTION_FIELDS: &[&str] = &["options", "secenekler", "şıklar", "siklar"];
const ANSWER_FIELDS: &[&str] = &["correct_answer", "dogru_cevap", "cevap"];
const EXPLANATION_FIELDS: &[&str] = &["explanation", "aciklama", "açıklama"];
const OPTION_TEXT_FIELDS: &[&str] = &["option_text", "text", "secenek"];

/// The outermost `[...]` or `{...}` span of a response.
static JSON_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[\s\S]*\]|\{[\s\S]*\}").expect("JSON span regex should compile")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub letter: String,
    pub text: String,
}

/// One generated question in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<QuestionOption>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

/// One line of the answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerKeyEntry {
    /// 1-based question number.
    pub number: usize,
    pub answer: String,
    pub explanation: Option<String>,
}

/// Turns the backend's `questions` field into a list of raw question values.
///
/// Strings go through: a direct JSON parse, then the first bracketed span,
/// then one JSON value per line, and finally a single
/// `{"question_text": <raw>}` wrapper. A non-array result is wrapped in an
/// array.
pub fn parse_questions(raw: &Value) -> Vec<Value> {
    let parsed = match raw {
        Value::String(text) => parse_text(text),
        Value::Null => Value::Array(Vec::new()),
        other => other.clone(),
    };
    match parsed {
        Value::Array(items) => items,
        single => vec![single],
    }
}

fn parse_text(text: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        debug!("Questions parsed as JSON directly");
        return value;
    }

    if let Some(span) = JSON_SPAN_RE.find(text) {
        if let Ok(value) = serde_json::from_str::<Value>(span.as_str()) {
            debug!("Questions parsed from embedded JSON span");
            return value;
        }
    }

    let per_line: Vec<Value> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    if !per_line.is_empty() {
        debug!(count = per_line.len(), "Questions parsed line by line");
        return Value::Array(per_line);
    }

    warn!("Could not find JSON in question response; wrapping raw text");
    json!([{ "question_text": text }])
}

/// Maps one raw question value onto [`Question`].
pub fn normalize_question(raw: &Value) -> Question {
    let Value::Object(obj) = raw else {
        return Question {
            text: display_text(raw),
            options: Vec::new(),
            correct_answer: None,
            explanation: None,
        };
    };

    Question {
        text: first_present(obj, TEXT_FIELDS)
            .map(display_text)
            .unwrap_or_else(|| raw.to_string()),
        options: first_present(obj, OPTION_FIELDS)
            .map(normalize_options)
            .unwrap_or_default(),
        correct_answer: first_present(obj, ANSWER_FIELDS).map(display_text),
        explanation: first_present(obj, EXPLANATION_FIELDS).map(display_text),
    }
}

/// Parses and normalizes in one step.
pub fn questions_from_response(raw: &Value) -> Vec<Question> {
    parse_questions(raw).iter().map(normalize_question).collect()
}

/// Lists the answers of every question that carries one.
pub fn answer_key(questions: &[Question]) -> Vec<AnswerKeyEntry> {
    questions
        .iter()
        .enumerate()
        .filter_map(|(index, question)| {
            question.correct_answer.as_ref().map(|answer| AnswerKeyEntry {
                number: index + 1,
                answer: answer.clone(),
                explanation: question.explanation.clone(),
            })
        })
        .collect()
}

fn normalize_options(raw: &Value) -> Vec<QuestionOption> {
    match raw {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| normalize_option(index, item))
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(letter, text)| QuestionOption {
                letter: letter.clone(),
                text: display_text(text),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn normalize_option(index: usize, item: &Value) -> QuestionOption {
    let fallback_letter = option_letter(index);
    match item {
        Value::Object(obj) => {
            let text = first_present(obj, OPTION_TEXT_FIELDS)
                .map(display_text)
                .unwrap_or_default();
            match first_present(obj, &["option_letter"]) {
                Some(letter) => QuestionOption {
                    letter: display_text(letter),
                    text,
                },
                None => QuestionOption {
                    letter: fallback_letter,
                    text: if text.is_empty() { item.to_string() } else { text },
                },
            }
        }
        other => QuestionOption {
            letter: fallback_letter,
            text: display_text(other),
        },
    }
}

/// `A`..`Z` for option indices, then plain numbers.
fn option_letter(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

/// The first field that is present and not empty, null or `false`.
fn first_present<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|value| !is_blank(value))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_json_string_parses() {
        let raw = Value::String("[{\"question_text\":\"2+2=?\"}]".to_string());
        let questions = parse_questions(&raw);
        assert_eq!(questions, vec![json!({ "question_text": "2+2=?" })]);
    }

    #[test]
    fn plain_text_is_wrapped() {
        let raw = Value::String("soru: 2+2=? cevap: 4".to_string());
        let questions = parse_questions(&raw);
        assert_eq!(
            questions,
            vec![json!({ "question_text": "soru: 2+2=? cevap: 4" })]
        );
        assert_eq!(normalize_question(&questions[0]).text, "soru: 2+2=? cevap: 4");
    }

    #[test]
    fn embedded_json_span_is_extracted() {
        let raw = Value::String(
            "İşte sorular:\n[{\"soru\": \"H2O nedir?\", \"cevap\": \"Su\"}]\nBaşarılar!".to_string(),
        );
        let questions = questions_from_response(&raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "H2O nedir?");
        assert_eq!(questions[0].correct_answer.as_deref(), Some("Su"));
    }

    #[test]
    fn json_lines_are_collected() {
        let raw = Value::String(
            "{\"soru\": \"Bir\"} trailing\n{\"soru\": \"İki\"}\n{\"soru\": \"Üç\"}".to_string(),
        );
        // The greedy span covers all lines and fails to parse, so each line
        // is tried on its own; the first line is skipped.
        let questions = questions_from_response(&raw);
        let texts: Vec<_> = questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["İki", "Üç"]);
    }

    #[test]
    fn single_object_is_wrapped_in_a_list() {
        let questions = parse_questions(&json!({ "question": "Tek soru" }));
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn options_accept_lists_and_letter_maps() {
        let listed = normalize_question(&json!({
            "question_text": "Hangisi soygazdır?",
            "options": ["Helyum", { "option_letter": "B", "option_text": "Oksijen" }, { "secenek": "Azot" }],
            "correct_answer": "A",
            "explanation": "Helyum soygazdır."
        }));
        assert_eq!(
            listed.options,
            vec![
                QuestionOption { letter: "A".into(), text: "Helyum".into() },
                QuestionOption { letter: "B".into(), text: "Oksijen".into() },
                QuestionOption { letter: "C".into(), text: "Azot".into() },
            ]
        );

        let mapped = normalize_question(&json!({
            "soru_metni": "2+2?",
            "secenekler": { "A": "3", "B": "4" },
            "dogru_cevap": "B"
        }));
        assert_eq!(mapped.options[1], QuestionOption { letter: "B".into(), text: "4".into() });
        assert_eq!(mapped.correct_answer.as_deref(), Some("B"));
    }

    #[test]
    fn answer_key_skips_unanswered_questions() {
        let questions = questions_from_response(&json!([
            { "soru": "Bir", "cevap": "A", "açıklama": "Çünkü" },
            { "soru": "İki" },
            { "soru": "Üç", "cevap": "C" }
        ]));
        let key = answer_key(&questions);
        assert_eq!(key.len(), 2);
        assert_eq!(key[0].number, 1);
        assert_eq!(key[0].explanation.as_deref(), Some("Çünkü"));
        assert_eq!(key[1].number, 3);
        assert_eq!(key[1].answer, "C");
    }
}
