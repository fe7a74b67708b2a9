//! Turning a model response into validated [`Question`]s.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use quizgen_core::{DifficultyLevel, MultipleChoiceOption, Question, QuestionType};

use crate::generator::GenerationError;

/// Locate the JSON payload in an LLM response: fenced block, then bare
/// array or object, else the trimmed text.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_tick = &trimmed[start + 3..];
        // Skip a language tag on the fence line.
        let content_start = after_tick.find('\n').map_or(0, |n| n + 1);
        if let Some(end) = after_tick[content_start..].find("```") {
            return after_tick[content_start..content_start + end].trim();
        }
    }

    if let Some(start) = trimmed.find(['[', '{']) {
        let close = if trimmed[start..].starts_with('[') { ']' } else { '}' };
        if let Some(end) = trimmed.rfind(close).filter(|&end| end > start) {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

#[derive(Debug, Deserialize)]
struct RawOption {
    text: String,
    #[serde(default)]
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    question_text: Option<String>,
    #[serde(default)]
    question_type: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    options: Option<Vec<RawOption>>,
    /// Models return strings, booleans or numbers here.
    #[serde(default)]
    correct_answer: Option<Value>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse a response into questions for segment `segment_index`.
///
/// Types that are unknown or were not requested are coerced to the first
/// requested type. Items without text, and multiple-choice items without
/// options, are skipped. Fails only when nothing usable remains.
pub fn parse_questions(
    response: &str,
    requested_types: &[QuestionType],
    segment_index: usize,
) -> Result<Vec<Question>, GenerationError> {
    let payload = extract_json(response);
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| GenerationError::InvalidResponse(format!("not valid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(GenerationError::InvalidResponse(
                    "expected a JSON array of questions".into(),
                ))
            }
        },
        _ => {
            return Err(GenerationError::InvalidResponse(
                "expected a JSON array of questions".into(),
            ))
        }
    };

    let fallback_type = requested_types
        .first()
        .copied()
        .unwrap_or(QuestionType::MultipleChoice);

    let mut questions = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        let raw: RawQuestion = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(segment = segment_index, position, error = %e, "Skipping malformed question");
                continue;
            }
        };
        match convert(raw, requested_types, fallback_type, segment_index) {
            Ok(question) => questions.push(question),
            Err(reason) => {
                warn!(segment = segment_index, position, reason, "Skipping invalid question");
            }
        }
    }

    if questions.is_empty() {
        return Err(GenerationError::NoValidQuestions);
    }
    Ok(questions)
}

fn convert(
    raw: RawQuestion,
    requested_types: &[QuestionType],
    fallback_type: QuestionType,
    segment_index: usize,
) -> Result<Question, &'static str> {
    let question_text = raw
        .question_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or("missing question_text")?;

    let question_type = raw
        .question_type
        .and_then(|t| t.parse::<QuestionType>().ok())
        .filter(|t| requested_types.is_empty() || requested_types.contains(t))
        .unwrap_or(fallback_type);

    let difficulty = raw.difficulty.and_then(|d| d.parse::<DifficultyLevel>().ok());

    let (options, correct_answer) = if question_type == QuestionType::MultipleChoice {
        let options: Vec<MultipleChoiceOption> = raw
            .options
            .unwrap_or_default()
            .into_iter()
            .map(|o| MultipleChoiceOption {
                text: o.text,
                is_correct: o.is_correct,
            })
            .collect();
        if options.is_empty() {
            return Err("multiple choice question without options");
        }
        (Some(options), None)
    } else {
        (None, raw.correct_answer.and_then(answer_text))
    };

    Ok(Question {
        id: Uuid::new_v4(),
        question_text,
        question_type,
        difficulty,
        options,
        correct_answer,
        explanation: raw.explanation.filter(|e| !e.trim().is_empty()),
        segment_index,
    })
}

fn answer_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use QuestionType::*;

    #[test]
    fn extract_json_from_fenced_block() {
        let input = "Sure:\n```json\n[{\"a\": 1}]\n```\nEnjoy.";
        assert_eq!(extract_json(input), "[{\"a\": 1}]");
    }

    #[test]
    fn extract_json_from_plain_fence() {
        let input = "```\n[1, 2]\n```";
        assert_eq!(extract_json(input), "[1, 2]");
    }

    #[test]
    fn extract_json_finds_bare_array() {
        assert_eq!(extract_json("Here you go: [1] thanks"), "[1]");
        assert_eq!(extract_json(r#"{"questions": []}"#), r#"{"questions": []}"#);
    }

    #[test]
    fn parses_all_question_kinds() {
        let response = r#"[
            {"question_text": "What is ATP?", "question_type": "multiple_choice", "difficulty": "basic",
             "options": [{"text": "Energy carrier", "is_correct": true}, {"text": "A sugar", "is_correct": false}],
             "explanation": "ATP stores energy."},
            {"question_text": "Cells have walls.", "question_type": "true_false", "correct_answer": false},
            {"question_text": "Describe mitosis.", "question_type": "open_ended", "correct_answer": "Division of the nucleus."}
        ]"#;
        let questions = parse_questions(response, &[MultipleChoice, TrueFalse, OpenEnded], 2).unwrap();
        assert_eq!(questions.len(), 3);

        assert_eq!(questions[0].question_type, MultipleChoice);
        assert_eq!(questions[0].difficulty, Some(DifficultyLevel::Basic));
        assert_eq!(questions[0].options.as_ref().unwrap().len(), 2);
        assert!(questions[0].correct_answer.is_none());

        assert_eq!(questions[1].correct_answer.as_deref(), Some("false"));
        assert!(questions[1].options.is_none());
        assert_eq!(questions[2].correct_answer.as_deref(), Some("Division of the nucleus."));
        assert!(questions.iter().all(|q| q.segment_index == 2));
        assert_ne!(questions[0].id, questions[1].id);
    }

    #[test]
    fn unrequested_type_is_coerced_to_first_requested() {
        let response = r#"[{"question_text": "Explain osmosis.", "question_type": "open_ended", "correct_answer": "x"},
                           {"question_text": "Is water wet?", "question_type": "riddle", "correct_answer": true}]"#;
        let questions = parse_questions(response, &[TrueFalse], 0).unwrap();
        assert!(questions.iter().all(|q| q.question_type == TrueFalse));
        assert_eq!(questions[1].correct_answer.as_deref(), Some("true"));
    }

    #[test]
    fn multiple_choice_without_options_is_skipped() {
        let response = r#"[{"question_text": "Pick one", "question_type": "multiple_choice"},
                           {"question_text": "Pick two", "question_type": "multiple_choice",
                            "options": [{"text": "A", "is_correct": true}]}]"#;
        let questions = parse_questions(response, &[MultipleChoice], 0).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_text, "Pick two");
    }

    #[test]
    fn wrapped_object_is_accepted() {
        let response = r#"{"questions": [{"question_text": "Q?", "question_type": "true_false", "correct_answer": "true"}]}"#;
        let questions = parse_questions(response, &[TrueFalse], 0).unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn items_without_text_are_skipped() {
        let response = r#"[{"question_type": "true_false"}, "not an object", {"question_text": "  "}]"#;
        let err = parse_questions(response, &[TrueFalse], 0).unwrap_err();
        assert!(matches!(err, GenerationError::NoValidQuestions));
    }

    #[test]
    fn empty_array_is_no_valid_questions() {
        let err = parse_questions("[]", &[TrueFalse], 0).unwrap_err();
        assert!(matches!(err, GenerationError::NoValidQuestions));
    }

    #[test]
    fn non_json_is_invalid_response() {
        let err = parse_questions("I cannot help with that.", &[TrueFalse], 0).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));

        let err = parse_questions(r#"{"answer": 42}"#, &[TrueFalse], 0).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }
}
