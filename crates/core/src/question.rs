use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Kind of quiz question a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    OpenEnded,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::OpenEnded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::OpenEnded => "open_ended",
        }
    }

    /// Human wording used in prompts ("multiple choice").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    /// Accepts the canonical tag plus the short aliases upload forms tend to send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple_choice" | "multiple-choice" | "mcq" | "mc" => Ok(QuestionType::MultipleChoice),
            "true_false" | "true-false" | "tf" | "bool" | "boolean" => Ok(QuestionType::TrueFalse),
            "open_ended" | "open-ended" | "essay" | "text" | "open" => Ok(QuestionType::OpenEnded),
            _ => Err(ValidationError::InvalidQuestionType(s.trim().to_string())),
        }
    }
}

/// Target difficulty of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Basic,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Basic => "basic",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(DifficultyLevel::Basic),
            "intermediate" => Ok(DifficultyLevel::Intermediate),
            "advanced" => Ok(DifficultyLevel::Advanced),
            _ => Err(ValidationError::InvalidDifficultyLevel(s.trim().to_string())),
        }
    }
}

/// Parse a comma-separated tag list ("mcq, tf,mcq") into an ordered list
/// with duplicates dropped at their later positions. Blank entries are ignored.
pub fn parse_tag_list<T>(raw: &str) -> Result<Vec<T>, ValidationError>
where
    T: FromStr<Err = ValidationError> + PartialEq,
{
    let mut out: Vec<T> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let tag: T = part.parse()?;
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    Ok(out)
}

/// Drop repeated entries, keeping the first occurrence of each.
pub fn dedup_preserving_order<T: PartialEq + Copy>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(*item);
        }
    }
    out
}

// ── Tag catalog ───────────────────────────────────────────────

/// A selectable tag and its title-cased display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOption {
    pub value: &'static str,
    pub label: String,
}

impl TagOption {
    fn new(value: &'static str) -> Self {
        Self {
            value,
            label: title_case(value),
        }
    }
}

fn title_case(tag: &str) -> String {
    tag.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every question type and difficulty level a request may name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCatalog {
    pub question_types: Vec<TagOption>,
    pub difficulty_levels: Vec<TagOption>,
}

impl TagCatalog {
    pub fn new() -> Self {
        Self {
            question_types: QuestionType::ALL.iter().map(|t| TagOption::new(t.as_str())).collect(),
            difficulty_levels: DifficultyLevel::ALL
                .iter()
                .map(|l| TagOption::new(l.as_str()))
                .collect(),
        }
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ── Generated questions ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleChoiceOption {
    pub text: String,
    pub is_correct: bool,
}

/// A question returned by the generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<DifficultyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<MultipleChoiceOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Index of the segment this question was generated from.
    pub segment_index: usize,
}
