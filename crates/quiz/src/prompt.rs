use std::fmt::Write as _;

use quizgen_llm::Message;

use crate::allocator::AllocationPlan;

const SYSTEM_PROMPT: &str = "You are an expert educational content creator. \
You write clear, unambiguous quiz questions grounded strictly in the text you are given, \
and you answer with JSON only.";

const OUTPUT_CONTRACT: &str = r#"Return your response as a JSON array with the following exact structure:
[
  {
    "question_text": "Your question here",
    "question_type": "multiple_choice" | "true_false" | "open_ended",
    "difficulty": "basic" | "intermediate" | "advanced",
    "options": [
      {"text": "Option A", "is_correct": false},
      {"text": "Option B", "is_correct": true},
      {"text": "Option C", "is_correct": false},
      {"text": "Option D", "is_correct": false}
    ],
    "correct_answer": "For true/false or open-ended questions",
    "explanation": "Brief explanation of the correct answer"
  }
]

Guidelines:
- Multiple choice: exactly 4 options, exactly one correct.
- True/false: set correct_answer to "true" or "false" and omit options.
- Open-ended: put a sample answer in correct_answer and omit options.
- Incorrect options must be plausible but clearly wrong.
- Base every question on the provided text only.
- Include a short explanation for each question.

Return only valid JSON without any additional text or formatting."#;

/// Chat messages asking for exactly the questions in `plan` from `text`.
pub fn build_messages(text: &str, plan: &AllocationPlan, topic: Option<&str>) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(build_user_prompt(text, plan, topic)),
    ]
}

pub fn build_user_prompt(text: &str, plan: &AllocationPlan, topic: Option<&str>) -> String {
    let mut prompt = String::with_capacity(text.len() + OUTPUT_CONTRACT.len() + 512);

    let _ = writeln!(
        prompt,
        "Based on the following text, create exactly {} quiz questions.\n",
        plan.questions_for_segment
    );
    let _ = writeln!(prompt, "Text to analyze:\n{}\n", text.trim());

    prompt.push_str("Requirements:\n");
    prompt.push_str("- Question types (exact counts):\n");
    for (question_type, count) in plan.type_distribution.iter().filter(|(_, n)| **n > 0) {
        let _ = writeln!(prompt, "  - {}: {}", question_type.label(), count);
    }
    prompt.push_str("- Difficulty levels (exact counts):\n");
    for (level, count) in plan.difficulty_distribution.iter().filter(|(_, n)| **n > 0) {
        let _ = writeln!(prompt, "  - {}: {}", level.as_str(), count);
    }
    prompt.push_str("- Focus on key concepts, facts and important details from the text\n");
    prompt.push_str("- Test comprehension and knowledge retention\n");
    if let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) {
        let _ = writeln!(prompt, "- Focus specifically on: {topic}");
    }

    prompt.push('\n');
    prompt.push_str(OUTPUT_CONTRACT);
    prompt
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use quizgen_core::{DifficultyLevel, QuestionType};
    use quizgen_llm::Role;

    use super::*;

    fn plan() -> AllocationPlan {
        AllocationPlan {
            segment_index: 1,
            questions_for_segment: 3,
            type_distribution: IndexMap::from([
                (QuestionType::MultipleChoice, 2),
                (QuestionType::TrueFalse, 1),
                (QuestionType::OpenEnded, 0),
            ]),
            difficulty_distribution: IndexMap::from([
                (DifficultyLevel::Basic, 3),
                (DifficultyLevel::Advanced, 0),
            ]),
        }
    }

    #[test]
    fn prompt_lists_only_non_zero_counts() {
        let prompt = build_user_prompt("Cells divide by mitosis.", &plan(), None);
        assert!(prompt.contains("create exactly 3 quiz questions"));
        assert!(prompt.contains("Cells divide by mitosis."));
        assert!(prompt.contains("  - multiple choice: 2"));
        assert!(prompt.contains("  - true false: 1"));
        assert!(!prompt.contains("open ended:"));
        assert!(prompt.contains("  - basic: 3"));
        assert!(!prompt.contains("advanced: 0"));
        assert!(!prompt.contains("Focus specifically on"));
        assert!(prompt.ends_with("without any additional text or formatting."));
    }

    #[test]
    fn topic_is_included_when_present() {
        let prompt = build_user_prompt("Text.", &plan(), Some("  cell cycle "));
        assert!(prompt.contains("- Focus specifically on: cell cycle\n"));

        let blank = build_user_prompt("Text.", &plan(), Some("   "));
        assert!(!blank.contains("Focus specifically on"));
    }

    #[test]
    fn messages_are_system_then_user() {
        let messages = build_messages("Text.", &plan(), None);
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0].role, Role::System));
        assert!(matches!(messages[1].role, Role::User));
    }
}
