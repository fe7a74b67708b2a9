use serde::{Deserialize, Serialize};

use quizgen_core::config::ChunkingConfig;
use quizgen_core::{dedup_preserving_order, DifficultyLevel, QuestionType};
use quizgen_ingest::SegmenterConfig;

/// A caller's normalized quiz request.
///
/// `total_questions` may be smaller than `|types| * |levels|`; the allocator
/// hands some tags zero questions in that case. Bounds such as the 40-question
/// ceiling are checked by the caller (`QuizLimits::check_question_count`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRequestSpec {
    pub total_questions: u32,
    /// Distinct, in first-seen order.
    pub question_types: Vec<QuestionType>,
    /// Distinct, in first-seen order.
    pub difficulty_levels: Vec<DifficultyLevel>,
    pub chunk_max_chars: usize,
    pub chunking_enabled: bool,
}

impl QuestionRequestSpec {
    pub fn new(
        total_questions: u32,
        question_types: &[QuestionType],
        difficulty_levels: &[DifficultyLevel],
        chunking: &ChunkingConfig,
    ) -> Self {
        Self {
            total_questions,
            question_types: dedup_preserving_order(question_types),
            difficulty_levels: dedup_preserving_order(difficulty_levels),
            chunk_max_chars: chunking.chunk_max_chars,
            chunking_enabled: chunking.chunking_enabled,
        }
    }

    pub fn segmenter_config(&self, min_chars: usize) -> SegmenterConfig {
        SegmenterConfig {
            max_chars: self.chunk_max_chars,
            min_chars,
            enabled: self.chunking_enabled,
        }
    }
}
