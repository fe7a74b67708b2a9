use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use quizgen_core::config::ChunkingConfig;
use quizgen_core::{DifficultyLevel, Question, QuestionType};
use quizgen_quiz::{GenerationError, GenerationRequest, QuestionGenerator, QuestionRequestSpec};

/// What the fake does for one segment.
#[derive(Clone, Copy)]
pub enum Script {
    /// Return exactly the planned count.
    Exact,
    /// Return this many questions regardless of the plan.
    Count(usize),
    Fail,
}

pub struct FakeGenerator {
    scripts: HashMap<usize, Script>,
    delays: HashMap<usize, Duration>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub calls: Mutex<Vec<(usize, u32)>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            delays: HashMap::new(),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script(mut self, segment: usize, script: Script) -> Self {
        self.scripts.insert(segment, script);
        self
    }

    pub fn delay(mut self, segment: usize, millis: u64) -> Self {
        self.delays.insert(segment, Duration::from_millis(millis));
        self
    }

    pub fn called_segments(&self) -> Vec<usize> {
        let mut segments: Vec<usize> = self.calls.lock().unwrap().iter().map(|(s, _)| *s).collect();
        segments.sort_unstable();
        segments
    }
}

#[async_trait]
impl QuestionGenerator for FakeGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Vec<Question>, GenerationError> {
        let index = request.segment.index;
        self.calls
            .lock()
            .unwrap()
            .push((index, request.plan.questions_for_segment));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&index) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let count = match self.scripts.get(&index).copied().unwrap_or(Script::Exact) {
            Script::Exact => request.plan.questions_for_segment as usize,
            Script::Count(n) => n,
            Script::Fail => return Err(GenerationError::InvalidResponse("scripted failure".into())),
        };

        let question_type = request
            .plan
            .requested_types()
            .first()
            .copied()
            .unwrap_or(QuestionType::TrueFalse);
        Ok((0..count)
            .map(|i| Question {
                id: Uuid::new_v4(),
                question_text: format!("Segment {index} question {i}"),
                question_type,
                difficulty: None,
                options: None,
                correct_answer: Some("true".into()),
                explanation: None,
                segment_index: index,
            })
            .collect())
    }
}

/// `n` paragraphs of exactly `len` characters, blank-line separated.
pub fn paragraphs(n: usize, len: usize) -> String {
    (0..n)
        .map(|i| {
            let head = format!("Paragraph {i} says");
            format!("{head} {}", "x".repeat(len - head.len() - 1))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn request(total: u32, types: &[QuestionType], chunking: &ChunkingConfig) -> QuestionRequestSpec {
    QuestionRequestSpec::new(total, types, &[DifficultyLevel::Intermediate], chunking)
}
