//! Segment → allocate → generate, with per-segment failure isolation.
//!
//! Planning is synchronous and deterministic. Generation runs segment calls
//! concurrently (bounded by `concurrency`) and re-joins the results in
//! segment order before building the [`QuizOutcome`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use quizgen_core::config::{ChunkingConfig, TieBreak};
use quizgen_core::Question;
use quizgen_ingest::{Segment, SegmentError, SegmentSummary, Segmenter};

use crate::allocator::{AllocationError, AllocationPlan, Allocator};
use crate::generator::{GenerationError, GenerationRequest, QuestionGenerator};
use crate::request::QuestionRequestSpec;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Segment(#[from] SegmentError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Segments and their allocation, before any generation.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedQuiz {
    pub segments: Vec<Segment>,
    pub plans: Vec<AllocationPlan>,
}

impl PlannedQuiz {
    pub fn summary(&self) -> SegmentSummary {
        SegmentSummary::from_segments(&self.segments)
    }

    pub fn total_questions(&self) -> u32 {
        self.plans.iter().map(|p| p.questions_for_segment).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentReport {
    pub segment_index: usize,
    pub requested: u32,
    pub produced: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextProcessing {
    pub input_length: usize,
    pub chunking_used: bool,
    pub max_chunk_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizOutcome {
    /// Segment order, then model order within a segment.
    pub questions: Vec<Question>,
    pub topic: Option<String>,
    pub total_questions: u32,
    pub segments: Vec<SegmentReport>,
    pub failed_segments: Vec<usize>,
    pub text_processing: TextProcessing,
    pub summary: SegmentSummary,
    pub generated_at: DateTime<Utc>,
}

impl QuizOutcome {
    pub fn requested(&self) -> u32 {
        self.segments.iter().map(|s| s.requested).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failed_segments.is_empty() && self.questions.len() as u32 == self.requested()
    }
}

pub struct QuizPipeline {
    generator: Arc<dyn QuestionGenerator>,
    min_text_chars: usize,
    allocator: Allocator,
    concurrency: usize,
}

impl QuizPipeline {
    pub fn new(generator: Arc<dyn QuestionGenerator>, chunking: &ChunkingConfig) -> Self {
        Self {
            generator,
            min_text_chars: chunking.min_text_chars,
            allocator: Allocator::new(chunking.tie_break),
            concurrency: 1,
        }
    }

    /// Maximum in-flight generation calls (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn tie_break(&self) -> TieBreak {
        self.allocator.tie_break()
    }

    pub fn plan(&self, text: &str, spec: &QuestionRequestSpec) -> Result<PlannedQuiz, QuizError> {
        let segmenter = Segmenter::new(spec.segmenter_config(self.min_text_chars));
        let segments = segmenter.segment(text)?;
        let plans = self.allocator.allocate(&segments, spec)?;
        Ok(PlannedQuiz { segments, plans })
    }

    pub async fn run(
        &self,
        text: &str,
        spec: &QuestionRequestSpec,
        topic: Option<&str>,
    ) -> Result<QuizOutcome, QuizError> {
        let planned = self.plan(text, spec)?;
        let summary = planned.summary();

        info!(
            segments = planned.segments.len(),
            total_questions = spec.total_questions,
            concurrency = self.concurrency,
            "Generating quiz"
        );

        let generator = &self.generator;
        let jobs = planned
            .segments
            .iter()
            .zip(&planned.plans)
            .filter(|(_, plan)| !plan.is_empty());

        let mut results: Vec<(usize, Result<Vec<Question>, GenerationError>)> = stream::iter(jobs)
            .map(|(segment, plan)| async move {
                let result = generator
                    .generate(GenerationRequest {
                        segment,
                        plan,
                        topic,
                    })
                    .await;
                (segment.index, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        results.sort_by_key(|(index, _)| *index);

        let mut results = results.into_iter().peekable();
        let mut questions = Vec::with_capacity(spec.total_questions as usize);
        let mut reports = Vec::with_capacity(planned.plans.len());
        let mut failed_segments = Vec::new();

        for plan in &planned.plans {
            let requested = plan.questions_for_segment;
            let mut report = SegmentReport {
                segment_index: plan.segment_index,
                requested,
                produced: 0,
                error: None,
            };

            let result = match results.next_if(|(index, _)| *index == plan.segment_index) {
                Some((_, result)) => result,
                None => {
                    reports.push(report);
                    continue;
                }
            };

            match result {
                Ok(mut generated) => {
                    if generated.len() > requested as usize {
                        info!(
                            segment = plan.segment_index,
                            requested,
                            received = generated.len(),
                            "Dropping surplus questions"
                        );
                        generated.truncate(requested as usize);
                    } else if generated.len() < requested as usize {
                        warn!(
                            segment = plan.segment_index,
                            requested,
                            received = generated.len(),
                            "Segment produced fewer questions than requested"
                        );
                    }
                    report.produced = generated.len() as u32;
                    questions.extend(generated);
                }
                Err(e) => {
                    warn!(
                        segment = plan.segment_index,
                        transient = e.is_transient(),
                        error = %e,
                        "Question generation failed for segment"
                    );
                    report.error = Some(e.to_string());
                    failed_segments.push(plan.segment_index);
                }
            }
            reports.push(report);
        }

        info!(
            produced = questions.len(),
            requested = spec.total_questions,
            failed = failed_segments.len(),
            "Quiz generation finished"
        );

        Ok(QuizOutcome {
            questions,
            topic: topic.map(str::to_string),
            total_questions: spec.total_questions,
            segments: reports,
            failed_segments,
            text_processing: TextProcessing {
                input_length: text.trim().chars().count(),
                chunking_used: planned.segments.len() > 1,
                max_chunk_size: spec.chunk_max_chars,
            },
            summary,
            generated_at: Utc::now(),
        })
    }
}
