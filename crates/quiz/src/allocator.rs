//! Question apportionment across segments, then across question types and
//! difficulty levels within each segment.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use quizgen_core::config::TieBreak;
use quizgen_core::{dedup_preserving_order, DifficultyLevel, QuestionType};
use quizgen_ingest::Segment;

use crate::apportion::{equal_split, largest_remainder};
use crate::request::QuestionRequestSpec;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
}

/// How many questions one segment should produce, and of which kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationPlan {
    pub segment_index: usize,
    pub questions_for_segment: u32,
    /// Requested order; zero-count entries are kept.
    pub type_distribution: IndexMap<QuestionType, u32>,
    pub difficulty_distribution: IndexMap<DifficultyLevel, u32>,
}

impl AllocationPlan {
    pub fn is_empty(&self) -> bool {
        self.questions_for_segment == 0
    }

    /// Question types with a non-zero count, in requested order.
    pub fn requested_types(&self) -> Vec<QuestionType> {
        self.type_distribution
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(t, _)| *t)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Allocator {
    tie_break: TieBreak,
}

impl Allocator {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// One plan per segment, in segment order.
    pub fn allocate(
        &self,
        segments: &[Segment],
        spec: &QuestionRequestSpec,
    ) -> Result<Vec<AllocationPlan>, AllocationError> {
        let sizes: Vec<usize> = segments.iter().map(|s| s.char_length).collect();
        let mut plans = self.allocate_sizes(&sizes, spec)?;
        for (plan, segment) in plans.iter_mut().zip(segments) {
            plan.segment_index = segment.index;
        }
        Ok(plans)
    }

    /// Same as [`allocate`](Self::allocate) but over bare segment lengths;
    /// plans are indexed by position.
    pub fn allocate_sizes(
        &self,
        sizes: &[usize],
        spec: &QuestionRequestSpec,
    ) -> Result<Vec<AllocationPlan>, AllocationError> {
        let types = dedup_preserving_order(&spec.question_types);
        let levels = dedup_preserving_order(&spec.difficulty_levels);

        if types.is_empty() {
            return Err(AllocationError::InvalidDistribution(
                "at least one question type is required".into(),
            ));
        }
        if levels.is_empty() {
            return Err(AllocationError::InvalidDistribution(
                "at least one difficulty level is required".into(),
            ));
        }
        if spec.total_questions == 0 {
            return Err(AllocationError::InvalidDistribution(
                "total_questions must be greater than zero".into(),
            ));
        }
        if sizes.is_empty() {
            return Err(AllocationError::InvalidDistribution(
                "no segments to allocate questions to".into(),
            ));
        }

        let weights: Vec<u64> = sizes.iter().map(|&s| s as u64).collect();
        let per_segment = largest_remainder(spec.total_questions, &weights, 0);

        let plans: Vec<AllocationPlan> = per_segment
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let priority = match self.tie_break {
                    TieBreak::FirstListed => 0,
                    TieBreak::Rotating => i,
                };
                AllocationPlan {
                    segment_index: i,
                    questions_for_segment: n,
                    type_distribution: distribute(n, &types, priority),
                    difficulty_distribution: distribute(n, &levels, priority),
                }
            })
            .collect();

        info!(
            total = spec.total_questions,
            segments = plans.len(),
            per_segment = ?per_segment,
            tie_break = self.tie_break.as_str(),
            "Allocated questions across segments"
        );

        Ok(plans)
    }
}

fn distribute<T>(n: u32, tags: &[T], priority: usize) -> IndexMap<T, u32>
where
    T: Copy + Eq + std::hash::Hash,
{
    tags.iter()
        .copied()
        .zip(equal_split(n, tags.len(), priority))
        .collect()
}
