//! Planning (segment + allocate) without generation.

use std::sync::Arc;

use quizgen_core::config::{ChunkingConfig, TieBreak};
use quizgen_core::QuestionType::*;
use quizgen_quiz::{QuizError, QuizPipeline};

use crate::fakes::{paragraphs, request, FakeGenerator};

#[test]
fn nine_thousand_chars_ten_questions() {
    let chunking = ChunkingConfig::default();
    let pipeline = QuizPipeline::new(Arc::new(FakeGenerator::new()), &chunking);
    let text = paragraphs(18, 500);

    let planned = pipeline
        .plan(&text, &request(10, &[MultipleChoice, TrueFalse], &chunking))
        .unwrap();

    assert_eq!(planned.segments.len(), 3);
    let counts: Vec<u32> = planned.plans.iter().map(|p| p.questions_for_segment).collect();
    assert_eq!(counts, vec![4, 4, 2]);
    for plan in &planned.plans {
        let half = plan.questions_for_segment / 2;
        assert_eq!(plan.type_distribution[&MultipleChoice], half);
        assert_eq!(plan.type_distribution[&TrueFalse], half);
    }
}

#[test]
fn disabled_chunking_plans_one_segment() {
    let chunking = ChunkingConfig {
        chunking_enabled: false,
        ..ChunkingConfig::default()
    };
    let pipeline = QuizPipeline::new(Arc::new(FakeGenerator::new()), &chunking);
    let planned = pipeline
        .plan(&paragraphs(18, 500), &request(7, &[OpenEnded], &chunking))
        .unwrap();
    assert_eq!(planned.segments.len(), 1);
    assert_eq!(planned.plans[0].questions_for_segment, 7);
}

#[test]
fn rotating_tie_break_comes_from_chunking_config() {
    let chunking = ChunkingConfig {
        chunk_max_chars: 1000,
        tie_break: TieBreak::Rotating,
        ..ChunkingConfig::default()
    };
    let pipeline = QuizPipeline::new(Arc::new(FakeGenerator::new()), &chunking);
    assert_eq!(pipeline.tie_break(), TieBreak::Rotating);

    // Three equal 900-char segments, one question each.
    let planned = pipeline
        .plan(&paragraphs(3, 900), &request(3, &[MultipleChoice, TrueFalse, OpenEnded], &chunking))
        .unwrap();
    let firsts: Vec<_> = planned.plans.iter().map(|p| p.requested_types()).collect();
    assert_eq!(firsts, vec![vec![MultipleChoice], vec![TrueFalse], vec![OpenEnded]]);
}

#[test]
fn zero_questions_is_rejected() {
    let chunking = ChunkingConfig::default();
    let pipeline = QuizPipeline::new(Arc::new(FakeGenerator::new()), &chunking);
    let err = pipeline
        .plan(&paragraphs(2, 200), &request(0, &[TrueFalse], &chunking))
        .unwrap_err();
    assert!(matches!(err, QuizError::Allocation(_)));
}

#[test]
fn planned_quiz_serializes_for_display() {
    let chunking = ChunkingConfig::default();
    let pipeline = QuizPipeline::new(Arc::new(FakeGenerator::new()), &chunking);
    let planned = pipeline
        .plan(&paragraphs(2, 200), &request(3, &[TrueFalse, MultipleChoice], &chunking))
        .unwrap();
    let json = serde_json::to_value(&planned).unwrap();
    assert_eq!(json["plans"][0]["questions_for_segment"], 3);
    assert_eq!(json["plans"][0]["type_distribution"]["true_false"], 2);
    assert_eq!(json["plans"][0]["type_distribution"]["multiple_choice"], 1);
}
