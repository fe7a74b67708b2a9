//! End-to-end runs against the scripted generator.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use quizgen_core::config::ChunkingConfig;
use quizgen_core::QuestionType::*;
use quizgen_quiz::{QuizPipeline, SegmentReport};

use crate::fakes::{paragraphs, request, FakeGenerator, Script};

#[tokio::test]
async fn full_run_collects_all_questions_in_order() {
    let chunking = ChunkingConfig::default();
    let fake = Arc::new(FakeGenerator::new());
    let pipeline = QuizPipeline::new(fake.clone(), &chunking).with_concurrency(3);
    let text = paragraphs(18, 500);

    let outcome = pipeline
        .run(&text, &request(10, &[MultipleChoice, TrueFalse], &chunking), None)
        .await
        .unwrap();

    assert_eq!(outcome.questions.len(), 10);
    assert!(outcome.is_complete());
    let owners: Vec<usize> = outcome.questions.iter().map(|q| q.segment_index).collect();
    assert_eq!(owners, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2]);
    assert!(outcome.text_processing.chunking_used);
    assert_eq!(outcome.text_processing.max_chunk_size, 4000);
    assert_eq!(outcome.text_processing.input_length, 9034);
    assert_eq!(outcome.summary.segment_sizes, vec![3512, 3512, 2006]);
}

#[tokio::test]
async fn results_are_rejoined_in_segment_order() {
    let chunking = ChunkingConfig::default();
    // Earlier segments finish last.
    let fake = Arc::new(FakeGenerator::new().delay(0, 60).delay(1, 30));
    let pipeline = QuizPipeline::new(fake.clone(), &chunking).with_concurrency(3);

    let outcome = pipeline
        .run(&paragraphs(18, 500), &request(10, &[TrueFalse], &chunking), None)
        .await
        .unwrap();

    let owners: Vec<usize> = outcome.questions.iter().map(|q| q.segment_index).collect();
    let mut sorted = owners.clone();
    sorted.sort_unstable();
    assert_eq!(owners, sorted);
    let report_order: Vec<usize> = outcome.segments.iter().map(|r| r.segment_index).collect();
    assert_eq!(report_order, vec![0, 1, 2]);
}

#[tokio::test]
async fn concurrency_limit_is_respected() {
    let chunking = ChunkingConfig {
        chunk_max_chars: 600,
        ..ChunkingConfig::default()
    };
    let mut fake = FakeGenerator::new();
    for i in 0..6 {
        fake = fake.delay(i, 20);
    }
    let fake = Arc::new(fake);
    let pipeline = QuizPipeline::new(fake.clone(), &chunking).with_concurrency(2);

    let outcome = pipeline
        .run(&paragraphs(6, 500), &request(6, &[TrueFalse], &chunking), None)
        .await
        .unwrap();

    assert_eq!(outcome.questions.len(), 6);
    assert!(fake.peak_in_flight.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn failed_segment_is_isolated() {
    let chunking = ChunkingConfig::default();
    let fake = Arc::new(FakeGenerator::new().script(1, Script::Fail));
    let pipeline = QuizPipeline::new(fake.clone(), &chunking).with_concurrency(2);

    let outcome = pipeline
        .run(&paragraphs(18, 500), &request(10, &[MultipleChoice], &chunking), Some("biology"))
        .await
        .unwrap();

    assert_eq!(outcome.failed_segments, vec![1]);
    assert_eq!(outcome.questions.len(), 6);
    assert!(!outcome.is_complete());
    assert!(outcome.questions.iter().all(|q| q.segment_index != 1));

    let failed = &outcome.segments[1];
    assert_eq!(failed.requested, 4);
    assert_eq!(failed.produced, 0);
    assert!(failed.error.as_deref().unwrap().contains("scripted failure"));
}

#[tokio::test]
async fn surplus_is_truncated_and_shortfall_reported() {
    let chunking = ChunkingConfig::default();
    let fake = Arc::new(
        FakeGenerator::new()
            .script(0, Script::Count(9))
            .script(2, Script::Count(1)),
    );
    let pipeline = QuizPipeline::new(fake.clone(), &chunking);

    let outcome = pipeline
        .run(&paragraphs(18, 500), &request(10, &[TrueFalse], &chunking), None)
        .await
        .unwrap();

    assert_eq!(
        outcome.segments,
        vec![
            SegmentReport { segment_index: 0, requested: 4, produced: 4, error: None },
            SegmentReport { segment_index: 1, requested: 4, produced: 4, error: None },
            SegmentReport { segment_index: 2, requested: 2, produced: 1, error: None },
        ]
    );
    assert_eq!(outcome.questions.len(), 9);
    assert!(outcome.failed_segments.is_empty());
    assert!(!outcome.is_complete());
}

#[tokio::test]
async fn zero_quota_segments_are_not_sent() {
    let chunking = ChunkingConfig {
        chunk_max_chars: 600,
        ..ChunkingConfig::default()
    };
    let fake = Arc::new(FakeGenerator::new());
    let pipeline = QuizPipeline::new(fake.clone(), &chunking).with_concurrency(4);

    // Four equal segments, two questions: only the first two get one each.
    let outcome = pipeline
        .run(&paragraphs(4, 500), &request(2, &[OpenEnded], &chunking), None)
        .await
        .unwrap();

    assert_eq!(fake.called_segments(), vec![0, 1]);
    assert_eq!(outcome.segments.len(), 4);
    assert_eq!(outcome.segments[3].requested, 0);
    assert_eq!(outcome.questions.len(), 2);
    assert!(outcome.is_complete());
}

#[tokio::test]
async fn outcome_serializes_with_timestamp() {
    let chunking = ChunkingConfig::default();
    let pipeline = QuizPipeline::new(Arc::new(FakeGenerator::new()), &chunking);
    let outcome = pipeline
        .run(&paragraphs(2, 300), &request(2, &[TrueFalse], &chunking), None)
        .await
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["generated_at"].is_string());
    assert_eq!(json["text_processing"]["chunking_used"], false);
    assert_eq!(json["questions"].as_array().unwrap().len(), 2);
    assert!(json["segments"][0].get("error").is_none());
}

#[tokio::test]
async fn outcome_echoes_topic_and_requested_total() {
    let chunking = ChunkingConfig::default();
    let pipeline = QuizPipeline::new(Arc::new(FakeGenerator::new()), &chunking);
    let spec = request(3, &[MultipleChoice], &chunking);

    let outcome = pipeline
        .run(&paragraphs(2, 300), &spec, Some("cell biology"))
        .await
        .unwrap();
    assert_eq!(outcome.topic.as_deref(), Some("cell biology"));
    assert_eq!(outcome.total_questions, 3);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["topic"], "cell biology");
    assert_eq!(json["total_questions"], 3);

    let untitled = pipeline.run(&paragraphs(2, 300), &spec, None).await.unwrap();
    assert!(serde_json::to_value(&untitled).unwrap()["topic"].is_null());
}
