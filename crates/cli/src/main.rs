mod cli;
mod input;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use quizgen_core::config::ChunkingConfig;
use quizgen_core::{parse_tag_list, Config, DifficultyLevel, QuestionType, TagCatalog};
use quizgen_ingest::{SegmentSummary, Segmenter};
use quizgen_quiz::{Allocator, LlmQuestionGenerator, QuestionRequestSpec, QuizPipeline};

use crate::cli::{CliArgs, Command, GenerateArgs, QuizArgs};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    quizgen_core::config::load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    match args.command {
        Command::Plan(quiz) => plan(&config, &quiz),
        Command::Generate(generate_args) => generate(&config, &generate_args).await,
        Command::Limits => print_json(&config.limits_summary()),
        Command::Types => print_json(&TagCatalog::new()),
        Command::Check => check(&config).await,
    }
}

/// Chunking settings for this run: config values with CLI overrides applied.
fn chunking_for(config: &Config, args: &QuizArgs) -> ChunkingConfig {
    let mut chunking = config.chunking.clone();
    if let Some(max_chars) = args.max_chars {
        chunking.chunk_max_chars = max_chars;
    }
    if args.no_chunking {
        chunking.chunking_enabled = false;
    }
    chunking
}

fn build_request(config: &Config, args: &QuizArgs, chunking: &ChunkingConfig) -> Result<QuestionRequestSpec> {
    config.limits.check_question_count(args.num_questions)?;
    let types: Vec<QuestionType> = parse_tag_list(&args.question_types)?;
    let levels: Vec<DifficultyLevel> = parse_tag_list(&args.difficulty_levels)?;
    Ok(QuestionRequestSpec::new(args.num_questions, &types, &levels, chunking))
}

#[derive(Serialize)]
struct PlanReport<'a> {
    request: &'a QuestionRequestSpec,
    summary: SegmentSummary,
    plans: Vec<quizgen_quiz::AllocationPlan>,
}

fn plan(config: &Config, args: &QuizArgs) -> Result<()> {
    let chunking = chunking_for(config, args);
    let request = build_request(config, args, &chunking)?;
    let text = input::load_text(args, &config.limits)?;

    let segments = Segmenter::new(request.segmenter_config(chunking.min_text_chars))
        .segment(&text)
        .context("segmentation failed")?;
    let plans = Allocator::new(chunking.tie_break)
        .allocate(&segments, &request)
        .context("allocation failed")?;

    print_json(&PlanReport {
        request: &request,
        summary: SegmentSummary::from_segments(&segments),
        plans,
    })
}

async fn generate(config: &Config, args: &GenerateArgs) -> Result<()> {
    let chunking = chunking_for(config, &args.quiz);
    let request = build_request(config, &args.quiz, &chunking)?;
    let text = input::load_text(&args.quiz, &config.limits)?;

    let generator = LlmQuestionGenerator::from_config(&config.llm, &config.ollama)
        .context("failed to create LLM provider")?;
    let concurrency = args.concurrency.unwrap_or(config.llm.concurrency);
    let pipeline = QuizPipeline::new(Arc::new(generator), &chunking).with_concurrency(concurrency);

    let outcome = pipeline
        .run(&text, &request, args.topic.as_deref())
        .await
        .context("quiz generation failed")?;

    if outcome.questions.is_empty() {
        anyhow::bail!(
            "no valid questions generated (failed segments: {:?})",
            outcome.failed_segments
        );
    }
    if !outcome.is_complete() {
        warn!(
            produced = outcome.questions.len(),
            requested = outcome.requested(),
            failed_segments = ?outcome.failed_segments,
            "Quiz is incomplete"
        );
    }

    print_json(&outcome)
}

async fn check(config: &Config) -> Result<()> {
    let generator = LlmQuestionGenerator::from_config(&config.llm, &config.ollama)
        .context("failed to create LLM provider")?;
    let connected = generator.test_connection().await;
    info!(provider = generator.provider_name(), connected, "Connection check finished");

    print_json(&serde_json::json!({
        "provider": generator.provider_name(),
        "model": generator.model(),
        "connected": connected,
    }))?;
    if !connected {
        anyhow::bail!("LLM provider '{}' did not respond", generator.provider_name());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
