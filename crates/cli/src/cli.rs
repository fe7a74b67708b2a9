use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Generate quiz questions from documents.
///
/// Long inputs are split into segments and the requested questions are
/// apportioned across them by size before any model is called.
#[derive(Parser, Debug)]
#[command(name = "quizgen", about = "Generate quiz questions from documents")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Segment the input and print the allocation plan (no model calls)
    Plan(QuizArgs),
    /// Run the full pipeline and print the generated quiz as JSON
    Generate(GenerateArgs),
    /// Print request limits and processing settings
    Limits,
    /// List the question types and difficulty levels a request may use
    Types,
    /// Check that the configured LLM provider answers
    Check,
}

#[derive(Args, Debug)]
pub struct QuizArgs {
    /// Document to read (pdf, docx or txt)
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    pub file: Option<PathBuf>,

    /// Inline text instead of a file
    #[arg(long)]
    pub text: Option<String>,

    /// Total number of questions
    #[arg(short = 'n', long = "num-questions", default_value_t = 5)]
    pub num_questions: u32,

    /// Comma-separated question types (multiple_choice, true_false, open_ended)
    #[arg(short = 't', long = "types", default_value = "multiple_choice")]
    pub question_types: String,

    /// Comma-separated difficulty levels (basic, intermediate, advanced)
    #[arg(short = 'd', long = "difficulty", default_value = "intermediate")]
    pub difficulty_levels: String,

    /// Override CHUNK_MAX_CHARS
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Send the whole text as a single segment
    #[arg(long)]
    pub no_chunking: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub quiz: QuizArgs,

    /// Optional topic to focus the questions on
    #[arg(long)]
    pub topic: Option<String>,

    /// Override GENERATION_CONCURRENCY
    #[arg(long)]
    pub concurrency: Option<usize>,
}
