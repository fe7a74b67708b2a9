//! Question allocation and quiz generation on top of the segmenter.

pub mod allocator;
pub mod apportion;
pub mod generator;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod request;

pub use allocator::{AllocationError, AllocationPlan, Allocator};
pub use apportion::largest_remainder;
pub use generator::{GenerationError, GenerationRequest, LlmQuestionGenerator, QuestionGenerator};
pub use pipeline::{PlannedQuiz, QuizError, QuizOutcome, QuizPipeline, SegmentReport, TextProcessing};
pub use request::QuestionRequestSpec;
