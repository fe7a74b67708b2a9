//! Integration tests for the quiz pipeline.
//!
//! A scripted `QuestionGenerator` stands in for the model, so these run
//! without network access or API keys.

mod fakes;
mod generation;
mod planning;
