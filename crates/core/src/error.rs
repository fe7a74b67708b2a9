use thiserror::Error;

/// Caller-facing validation failures raised before any segmentation or
/// allocation work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid question type: {0} (valid: multiple_choice, true_false, open_ended)")]
    InvalidQuestionType(String),

    #[error("invalid difficulty level: {0} (valid: basic, intermediate, advanced)")]
    InvalidDifficultyLevel(String),

    #[error("number of questions must be between {min} and {max}, got {actual}")]
    QuestionCountOutOfRange { min: u32, max: u32, actual: u32 },

    #[error("unsupported file type: {file_type} (allowed: {allowed})")]
    UnsupportedFileType { file_type: String, allowed: String },

    #[error("file size ({size} bytes) exceeds maximum limit of {max} bytes")]
    FileTooLarge { size: usize, max: usize },
}
