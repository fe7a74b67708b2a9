//! Segmenter configuration, output types and errors.

use serde::Serialize;
use thiserror::Error;

use quizgen_core::config::ChunkingConfig;

use super::helpers::{char_len, estimate_tokens};

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the segmenter.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Maximum characters per segment (default: 4000).
    pub max_chars: usize,
    /// Minimum trimmed input length accepted by `Segmenter::segment` (default: 50).
    pub min_chars: usize,
    /// When false, `segment` returns the whole text as one segment.
    pub enabled: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_chars: 4000,
            min_chars: 50,
            enabled: true,
        }
    }
}

impl From<&ChunkingConfig> for SegmenterConfig {
    fn from(c: &ChunkingConfig) -> Self {
        Self {
            max_chars: c.chunk_max_chars,
            min_chars: c.min_text_chars,
            enabled: c.chunking_enabled,
        }
    }
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("text is too short: {actual} characters after trimming, at least {min} required")]
    InputTooShort { min: usize, actual: usize },
    #[error("max_chars must be greater than zero")]
    ZeroMaxChars,
}

/// Non-fatal condition attached to a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentWarning {
    /// A single word longer than `max_chars` could not be split without
    /// cutting it, so the segment exceeds the limit.
    TooLarge { char_length: usize, max_chars: usize },
}

// ── Segment output ──────────────────────────────────────────────────────────

/// A contiguous slice of the source text, within `max_chars` unless
/// `warning` says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// 0-based position in document order.
    pub index: usize,
    pub text: String,
    /// Byte offset of `text` inside the trimmed source.
    pub byte_offset: usize,
    /// Unicode scalar count of `text`.
    pub char_length: usize,
    pub estimated_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<SegmentWarning>,
}

impl Segment {
    pub(crate) fn new(index: usize, text: &str, byte_offset: usize, max_chars: usize) -> Self {
        let char_length = char_len(text);
        let warning = (char_length > max_chars).then_some(SegmentWarning::TooLarge {
            char_length,
            max_chars,
        });
        Self {
            index,
            text: text.to_string(),
            byte_offset,
            char_length,
            estimated_tokens: estimate_tokens(char_length),
            warning,
        }
    }

    pub fn is_oversized(&self) -> bool {
        self.warning.is_some()
    }
}

// ── Summary ─────────────────────────────────────────────────────────────────

/// Aggregate figures about a segmentation run, reported alongside a quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub total_segments: usize,
    pub total_characters: usize,
    pub estimated_total_tokens: usize,
    pub average_segment_size: usize,
    pub segment_sizes: Vec<usize>,
}

impl SegmentSummary {
    pub fn from_segments(segments: &[Segment]) -> Self {
        let total_characters: usize = segments.iter().map(|s| s.char_length).sum();
        let estimated_total_tokens = segments.iter().map(|s| s.estimated_tokens).sum();
        Self {
            total_segments: segments.len(),
            total_characters,
            estimated_total_tokens,
            average_segment_size: total_characters.checked_div(segments.len()).unwrap_or(0),
            segment_sizes: segments.iter().map(|s| s.char_length).collect(),
        }
    }
}
