//! Bounded-size text segmentation.
//!
//! Splits extracted document text into ordered segments of at most
//! `max_chars` characters, preferring the coarsest boundary that fits:
//! paragraphs first, then sentences, then words. Each segment is an exact
//! substring of the trimmed source, so joining the segments in order
//! rebuilds the source up to the whitespace at split points.
//!
//! The only allowed bound violation is a single word longer than
//! `max_chars`: it is kept whole and its segment carries
//! [`SegmentWarning::TooLarge`].

mod helpers;
mod strategies;
mod types;

use std::ops::Range;

use tracing::{debug, info, warn};

use helpers::char_len;
pub use strategies::{default_cascade, ParagraphSplit, SentenceSplit, SplitStrategy, WordSplit};
pub use types::{Segment, SegmentError, SegmentSummary, SegmentWarning, SegmenterConfig};


/// Splits text into [`Segment`]s using an ordered cascade of strategies.
pub struct Segmenter {
    config: SegmenterConfig,
    strategies: Vec<Box<dyn SplitStrategy>>,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self::with_strategies(config, default_cascade())
    }

    /// Use a custom cascade. Strategies are tried in order on units that are
    /// still oversized after the previous tier.
    pub fn with_strategies(config: SegmenterConfig, strategies: Vec<Box<dyn SplitStrategy>>) -> Self {
        Self { config, strategies }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Validate `text` and segment it.
    ///
    /// Fails with [`SegmentError::InputTooShort`] when the trimmed text is
    /// shorter than `min_chars`. With chunking disabled the trimmed text is
    /// returned as a single segment whatever its length.
    pub fn segment(&self, text: &str) -> Result<Vec<Segment>, SegmentError> {
        if self.config.max_chars == 0 {
            return Err(SegmentError::ZeroMaxChars);
        }
        let source = text.trim();
        let actual = char_len(source);
        if actual < self.config.min_chars || source.is_empty() {
            return Err(SegmentError::InputTooShort {
                min: self.config.min_chars,
                actual,
            });
        }

        if !self.config.enabled {
            debug!(chars = actual, "chunking disabled, using a single segment");
            return Ok(vec![Segment::new(0, source, 0, usize::MAX)]);
        }

        Ok(self.split(source))
    }

    /// Run the cascade without input validation. Blank text yields no segments.
    pub fn split(&self, text: &str) -> Vec<Segment> {
        let source = text.trim();
        if source.is_empty() {
            return Vec::new();
        }
        let max_chars = self.config.max_chars;
        let total_chars = char_len(source);

        if total_chars <= max_chars {
            return vec![Segment::new(0, source, 0, max_chars)];
        }

        info!(
            chars = total_chars,
            max_chars, "splitting text into bounded segments"
        );

        let mut ranges = Vec::new();
        self.split_unit(source, 0..source.len(), 0, &mut ranges);

        let segments: Vec<Segment> = ranges
            .into_iter()
            .enumerate()
            .map(|(i, r)| Segment::new(i, &source[r.clone()], r.start, max_chars))
            .collect();

        for seg in segments.iter().filter(|s| s.is_oversized()) {
            warn!(
                segment = seg.index,
                chars = seg.char_length,
                max_chars,
                "segment exceeds max_chars: contains an unsplittable word"
            );
        }
        info!(segments = segments.len(), "segmentation complete");
        segments
    }

    /// Emit ranges of `text` covering `range`, descending to finer tiers only
    /// for pieces that still exceed `max_chars`.
    fn split_unit(&self, text: &str, range: Range<usize>, tier: usize, out: &mut Vec<Range<usize>>) {
        let max_chars = self.config.max_chars;
        if char_len(&text[range.clone()]) <= max_chars {
            out.push(range);
            return;
        }
        let Some(strategy) = self.strategies.get(tier) else {
            out.push(range);
            return;
        };

        match strategy.try_split(&text[range.clone()], max_chars) {
            Some(pieces) => {
                debug!(strategy = strategy.name(), pieces = pieces.len(), "split oversized unit");
                for piece in pieces {
                    let abs = range.start + piece.start..range.start + piece.end;
                    self.split_unit(text, abs, tier + 1, out);
                }
            }
            None => self.split_unit(text, range, tier + 1, out),
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmenterConfig::default())
    }
}

/// Segment `text` into pieces of at most `max_chars` with the default
/// cascade, skipping the minimum-length check.
pub fn segment_text(text: &str, max_chars: usize) -> Vec<Segment> {
    Segmenter::new(SegmenterConfig {
        max_chars,
        min_chars: 0,
        enabled: true,
    })
    .split(text)
}
