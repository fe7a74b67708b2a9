//! Split strategies tried in order on oversized units: paragraph, sentence, word.

use std::ops::Range;

use super::helpers::{pack_ranges, trim_range};

/// One tier of the segmentation cascade.
pub trait SplitStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Split `unit` at this strategy's boundaries and greedily pack the pieces
    /// up to `max_chars`. Ranges are relative to `unit`, trimmed, ordered and
    /// non-overlapping; a returned range may still exceed `max_chars` when a
    /// single piece is too large on its own.
    ///
    /// Returns `None` when the unit holds fewer than two pieces, meaning this
    /// strategy cannot make progress on it.
    fn try_split(&self, unit: &str, max_chars: usize) -> Option<Vec<Range<usize>>>;
}

/// The standard cascade: paragraphs, then sentences, then words.
pub fn default_cascade() -> Vec<Box<dyn SplitStrategy>> {
    vec![
        Box::new(ParagraphSplit),
        Box::new(SentenceSplit),
        Box::new(WordSplit),
    ]
}

fn pack_if_splittable(
    unit: &str,
    pieces: Vec<Range<usize>>,
    max_chars: usize,
) -> Option<Vec<Range<usize>>> {
    if pieces.len() < 2 {
        return None;
    }
    Some(pack_ranges(unit, pieces, max_chars))
}

// ── Paragraphs ──────────────────────────────────────────────────────────────

/// Paragraphs are runs of non-blank lines separated by one or more lines
/// containing only whitespace.
pub struct ParagraphSplit;

impl ParagraphSplit {
    pub(crate) fn paragraphs(text: &str) -> Vec<Range<usize>> {
        let mut paragraphs = Vec::new();
        let mut start: Option<usize> = None;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();
            if line.trim().is_empty() {
                if let Some(s) = start.take() {
                    paragraphs.extend(trim_range(text, s..line_start));
                }
            } else if start.is_none() {
                start = Some(line_start);
            }
        }
        if let Some(s) = start {
            paragraphs.extend(trim_range(text, s..text.len()));
        }
        paragraphs
    }
}

impl SplitStrategy for ParagraphSplit {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn try_split(&self, unit: &str, max_chars: usize) -> Option<Vec<Range<usize>>> {
        pack_if_splittable(unit, Self::paragraphs(unit), max_chars)
    }
}

// ── Sentences ───────────────────────────────────────────────────────────────

/// Sentences end after a run of `.`, `!` or `?` (plus any closing quotes or
/// brackets) that is followed by whitespace or the end of the text.
pub struct SentenceSplit;

impl SentenceSplit {
    fn is_terminal(c: char) -> bool {
        matches!(c, '.' | '!' | '?')
    }

    fn is_closer(c: char) -> bool {
        matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
    }

    pub(crate) fn sentences(text: &str) -> Vec<Range<usize>> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            if !Self::is_terminal(c) {
                continue;
            }
            // Swallow "?!", "...", and trailing quotes/brackets.
            let mut end = text.len();
            while let Some(&(j, next)) = chars.peek() {
                if Self::is_terminal(next) || Self::is_closer(next) {
                    chars.next();
                } else {
                    end = j;
                    break;
                }
            }
            let at_boundary = text[end..].chars().next().map_or(true, char::is_whitespace);
            if at_boundary {
                sentences.extend(trim_range(text, start..end));
                start = end;
            }
        }
        if start < text.len() {
            sentences.extend(trim_range(text, start..text.len()));
        }
        sentences
    }
}

impl SplitStrategy for SentenceSplit {
    fn name(&self) -> &'static str {
        "sentence"
    }

    fn try_split(&self, unit: &str, max_chars: usize) -> Option<Vec<Range<usize>>> {
        pack_if_splittable(unit, Self::sentences(unit), max_chars)
    }
}

// ── Words ───────────────────────────────────────────────────────────────────

/// Last resort: whitespace-separated words. Words themselves are never cut.
pub struct WordSplit;

impl WordSplit {
    pub(crate) fn words(text: &str) -> Vec<Range<usize>> {
        let mut words = Vec::new();
        let mut start: Option<usize> = None;
        for (i, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    words.push(s..i);
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            words.push(s..text.len());
        }
        words
    }
}

impl SplitStrategy for WordSplit {
    fn name(&self) -> &'static str {
        "word"
    }

    fn try_split(&self, unit: &str, max_chars: usize) -> Option<Vec<Range<usize>>> {
        pack_if_splittable(unit, Self::words(unit), max_chars)
    }
}
