//! Range and size utilities shared by the split strategies.

use std::ops::Range;

/// Length in Unicode scalar values, the unit `max_chars` is measured in.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Rough token estimate: ~4 characters per token for English text.
pub(crate) fn estimate_tokens(char_length: usize) -> usize {
    char_length / 4
}

/// Narrow `range` to exclude leading and trailing whitespace of `text[range]`.
/// Returns `None` when nothing but whitespace remains.
pub(crate) fn trim_range(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    let start = range.start + (slice.len() - slice.trim_start().len());
    Some(start..start + trimmed.len())
}

/// Greedily merge consecutive `units` of `text` while the merged span
/// (separators included) stays within `max_chars`. A unit that is oversized
/// on its own is emitted alone so the caller can split it further.
pub(crate) fn pack_ranges(
    text: &str,
    units: Vec<Range<usize>>,
    max_chars: usize,
) -> Vec<Range<usize>> {
    let mut packed = Vec::with_capacity(units.len());
    let mut current: Option<Range<usize>> = None;

    for unit in units {
        if char_len(&text[unit.clone()]) > max_chars {
            if let Some(cur) = current.take() {
                packed.push(cur);
            }
            packed.push(unit);
            continue;
        }

        current = match current.take() {
            Some(cur) if char_len(&text[cur.start..unit.end]) <= max_chars => {
                Some(cur.start..unit.end)
            }
            Some(cur) => {
                packed.push(cur);
                Some(unit)
            }
            None => Some(unit),
        };
    }

    if let Some(cur) = current {
        packed.push(cur);
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_range_strips_both_ends() {
        let text = "  hello world \n";
        let r = trim_range(text, 0..text.len()).unwrap();
        assert_eq!(&text[r], "hello world");
    }

    #[test]
    fn trim_range_of_blank_is_none() {
        assert!(trim_range(" \n\t ", 0..4).is_none());
    }

    #[test]
    fn char_len_counts_scalars_not_bytes() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!("héllo".len(), 6);
    }

    #[test]
    fn estimate_is_quarter_of_length() {
        assert_eq!(estimate_tokens(0), 0);
        assert_eq!(estimate_tokens(9), 2);
        assert_eq!(estimate_tokens(4000), 1000);
    }

    #[test]
    fn pack_merges_until_limit() {
        let text = "aaaa bbbb cccc dddd";
        let units = vec![0..4, 5..9, 10..14, 15..19];
        let packed = pack_ranges(text, units, 9);
        let pieces: Vec<&str> = packed.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(pieces, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn pack_isolates_oversized_unit() {
        let text = "aa bbbbbbbbbb cc";
        let units = vec![0..2, 3..13, 14..16];
        let packed = pack_ranges(text, units, 5);
        let pieces: Vec<&str> = packed.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(pieces, vec!["aa", "bbbbbbbbbb", "cc"]);
    }
}
