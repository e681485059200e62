//! Coarse reading-direction detection.
//!
//! This is not the Unicode bidirectional algorithm. A text is right-to-left
//! as soon as it contains one character from the Arabic block
//! (U+0600..=U+06FF); Hebrew, Syriac and the Arabic supplements are treated
//! as left-to-right.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Reading direction of a preview block or a shaping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    pub fn is_rtl(self) -> bool {
        self == TextDirection::RightToLeft
    }
}

/// Whether `c` lies in the Arabic Unicode block.
pub fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Direction of a whole sample text.
pub fn detect_direction(text: &str) -> TextDirection {
    if text.chars().any(is_arabic) {
        TextDirection::RightToLeft
    } else {
        TextDirection::LeftToRight
    }
}

/// A maximal byte range of `text` shaped in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionRun {
    pub range: Range<usize>,
    pub direction: TextDirection,
}

/// Split `text` into runs of Arabic and non-Arabic graphemes, in logical order.
///
/// A grapheme takes the direction of its first character. Whitespace and
/// punctuation are neutral. A neutral span between two strong runs of the
/// same direction joins them; between runs of different directions it takes
/// the paragraph direction from [`detect_direction`]. Leading neutrals join
/// the first strong run and trailing neutrals join the last one.
pub fn split_direction_runs(text: &str) -> Vec<DirectionRun> {
    let paragraph = detect_direction(text);

    // (range, strong direction or None for a neutral)
    let mut segments: Vec<(Range<usize>, Option<TextDirection>)> = Vec::new();
    for (offset, grapheme) in text.grapheme_indices(true) {
        let Some(first) = grapheme.chars().next() else {
            continue;
        };
        let strong = if is_arabic(first) {
            Some(TextDirection::RightToLeft)
        } else if first.is_whitespace() || first.is_ascii_punctuation() {
            None
        } else {
            Some(TextDirection::LeftToRight)
        };
        segments.push((offset..offset + grapheme.len(), strong));
    }

    let mut runs: Vec<DirectionRun> = Vec::new();
    let mut position = 0;
    while position < segments.len() {
        let (range, strong) = segments[position].clone();
        let (range, direction) = match strong {
            Some(direction) => {
                position += 1;
                (range, direction)
            }
            None => {
                // Whole neutral span at once
                let span_end = segments[position..]
                    .iter()
                    .position(|(_, strong)| strong.is_some())
                    .map_or(segments.len(), |n| position + n);
                let before = runs.last().map(|run| run.direction);
                let after = segments.get(span_end).and_then(|(_, strong)| *strong);
                let direction = match (before, after) {
                    (Some(before), Some(after)) if before == after => before,
                    (Some(_), Some(_)) => paragraph,
                    (Some(only), None) | (None, Some(only)) => only,
                    (None, None) => paragraph,
                };
                let end = segments[span_end - 1].0.end;
                position = span_end;
                (range.start..end, direction)
            }
        };

        match runs.last_mut() {
            Some(run) if run.direction == direction => run.range.end = range.end,
            _ => runs.push(DirectionRun { range, direction }),
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_sample_is_rtl() {
        assert_eq!(detect_direction("Hello مرحبا"), TextDirection::RightToLeft);
    }

    #[test]
    fn test_latin_sample_is_ltr() {
        assert_eq!(detect_direction("Hello World"), TextDirection::LeftToRight);
        assert_eq!(detect_direction(""), TextDirection::LeftToRight);
    }

    #[test]
    fn test_block_bounds_are_inclusive() {
        assert!(is_arabic('\u{0600}'));
        assert!(is_arabic('\u{06FF}'));
        assert!(!is_arabic('\u{05FF}'));
        assert!(!is_arabic('\u{0700}'));
    }

    #[test]
    fn test_hebrew_is_not_detected() {
        assert_eq!(detect_direction("שלום"), TextDirection::LeftToRight);
    }

    #[test]
    fn test_split_mixed_text() {
        let text = "Hello مرحبا";
        let runs = split_direction_runs(text);
        assert_eq!(runs.len(), 2);
        assert_eq!(&text[runs[0].range.clone()], "Hello");
        assert_eq!(runs[0].direction, TextDirection::LeftToRight);
        // The separating space follows the RTL paragraph
        assert_eq!(&text[runs[1].range.clone()], " مرحبا");
        assert_eq!(runs[1].direction, TextDirection::RightToLeft);
    }

    #[test]
    fn test_split_neutral_between_same_direction_joins_runs() {
        let text = "مرحبا, مرحبا";
        let runs = split_direction_runs(text);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].range, 0..text.len());
    }

    #[test]
    fn test_split_trailing_neutrals_join_last_run() {
        let text = "مرحبا Hello!";
        let runs = split_direction_runs(text);
        assert_eq!(runs.len(), 2);
        assert_eq!(&text[runs[0].range.clone()], "مرحبا ");
        assert!(runs[0].direction.is_rtl());
        assert_eq!(&text[runs[1].range.clone()], "Hello!");
    }

    #[test]
    fn test_split_leading_neutrals_join_first_run() {
        let text = "  مرحبا!";
        let runs = split_direction_runs(text);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].range, 0..text.len());
        assert!(runs[0].direction.is_rtl());
    }

    #[test]
    fn test_split_neutral_only_text() {
        let runs = split_direction_runs(" ... ");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].direction, TextDirection::LeftToRight);
        assert!(split_direction_runs("").is_empty());
    }
}
