//! Estimated reading time of a post.

use super::rich_text::as_text;
use super::ContentSection;

/// Assumed reading speed.
pub const WORDS_PER_MINUTE: usize = 200;

/// Count whitespace-separated words across every section's heading and body.
#[must_use]
pub fn count_words(content: &[ContentSection]) -> usize {
    content
        .iter()
        .map(|section| {
            section.heading.split_whitespace().count()
                + as_text(&section.body).split_whitespace().count()
        })
        .sum()
}

/// Estimated reading time in whole minutes, rounded up.
///
/// A post without content reads in 0 minutes.
#[must_use]
pub fn estimate(content: &[ContentSection]) -> u32 {
    let words = count_words(content);
    let minutes = words.div_ceil(WORDS_PER_MINUTE);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::rich_text::RichTextBlock;

    fn section_with_words(heading_words: usize, body_words: usize) -> ContentSection {
        ContentSection {
            heading: vec!["título"; heading_words].join(" "),
            body: vec![RichTextBlock::paragraph(vec!["palavra"; body_words].join(" "))],
        }
    }

    #[test]
    fn test_empty_content_is_zero() {
        assert_eq!(estimate(&[]), 0);
    }

    #[test]
    fn test_zero_words_is_zero() {
        let section = ContentSection {
            heading: String::new(),
            body: Vec::new(),
        };
        assert_eq!(estimate(&[section]), 0);
    }

    #[test]
    fn test_rounding_boundaries() {
        for (words, minutes) in [(1, 1), (200, 1), (201, 2), (400, 2), (401, 3)] {
            assert_eq!(
                estimate(&[section_with_words(0, words)]),
                minutes,
                "{words} words"
            );
        }
    }

    #[test]
    fn test_headings_count_as_words() {
        let content = vec![section_with_words(2, 198), section_with_words(1, 0)];
        assert_eq!(count_words(&content), 201);
        assert_eq!(estimate(&content), 2);
    }

    #[test]
    fn test_blocks_do_not_merge_words() {
        let section = ContentSection {
            heading: "Intro".to_string(),
            body: vec![
                RichTextBlock::paragraph("first"),
                RichTextBlock::paragraph("second\nthird"),
            ],
        };
        assert_eq!(count_words(&[section]), 4);
    }
}
