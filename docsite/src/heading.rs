//! Heading extraction from raw Markdown text
//!
//! Extraction is line based rather than going through a Markdown parser:
//! any line of the form `## text`, `### text` or `#### text` is a heading,
//! including lines that sit inside fenced code blocks. Code fences are not
//! tracked.

use crate::slug::slugify;
use regex::Regex;
use std::fmt;
use std::str::Lines;
use std::sync::OnceLock;

fn heading_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(#{2,4})\s+(.+)$").expect("heading pattern is valid"))
}

/// Nesting level of a navigable heading
///
/// Level 1 is the page title and levels 5 and deeper are too fine-grained
/// for the table of contents, so neither is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Map a count of leading `#` characters to a level
    pub fn from_marker_len(len: usize) -> Option<Self> {
        match len {
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            4 => Some(HeadingLevel::H4),
            _ => None,
        }
    }

    /// Numeric heading level (2, 3 or 4)
    pub fn as_u8(self) -> u8 {
        match self {
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    /// Indentation steps relative to the base level
    pub fn indent_steps(self) -> usize {
        usize::from(self.as_u8() - 2)
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.as_u8())
    }
}

/// A navigable heading found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingDescriptor {
    /// Anchor id, `slugify(text)`
    pub id: String,

    /// Heading text as authored, trimmed
    pub text: String,

    /// Heading level
    pub level: HeadingLevel,
}

impl HeadingDescriptor {
    /// Build a descriptor, deriving the id from the text
    pub fn new(text: impl Into<String>, level: HeadingLevel) -> Self {
        let text = text.into();
        Self {
            id: slugify(&text),
            text,
            level,
        }
    }

    /// Parse a single line, returning a descriptor if it is a heading line
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = heading_line().captures(line)?;
        let level = HeadingLevel::from_marker_len(caps[1].len())?;
        Some(Self::new(caps[2].trim(), level))
    }
}

/// Lazy iterator over the headings of a document, in document order
#[derive(Debug, Clone)]
pub struct HeadingIter<'a> {
    lines: Lines<'a>,
}

impl Iterator for HeadingIter<'_> {
    type Item = HeadingDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.by_ref().find_map(HeadingDescriptor::parse_line)
    }
}

/// Iterate the headings of `content` lazily
///
/// Calling this twice on the same text yields identical sequences.
pub fn headings(content: &str) -> HeadingIter<'_> {
    HeadingIter {
        lines: content.lines(),
    }
}

/// Extract every level 2-4 heading from `content`, in document order
///
/// Text without headings yields an empty vector; there is no failure case.
pub fn extract_headings(content: &str) -> Vec<HeadingDescriptor> {
    headings(content).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_levels_two_to_four() {
        let content = "# Title\n\n## Overview\n### Details\n#### Fine print\n##### Too deep\n";
        let headings = extract_headings(content);

        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].level, HeadingLevel::H2);
        assert_eq!(headings[1].level, HeadingLevel::H3);
        assert_eq!(headings[2].level, HeadingLevel::H4);
        assert_eq!(headings[2].id, "fine-print");
    }

    #[test]
    fn test_level_one_is_excluded() {
        assert!(extract_headings("# Introduction\n").is_empty());
    }

    #[test]
    fn test_marker_requires_whitespace() {
        assert!(extract_headings("##NoSpace\n").is_empty());
        assert_eq!(extract_headings("##\tTabbed\n")[0].text, "Tabbed");
    }

    #[test]
    fn test_heading_must_start_line() {
        assert!(extract_headings("  ## Indented\ntext ## inline\n").is_empty());
    }

    #[test]
    fn test_text_is_trimmed() {
        let headings = extract_headings("##   Spaced out   \n");
        assert_eq!(headings[0].text, "Spaced out");
        assert_eq!(headings[0].id, "spaced-out");
    }

    #[test]
    fn test_crlf_line_endings() {
        let headings = extract_headings("## First\r\n## Second\r\n");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "First");
        assert_eq!(headings[1].id, "second");
    }

    #[test]
    fn test_code_fence_headings_are_extracted() {
        let content = "## Real\n```sh\n## not really a heading\n```\n";
        let headings = extract_headings(content);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[1].id, "not-really-a-heading");
    }

    #[test]
    fn test_document_order_is_kept() {
        let content = "#### Deep\n## Shallow\n### Middle\n";
        let ids: Vec<_> = extract_headings(content).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["deep", "shallow", "middle"]);
    }

    #[test]
    fn test_lazy_iterator_is_restartable() {
        let content = "## One\n## Two\n";
        let first: Vec<_> = headings(content).collect();
        let second: Vec<_> = headings(content).collect();
        assert_eq!(first, second);
        assert_eq!(headings(content).next().map(|h| h.text), Some("One".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_headings("").is_empty());
        assert!(extract_headings("just a paragraph\n").is_empty());
    }

    #[test]
    fn test_level_indent_steps() {
        assert_eq!(HeadingLevel::H2.indent_steps(), 0);
        assert_eq!(HeadingLevel::H3.indent_steps(), 1);
        assert_eq!(HeadingLevel::H4.indent_steps(), 2);
        assert_eq!(HeadingLevel::from_marker_len(5), None);
        assert_eq!(HeadingLevel::H3.to_string(), "h3");
    }
}
